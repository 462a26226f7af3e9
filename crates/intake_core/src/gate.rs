//! Direct goal publication, bypassing the planner.

use std::sync::{Arc, RwLock};

use shared::{
    domain::{Goal, StatusState},
    error::IntakeErrorKind,
    protocol::GoalMessage,
};
use tracing::{info, warn};

use crate::status::StatusChannel;

pub const DEFAULT_GOAL_TOPIC: &str = "huber/robot/goal";

/// A pub/sub client owned elsewhere. The gate only reads connectivity and
/// publishes; connecting and reconnecting are the owner's business.
pub trait ConnectionHandle: Send + Sync {
    fn is_connected(&self) -> bool;
    fn publish(&self, topic: &str, payload: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published { topic: String, payload: String },
    Refused(IntakeErrorKind),
}

pub struct DirectPublishGate {
    connection: Option<Arc<dyn ConnectionHandle>>,
    topic: RwLock<String>,
    status: StatusChannel,
}

impl DirectPublishGate {
    pub fn new(
        connection: Option<Arc<dyn ConnectionHandle>>,
        topic: impl Into<String>,
        status: StatusChannel,
    ) -> Self {
        Self {
            connection,
            topic: RwLock::new(topic.into()),
            status,
        }
    }

    pub fn set_topic(&self, topic: impl Into<String>) {
        let mut guard = self
            .topic
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = topic.into();
    }

    pub fn topic(&self) -> String {
        self.topic
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .trim()
            .to_string()
    }

    /// Publishes at most once; nothing is retried or queued.
    pub fn publish_goal(&self, x: f64, y: f64) -> PublishOutcome {
        let Some(connection) = self.connection.as_ref().filter(|c| c.is_connected()) else {
            return self.refuse(IntakeErrorKind::NotConnected, "bus: not connected".into());
        };
        let topic = self.topic();
        if topic.is_empty() {
            return self.refuse(IntakeErrorKind::EmptyTopic, "bus: empty topic".into());
        }
        let Some(goal) = Goal::from_coordinates(x, y) else {
            return self.refuse(IntakeErrorKind::InvalidGoal, "bus: invalid goal".into());
        };

        let payload = match serde_json::to_string(&GoalMessage::from(goal)) {
            Ok(payload) => payload,
            Err(err) => {
                return self.refuse(
                    IntakeErrorKind::InvalidGoal,
                    format!("bus: invalid goal ({err})"),
                )
            }
        };

        if let Err(err) = connection.publish(&topic, &payload) {
            return self.refuse(
                IntakeErrorKind::PublishFailed,
                format!("bus: publish failed ({err})"),
            );
        }

        info!(%topic, %payload, "published goal");
        self.status
            .set(StatusState::Online, format!("bus: published {payload}"));
        PublishOutcome::Published { topic, payload }
    }

    fn refuse(&self, kind: IntakeErrorKind, message: String) -> PublishOutcome {
        warn!(?kind, %message, "goal not published");
        self.status.set(StatusState::Offline, message);
        PublishOutcome::Refused(kind)
    }
}

#[cfg(test)]
#[path = "tests/gate_tests.rs"]
mod tests;
