use super::*;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use anyhow::anyhow;

struct RecordingBus {
    connected: AtomicBool,
    fail_with: Option<String>,
    published: Mutex<Vec<(String, String)>>,
}

impl RecordingBus {
    fn connected() -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(true),
            fail_with: None,
            published: Mutex::new(Vec::new()),
        })
    }

    fn disconnected() -> Arc<Self> {
        let bus = Self::connected();
        bus.connected.store(false, Ordering::SeqCst);
        bus
    }

    fn failing(err: &str) -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(true),
            fail_with: Some(err.to_string()),
            published: Mutex::new(Vec::new()),
        })
    }

    fn published(&self) -> Vec<(String, String)> {
        self.published.lock().expect("published").clone()
    }
}

impl ConnectionHandle for RecordingBus {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn publish(&self, topic: &str, payload: &str) -> anyhow::Result<()> {
        if let Some(err) = &self.fail_with {
            return Err(anyhow!(err.clone()));
        }
        self.published
            .lock()
            .expect("published")
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

fn gate_with(bus: &Arc<RecordingBus>, topic: &str) -> (DirectPublishGate, StatusChannel) {
    let status = StatusChannel::new();
    let connection: Arc<dyn ConnectionHandle> = bus.clone();
    (
        DirectPublishGate::new(Some(connection), topic, status.clone()),
        status,
    )
}

#[test]
fn publishes_rounded_goal_once() {
    let bus = RecordingBus::connected();
    let (gate, status) = gate_with(&bus, "robot/goal");

    let outcome = gate.publish_goal(187.6, -4.2);

    assert_eq!(
        outcome,
        PublishOutcome::Published {
            topic: "robot/goal".into(),
            payload: r#"{"x":188,"y":-4}"#.into(),
        }
    );
    assert_eq!(
        bus.published(),
        vec![("robot/goal".to_string(), r#"{"x":188,"y":-4}"#.to_string())]
    );
    let current = status.current();
    assert_eq!(current.state, StatusState::Online);
    assert!(current.message.contains(r#"{"x":188,"y":-4}"#));
}

#[test]
fn disconnected_handle_never_publishes() {
    let bus = RecordingBus::disconnected();
    let (gate, status) = gate_with(&bus, "robot/goal");

    for (x, y) in [(0.0, 0.0), (187.6, -4.2), (f64::NAN, 1.0)] {
        assert_eq!(
            gate.publish_goal(x, y),
            PublishOutcome::Refused(IntakeErrorKind::NotConnected)
        );
    }

    assert!(bus.published().is_empty());
    let current = status.current();
    assert_eq!(current.state, StatusState::Offline);
    assert!(current.message.contains("not connected"));
}

#[test]
fn missing_handle_counts_as_disconnected() {
    let status = StatusChannel::new();
    let gate = DirectPublishGate::new(None, DEFAULT_GOAL_TOPIC, status.clone());

    assert_eq!(
        gate.publish_goal(1.0, 2.0),
        PublishOutcome::Refused(IntakeErrorKind::NotConnected)
    );
    assert_eq!(status.state(), StatusState::Offline);
}

#[test]
fn blank_topic_is_refused() {
    let bus = RecordingBus::connected();
    let (gate, status) = gate_with(&bus, "   ");

    assert_eq!(
        gate.publish_goal(1.0, 2.0),
        PublishOutcome::Refused(IntakeErrorKind::EmptyTopic)
    );
    assert!(bus.published().is_empty());
    assert!(status.current().message.contains("empty topic"));
}

#[test]
fn topic_is_trimmed_and_replaceable() {
    let bus = RecordingBus::connected();
    let (gate, _status) = gate_with(&bus, "");

    gate.set_topic("  lab/robot/goal ");
    gate.publish_goal(10.4, 10.5);

    assert_eq!(
        bus.published(),
        vec![("lab/robot/goal".to_string(), r#"{"x":10,"y":11}"#.to_string())]
    );
}

#[test]
fn non_finite_goal_is_refused() {
    let bus = RecordingBus::connected();
    let (gate, status) = gate_with(&bus, "robot/goal");

    assert_eq!(
        gate.publish_goal(f64::INFINITY, 0.0),
        PublishOutcome::Refused(IntakeErrorKind::InvalidGoal)
    );
    assert!(bus.published().is_empty());
    assert_eq!(status.state(), StatusState::Offline);
}

#[test]
fn transport_error_is_reported_offline() {
    let bus = RecordingBus::failing("socket closed");
    let (gate, status) = gate_with(&bus, "robot/goal");

    assert_eq!(
        gate.publish_goal(1.0, 1.0),
        PublishOutcome::Refused(IntakeErrorKind::PublishFailed)
    );
    let current = status.current();
    assert_eq!(current.state, StatusState::Offline);
    assert!(current.message.contains("socket closed"));
}
