//! Single-flight submission of prompt text to the planner.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::{domain::StatusState, error::IntakeErrorKind};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    planner::{PlanAck, PlannerClient},
    status::StatusChannel,
    surface::UiSurface,
};

const UNKNOWN_INTENT: &str = "?";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("a planner request is already in flight")]
    Busy,
}

impl DispatchError {
    pub fn kind(&self) -> IntakeErrorKind {
        IntakeErrorKind::Busy
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Nothing but whitespace; no state was touched.
    Ignored,
    Accepted(PlanAck),
    Failed {
        kind: IntakeErrorKind,
        reason: String,
    },
}

pub struct SubmissionDispatcher {
    planner: Arc<dyn PlannerClient>,
    surface: Arc<dyn UiSurface>,
    status: StatusChannel,
    in_flight: AtomicBool,
}

impl SubmissionDispatcher {
    pub fn new(
        planner: Arc<dyn PlannerClient>,
        surface: Arc<dyn UiSurface>,
        status: StatusChannel,
    ) -> Self {
        Self {
            planner,
            surface,
            status,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn status(&self) -> &StatusChannel {
        &self.status
    }

    pub async fn dispatch(&self, raw_text: &str) -> Result<DispatchOutcome, DispatchError> {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!("ignoring empty command");
            return Ok(DispatchOutcome::Ignored);
        }

        let _slot = SubmissionSlot::acquire(&self.in_flight, self.surface.as_ref())
            .ok_or(DispatchError::Busy)?;

        if let Some(shown) = self.surface.text() {
            if shown.trim() != text {
                self.surface.set_text(text);
            }
        }
        self.surface.set_sent_marker(true);
        self.status.set(StatusState::Loading, "planner: sending...");

        match self.planner.plan(text).await {
            Ok(ack) => {
                let intent = ack
                    .intent()
                    .unwrap_or_else(|| UNKNOWN_INTENT.to_string());
                info!(%intent, command = %text, "planner accepted command");
                self.status
                    .set(StatusState::Online, format!("planner: OK · intent={intent}"));
                // The sent marker stays until the next edit.
                Ok(DispatchOutcome::Accepted(ack))
            }
            Err(err) => {
                warn!(error = %err, command = %text, "planner request failed");
                self.surface.set_sent_marker(false);
                self.status
                    .set(StatusState::Offline, format!("planner: ERROR ({err})"));
                Ok(DispatchOutcome::Failed {
                    kind: err.kind(),
                    reason: err.to_string(),
                })
            }
        }
    }
}

/// Held for the duration of one planner round-trip. Dropping it re-enables
/// the prompt and hands focus back, whichever way the dispatch ended.
struct SubmissionSlot<'a> {
    flag: &'a AtomicBool,
    surface: &'a dyn UiSurface,
}

impl<'a> SubmissionSlot<'a> {
    fn acquire(flag: &'a AtomicBool, surface: &'a dyn UiSurface) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        surface.set_busy(true);
        Some(Self { flag, surface })
    }
}

impl Drop for SubmissionSlot<'_> {
    fn drop(&mut self) {
        self.surface.set_busy(false);
        self.flag.store(false, Ordering::Release);
        self.surface.focus();
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
