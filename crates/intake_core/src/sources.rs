//! Maps UI triggers onto the dispatcher and the publish gate.

use std::{str::FromStr, sync::Arc};

use thiserror::Error;
use tracing::debug;

use crate::{
    dispatcher::{DispatchError, DispatchOutcome, SubmissionDispatcher},
    gate::{DirectPublishGate, PublishOutcome},
    guard::InputLifecycleGuard,
    surface::UiSurface,
};

/// Canned buttons. Every one of them goes through the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickAction {
    Center,
    Stop,
    Circle,
    FigureEight,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Center,
        QuickAction::Stop,
        QuickAction::Circle,
        QuickAction::FigureEight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QuickAction::Center => "center",
            QuickAction::Stop => "stop",
            QuickAction::Circle => "circle",
            QuickAction::FigureEight => "figure8",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            QuickAction::Center => "Go to the center (0,0) and stop.",
            QuickAction::Stop => "STOP. Stop right now and hold your current position.",
            QuickAction::Circle => "Trace a circle of radius 200mm in 30s centered at (0,0).",
            QuickAction::FigureEight => {
                "Trace a figure eight centered at (0,0) with amplitude 200mm in 40s."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown quick action '{0}'")]
pub struct UnknownQuickAction(pub String);

impl FromStr for QuickAction {
    type Err = UnknownQuickAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        QuickAction::ALL
            .into_iter()
            .find(|action| action.name() == wanted)
            .ok_or_else(|| UnknownQuickAction(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl+Enter, or Cmd+Enter on macOS.
    pub fn is_submit(&self) -> bool {
        self.key == "Enter" && (self.ctrl || self.meta)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Send button: submits whatever the field shows.
    Submit,
    Shortcut(KeyChord),
    Quick(QuickAction),
    /// Example prompt chip: fills the field without submitting.
    Chip(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Dispatched(DispatchOutcome),
    Filled,
    Unhandled,
}

pub struct CommandIntake {
    dispatcher: SubmissionDispatcher,
    gate: DirectPublishGate,
    guard: InputLifecycleGuard,
    surface: Arc<dyn UiSurface>,
}

impl CommandIntake {
    pub fn new(
        dispatcher: SubmissionDispatcher,
        gate: DirectPublishGate,
        surface: Arc<dyn UiSurface>,
    ) -> Self {
        Self {
            dispatcher,
            gate,
            guard: InputLifecycleGuard::new(surface.clone()),
            surface,
        }
    }

    pub fn dispatcher(&self) -> &SubmissionDispatcher {
        &self.dispatcher
    }

    pub fn gate(&self) -> &DirectPublishGate {
        &self.gate
    }

    pub fn guard(&self) -> &InputLifecycleGuard {
        &self.guard
    }

    pub async fn trigger(&self, trigger: Trigger) -> Result<TriggerOutcome, DispatchError> {
        let text = match trigger {
            Trigger::Submit => self.surface.text().unwrap_or_default(),
            Trigger::Shortcut(chord) if chord.is_submit() => {
                self.surface.text().unwrap_or_default()
            }
            Trigger::Shortcut(chord) => {
                debug!(key = %chord.key, "ignoring non-submit shortcut");
                return Ok(TriggerOutcome::Unhandled);
            }
            Trigger::Quick(action) => {
                debug!(action = action.name(), "quick action");
                action.prompt().to_string()
            }
            Trigger::Chip(prompt) => {
                // The field no longer shows what was submitted.
                self.surface.set_sent_marker(false);
                self.surface.set_text(&prompt);
                self.surface.focus();
                return Ok(TriggerOutcome::Filled);
            }
        };
        self.dispatcher
            .dispatch(&text)
            .await
            .map(TriggerOutcome::Dispatched)
    }

    /// Replaces the whole prompt with `text`, the way a pasted line would.
    ///
    /// Returns `false` without touching the field while a submission is in
    /// flight: the field is read-only then, so the edit never reaches the
    /// guard.
    pub fn replace_text(&self, text: &str) -> bool {
        if self.dispatcher.is_in_flight() {
            debug!("prompt is read-only, edit dropped");
            return false;
        }
        self.guard.on_before_edit();
        self.surface.set_text(text);
        true
    }

    pub fn publish_goal(&self, x: f64, y: f64) -> PublishOutcome {
        self.gate.publish_goal(x, y)
    }
}

#[cfg(test)]
#[path = "tests/sources_tests.rs"]
mod tests;
