//! The prompt field as seen by the intake core.

use std::sync::{Mutex, MutexGuard};

/// Everything the dispatcher and the input guard touch on the user-facing
/// prompt. Implementations use interior mutability; each call is applied
/// atomically with respect to the others.
pub trait UiSurface: Send + Sync {
    /// Current field text, or `None` when no display surface exists.
    fn text(&self) -> Option<String>;
    fn set_text(&self, text: &str);
    /// Disables the submit control and makes the field read-only, or undoes both.
    fn set_busy(&self, busy: bool);
    fn set_sent_marker(&self, sent: bool);
    fn sent_marker(&self) -> bool;
    fn focus(&self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptSnapshot {
    pub text: String,
    pub busy: bool,
    pub sent: bool,
    pub focus_count: u32,
}

/// In-memory prompt used by the console front-end and by tests.
#[derive(Debug, Default)]
pub struct PromptField {
    inner: Mutex<PromptSnapshot>,
}

impl PromptField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(PromptSnapshot {
                text: text.into(),
                ..PromptSnapshot::default()
            }),
        }
    }

    pub fn snapshot(&self) -> PromptSnapshot {
        self.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }

    /// Appends user keystrokes. Ignored while the field is read-only.
    pub fn type_text(&self, input: &str) -> bool {
        let mut guard = self.lock();
        if guard.busy {
            return false;
        }
        guard.text.push_str(input);
        true
    }

    fn lock(&self) -> MutexGuard<'_, PromptSnapshot> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl UiSurface for PromptField {
    fn text(&self) -> Option<String> {
        Some(self.lock().text.clone())
    }

    fn set_text(&self, text: &str) {
        self.lock().text = text.to_string();
    }

    fn set_busy(&self, busy: bool) {
        self.lock().busy = busy;
    }

    fn set_sent_marker(&self, sent: bool) {
        self.lock().sent = sent;
    }

    fn sent_marker(&self) -> bool {
        self.lock().sent
    }

    fn focus(&self) {
        self.lock().focus_count += 1;
    }
}
