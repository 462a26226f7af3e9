use std::sync::Arc;

use tracing::debug;

use crate::surface::UiSurface;

/// Wipes an already-submitted prompt on the first edit that follows it.
///
/// The guard never looks at the submission slot: read-only mode blocks edits
/// while a request is in flight, and the guard works the same either way.
#[derive(Clone)]
pub struct InputLifecycleGuard {
    surface: Arc<dyn UiSurface>,
}

impl InputLifecycleGuard {
    pub fn new(surface: Arc<dyn UiSurface>) -> Self {
        Self { surface }
    }

    /// Call before a pending edit is applied. Returns `true` when the field
    /// was reset.
    pub fn on_before_edit(&self) -> bool {
        if !self.surface.sent_marker() {
            return false;
        }
        self.surface.set_text("");
        self.surface.set_sent_marker(false);
        debug!("cleared submitted prompt ahead of new input");
        true
    }
}

#[cfg(test)]
#[path = "tests/guard_tests.rs"]
mod tests;
