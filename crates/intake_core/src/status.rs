//! Observable status line shared by the dispatcher and the publish gate.

use std::sync::Arc;

use shared::domain::{Status, StatusState};
use tokio::sync::watch;
use tracing::debug;

#[derive(Clone)]
pub struct StatusChannel {
    tx: Arc<watch::Sender<Status>>,
}

impl StatusChannel {
    pub fn new() -> Self {
        Self::with_initial(Status::default())
    }

    pub fn with_initial(initial: Status) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replaces state and message in one step.
    pub fn set(&self, state: StatusState, message: impl Into<String>) {
        let status = Status::new(state, message);
        debug!(state = %status.state, message = %status.message, "status transition");
        self.tx.send_replace(status);
    }

    pub fn current(&self) -> Status {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> StatusState {
        self.tx.borrow().state
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.tx.subscribe()
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StatusChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StatusChannel").field(&self.current()).finish()
    }
}
