//! Loopback bus for the console: publishes are printed instead of sent.

use std::sync::atomic::{AtomicBool, Ordering};

use intake_core::{BootstrapTarget, ConnectionHandle};
use tracing::info;

#[derive(Default)]
pub struct ConsoleBus {
    connected: AtomicBool,
    started: AtomicBool,
}

impl ConsoleBus {
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}

impl ConnectionHandle for ConsoleBus {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn publish(&self, topic: &str, payload: &str) -> anyhow::Result<()> {
        println!("[bus] {topic} {payload}");
        Ok(())
    }
}

impl BootstrapTarget for ConsoleBus {
    fn connect(&self) {
        self.connected.store(true, Ordering::Release);
        info!("console bus connected");
    }

    fn start(&self) {
        self.started.store(true, Ordering::Release);
        info!("robot drive started");
    }

    fn start_label(&self) -> Option<String> {
        Some("Start".into())
    }
}
