//! Startup sequencing: connect the bus shortly after launch, then optionally
//! kick off the robot drive.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

const START_LABEL_WORDS: [&str; 3] = ["iniciar", "start", "play"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoStart {
    #[default]
    Off,
    On,
    /// Start only when the start control's label reads like a start button.
    LegacyLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown auto-start mode '{0}'")]
pub struct UnknownAutoStart(pub String);

impl std::str::FromStr for AutoStart {
    type Err = UnknownAutoStart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" | "false" | "no" => Ok(AutoStart::Off),
            "on" | "1" | "true" | "yes" => Ok(AutoStart::On),
            "legacy_label" | "legacy-label" => Ok(AutoStart::LegacyLabel),
            _ => Err(UnknownAutoStart(s.to_string())),
        }
    }
}

/// The two black-box actions bootstrap may fire.
pub trait BootstrapTarget: Send + Sync {
    fn connect(&self);
    fn start(&self);
    fn start_label(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapPlan {
    pub connect_delay: Duration,
    /// Measured from the beginning of bootstrap, not from the connect.
    pub start_delay: Duration,
    pub auto_start: AutoStart,
}

impl Default for BootstrapPlan {
    fn default() -> Self {
        Self {
            connect_delay: Duration::from_millis(50),
            start_delay: Duration::from_millis(120),
            auto_start: AutoStart::Off,
        }
    }
}

pub fn looks_like_start_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    START_LABEL_WORDS.iter().any(|word| lower.contains(word))
}

/// Fires `connect`, then `start` when the plan allows it. Returns whether
/// `start` was fired.
pub async fn run_bootstrap(plan: BootstrapPlan, target: &dyn BootstrapTarget) -> bool {
    let began = tokio::time::Instant::now();

    tokio::time::sleep(plan.connect_delay).await;
    debug!("bootstrap connect");
    target.connect();

    if plan.auto_start == AutoStart::Off {
        return false;
    }

    tokio::time::sleep_until(began + plan.start_delay).await;
    if plan.auto_start == AutoStart::LegacyLabel {
        let label = target.start_label().unwrap_or_default();
        if !looks_like_start_label(&label) {
            debug!(%label, "start control does not look like a start button");
            return false;
        }
    }

    info!(mode = ?plan.auto_start, "bootstrap auto-start");
    target.start();
    true
}

#[cfg(test)]
#[path = "tests/bootstrap_tests.rs"]
mod tests;
