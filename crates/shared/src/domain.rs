use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    #[default]
    Idle,
    Loading,
    Online,
    Offline,
}

impl StatusState {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusState::Idle => "idle",
            StatusState::Loading => "loading",
            StatusState::Online => "online",
            StatusState::Offline => "offline",
        }
    }
}

impl std::fmt::Display for StatusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub state: StatusState,
    pub message: String,
}

impl Status {
    pub fn new(state: StatusState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new(StatusState::Idle, "planner: idle")
    }
}

/// Integer motion target published straight to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Goal {
    pub x: i64,
    pub y: i64,
}

impl Goal {
    /// Rounds to the nearest integer with halves going toward positive
    /// infinity, so `-4.5` becomes `-4`. Returns `None` for NaN, infinite or
    /// out-of-range coordinates.
    pub fn from_coordinates(x: f64, y: f64) -> Option<Self> {
        Some(Self {
            x: round_half_up(x)?,
            y: round_half_up(y)?,
        })
    }
}

fn round_half_up(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    // `value + 0.5` would round up the largest double below one half.
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return None;
    }
    Some(rounded as i64)
}
