use serde::{Deserialize, Serialize};

/// Every failure class the intake core knows about. Only `Busy` ever reaches a
/// caller as an error; the rest end up as offline status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeErrorKind {
    EmptyInput,
    NetworkOrPlannerFailure,
    MalformedResponse,
    NotConnected,
    EmptyTopic,
    InvalidGoal,
    PublishFailed,
    Busy,
}
