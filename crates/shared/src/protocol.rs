use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::Goal;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Structured command the planner derived from the text. Only `intent` is
/// interpreted here; every other field is kept as-is.
///
/// `intent` is any JSON value: a planner that answers with a number or an
/// object still gets its command accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlannerCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlannerCommand {
    /// Text shown for the intent. Strings appear as-is, other values as JSON.
    pub fn intent_label(&self) -> Option<String> {
        render_label(self.intent.as_ref()?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub cmd: Option<PlannerCommand>,
    /// A plain string from the planner, or a structured validation error list.
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub used_llm: Option<bool>,
    #[serde(default)]
    pub raw_head: Option<String>,
}

impl PlanResponse {
    pub fn detail_message(&self) -> Option<String> {
        render_label(self.detail.as_ref()?)
    }
}

fn render_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub mqtt: Option<String>,
    #[serde(default)]
    pub cmd_topic: Option<String>,
}

/// Wire form of a [`Goal`] on the bus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalMessage {
    pub x: i64,
    pub y: i64,
}

impl From<Goal> for GoalMessage {
    fn from(goal: Goal) -> Self {
        Self {
            x: goal.x,
            y: goal.y,
        }
    }
}
