//! Tool call lifecycle and UI-facing call records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Phase of one tool invocation.
///
/// `Idle -> InputReceived -> Executing -> {Succeeded, Failed}`; input that
/// fails validation goes straight from `InputReceived` to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallPhase {
    Idle,
    InputReceived,
    Executing,
    Succeeded,
    Failed,
}

impl ToolCallPhase {
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::InputReceived)
                | (Self::InputReceived, Self::Executing | Self::Failed)
                | (Self::Executing, Self::Succeeded | Self::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// A tool call as shown to a user interface.
///
/// Held by the calling application; the client never stores these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: Uuid,
    pub name: String,
    pub args: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl ToolCallRecord {
    pub fn begin(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            args,
            result: None,
            timestamp: Utc::now(),
        }
    }

    pub fn complete(mut self, result: serde_json::Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// `Some(true)` when the shaped result reports success.
    pub fn succeeded(&self) -> Option<bool> {
        self.result
            .as_ref()
            .map(|r| r.get("success").and_then(|v| v.as_bool()).unwrap_or(false))
    }
}
