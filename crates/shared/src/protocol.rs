use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TaskId;

/// Body of `POST /command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

/// Action tag chosen by the remote interpreter. Tags outside the known set
/// are kept verbatim instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Create,
    Read,
    Update,
    Delete,
    Unknown,
    Other(String),
}

impl ActionKind {
    pub const UNKNOWN_TAG: &'static str = "unknown";

    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Read => "read",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
            ActionKind::Unknown => Self::UNKNOWN_TAG,
            ActionKind::Other(tag) => tag,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ActionKind::Unknown)
    }
}

impl From<String> for ActionKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "create" => ActionKind::Create,
            "read" => ActionKind::Read,
            "update" => ActionKind::Update,
            "delete" => ActionKind::Delete,
            ActionKind::UNKNOWN_TAG => ActionKind::Unknown,
            _ => ActionKind::Other(tag),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// What the interpreter made of the command. Only `action` is typed; the
/// other fields are kept as sent and never validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandInterpretation {
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl CommandInterpretation {
    pub fn bare(action: ActionKind) -> Self {
        Self {
            action,
            task_id: None,
            description: None,
            start_date: None,
            status: None,
            message: None,
        }
    }
}

/// Outcome severity reported by the service. Unrecognised values survive
/// decoding so the client can still show the message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Success,
    Error,
    Info,
    Unrecognized(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "success" => Severity::Success,
            "error" => Severity::Error,
            "info" => Severity::Info,
            _ => Severity::Unrecognized(raw),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub status: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
}

/// Response of `POST /command`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(rename = "llm_interpretation")]
    pub interpretation: CommandInterpretation,
    pub action_result: ActionResult,
}
