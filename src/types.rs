use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, ErrorKind};

/// A tool the remote server offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// Outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
    Cancelled,
}

/// Error detail attached to a non-success result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
}

/// What the host gets back for every command.
///
/// Payload fields hold JSON *text*, not nested values: `result` carries the
/// encoded tool output, `tools` the encoded descriptor list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl CommandResult {
    pub fn executed(output: &Value) -> Result<Self, BridgeError> {
        let encoded =
            serde_json::to_string(output).map_err(|e| BridgeError::Encode(e.to_string()))?;
        Ok(Self {
            status: Status::Success,
            result: Some(encoded),
            tools: None,
            error: None,
        })
    }

    pub fn listed(tools: &[ToolDescriptor]) -> Result<Self, BridgeError> {
        let encoded =
            serde_json::to_string(tools).map_err(|e| BridgeError::Encode(e.to_string()))?;
        Ok(Self {
            status: Status::Success,
            result: None,
            tools: Some(encoded),
            error: None,
        })
    }

    pub fn failed(err: &BridgeError) -> Self {
        let status = match err {
            BridgeError::Cancelled => Status::Cancelled,
            _ => Status::Error,
        };
        Self {
            status,
            result: None,
            tools: None,
            error: Some(ErrorBody {
                kind: err.kind(),
                code: err.code(),
                message: err.to_string(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Serialize for the host. Falls back to a hand-built error object if
    /// encoding fails, so the host always receives valid JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "status": "error",
                "error": { "kind": "internal", "message": e.to_string() },
            })
            .to_string()
        })
    }
}
