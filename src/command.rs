use serde_json::{Map, Value};

use crate::error::BridgeError;

pub const EXECUTE_TOOL: &str = "execute_mcp_tool";
pub const LIST_TOOLS: &str = "list_mcp_tools";

/// A command the host can send, already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ExecuteTool {
        tool_name: String,
        args: Map<String, Value>,
    },
    ListTools,
}

impl Command {
    /// Parse the raw mapping delivered by the host.
    ///
    /// `name` selects the variant. For `execute_mcp_tool`, `tool_args` is a
    /// JSON string encoding an object and defaults to `"{}"`; a native object
    /// is accepted too.
    pub fn from_value(raw: &Value) -> Result<Self, BridgeError> {
        let name = raw.get("name").and_then(Value::as_str).unwrap_or("");

        match name {
            EXECUTE_TOOL => {
                let tool_name = raw
                    .get("tool_name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        BridgeError::InvalidCommand("tool_name must be a string".into())
                    })?
                    .to_string();
                let args = match raw.get("tool_args") {
                    None | Some(Value::Null) => Map::new(),
                    Some(Value::String(text)) => parse_tool_args(text)?,
                    Some(Value::Object(map)) => map.clone(),
                    Some(other) => {
                        return Err(BridgeError::InvalidCommand(format!(
                            "tool_args must be a JSON string, got {other}"
                        )))
                    }
                };
                Ok(Command::ExecuteTool { tool_name, args })
            }
            LIST_TOOLS => Ok(Command::ListTools),
            other => Err(BridgeError::UnknownCommand(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::ExecuteTool { .. } => EXECUTE_TOOL,
            Command::ListTools => LIST_TOOLS,
        }
    }
}

/// Decode `tool_args` text into an argument map.
pub fn parse_tool_args(text: &str) -> Result<Map<String, Value>, BridgeError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(BridgeError::Parse(format!(
            "tool_args must encode a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(BridgeError::Parse(format!("malformed tool_args: {e}"))),
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
