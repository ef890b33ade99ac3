use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::ToolClient;
use crate::error::RemoteError;
use crate::types::ToolDescriptor;

/// Offline client with a single canned workflow. Stands in when no remote
/// server is configured.
#[derive(Debug, Default, Clone)]
pub struct ExampleClient;

impl ExampleClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolClient for ExampleClient {
    fn transport(&self) -> &str {
        "example"
    }

    async fn invoke(
        &self,
        tool_name: &str,
        args: &Map<String, Value>,
    ) -> Result<Value, RemoteError> {
        debug!(tool = tool_name, args = args.len(), "example tool call");
        Ok(json!({ "message": format!("Executed {tool_name} successfully") }))
    }

    async fn list(&self) -> Result<Vec<ToolDescriptor>, RemoteError> {
        Ok(vec![ToolDescriptor::new(
            "example_tool",
            "Example Pipedream workflow",
        )])
    }
}
