use async_trait::async_trait;
use rmcp::service::{Peer, RunningService, ServiceError};
use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::{RoleClient, ServiceExt};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::ToolClient;
use crate::error::RemoteError;
use crate::types::ToolDescriptor;

/// MCP client over the streamable HTTP transport.
///
/// `connect` runs the MCP handshake and keeps the session; every later call
/// goes through the same peer, which multiplexes concurrent requests by id.
pub struct McpHttpClient {
    url: String,
    token: Option<String>,
    service: RwLock<Option<RunningService<RoleClient, ()>>>,
}

impl McpHttpClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            service: RwLock::new(None),
        }
    }

    /// Bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub async fn is_connected(&self) -> bool {
        self.service.read().await.is_some()
    }

    async fn peer(&self) -> Result<Peer<RoleClient>, RemoteError> {
        self.service
            .read()
            .await
            .as_ref()
            .map(|service| service.peer().clone())
            .ok_or(RemoteError::NotConnected)
    }
}

#[async_trait]
impl ToolClient for McpHttpClient {
    fn transport(&self) -> &str {
        "mcp-http"
    }

    async fn connect(&self) -> Result<(), RemoteError> {
        let mut service = self.service.write().await;
        if service.is_some() {
            return Ok(());
        }

        let mut config = StreamableHttpClientTransportConfig::with_uri(self.url.as_str());
        if let Some(ref token) = self.token {
            config = config.auth_header(token.clone());
        }
        let transport = StreamableHttpClientTransport::from_config(config);

        let running = ()
            .serve(transport)
            .await
            .map_err(|e| RemoteError::Connect(e.to_string()))?;

        info!(url = %self.url, "mcp session initialized");
        *service = Some(running);
        Ok(())
    }

    async fn invoke(
        &self,
        tool_name: &str,
        args: &Map<String, Value>,
    ) -> Result<Value, RemoteError> {
        let peer = self.peer().await?;
        debug!(tool = tool_name, url = %self.url, "mcp tools/call");

        let params = serde_json::from_value(json!({ "name": tool_name, "arguments": args }))
            .map_err(|e| RemoteError::Parse(e.to_string()))?;
        let result = peer.call_tool(params).await.map_err(service_error)?;

        let result = serde_json::to_value(&result).map_err(|e| RemoteError::Parse(e.to_string()))?;
        call_output(result)
    }

    async fn list(&self) -> Result<Vec<ToolDescriptor>, RemoteError> {
        let peer = self.peer().await?;
        let tools = peer.list_all_tools().await.map_err(service_error)?;

        debug!(count = tools.len(), "mcp tools listed");
        Ok(tools
            .into_iter()
            .map(|t| {
                let description = t.description.map(|d| d.to_string()).unwrap_or_default();
                ToolDescriptor::new(t.name.to_string(), description)
                    .with_input_schema(Value::Object((*t.input_schema).clone()))
            })
            .collect())
    }
}

/// JSON-RPC errors keep their code; anything else broke in transit.
fn service_error(err: ServiceError) -> RemoteError {
    match err {
        ServiceError::McpError(e) => RemoteError::Rpc {
            code: i64::from(e.code.0),
            message: e.message.to_string(),
        },
        other => RemoteError::Transport(other.to_string()),
    }
}

/// Reduce a `tools/call` result to the tool's output.
fn call_output(result: Value) -> Result<Value, RemoteError> {
    if result["isError"].as_bool() == Some(true) {
        let text = result["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|b| b["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "tool call failed".into());
        return Err(RemoteError::Tool(text));
    }

    match result.get("structuredContent") {
        Some(structured) if !structured.is_null() => Ok(structured.clone()),
        _ => Ok(result),
    }
}
