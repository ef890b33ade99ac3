use std::time::Duration;

use tracing::{info, warn};

use crate::client::{ExampleClient, McpHttpClient, PipedreamClient, ToolClient};
use crate::policy::CallPolicy;

pub const ENV_SERVER_URL: &str = "MCP_SERVER_URL";
pub const ENV_SERVER_TOKEN: &str = "MCP_SERVER_TOKEN";
pub const ENV_PIPEDREAM_API_KEY: &str = "PIPEDREAM_API_KEY";
pub const ENV_PIPEDREAM_PROJECT_ID: &str = "PIPEDREAM_PROJECT_ID";

/// Adapter configuration.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Name the host knows the extension by. Shows up in logs and health.
    pub name: String,
    pub call_timeout: Duration,
    pub max_retries: u32,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        let policy = CallPolicy::default();
        Self {
            name: "mcp_integration".into(),
            call_timeout: policy.timeout,
            max_retries: policy.max_retries,
        }
    }
}

impl AdapterConfig {
    pub fn policy(&self) -> CallPolicy {
        CallPolicy {
            timeout: self.call_timeout,
            max_retries: self.max_retries,
        }
    }
}

/// Where the remote tools live. Read from the environment by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: Option<String>,
    pub server_token: Option<String>,
    pub pipedream_api_key: Option<String>,
    pub pipedream_project_id: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            server_url: get(ENV_SERVER_URL),
            server_token: get(ENV_SERVER_TOKEN),
            pipedream_api_key: get(ENV_PIPEDREAM_API_KEY),
            pipedream_project_id: get(ENV_PIPEDREAM_PROJECT_ID),
        }
    }

    /// Pick a client: an MCP server URL wins, then Pipedream credentials,
    /// then the offline example client.
    pub fn build_client(&self) -> Box<dyn ToolClient> {
        if let Some(ref url) = self.server_url {
            info!(url = %url, "using MCP HTTP client");
            let mut client = McpHttpClient::new(url);
            if let Some(ref token) = self.server_token {
                client = client.with_token(token);
            }
            return Box::new(client);
        }

        if let (Some(key), Some(project)) = (&self.pipedream_api_key, &self.pipedream_project_id)
        {
            info!(project = %project, "using Pipedream REST client");
            return Box::new(PipedreamClient::new(key, project));
        }

        if self.pipedream_api_key.is_some() || self.pipedream_project_id.is_some() {
            warn!(
                "partial Pipedream configuration: both {ENV_PIPEDREAM_API_KEY} and {ENV_PIPEDREAM_PROJECT_ID} are required"
            );
        }
        warn!("no remote tool server configured, falling back to example client");
        Box::new(ExampleClient::new())
    }
}
