use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Map, Value};
use tracing::debug;

use super::ToolClient;
use crate::error::RemoteError;
use crate::types::ToolDescriptor;

const DEFAULT_BASE_URL: &str = "https://api.pipedream.com";

/// Talks to the Pipedream REST API directly: each workflow in a project is
/// exposed as a tool.
pub struct PipedreamClient {
    client: reqwest::Client,
    api_key: String,
    project_id: String,
    base_url: String,
}

impl PipedreamClient {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            project_id: project_id.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// `{base}/v1/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RemoteError::NotConfigured(format!("bad base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::NotConfigured("base url cannot take a path".into()))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, RemoteError> {
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        if !(200..300).contains(&status) {
            return Err(RemoteError::Api { status, body: text });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ToolClient for PipedreamClient {
    fn transport(&self) -> &str {
        "pipedream"
    }

    async fn connect(&self) -> Result<(), RemoteError> {
        if self.api_key.trim().is_empty() {
            return Err(RemoteError::NotConfigured("PIPEDREAM_API_KEY is empty".into()));
        }
        if self.project_id.trim().is_empty() {
            return Err(RemoteError::NotConfigured(
                "PIPEDREAM_PROJECT_ID is empty".into(),
            ));
        }
        self.endpoint(&[])?;
        Ok(())
    }

    async fn invoke(
        &self,
        tool_name: &str,
        args: &Map<String, Value>,
    ) -> Result<Value, RemoteError> {
        let url = self.endpoint(&["workflows", tool_name, "execute"])?;
        debug!(tool = tool_name, %url, "pipedream workflow execute");

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(args)
            .send()
            .await?;

        Self::read_json(resp).await
    }

    async fn list(&self) -> Result<Vec<ToolDescriptor>, RemoteError> {
        let url = self.endpoint(&["projects", &self.project_id, "workflows"])?;
        debug!(%url, "pipedream workflow listing");

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .send()
            .await?;

        let body = Self::read_json(resp).await?;
        parse_workflows(&body)
    }
}

/// Workflows come back either as a bare array or wrapped in `data`.
fn parse_workflows(body: &Value) -> Result<Vec<ToolDescriptor>, RemoteError> {
    let raw = body
        .as_array()
        .or_else(|| body["data"].as_array())
        .ok_or_else(|| RemoteError::Parse("expected a list of workflows".into()))?;

    Ok(raw
        .iter()
        .filter_map(|w| {
            let name = w["name"].as_str()?;
            let mut tool =
                ToolDescriptor::new(name, w["description"].as_str().unwrap_or_default());
            if let Some(schema) = w.get("inputSchema").filter(|s| !s.is_null()) {
                tool = tool.with_input_schema(schema.clone());
            }
            Some(tool)
        })
        .collect())
}
