pub mod example;
pub mod http;
pub mod pipedream;

#[cfg(test)]
mod stub;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::RemoteError;
use crate::types::ToolDescriptor;

/// Connection to a remote tool server. The adapter only ever talks to this
/// trait; transports live behind it.
///
/// Implementations must tolerate concurrent calls through `&self`.
#[async_trait]
pub trait ToolClient: Send + Sync {
    /// Short transport label for logs and health reports.
    fn transport(&self) -> &str;

    /// Establish whatever session the transport needs. Called once by
    /// `CommandAdapter::initialize`.
    async fn connect(&self) -> Result<(), RemoteError> {
        Ok(())
    }

    /// Run a tool and return its output.
    async fn invoke(&self, tool_name: &str, args: &Map<String, Value>)
        -> Result<Value, RemoteError>;

    /// Every tool the server currently offers.
    async fn list(&self) -> Result<Vec<ToolDescriptor>, RemoteError>;
}

/// Blanket impl so `Box<dyn ToolClient>` can be passed directly to `CommandAdapter::new()`.
#[async_trait]
impl ToolClient for Box<dyn ToolClient> {
    fn transport(&self) -> &str {
        (**self).transport()
    }

    async fn connect(&self) -> Result<(), RemoteError> {
        (**self).connect().await
    }

    async fn invoke(
        &self,
        tool_name: &str,
        args: &Map<String, Value>,
    ) -> Result<Value, RemoteError> {
        (**self).invoke(tool_name, args).await
    }

    async fn list(&self) -> Result<Vec<ToolDescriptor>, RemoteError> {
        (**self).list().await
    }
}

#[async_trait]
impl<T: ToolClient + ?Sized> ToolClient for Arc<T> {
    fn transport(&self) -> &str {
        (**self).transport()
    }

    async fn connect(&self) -> Result<(), RemoteError> {
        (**self).connect().await
    }

    async fn invoke(
        &self,
        tool_name: &str,
        args: &Map<String, Value>,
    ) -> Result<Value, RemoteError> {
        (**self).invoke(tool_name, args).await
    }

    async fn list(&self) -> Result<Vec<ToolDescriptor>, RemoteError> {
        (**self).list().await
    }
}

pub use example::ExampleClient;
pub use http::McpHttpClient;
pub use pipedream::PipedreamClient;
