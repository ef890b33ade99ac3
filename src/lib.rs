pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod health;
pub mod policy;
pub mod types;

use serde_json::Value;
use tokio::sync::{mpsc, OnceCell};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use client::{ExampleClient, McpHttpClient, PipedreamClient, ToolClient};
pub use command::{Command, EXECUTE_TOOL, LIST_TOOLS};
pub use config::{AdapterConfig, ClientConfig};
pub use error::{BridgeError, ErrorKind, RemoteError};
pub use events::AdapterEvent;
pub use health::{HealthReport, HealthStatus};
pub use policy::{CallPolicy, Retry};
pub use types::{CommandResult, ErrorBody, Status, ToolDescriptor};

/// Routes host commands to a remote tool client and always answers with a
/// [`CommandResult`].
///
/// Starts uninitialized; [`initialize`](Self::initialize) connects the client.
/// All methods take `&self`, so one adapter can be shared behind an `Arc` and
/// dispatched from several tasks at once.
pub struct CommandAdapter {
    client: Box<dyn ToolClient>,
    config: AdapterConfig,
    policy: CallPolicy,
    ready: OnceCell<()>,
    events: Option<mpsc::Sender<AdapterEvent>>,
}

impl CommandAdapter {
    pub fn new(client: impl ToolClient + 'static, config: AdapterConfig) -> Self {
        let policy = config.policy();
        Self {
            client: Box::new(client),
            config,
            policy,
            ready: OnceCell::new(),
            events: None,
        }
    }

    /// Stream [`AdapterEvent`]s to the host. A closed receiver is ignored.
    pub fn with_events(mut self, tx: mpsc::Sender<AdapterEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_initialized(&self) -> bool {
        self.ready.initialized()
    }

    /// Connect the remote client. Safe to call again: once it has succeeded
    /// later calls return immediately, and concurrent callers wait on the
    /// same attempt.
    pub async fn initialize(&self) -> Result<(), BridgeError> {
        self.ready
            .get_or_try_init(|| async {
                info!(
                    extension = %self.config.name,
                    transport = self.client.transport(),
                    "initializing tool client"
                );
                if let Err(e) = self
                    .policy
                    .run("connect", Retry::Transient, || self.client.connect())
                    .await
                {
                    warn!(extension = %self.config.name, error = %e, "tool client connection failed");
                    self.emit(AdapterEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
                    return Err(BridgeError::from(e));
                }
                self.emit(AdapterEvent::Initialized {
                    transport: self.client.transport().to_string(),
                })
                .await;
                Ok(())
            })
            .await
            .map(|_| ())
    }

    /// Handle one raw command mapping from the host.
    pub async fn dispatch(&self, raw: &Value) -> CommandResult {
        self.dispatch_inner(raw, None).await
    }

    /// Like [`dispatch`](Self::dispatch), but gives up with a `cancelled`
    /// result as soon as `cancel` fires. The in-flight remote call is dropped.
    pub async fn dispatch_with_cancel(
        &self,
        raw: &Value,
        cancel: CancellationToken,
    ) -> CommandResult {
        self.dispatch_inner(raw, Some(cancel)).await
    }

    /// Run an already-parsed command.
    pub async fn execute(&self, command: &Command) -> Result<CommandResult, BridgeError> {
        if !self.is_initialized() {
            return Err(BridgeError::NotInitialized);
        }
        debug!(command = command.name(), "executing command");

        match command {
            Command::ExecuteTool { tool_name, args } => {
                info!(tool = %tool_name, args = args.len(), "executing tool");
                self.emit(AdapterEvent::ToolCall {
                    name: tool_name.clone(),
                    args: Value::Object(args.clone()),
                })
                .await;

                let output = self
                    .policy
                    .run("tools/call", Retry::Unsent, || {
                        self.client.invoke(tool_name, args)
                    })
                    .await?;
                CommandResult::executed(&output)
            }
            Command::ListTools => {
                let tools = self
                    .policy
                    .run("tools/list", Retry::Transient, || self.client.list())
                    .await?;
                debug!(count = tools.len(), "tools listed");
                CommandResult::listed(&tools)
            }
        }
    }

    pub fn health(&self) -> HealthReport {
        HealthReport::new(
            self.config.name.clone(),
            self.client.transport(),
            self.is_initialized(),
        )
    }

    async fn dispatch_inner(&self, raw: &Value, cancel: Option<CancellationToken>) -> CommandResult {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        debug!(command = %name, "command received");
        self.emit(AdapterEvent::CommandReceived { name: name.clone() })
            .await;

        let outcome = match Command::from_value(raw) {
            Ok(command) => match cancel {
                Some(cancel) => {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            info!(command = %name, "command cancelled");
                            Err(BridgeError::Cancelled)
                        }
                        result = self.execute(&command) => result,
                    }
                }
                None => self.execute(&command).await,
            },
            Err(e) => Err(e),
        };

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(command = %name, kind = ?e.kind(), error = %e, "command failed");
                self.emit(AdapterEvent::Error {
                    message: e.to_string(),
                })
                .await;
                CommandResult::failed(&e)
            }
        };

        self.emit(AdapterEvent::CommandFinished {
            name,
            status: result.status,
        })
        .await;
        result
    }

    async fn emit(&self, event: AdapterEvent) {
        if let Some(ref tx) = self.events {
            let _ = tx.send(event).await;
        }
    }
}
