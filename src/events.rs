use serde_json::Value;

use crate::types::Status;

/// Events emitted while the adapter works, for host telemetry.
#[derive(Debug, Clone)]
pub enum AdapterEvent {
    Initialized { transport: String },
    CommandReceived { name: String },
    ToolCall { name: String, args: Value },
    CommandFinished { name: String, status: Status },
    Error { message: String },
}
