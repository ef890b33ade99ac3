use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Everything that can turn a command into an error result.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    #[error("invalid command: {0}")]
    InvalidCommand(String),
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
    #[error("adapter not initialized")]
    NotInitialized,
    #[error("command cancelled")]
    Cancelled,
    #[error("failed to encode result: {0}")]
    Encode(String),
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Parse(_) => ErrorKind::ParseError,
            BridgeError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            BridgeError::InvalidCommand(_) => ErrorKind::InvalidCommand,
            BridgeError::Remote(_) => ErrorKind::RemoteError,
            BridgeError::NotInitialized => ErrorKind::NotInitialized,
            BridgeError::Cancelled => ErrorKind::Cancelled,
            BridgeError::Encode(_) => ErrorKind::Internal,
        }
    }

    /// Numeric code from the remote side, if there is one.
    pub fn code(&self) -> Option<i64> {
        match self {
            BridgeError::Remote(e) => e.code(),
            _ => None,
        }
    }
}

/// Machine-readable error category reported back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ParseError,
    UnknownCommand,
    InvalidCommand,
    RemoteError,
    NotInitialized,
    Cancelled,
    Internal,
}

/// Failure talking to the remote tool server.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The request never reached the server.
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    /// The exchange broke after the request went out; the server may have
    /// acted on it.
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("server returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("tool reported an error: {0}")]
    Tool(String),
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("client not configured: {0}")]
    NotConfigured(String),
    #[error("no session with the server")]
    NotConnected,
}

impl RemoteError {
    /// Transport-level failures that may succeed on a second attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Connect(_) | RemoteError::Timeout(_) | RemoteError::Transport(_) => true,
            RemoteError::Api { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Failures where the server cannot have seen the request.
    pub fn is_unsent(&self) -> bool {
        matches!(self, RemoteError::Connect(_))
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            RemoteError::Api { status, .. } => Some(i64::from(*status)),
            RemoteError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            RemoteError::Connect(e.to_string())
        } else if e.is_timeout() {
            RemoteError::Transport(e.to_string())
        } else {
            RemoteError::Request(e.to_string())
        }
    }
}
