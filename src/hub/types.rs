use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Direct-method status codes understood by the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    Completed,
    InProgress,
    NotFound,
    BadRequest,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        match self {
            StatusCode::Completed => 200,
            StatusCode::InProgress => 202,
            StatusCode::NotFound => 404,
            StatusCode::BadRequest => 400,
        }
    }
}

/// A cloud-to-device method invocation.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub payload: Vec<u8>,
}

impl CommandRequest {
    pub fn new(name: &str, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.to_string(),
            payload: payload.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub status: StatusCode,
    pub payload: Vec<u8>,
}

impl CommandResponse {
    pub fn new(status: StatusCode, payload: Vec<u8>) -> Self {
        Self { status, payload }
    }

    /// A response carrying a status and nothing else.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            payload: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    DisconnectedRetrying,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatusChangeReason {
    ConnectionOk,
    ClientClose,
    CommunicationError,
    RetryExpired,
}

/// Callback slot for a named command. Invoked from the hub's dispatch path,
/// possibly while telemetry sends are in flight.
pub type CommandHandler = Arc<dyn Fn(&CommandRequest) -> CommandResponse + Send + Sync>;

/// Callback slot for connection status transitions.
pub type ConnectionStatusHandler =
    Arc<dyn Fn(ConnectionStatus, ConnectionStatusChangeReason) + Send + Sync>;
