//! Device-to-cloud messaging seam.
//!
//! The agent only talks to the hub through [`HubChannel`]. A vendor SDK
//! binding would implement it; [`loopback::LoopbackHub`] is the in-process
//! implementation used by the binary and the tests.

pub mod loopback;
pub mod message;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use loopback::LoopbackHub;
pub use message::Message;
pub use types::*;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("hub transport failure: {0}")]
    Transport(String),
    #[error("hub channel is closed")]
    Closed,
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait HubChannel: Send + Sync {
    async fn open(&self) -> Result<(), HubError>;

    async fn close(&self) -> Result<(), HubError>;

    /// Resolves once the hub acknowledged the message. No retry happens at
    /// this layer.
    async fn send(&self, message: Message) -> Result<(), HubError>;

    async fn register_command_handler(
        &self,
        command_name: &str,
        handler: CommandHandler,
    ) -> Result<(), HubError>;

    fn set_connection_status_handler(&self, handler: ConnectionStatusHandler);
}
