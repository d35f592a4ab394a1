use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use super::message::Message;
use super::types::{
    CommandHandler, CommandRequest, CommandResponse, ConnectionStatus,
    ConnectionStatusChangeReason, ConnectionStatusHandler, StatusCode,
};
use super::{HubChannel, HubError};

/// In-process hub. Everything the device sends is delivered to the receiver
/// returned by [`LoopbackHub::new`], which plays the cloud side.
pub struct LoopbackHub {
    device_id: String,
    model_id: String,
    outbound: mpsc::Sender<Message>,
    handlers: Mutex<HashMap<String, CommandHandler>>,
    status_handler: Mutex<Option<ConnectionStatusHandler>>,
    closed: AtomicBool,
}

impl LoopbackHub {
    pub fn new(device_id: &str, model_id: &str, capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity);
        let hub = Self {
            device_id: device_id.to_string(),
            model_id: model_id.to_string(),
            outbound: tx,
            handlers: Mutex::new(HashMap::new()),
            status_handler: Mutex::new(None),
            closed: AtomicBool::new(false),
        };
        (hub, rx)
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Cloud-side method invocation. Unregistered commands get 404.
    pub fn invoke(&self, request: &CommandRequest) -> CommandResponse {
        // Clone the slot out so the lock is not held while the handler runs
        let handler = self
            .handlers
            .lock()
            .ok()
            .and_then(|table| table.get(&request.name).cloned());

        match handler {
            Some(handler) => handler(request),
            None => {
                debug!("No handler registered for command '{}'", request.name);
                CommandResponse::empty(StatusCode::NotFound)
            }
        }
    }

    pub fn has_handler(&self, command_name: &str) -> bool {
        self.handlers
            .lock()
            .map(|table| table.contains_key(command_name))
            .unwrap_or(false)
    }

    fn notify(&self, status: ConnectionStatus, reason: ConnectionStatusChangeReason) {
        let handler = self.status_handler.lock().ok().and_then(|slot| slot.clone());
        if let Some(handler) = handler {
            handler(status, reason);
        }
    }
}

#[async_trait]
impl HubChannel for LoopbackHub {
    async fn open(&self) -> Result<(), HubError> {
        self.closed.store(false, Ordering::SeqCst);
        debug!(
            "Loopback hub open - device={}, model={}",
            self.device_id, self.model_id
        );
        self.notify(ConnectionStatus::Connected, ConnectionStatusChangeReason::ConnectionOk);
        Ok(())
    }

    async fn close(&self) -> Result<(), HubError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.notify(ConnectionStatus::Disabled, ConnectionStatusChangeReason::ClientClose);
        }
        Ok(())
    }

    async fn send(&self, message: Message) -> Result<(), HubError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(HubError::Closed);
        }
        self.outbound.send(message).await.map_err(|_| HubError::Closed)
    }

    async fn register_command_handler(
        &self,
        command_name: &str,
        handler: CommandHandler,
    ) -> Result<(), HubError> {
        let mut table = self
            .handlers
            .lock()
            .map_err(|_| HubError::Transport("handler table poisoned".to_string()))?;
        table.insert(command_name.to_string(), handler);
        Ok(())
    }

    fn set_connection_status_handler(&self, handler: ConnectionStatusHandler) {
        if let Ok(mut slot) = self.status_handler.lock() {
            *slot = Some(handler);
        }
    }
}
