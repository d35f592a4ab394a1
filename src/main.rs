use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use thermolink::config::AgentConfig;
use thermolink::console;
use thermolink::hub::{
    ConnectionStatus, ConnectionStatusChangeReason, HubChannel, LoopbackHub,
};
use thermolink::TemperatureController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AgentConfig::from_env()?;
    tracing::info!("Press Control+C to quit.");
    tracing::debug!("Set up the device client: {:?}", config);

    let (hub, mut cloud_rx) = LoopbackHub::new(&config.device_id, &config.model_id, 64);
    let hub = Arc::new(hub);
    hub.set_connection_status_handler(Arc::new(|status: ConnectionStatus, reason: ConnectionStatusChangeReason| {
        tracing::debug!("Connection status change registered - status={:?}, reason={:?}.", status, reason);
    }));
    hub.open().await?;

    tracing::info!("Device {} reporting as {}", hub.device_id(), hub.model_id());

    // Cloud side: show what the hub would receive
    let device_id = hub.device_id().to_string();
    tokio::spawn(async move {
        while let Some(msg) = cloud_rx.recv().await {
            let body = String::from_utf8_lossy(&msg.body);
            match msg.component_name.as_deref() {
                Some(component) => tracing::info!("[HUB] {} / {}: {}", device_id, component, body),
                None => tracing::info!("[HUB] {}: {}", device_id, body),
            }
        }
    });

    // Commands from the console, e.g. `talktome {"name":"Dave"}`
    let mut lines = console::spawn_line_reader(std::io::stdin(), 16);
    let command_hub = hub.clone();
    tokio::spawn(async move {
        while let Some(line) = lines.recv().await {
            let Some(request) = console::parse_command(&line) else {
                continue;
            };
            let response = command_hub.invoke(&request);
            println!(
                "[{}] {} {}",
                request.name,
                response.status.code(),
                String::from_utf8_lossy(&response.payload)
            );
        }
    });

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown requested.");
                ctrl_c.cancel();
            }
            Err(e) => tracing::warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    let mut controller = TemperatureController::new(hub.clone()).with_interval(config.interval);
    let result = controller.run(cancel).await;

    hub.close().await?;
    result?;
    Ok(())
}
