use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use thermolink::config::RelayConfig;
use thermolink::services::gauge::GaugeClient;
use thermolink::RelayFunction;

/// Stand-in for the event trigger: every stdin line is one hub message.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RelayConfig::from_env()?;
    let gauge = GaugeClient::new(&config.gauge_base_url, config.gauge_timeout)?;
    let relay = Arc::new(RelayFunction::new(gauge));
    tracing::info!("Relaying hub messages to {}", config.gauge_base_url);

    let mut invocations = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let relay = relay.clone();
        invocations.spawn(async move {
            // Failures are logged by the relay and the message is dropped
            if let Ok(outcome) = relay.handle(line.as_bytes()).await {
                tracing::debug!("Relay outcome: {:?}", outcome);
            }
        });

        // Reap finished invocations so the set does not grow with the stream
        while invocations.try_join_next().is_some() {}
    }

    while invocations.join_next().await.is_some() {}
    Ok(())
}
