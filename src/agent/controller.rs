use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::command::{talk_to_me_handler, TALK_TO_ME};
use super::context::DeviceContext;
use super::sensors::{ProcessMemory, TemperatureSource};
use super::telemetry::{TelemetrySample, THERMOSTAT_1};
use crate::hub::{HubChannel, HubError};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Thermostat device driver: one temperature and one memory sample per
/// cycle until cancelled, plus the `talktome` command.
pub struct TemperatureController<H: HubChannel> {
    hub: Arc<H>,
    context: DeviceContext,
    temperature: TemperatureSource,
    memory: ProcessMemory,
    interval: Duration,
}

impl<H: HubChannel> TemperatureController<H> {
    pub fn new(hub: Arc<H>) -> Self {
        Self {
            hub,
            context: DeviceContext::new(),
            temperature: TemperatureSource::from_entropy(),
            memory: ProcessMemory::current(),
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_temperature_source(mut self, source: TemperatureSource) -> Self {
        self.temperature = source;
        self
    }

    pub fn context(&self) -> &DeviceContext {
        &self.context
    }

    /// Runs until `cancel` fires. Cancellation is checked once per cycle;
    /// a send already in flight completes first. A send failure ends the
    /// loop with that error.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), HubError> {
        debug!("Set handler for '{}' command.", TALK_TO_ME);
        self.hub
            .register_command_handler(TALK_TO_ME, talk_to_me_handler())
            .await?;

        self.context.reset_max(THERMOSTAT_1);

        while !cancel.is_cancelled() {
            self.send_temperature(THERMOSTAT_1).await?;
            self.send_device_memory().await?;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("Telemetry loop stopped.");
        Ok(())
    }

    async fn send_temperature(&mut self, component: &str) -> Result<(), HubError> {
        let sample = TelemetrySample::temperature(component, self.temperature.read());
        self.hub.send(sample.to_message()?).await?;
        debug!(
            "Telemetry: Sent - component=\"{}\", {{ \"{}\": {} }} in °C.",
            component, sample.metric_name, sample.value
        );
        self.context.record(&sample);
        Ok(())
    }

    async fn send_device_memory(&mut self) -> Result<(), HubError> {
        let sample = TelemetrySample::working_set(self.memory.working_set_kb());
        self.hub.send(sample.to_message()?).await?;
        debug!(
            "Telemetry: Sent - {{ \"{}\": {} }} in KB.",
            sample.metric_name, sample.value
        );
        Ok(())
    }
}
