//! Runtime configuration, read from the environment.
//!
//! Credentials and endpoints are never compiled in.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;

use crate::services::gauge::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const DEFAULT_MODEL_ID: &str = "dtmi:com:example:TemperatureController;2";
pub const DEFAULT_DEVICE_ID: &str = "temperatureSensor";
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// `HostName=...;DeviceId=...;SharedAccessKey=...`
#[derive(Clone, PartialEq, Eq)]
pub struct HubConnectionString {
    pub host_name: String,
    pub device_id: String,
    pub shared_access_key: String,
}

impl HubConnectionString {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut host_name = None;
        let mut device_id = None;
        let mut shared_access_key = None;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            // Keys are base64 and may themselves end in '='
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| anyhow!("malformed connection string segment '{}'", segment))?;
            match key {
                "HostName" => host_name = Some(value.to_string()),
                "DeviceId" => device_id = Some(value.to_string()),
                "SharedAccessKey" => shared_access_key = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(Self {
            host_name: host_name.context("connection string is missing HostName")?,
            device_id: device_id.context("connection string is missing DeviceId")?,
            shared_access_key: shared_access_key
                .context("connection string is missing SharedAccessKey")?,
        })
    }
}

impl fmt::Debug for HubConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubConnectionString")
            .field("host_name", &self.host_name)
            .field("device_id", &self.device_id)
            .field("shared_access_key", &"<redacted>")
            .finish()
    }
}

/// Telemetry interval in whole seconds, at least one.
pub fn parse_interval_secs(raw: &str) -> Result<Duration> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .context("interval must be a whole number of seconds")?;
    if secs == 0 {
        return Err(anyhow!("interval must be at least one second"));
    }
    Ok(Duration::from_secs(secs))
}

#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub connection: Option<HubConnectionString>,
    pub device_id: String,
    pub model_id: String,
    pub interval: Duration,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        let connection = env::var("HUB_CONNECTION_STRING")
            .ok()
            .map(|raw| HubConnectionString::parse(&raw))
            .transpose()
            .context("invalid HUB_CONNECTION_STRING")?;
        let device_id = match &connection {
            Some(conn) => conn.device_id.clone(),
            None => env::var("DEVICE_ID").unwrap_or_else(|_| DEFAULT_DEVICE_ID.to_string()),
        };
        let model_id = env::var("MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());
        let interval = match env::var("TELEMETRY_INTERVAL_SECS") {
            Ok(raw) => parse_interval_secs(&raw).context("invalid TELEMETRY_INTERVAL_SECS")?,
            Err(_) => Duration::from_secs(DEFAULT_INTERVAL_SECS),
        };

        Ok(Self {
            connection,
            device_id,
            model_id,
            interval,
        })
    }
}

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub gauge_base_url: String,
    pub gauge_timeout: Duration,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        let gauge_base_url =
            env::var("GAUGE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let gauge_timeout = match env::var("GAUGE_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("GAUGE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            gauge_base_url,
            gauge_timeout,
        })
    }
}
