//! Hub event relay.
//!
//! One invocation per inbound hub message. The function keeps no state
//! between invocations; the only shared piece is the pooled gauge client.

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::services::gauge::GaugeClient;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RelayMessage {
    pub temperature: f64,
}

impl RelayMessage {
    pub fn parse(payload: &[u8]) -> Result<Self, RelayError> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| RelayError::MalformedMessage(e.to_string()))?;
        serde_json::from_str(text).map_err(|e| RelayError::MalformedMessage(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The gauge accepted the value.
    Forwarded { temperature: i64 },
    /// The gauge answered with a non-success status. Not retried.
    Rejected { temperature: i64, status: u16 },
    /// Rounded to zero; nothing was sent.
    Skipped,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed hub message: {0}")]
    MalformedMessage(String),
    #[error("gauge request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Round half to even, so `2.5 -> 2` and `3.5 -> 4`. Values that do not
/// fit an `i64` are rejected rather than clamped.
pub fn round_temperature(value: f64) -> Result<i64, RelayError> {
    let rounded = value.round_ties_even();
    // i64::MAX as f64 is 2^63, which is itself out of range
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(RelayError::MalformedMessage(format!(
            "temperature {} is out of range",
            value
        )));
    }
    Ok(rounded as i64)
}

#[derive(Clone, Debug)]
pub struct RelayFunction {
    gauge: GaugeClient,
}

impl RelayFunction {
    pub fn new(gauge: GaugeClient) -> Self {
        Self { gauge }
    }

    /// Parse, round, and forward one event. The gauge call is awaited, so
    /// when this returns the forward has either landed or definitely failed.
    pub async fn handle(&self, payload: &[u8]) -> Result<RelayOutcome, RelayError> {
        let message = match RelayMessage::parse(payload) {
            Ok(message) => message,
            Err(e) => {
                warn!("Dropping hub message: {}", e);
                return Err(e);
            }
        };

        let temperature = match round_temperature(message.temperature) {
            Ok(temperature) => temperature,
            Err(e) => {
                warn!("Dropping hub message: {}", e);
                return Err(e);
            }
        };
        if temperature == 0 {
            return Ok(RelayOutcome::Skipped);
        }

        let status = match self.gauge.push_value(temperature).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Gauge API unreachable: {}", e);
                return Err(RelayError::Transport(e));
            }
        };
        info!("Temperature : {}", temperature);

        if status.is_success() {
            Ok(RelayOutcome::Forwarded { temperature })
        } else {
            warn!("API call has error : {}", status);
            Ok(RelayOutcome::Rejected {
                temperature,
                status: status.as_u16(),
            })
        }
    }
}
