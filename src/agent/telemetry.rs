use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hub::Message;

pub const THERMOSTAT_1: &str = "thermostat1";
pub const TEMPERATURE: &str = "temperature";
pub const WORKING_SET: &str = "WorkingSet_DeviceMemory";

/// A timestamped metric value. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub component_name: Option<String>,
    pub metric_name: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl TelemetrySample {
    pub fn temperature(component_name: &str, degrees: f64) -> Self {
        Self {
            component_name: Some(component_name.to_string()),
            metric_name: TEMPERATURE.to_string(),
            value: degrees,
            timestamp: Utc::now(),
        }
    }

    /// Process memory in kilobytes, reported on the root interface.
    pub fn working_set(kilobytes: u64) -> Self {
        Self {
            component_name: None,
            metric_name: WORKING_SET.to_string(),
            value: kilobytes as f64,
            timestamp: Utc::now(),
        }
    }

    pub fn to_message(&self) -> Result<Message, serde_json::Error> {
        // Working set goes out as an integer, like the device reports it
        if self.metric_name == WORKING_SET {
            Message::telemetry(&self.metric_name, self.value as u64, self.component_name.as_deref())
        } else {
            Message::telemetry(&self.metric_name, self.value, self.component_name.as_deref())
        }
    }
}
