use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use super::telemetry::TelemetrySample;

/// Per-instance bookkeeping for the thermostat components.
///
/// Readings are never evicted. Memory constrained devices should push this to
/// an external store instead of keeping it here.
#[derive(Debug, Default)]
pub struct DeviceContext {
    readings: HashMap<String, BTreeMap<DateTime<Utc>, f64>>,
    current: HashMap<String, f64>,
    max_temp: HashMap<String, f64>,
}

impl DeviceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_max(&mut self, component: &str) {
        self.max_temp.insert(component.to_string(), 0.0);
    }

    /// Records a sent temperature sample. A second reading with the same
    /// timestamp is ignored.
    pub fn record(&mut self, sample: &TelemetrySample) {
        let Some(component) = sample.component_name.as_deref() else {
            return;
        };

        self.readings
            .entry(component.to_string())
            .or_default()
            .entry(sample.timestamp)
            .or_insert(sample.value);

        self.current.insert(component.to_string(), sample.value);

        let max = self.max_temp.entry(component.to_string()).or_insert(sample.value);
        if sample.value > *max {
            *max = sample.value;
        }
    }

    pub fn readings(&self, component: &str) -> Option<&BTreeMap<DateTime<Utc>, f64>> {
        self.readings.get(component)
    }

    pub fn current_temperature(&self, component: &str) -> Option<f64> {
        self.current.get(component).copied()
    }

    pub fn max_temperature(&self, component: &str) -> Option<f64> {
        self.max_temp.get(component).copied()
    }
}
