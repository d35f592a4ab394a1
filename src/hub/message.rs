//! Plug-and-play message convention.
//!
//! A telemetry message body is a JSON object of `telemetry name -> value`.
//! Telemetry that belongs to a component carries the component name in the
//! `$.sub` property; root-interface telemetry has no component.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

pub const CONTENT_TYPE: &str = "application/json";
pub const CONTENT_ENCODING: &str = "utf-8";
pub const COMPONENT_PROPERTY: &str = "$.sub";

#[derive(Debug, Clone)]
pub struct Message {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub content_encoding: &'static str,
    pub component_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Single telemetry value, optionally scoped to a component.
    pub fn telemetry<T: Serialize>(
        name: &str,
        value: T,
        component_name: Option<&str>,
    ) -> Result<Self, serde_json::Error> {
        let mut body = Map::new();
        body.insert(name.to_string(), serde_json::to_value(value)?);
        Self::from_map(body, component_name)
    }

    /// Several telemetry values in one message.
    pub fn from_map(
        body: Map<String, Value>,
        component_name: Option<&str>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            body: serde_json::to_vec(&Value::Object(body))?,
            content_type: CONTENT_TYPE,
            content_encoding: CONTENT_ENCODING,
            component_name: component_name.map(str::to_string),
            created_at: Utc::now(),
        })
    }

    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Application properties as they would appear on the wire.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        match &self.component_name {
            Some(component) => vec![(COMPONENT_PROPERTY, component.clone())],
            None => Vec::new(),
        }
    }
}
