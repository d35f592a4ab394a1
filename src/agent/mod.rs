//! Simulated thermostat device.
//!
//! The controller owns all per-device state through [`DeviceContext`]; nothing
//! here is process-wide, so several agents can share one process.

pub mod command;
pub mod context;
pub mod controller;
pub mod sensors;
pub mod telemetry;

pub use command::{talk_to_me, DeviceData, TALK_TO_ME};
pub use context::DeviceContext;
pub use controller::TemperatureController;
pub use telemetry::TelemetrySample;
