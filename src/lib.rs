pub mod agent;
pub mod config;
pub mod console;
pub mod hub;
pub mod relay;
pub mod services;

pub use agent::TemperatureController;
pub use relay::RelayFunction;
