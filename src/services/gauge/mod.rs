pub mod client;

pub use client::GaugeClient;
