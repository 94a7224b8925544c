pub mod config;
pub mod telemetry;

pub use telemetry::Telemetry;
