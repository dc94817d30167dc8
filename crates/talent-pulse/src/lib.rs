pub mod config;
pub mod error;
pub mod evaluations;
pub mod snapshot;
pub mod telemetry;
