//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer on top of the
//! OpenStreetMap integrations, plus configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, TourAppConfig};
pub use telemetry::{LoggingConfig, TelemetryError, init_logging};
