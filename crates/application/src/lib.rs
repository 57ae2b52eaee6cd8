//! Application layer - Use cases and orchestration
//!
//! Contains the tour session, live guidance and the port definitions the
//! infrastructure layer implements. Orchestrates domain objects without
//! performing I/O itself.

pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
