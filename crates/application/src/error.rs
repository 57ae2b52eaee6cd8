//! Application-level errors

use domain::DomainError;
use thiserror::Error;

use crate::ports::LocationError;

/// Errors that can occur in the application layer
///
/// None of these are fatal to a tour session: each one degrades a single
/// feature (nearby search, routing or live guidance).
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Position could not be acquired
    #[error("Location unavailable: {0}")]
    Location(#[from] LocationError),

    /// POI or routing service failed or returned an unusable body
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Operation not possible in the current session state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Short message suitable for showing to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Location(LocationError::PermissionDenied) => {
                "Location access was denied. Enable it to see where you are.".to_string()
            },
            Self::Location(_) => "Your location is currently unavailable.".to_string(),
            Self::ExternalService(_) => {
                "The map service is not responding right now. Please try again.".to_string()
            },
            Self::InvalidState(reason) => reason.clone(),
            Self::Domain(e) => e.to_string(),
            Self::Configuration(_) => "The tour guide is not configured correctly.".to_string(),
        }
    }
}
