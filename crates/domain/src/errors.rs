//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside the WGS-84 range
    #[error("Invalid coordinates: {lat}, {lon}")]
    InvalidCoordinates {
        /// Rejected latitude
        lat: f64,
        /// Rejected longitude
        lon: f64,
    },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_coordinates_error_message() {
        let err = DomainError::InvalidCoordinates { lat: 91.0, lon: 0.0 };
        assert_eq!(err.to_string(), "Invalid coordinates: 91, 0");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("field is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: field is required");
    }
}
