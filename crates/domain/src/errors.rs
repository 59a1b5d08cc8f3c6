//! Error types raised by domain invariants.

/// Errors produced when a value violates an entity invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A string could not be parsed as an entity identifier
    #[error("Invalid {kind} id: {value}")]
    InvalidId {
        /// Entity kind the id was meant for
        kind: &'static str,
        /// The rejected input
        value: String,
    },

    /// Latitude or longitude outside of the valid range
    #[error("Invalid coordinates: lat {lat}, lng {lng}")]
    InvalidCoordinates {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lng: f64,
    },

    /// Offer validity ends before it starts
    #[error("Offer validity window ends before it starts")]
    InvalidValidityWindow,

    /// Order status was blank
    #[error("Order status must not be empty")]
    EmptyOrderStatus,
}

impl DomainError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidId { .. } => "INVALID_ID",
            Self::InvalidCoordinates { .. } => "INVALID_COORDINATES",
            Self::InvalidValidityWindow => "INVALID_VALIDITY_WINDOW",
            Self::EmptyOrderStatus => "INVALID_ORDER_STATUS",
        }
    }
}

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DomainError::InvalidValidityWindow.error_code(),
            "INVALID_VALIDITY_WINDOW"
        );
        assert_eq!(
            DomainError::InvalidCoordinates { lat: 91.0, lng: 0.0 }.error_code(),
            "INVALID_COORDINATES"
        );
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidId {
            kind: "vendor",
            value: "xyz".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid vendor id: xyz");
    }
}
