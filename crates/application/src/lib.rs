//! Application layer for FoodHub
//!
//! This crate holds the use cases of the marketplace and the ports they need
//! from the outside world.
//!
//! ## Architecture
//!
//! Services in [`services`] depend only on the traits in [`ports`]. The
//! infrastructure crate provides MongoDB and object-storage implementations;
//! the testing crate provides in-memory ones.
//!
//! ## Modules
//!
//! - `ports` - Repository, image storage and health traits
//! - `services` - Vendor, food, order, offer, customer, delivery, shopping and image services

pub mod ports;
pub mod services;

// Re-export commonly used types
pub use ports::{
    CustomerRepositoryPort, DeliveryRepositoryPort, FoodRepositoryPort, HealthProbe, ImageStore,
    ImageUpload, OfferRepositoryPort, OrderRepositoryPort, Repositories, StoredImage,
    VendorRepositoryPort,
};
pub use services::{
    Argon2PasswordHasher, CustomerService, DeliveryService, FoodService, ImageService,
    OfferService, OrderService, PasswordHasher, ShoppingService, UploadPolicy, VendorService,
};

use foodhub_domain::DomainError;
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication required or credentials rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Resource conflict (e.g., duplicate)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Upload exceeds the configured size cap
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database or storage backend unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApplicationError {
    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            ApplicationError::NotFound(_) => 404,
            ApplicationError::Unauthorized(_) => 401,
            ApplicationError::Forbidden(_) => 403,
            ApplicationError::InvalidInput(_) => 400,
            ApplicationError::ValidationFailed(_) => 422,
            ApplicationError::Conflict(_) => 409,
            ApplicationError::PayloadTooLarge(_) => 413,
            ApplicationError::Internal(_) => 500,
            ApplicationError::ServiceUnavailable(_) => 503,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApplicationError::ServiceUnavailable(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ApplicationError::NotFound(_) => "NOT_FOUND",
            ApplicationError::Unauthorized(_) => "UNAUTHORIZED",
            ApplicationError::Forbidden(_) => "FORBIDDEN",
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::ValidationFailed(_) => "VALIDATION_FAILED",
            ApplicationError::Conflict(_) => "CONFLICT",
            ApplicationError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApplicationError::Internal(_) => "INTERNAL_ERROR",
            ApplicationError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// The message without the category prefix, for response bodies
    pub fn message(&self) -> &str {
        match self {
            ApplicationError::NotFound(m)
            | ApplicationError::Unauthorized(m)
            | ApplicationError::Forbidden(m)
            | ApplicationError::InvalidInput(m)
            | ApplicationError::ValidationFailed(m)
            | ApplicationError::Conflict(m)
            | ApplicationError::PayloadTooLarge(m)
            | ApplicationError::Internal(m)
            | ApplicationError::ServiceUnavailable(m) => m,
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        ApplicationError::InvalidInput(err.to_string())
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_http_status() {
        assert_eq!(ApplicationError::NotFound("test".to_string()).http_status(), 404);
        assert_eq!(ApplicationError::Unauthorized("test".to_string()).http_status(), 401);
        assert_eq!(ApplicationError::Forbidden("test".to_string()).http_status(), 403);
        assert_eq!(ApplicationError::ValidationFailed("test".to_string()).http_status(), 422);
        assert_eq!(ApplicationError::Conflict("test".to_string()).http_status(), 409);
        assert_eq!(ApplicationError::PayloadTooLarge("test".to_string()).http_status(), 413);
        assert_eq!(ApplicationError::Internal("test".to_string()).http_status(), 500);
    }

    #[test]
    fn test_error_retryable() {
        assert!(ApplicationError::ServiceUnavailable("test".to_string()).is_retryable());
        assert!(!ApplicationError::NotFound("test".to_string()).is_retryable());
        assert!(!ApplicationError::Forbidden("test".to_string()).is_retryable());
    }

    #[test]
    fn test_domain_errors_become_invalid_input() {
        let err: ApplicationError = DomainError::InvalidValidityWindow.into();
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.message(), "Offer validity window ends before it starts");
    }
}
