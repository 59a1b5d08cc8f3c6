//! Infrastructure layer for FoodHub
//!
//! This crate provides implementations for:
//! - Database access (MongoDB)
//! - Repository implementations of the application ports
//! - Image storage (local disk and S3-compatible object storage)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use foodhub_infrastructure::{database::Database, repositories::mongo_repositories};
//!
//! let db = Database::connect(&config.database).await?;
//! db.ensure_indexes().await?;
//! let repositories = mongo_repositories(&db);
//! ```

pub mod database;
pub mod repositories;
pub mod storage;

// Re-export commonly used types
pub use database::Database;
pub use repositories::{
    mongo_repositories, MongoCustomerRepository, MongoDeliveryRepository, MongoFoodRepository,
    MongoOfferRepository, MongoOrderRepository, MongoVendorRepository,
};
pub use storage::{image_store_from_config, LocalDiskStorage, S3ImageStorage};

use foodhub_application::ApplicationError;
use mongodb::error::{ErrorKind, WriteFailure};

// Re-export result and error types
pub type Result<T> = std::result::Result<T, Error>;

/// MongoDB server error code for unique index violations
const DUPLICATE_KEY: i32 = 11000;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Driver errors from MongoDB
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Documents that could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    /// Storage errors from disk or S3 operations
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// A write rejected by a unique index
    pub fn is_duplicate_key(&self) -> bool {
        let Error::Database(err) = self else {
            return false;
        };
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
            _ => false,
        }
    }

    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Database(_) if self.is_duplicate_key() => 409,
            Error::Database(_) | Error::Storage(_) => 503,
            Error::Serialization(_) | Error::Configuration(_) => 500,
        }
    }
}

impl From<Error> for ApplicationError {
    fn from(err: Error) -> Self {
        if err.is_duplicate_key() {
            return ApplicationError::Conflict("A record with this email already exists".to_string());
        }
        match err {
            Error::Database(e) => match e.kind.as_ref() {
                ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
                    ApplicationError::Internal(e.to_string())
                }
                _ => ApplicationError::ServiceUnavailable(e.to_string()),
            },
            Error::Storage(msg) => ApplicationError::ServiceUnavailable(msg),
            Error::Serialization(e) => ApplicationError::Internal(e.to_string()),
            Error::Configuration(msg) => ApplicationError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_are_unavailable() {
        let err: ApplicationError = Error::Storage("disk full".to_string()).into();
        assert_eq!(err, ApplicationError::ServiceUnavailable("disk full".to_string()));
    }

    #[test]
    fn test_error_http_status() {
        assert_eq!(Error::Storage("x".to_string()).http_status(), 503);
        assert_eq!(Error::Configuration("x".to_string()).http_status(), 500);
        assert!(!Error::Configuration("x".to_string()).is_duplicate_key());
    }
}
