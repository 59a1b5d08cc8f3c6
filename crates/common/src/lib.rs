//! Common utilities and shared functionality for the FoodHub services.
//!
//! This crate provides:
//! - Configuration management
//! - Structured logging setup
//! - Pagination helpers
//! - Password hashing
//! - Bearer token issuing and verification

pub mod config;
pub mod crypto;
pub mod pagination;
pub mod telemetry;
pub mod token;

// Re-export commonly used types
pub use config::{AppConfig, RemoteStorageProvider, S3Config, StorageConfig};
pub use crypto::{hash_password, verify_password};
pub use pagination::{PaginatedResult, PaginationParams, SortDirection, SortParams};
pub use telemetry::init_tracing;
pub use token::{Claims, Identity, TokenError, TokenService};

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
