//! Testing utilities for FoodHub
//!
//! This crate provides:
//! - Test fixtures for all domain types
//! - Builders for service inputs
//! - In-memory implementations of every application port
//! - Throwaway MongoDB containers for repository tests
//!
//! # Examples
//!
//! ```
//! use foodhub_testing::{fixtures::*, MockStores};
//!
//! let stores = MockStores::new();
//! stores.vendors.seed(create_test_vendor());
//! assert_eq!(stores.vendors.count(), 1);
//! ```

pub mod builders;
pub mod database;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
pub use testcontainers;
