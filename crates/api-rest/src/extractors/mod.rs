//! Custom Axum extractors.
//!
//! This module provides reusable extractors for authentication, pagination,
//! validated JSON payloads and multipart image uploads.

pub mod auth;
pub mod images;
pub mod pagination;
pub mod validated_json;

pub use auth::{AdminKey, AuthCustomer, AuthDelivery, AuthVendor, AuthenticatedUser};
pub use images::collect_images;
pub use pagination::{NameFilter, Pagination};
pub use validated_json::{OptionalJson, ValidatedJson};
