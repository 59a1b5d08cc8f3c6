//! FoodHub Domain Types
//!
//! This crate provides the core domain model for the FoodHub marketplace:
//! vendors, their foods and offers, customer orders, and the people who place
//! and deliver them. Entities serialize to the document layout stored in
//! MongoDB (camelCase fields, `_id` object ids).
//!
//! ## Architecture
//!
//! - **identifiers**: Strongly-typed `ObjectId` wrappers for all entities
//! - **vendor**, **food**, **order**, **offer**, **customer**, **delivery**: entities
//! - **location**: validated coordinates
//! - **user**: roles carried in bearer credentials
//! - **errors**: invariant violations
//!
//! ## Usage
//!
//! ```rust
//! use foodhub_domain::{offer::OfferType, VendorId};
//!
//! let vendor = VendorId::new();
//! let parsed: VendorId = vendor.to_string().parse().unwrap();
//! assert_eq!(vendor, parsed);
//! assert_ne!(OfferType::Generic, OfferType::Vendor);
//! ```

#![warn(clippy::all)]

pub mod customer;
pub mod delivery;
pub mod errors;
pub mod food;
pub mod identifiers;
pub mod location;
pub mod offer;
pub mod order;
pub mod user;
pub mod vendor;

// Re-export commonly used types
pub use errors::{DomainError, DomainResult};
pub use identifiers::*;
pub use location::Coordinates;

pub use customer::{Customer, PersonProfilePatch};
pub use delivery::DeliveryPerson;
pub use food::Food;
pub use offer::{Offer, OfferType, PromoType};
pub use order::{Order, OrderDetails, OrderItem, OrderLine, OrderStatus};
pub use user::Role;
pub use vendor::{Vendor, VendorProfilePatch};
