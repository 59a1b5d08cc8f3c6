//! Application Services
//!
//! Use cases of the marketplace, one service per aggregate. Services hold
//! their ports as shared trait objects so they are cheap to clone into
//! request handlers.

mod auth;
mod customer;
mod delivery;
mod food;
mod image;
mod offer;
mod order;
mod shopping;
mod vendor;

pub use auth::*;
pub use customer::*;
pub use delivery::*;
pub use food::*;
pub use image::*;
pub use offer::*;
pub use order::*;
pub use shopping::*;
pub use vendor::*;

use crate::{ApplicationError, ApplicationResult};

/// Turn a missing document into a `NotFound` error with the given message
pub(crate) fn found<T>(value: Option<T>, message: &str) -> ApplicationResult<T> {
    value.ok_or_else(|| ApplicationError::NotFound(message.to_string()))
}
