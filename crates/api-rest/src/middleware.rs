//! HTTP middleware components.
//!
//! - Request ID generation
//! - Request logging
//! - Login rate limiting
//! - Fallback and panic handling

pub mod error_handler;
pub mod logging;
pub mod rate_limit;
pub mod request_id;

pub use error_handler::{handle_panic, handle_timeout, not_found};
pub use logging::logging_middleware;
pub use rate_limit::{RateLimitConfig, RateLimitLayer};
pub use request_id::{request_id_middleware, RequestId};
