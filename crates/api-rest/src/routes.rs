//! HTTP route handlers, one module per audience.

pub mod admin;
pub mod customer;
pub mod delivery;
pub mod health;
pub mod shopping;
pub mod upload;
pub mod vendor;

use crate::{middleware::RateLimitLayer, state::AppState};
use axum::Router;
use foodhub_application::services::MAX_FILES_PER_REQUEST;

/// Multipart framing allowance on top of the file bytes
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Every API route. The three login routes share `login_limit`.
pub fn routes(login_limit: RateLimitLayer, max_upload_bytes: usize) -> Router<AppState> {
    let single_upload = max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    let cover_upload = max_upload_bytes
        .saturating_mul(MAX_FILES_PER_REQUEST)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .merge(health::routes())
        .merge(vendor::routes(login_limit.clone(), cover_upload))
        .merge(customer::routes(login_limit.clone()))
        .merge(delivery::routes(login_limit))
        .merge(admin::routes())
        .merge(shopping::routes())
        .merge(upload::routes(single_upload))
}
