//! Request logging middleware.

use super::request_id::RequestId;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, Response},
    middleware::Next,
};
use std::time::Instant;
use tracing::{info, warn};

/// Declared body size of a response, if it carries one.
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Middleware for logging HTTP requests and responses
pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response<Body> {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();
    let content_length = content_length(response.headers());

    if status.is_server_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %status,
            content_length = ?content_length,
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %status,
            content_length = ?content_length,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}
