//! Fallback and panic handlers.

use crate::error::{ApiError, ErrorResponse};
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    BoxError, Json,
};
use tower::timeout::error::Elapsed;
use tracing::{error, warn};

/// Unknown routes get the regular error envelope
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Map errors raised by the timeout layer into the error envelope
pub async fn handle_timeout(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        warn!("Request timed out");
        ApiError::RequestTimeout
    } else {
        ApiError::Internal(err.to_string())
    }
}

/// Turn a handler panic into a 500 envelope
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    error!(details = %details, "Handler panicked");

    let body = ErrorResponse::new("INTERNAL_ERROR", "Internal server error");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
