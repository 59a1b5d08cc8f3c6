//! Health check endpoints.

use crate::{
    error::{ApiError, ApiResult},
    responses::ApiResponse,
    state::AppState,
};
use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Readiness check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Database connectivity
    pub database: bool,
}

/// Health check routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

/// Basic health check
///
/// Returns service status and version information.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> ApiResponse<HealthResponse> {
    ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check
///
/// Pings the database; 503 while it cannot be reached.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Database unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn ready(State(state): State<AppState>) -> ApiResult<ApiResponse<ReadinessResponse>> {
    if let Err(e) = state.health.ping().await {
        warn!(error = %e, "readiness check failed");
        return Err(ApiError::ServiceUnavailable(
            "Database is not reachable".to_string(),
        ));
    }

    Ok(ApiResponse::success(ReadinessResponse {
        ready: true,
        database: true,
    }))
}
