//! HTTP error handling and conversion.
//!
//! Every failure leaves the API as `{"ok": false, "kind": ..., "message": ...}`
//! with a status code derived from the error.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use foodhub_application::ApplicationError;
use foodhub_domain::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// API-specific error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Application layer error
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// No or malformed credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Token failed signature or expiry checks
    #[error("{0}")]
    InvalidToken(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Request body failed validation
    #[error("{0}")]
    Validation(String),

    /// Malformed request
    #[error("{0}")]
    BadRequest(String),

    /// Unknown route or resource
    #[error("{0}")]
    NotFound(String),

    /// Body or upload over the configured limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Login attempts exhausted for this window
    #[error("Too many requests, please try again later")]
    RateLimitExceeded {
        /// Seconds until the window resets
        retry_after: u64,
    },

    /// Handler did not finish within the configured timeout
    #[error("Request timed out")]
    RequestTimeout,

    /// Dependency not reachable
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Internal server error
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Application(err) => StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Unauthorized(_) | Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API response
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Application(err) => err.error_code(),
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        match self {
            Self::Application(ApplicationError::Internal(_)) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Application(err) => err.message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Error half of the response envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub ok: bool,

    /// Machine-readable error code
    pub kind: String,

    /// Human-readable message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error_code = self.error_code(), error = %self, detail = ?self, "Request failed");
        }

        let body = ErrorResponse::new(self.error_code(), self.public_message());
        let mut response = (status, Json(body)).into_response();

        if let Self::RateLimitExceeded { retry_after } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Application(err.into())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_application_errors_keep_their_status() {
        let err = ApiError::from(ApplicationError::NotFound("Order Not found".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.public_message(), "Order Not found");

        let err = ApiError::from(ApplicationError::ServiceUnavailable("down".to_string()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = ApiError::from(ApplicationError::Internal("secret stack".to_string()));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let response = ApiError::Forbidden("Vendor access required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["kind"], "FORBIDDEN");
        assert_eq!(json["message"], "Vendor access required");
    }

    #[test]
    fn test_rate_limit_sets_retry_after() {
        let response = ApiError::RateLimitExceeded { retry_after: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
    }
}
