//! Pagination extractor.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use foodhub_common::pagination::PaginationParams;
use serde::Deserialize;

/// Query parameters for pagination.
///
/// The page size is accepted as `limit`, `page_size` or `per_page`; when
/// several are given the first in that order wins.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    /// Page number (1-indexed)
    #[serde(default)]
    pub page: Option<u32>,

    /// Items per page
    #[serde(default)]
    pub limit: Option<u32>,

    #[serde(default)]
    pub page_size: Option<u32>,

    #[serde(default)]
    pub per_page: Option<u32>,
}

impl PaginationQuery {
    /// The requested page size under whichever name it was sent.
    pub fn requested_limit(&self) -> Option<u32> {
        self.limit.or(self.page_size).or(self.per_page)
    }
}

/// Extracted pagination parameters; missing or zero values use the defaults
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub PaginationParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PaginationQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid pagination parameters: {}", e)))?;

        Ok(Self(PaginationParams::new(
            query.page.unwrap_or(0),
            query.requested_limit().unwrap_or(0),
        )))
    }
}

/// Optional `name` text filter
#[derive(Debug, Default, Deserialize)]
pub struct NameFilter {
    #[serde(default)]
    pub name: Option<String>,
}

impl NameFilter {
    pub fn as_deref(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
