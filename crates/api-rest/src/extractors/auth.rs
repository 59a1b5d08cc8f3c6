//! Authentication extractors.
//!
//! `Authorization: Bearer <token>` is verified before the handler runs.
//! Role-scoped extractors additionally reject tokens issued to another role.

use crate::{error::ApiError, state::AppState};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use foodhub_common::{Claims, TokenError};
use foodhub_domain::{CustomerId, DeliveryPersonId, Role, VendorId};
use std::str::FromStr;

/// Header carrying the admin key
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Authenticated caller of any role
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Verified claims
    pub claims: Claims,
}

impl AuthenticatedUser {
    /// Check if the token was issued to `role`
    pub fn has_role(&self, role: Role) -> bool {
        self.claims.role == role
    }

    fn require<I>(self, role: Role) -> Result<I, ApiError>
    where
        I: FromStr,
    {
        if !self.has_role(role) {
            return Err(ApiError::Forbidden(format!("{} access required", role)));
        }
        self.claims
            .sub
            .parse()
            .map_err(|_| ApiError::InvalidToken("Invalid subject in token".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Not authorized".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Not authorized".to_string()))?;

        let claims = state.tokens.verify(token).map_err(|e| match e {
            TokenError::Expired => ApiError::InvalidToken("Token has expired".to_string()),
            _ => ApiError::InvalidToken("Invalid token".to_string()),
        })?;

        Ok(Self { claims })
    }
}

/// Authenticated vendor
#[derive(Debug, Clone)]
pub struct AuthVendor {
    pub id: VendorId,
    pub claims: Claims,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthVendor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        let claims = user.claims.clone();
        Ok(Self {
            id: user.require(Role::Vendor)?,
            claims,
        })
    }
}

/// Authenticated customer
#[derive(Debug, Clone)]
pub struct AuthCustomer {
    pub id: CustomerId,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthCustomer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        Ok(Self {
            id: user.require(Role::Customer)?,
        })
    }
}

/// Authenticated delivery person
#[derive(Debug, Clone)]
pub struct AuthDelivery {
    pub id: DeliveryPersonId,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthDelivery {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        Ok(Self {
            id: user.require(Role::Delivery)?,
        })
    }
}

/// Caller presenting the configured admin key.
///
/// With no key configured every admin request is refused.
#[derive(Debug, Clone, Copy)]
pub struct AdminKey;

#[async_trait]
impl FromRequestParts<AppState> for AdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_api_key() else {
            return Err(ApiError::Forbidden("Admin access is disabled".to_string()));
        };

        let presented = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Admin key required".to_string()))?;

        if keys_match(presented.as_bytes(), expected.as_bytes()) {
            Ok(Self)
        } else {
            Err(ApiError::Forbidden("Invalid admin key".to_string()))
        }
    }
}

/// Compare without short-circuiting on the first differing byte
fn keys_match(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
