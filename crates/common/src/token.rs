//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the identity of a vendor, customer or
//! delivery person. There is no refresh or revocation.

use chrono::Utc;
use foodhub_domain::Role;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id (hex object id)
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Expiration timestamp
    pub exp: usize,
    /// Issued at timestamp
    pub iat: usize,
}

/// The identity a token is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies bearer tokens with one shared secret
#[derive(Clone)]
pub struct TokenService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    expiry: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, expiry: Duration) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            expiry,
        }
    }

    /// Sign a token for `identity`, valid for the configured lifetime
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let now = Utc::now().timestamp().max(0) as usize;
        let claims = Claims {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            role: identity.role,
            iat: now,
            exp: now + self.expiry.as_secs() as usize,
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-minimum-32-characters";

    fn identity() -> Identity {
        Identity {
            id: "65f1c0ffee0000000000beef".to_string(),
            email: "vendor@example.com".to_string(),
            name: "Spice Route".to_string(),
            role: Role::Vendor,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = TokenService::new(SECRET, Duration::from_secs(3600));
        let token = tokens.issue(&identity()).unwrap();
        assert!(!token.is_empty());

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "65f1c0ffee0000000000beef");
        assert_eq!(claims.role, Role::Vendor);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = TokenService::new(SECRET, Duration::from_secs(60))
            .issue(&identity())
            .unwrap();
        let other = TokenService::new("another-secret-key-minimum-32-characters", Duration::from_secs(60));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = TokenService::new(SECRET, Duration::from_secs(60));
        let past = (Utc::now().timestamp() - 3600) as usize;
        let token = tokens
            .sign(&Claims {
                sub: "x".to_string(),
                email: "x@example.com".to_string(),
                name: "x".to_string(),
                role: Role::Customer,
                iat: past - 60,
                exp: past,
            })
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let tokens = TokenService::new(SECRET, Duration::from_secs(60));
        assert!(matches!(tokens.verify("not.a.jwt"), Err(TokenError::Invalid(_))));
    }
}
