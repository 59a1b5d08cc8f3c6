//! Credential checks shared by the login flows.

use async_trait::async_trait;
use foodhub_common::{Identity, TokenService};
use std::sync::Arc;
use tracing::warn;

use crate::{ApplicationError, ApplicationResult};

/// The single message returned for every rejected login
pub const INVALID_CREDENTIALS: &str = "Login credential is not valid";

/// Password hasher trait
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    async fn verify(&self, password: &str, hash: &str) -> ApplicationResult<bool>;
}

/// Argon2id hasher. Work runs on the blocking pool.
pub struct Argon2PasswordHasher;

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || foodhub_common::hash_password(&password))
            .await
            .map_err(|e| ApplicationError::Internal(e.to_string()))?
            .map_err(|e| ApplicationError::Internal(e.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> ApplicationResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        let outcome =
            tokio::task::spawn_blocking(move || foodhub_common::verify_password(&password, &hash))
                .await
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                warn!(error = %e, "stored password hash is unreadable");
                Ok(false)
            }
        }
    }
}

/// Hashes passwords, checks logins and signs tokens
#[derive(Clone)]
pub struct Authenticator {
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenService,
}

impl Authenticator {
    pub fn new(hasher: Arc<dyn PasswordHasher>, tokens: TokenService) -> Self {
        Self { hasher, tokens }
    }

    pub async fn hash(&self, password: &str) -> ApplicationResult<String> {
        self.hasher.hash(password).await
    }

    /// Accept only when an account exists and the password matches its hash.
    ///
    /// Unknown accounts and wrong passwords produce the same error.
    pub async fn check(&self, password: &str, stored_hash: Option<&str>) -> ApplicationResult<()> {
        let Some(hash) = stored_hash else {
            return Err(ApplicationError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if self.hasher.verify(password, hash).await? {
            Ok(())
        } else {
            Err(ApplicationError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }

    pub fn issue(&self, identity: &Identity) -> ApplicationResult<String> {
        self.tokens
            .issue(identity)
            .map_err(|e| ApplicationError::Internal(e.to_string()))
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}
