//! Password hashing.
//!
//! Hashes are argon2id PHC strings; the salt travels inside the hash.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2.
///
/// # Examples
///
/// ```
/// use foodhub_common::crypto::hash_password;
///
/// let hash = hash_password("my_secure_password").expect("Failed to hash password");
/// assert!(hash.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .context("Failed to hash password")?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a hash.
///
/// A malformed stored hash is an error; a mismatch is `Ok(false)`.
///
/// # Examples
///
/// ```
/// use foodhub_common::crypto::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").expect("Failed to hash");
/// assert!(verify_password("my_password", &hash).expect("Failed to verify"));
/// assert!(!verify_password("wrong_password", &hash).expect("Failed to verify"));
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).context("Invalid password hash format")?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_password_success() {
        let hash = hash_password("test_password_123").expect("Failed to hash password");
        assert!(verify_password("test_password_123", &hash).expect("Failed to verify password"));
    }

    #[test]
    fn test_verify_password_failure() {
        let hash = hash_password("test_password_123").expect("Failed to hash password");
        assert!(!verify_password("wrong_password", &hash).expect("Failed to verify password"));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
