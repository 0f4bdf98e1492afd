//! Password hashing
//!
//! Argon2id with a random salt, stored as a PHC string so the salt and
//! parameters travel with the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use std::sync::OnceLock;

use crate::error::DomainError;

/// Plaintext behind the hash used when there is no stored hash to check
const DUMMY_PASSWORD: &str = "bizdesk-unknown-user";

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Hash a plaintext password for storage
pub fn hash_password(plain_text: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain_text.as_bytes(), &salt)
        .map_err(|e| DomainError::Internal(format!("Password hash failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC string.
///
/// A malformed stored hash never matches.
pub fn verify_password(plain_text: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Hash on the blocking pool so Argon2 does not stall the runtime
pub async fn hash_password_blocking(plain_text: String) -> Result<String, DomainError> {
    tokio::task::spawn_blocking(move || hash_password(&plain_text))
        .await
        .map_err(|e| DomainError::Internal(format!("Password hash task failed: {}", e)))?
}

/// Verify on the blocking pool.
///
/// With no stored hash the password is checked against a throwaway hash, so
/// a missing account costs the same as a wrong password. The result is then
/// always false.
pub async fn verify_password_blocking(
    plain_text: String,
    stored_hash: Option<String>,
) -> Result<bool, DomainError> {
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&plain_text, &hash),
        None => {
            if let Some(dummy) = dummy_hash() {
                let _ = verify_password(&plain_text, dummy);
            }
            false
        }
    })
    .await
    .map_err(|e| DomainError::Internal(format!("Password verify task failed: {}", e)))
}

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_password(DUMMY_PASSWORD).ok())
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("secret124", &hash));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("secret123", "not-a-phc-string"));
        assert!(!verify_password("", ""));
    }

    #[tokio::test]
    async fn blocking_variants_match_sync_ones() {
        let hash = hash_password_blocking("secret123".to_string()).await.unwrap();
        assert!(verify_password("secret123", &hash));
        assert!(verify_password_blocking("secret123".to_string(), Some(hash.clone()))
            .await
            .unwrap());
        assert!(!verify_password_blocking("wrong".to_string(), Some(hash))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn missing_hash_never_verifies() {
        assert!(!verify_password_blocking(DUMMY_PASSWORD.to_string(), None)
            .await
            .unwrap());
        assert!(dummy_hash().is_some_and(|h| h.starts_with("$argon2id$")));
    }
}
