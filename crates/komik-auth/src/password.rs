//! Credential hashing and verification.
//!
//! Argon2id-based hashing for user passwords and for refresh tokens at
//! rest. The same primitives serve both. Every hash carries its own
//! random salt, so equal inputs never produce equal hashes; stored
//! refresh-token hashes therefore cannot be looked up by equality and
//! must be matched with [`verify`] (see the rotation protocol in
//! [`crate::service`]).
//!
//! Hashing is CPU-bound, so the async variants offload to
//! `spawn_blocking` rather than stalling the runtime.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{AuthError, AuthResult};

/// Hash a secret for storage using Argon2id.
///
/// Uses a cryptographically secure random salt (OsRng) and the default
/// Argon2id parameters, producing a PHC-formatted string.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if hashing fails (rare).
pub fn hash(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(secret.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a secret against a stored Argon2 hash.
///
/// Returns `Ok(true)` if the secret matches, `Ok(false)` if it does
/// not. Returns `Err` only if the stored hash is not a valid PHC
/// string.
pub fn verify(secret: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let result = Argon2::default().verify_password(secret.as_bytes(), &parsed_hash);
    Ok(result.is_ok())
}

/// Hash a secret on the blocking thread pool.
///
/// # Errors
///
/// Returns [`AuthError::Internal`] if hashing fails or the blocking
/// task is cancelled.
pub async fn hash_blocking(secret: String) -> AuthResult<String> {
    tokio::task::spawn_blocking(move || hash(&secret))
        .await
        .map_err(|e| AuthError::internal(format!("hashing task failed: {e}")))?
        .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))
}

/// Verify a secret against a stored hash on the blocking thread pool.
///
/// A stored hash that fails to parse is treated as a non-match rather
/// than an error: a corrupt row must not authenticate anyone.
pub async fn verify_blocking(secret: String, hash: String) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || verify(&secret, &hash).unwrap_or(false))
        .await
        .map_err(|e| AuthError::internal(format!("verification task failed: {e}")))
}
