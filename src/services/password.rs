//! Password hashing and the admin credential ladder
//!
//! Uses Argon2id with secure defaults for hashed credentials. The admin
//! identity supports two configurations: a stored Argon2id hash
//! (preferred, takes precedence) or a plaintext password from config/env
//! (development fallback).

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id with secure defaults.
///
/// Returns a PHC-format string (algorithm, parameters, salt and hash).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;

    Ok(hash.to_string())
}

/// Verify a password against a PHC-format Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow!("Invalid password hash format: {}", e))
        .context("Failed to parse password hash")?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check a provided password against the configured admin credential.
///
/// If a password hash is configured it always wins; an unparseable hash
/// fails verification rather than falling through to the plaintext path.
/// With no hash, the plaintext configured password is compared directly.
/// With neither configured, every attempt fails.
pub fn verify_admin_password(
    provided: &str,
    config_password: &str,
    config_password_hash: Option<&str>,
) -> bool {
    if let Some(hash) = config_password_hash.filter(|h| !h.is_empty()) {
        return verify_password(provided, hash).unwrap_or(false);
    }
    if !config_password.is_empty() {
        return provided == config_password;
    }
    false
}
