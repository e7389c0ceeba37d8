//! One-way hashing for refresh secrets.
//!
//! Argon2id with a per-secret random salt, so a leaked store cannot be
//! cheaply reversed into usable refresh secrets. A mismatch is a boolean
//! `false`; only randomness or parameter failures are errors.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a raw refresh secret into a PHC string for persistence.
pub fn hash_secret(raw: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("failed to hash refresh secret: {err}"))
}

/// Verify a presented secret against a stored PHC string.
pub fn verify_secret(raw: &str, stored: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|err| anyhow!("invalid stored secret hash: {err}"))?;
    match Argon2::default().verify_password(raw.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(anyhow!("failed to verify refresh secret: {err}")),
    }
}
