//! Error taxonomy for the credential flows.
//!
//! Lookup and verification failures stay opaque at the boundary: the
//! response must not reveal whether the user, the session, or the secret
//! was the failing check. Infrastructure variants carry their cause for
//! logging only; it is never serialized into a response body.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// User or session absent.
    #[error("not found")]
    NotFound,

    /// Credential verification failed or the session expired.
    #[error("unauthorized")]
    Unauthorized,

    /// Rotation lost the race against a concurrent refresh.
    #[error("session was concurrently rotated")]
    ConflictStale,

    /// Secret generation or hashing failed, never a mismatch.
    #[error("hashing failure")]
    Hashing(#[source] anyhow::Error),

    /// The access token could not be signed.
    #[error("signing failure")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The session store failed.
    #[error("store failure")]
    Store(#[source] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            StoreError::ConflictStale => Self::ConflictStale,
            StoreError::Backend(cause) => Self::Store(cause),
        }
    }
}
