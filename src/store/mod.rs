//! Session store contract and records.
//!
//! The store owns per-fingerprint uniqueness: at most one session exists
//! for a `(user, fingerprint)` pair. Rotation goes through
//! [`SessionStore::replace_session`], a compare-and-swap on the stored
//! hash, so two refreshes racing on the same secret commit at most once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemorySessionStore;
pub use postgres::PgSessionStore;

/// One refresh session, bound to a client fingerprint.
///
/// `refresh_hash` is the PHC string for the refresh secret; the raw
/// secret never reaches the store.
#[derive(Debug, Clone)]
pub struct Session {
    pub fingerprint: String,
    pub refresh_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A user identity together with its sessions as loaded from the store.
///
/// Loaded fresh per request; never cached across requests.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub id: Uuid,
    pub display_name: String,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// User or session absent.
    #[error("not found")]
    NotFound,

    /// The session exists but its hash no longer matches the expected one.
    #[error("stale session hash")]
    ConflictStale,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Replace the user's entire session set with `session`.
    ///
    /// Sign-in policy: establishing a new session invalidates every prior
    /// session for that user. Fails with [`StoreError::NotFound`] when the
    /// user does not exist.
    async fn create_session(&self, user_id: Uuid, session: Session) -> Result<(), StoreError>;

    /// Atomically swap the session in the `(user, fingerprint)` slot,
    /// conditioned on `old_hash` still being the stored hash.
    ///
    /// Fails with [`StoreError::ConflictStale`] when the slot exists but
    /// was rotated concurrently, [`StoreError::NotFound`] when the slot is
    /// gone. Never leaves the slot empty on failure.
    async fn replace_session(
        &self,
        user_id: Uuid,
        fingerprint: &str,
        old_hash: &str,
        new_session: Session,
    ) -> Result<(), StoreError>;

    /// Load a user and all of their sessions.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<UserIdentity, StoreError>;

    /// Load the user owning a session for `fingerprint`, with `sessions`
    /// narrowed to that one matching session.
    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<UserIdentity, StoreError>;
}
