//! Session lifecycle orchestration for sign-in and refresh.

use crate::auth::{config::AuthConfig, error::AuthError, hasher, jwt::AccessTokenIssuer, secret};
use crate::store::{Session, SessionStore};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Credentials handed back to the boundary layer after a successful
/// sign-in or refresh.
#[derive(Debug)]
pub struct IssuedCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub session_expires_at: DateTime<Utc>,
}

/// Orchestrates the credential flows against an injected [`SessionStore`].
///
/// Holds no mutable state of its own; every mutation goes through the
/// store, and no lock is held across a store round trip.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    issuer: AccessTokenIssuer,
    config: AuthConfig,
}

impl SessionManager {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, issuer: AccessTokenIssuer, config: AuthConfig) -> Self {
        Self {
            store,
            issuer,
            config,
        }
    }

    /// Establish a new session for `user_id`, invalidating all prior
    /// sessions (single-session policy).
    ///
    /// The access token is only minted after the session commit, so a
    /// failed store write never leaks a usable credential.
    ///
    /// # Errors
    /// [`AuthError::NotFound`] for unknown users; infrastructure variants
    /// for store, hashing, or signing failures.
    pub async fn sign_in(
        &self,
        user_id: Uuid,
        fingerprint: &str,
    ) -> Result<IssuedCredentials, AuthError> {
        let user = self.store.find_by_user_id(user_id).await?;

        let (refresh_token, session) = self.new_session(fingerprint)?;
        let session_expires_at = session.expires_at;

        debug!("Creating session for user {}", user.id);
        self.store.create_session(user.id, session).await?;

        let access_token = self
            .issuer
            .issue(&user.id.to_string())
            .map_err(AuthError::Signing)?;

        Ok(IssuedCredentials {
            access_token,
            refresh_token,
            session_expires_at,
        })
    }

    /// Validate a presented refresh secret and rotate the session bound to
    /// `fingerprint`.
    ///
    /// Rotation is a compare-and-swap on the stored hash: of two
    /// concurrent refreshes presenting the same secret, exactly one
    /// commits and the other observes [`AuthError::ConflictStale`].
    ///
    /// # Errors
    /// [`AuthError::NotFound`] when no session matches the fingerprint,
    /// [`AuthError::Unauthorized`] on hash mismatch or expiry,
    /// [`AuthError::ConflictStale`] on a lost rotation race.
    pub async fn refresh(
        &self,
        fingerprint: &str,
        presented_secret: &str,
    ) -> Result<IssuedCredentials, AuthError> {
        let user = self.store.find_by_fingerprint(fingerprint).await?;
        let current = user
            .sessions
            .iter()
            .find(|session| session.fingerprint == fingerprint)
            .ok_or(AuthError::NotFound)?;

        // An expired session is unusable even when the hash matches.
        if current.expires_at <= Utc::now() {
            return Err(AuthError::Unauthorized);
        }

        if !hasher::verify_secret(presented_secret, &current.refresh_hash)
            .map_err(AuthError::Hashing)?
        {
            return Err(AuthError::Unauthorized);
        }

        let (refresh_token, session) = self.new_session(fingerprint)?;
        let session_expires_at = session.expires_at;

        debug!("Rotating session for user {}", user.id);
        self.store
            .replace_session(user.id, fingerprint, &current.refresh_hash, session)
            .await?;

        let access_token = self
            .issuer
            .issue(&user.id.to_string())
            .map_err(AuthError::Signing)?;

        Ok(IssuedCredentials {
            access_token,
            refresh_token,
            session_expires_at,
        })
    }

    /// Expose the issuer for verification middleware wired elsewhere.
    #[must_use]
    pub fn issuer(&self) -> &AccessTokenIssuer {
        &self.issuer
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn new_session(&self, fingerprint: &str) -> Result<(String, Session), AuthError> {
        let raw = secret::generate_refresh_secret().map_err(AuthError::Hashing)?;
        let refresh_hash = hasher::hash_secret(&raw).map_err(AuthError::Hashing)?;
        let created_at = Utc::now();
        let expires_at = created_at + Duration::seconds(self.config.refresh_token_ttl_seconds());
        Ok((
            raw,
            Session {
                fingerprint: fingerprint.to_string(),
                refresh_hash,
                created_at,
                expires_at,
            },
        ))
    }
}
