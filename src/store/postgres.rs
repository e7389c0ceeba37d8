//! Postgres-backed session store.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE users (
//!     id           UUID PRIMARY KEY,
//!     display_name TEXT NOT NULL
//! );
//!
//! CREATE TABLE user_sessions (
//!     user_id      UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
//!     fingerprint  TEXT NOT NULL,
//!     refresh_hash TEXT NOT NULL,
//!     created_at   TIMESTAMPTZ NOT NULL,
//!     expires_at   TIMESTAMPTZ NOT NULL,
//!     PRIMARY KEY (user_id, fingerprint)
//! );
//!
//! CREATE INDEX user_sessions_fingerprint_idx ON user_sessions (fingerprint);
//! ```
//!
//! Rotation is a single conditional `UPDATE` keyed on the old hash, so the
//! database serializes concurrent refreshes on the same slot without the
//! application holding any lock across round trips.

use super::{Session, SessionStore, StoreError, UserIdentity};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create_session(&self, user_id: Uuid, session: Session) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("begin create-session transaction")?;

        let query = "SELECT 1 FROM users WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .instrument(span)
            .await
            .context("failed to lookup user")?;
        if row.is_none() {
            return Err(StoreError::NotFound);
        }

        // Sign-in invalidates every prior session for this user.
        let query = "DELETE FROM user_sessions WHERE user_id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .execute(&mut *tx)
            .instrument(span)
            .await
            .context("failed to clear prior sessions")?;

        let query = r"
            INSERT INTO user_sessions (user_id, fingerprint, refresh_hash, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .bind(&session.fingerprint)
            .bind(&session.refresh_hash)
            .bind(session.created_at)
            .bind(session.expires_at)
            .execute(&mut *tx)
            .instrument(span)
            .await
            .context("failed to insert session")?;

        tx.commit()
            .await
            .context("commit create-session transaction")?;
        Ok(())
    }

    async fn replace_session(
        &self,
        user_id: Uuid,
        fingerprint: &str,
        old_hash: &str,
        new_session: Session,
    ) -> Result<(), StoreError> {
        // Compare-and-swap: the row is only touched while the old hash is
        // still in place, so a lost race never deletes the winning session.
        let query = r"
            UPDATE user_sessions
            SET refresh_hash = $4, created_at = $5, expires_at = $6
            WHERE user_id = $1 AND fingerprint = $2 AND refresh_hash = $3
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(user_id)
            .bind(fingerprint)
            .bind(old_hash)
            .bind(&new_session.refresh_hash)
            .bind(new_session.created_at)
            .bind(new_session.expires_at)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to replace session")?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Distinguish a rotated slot from a vanished one.
        let query = "SELECT 1 FROM user_sessions WHERE user_id = $1 AND fingerprint = $2";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(user_id)
            .bind(fingerprint)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to check session slot")?;

        match row {
            Some(_) => Err(StoreError::ConflictStale),
            None => Err(StoreError::NotFound),
        }
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<UserIdentity, StoreError> {
        let query = "SELECT id, display_name FROM users WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user")?
            .ok_or(StoreError::NotFound)?;

        let query = r"
            SELECT fingerprint, refresh_hash, created_at, expires_at
            FROM user_sessions
            WHERE user_id = $1
            ORDER BY created_at
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let sessions = sqlx::query(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .context("failed to load sessions")?;

        Ok(UserIdentity {
            id: row.get("id"),
            display_name: row.get("display_name"),
            sessions: sessions.iter().map(session_from_row).collect(),
        })
    }

    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<UserIdentity, StoreError> {
        let query = r"
            SELECT users.id, users.display_name,
                   user_sessions.fingerprint, user_sessions.refresh_hash,
                   user_sessions.created_at, user_sessions.expires_at
            FROM user_sessions
            JOIN users ON users.id = user_sessions.user_id
            WHERE user_sessions.fingerprint = $1
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(fingerprint)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup session by fingerprint")?
            .ok_or(StoreError::NotFound)?;

        Ok(UserIdentity {
            id: row.get("id"),
            display_name: row.get("display_name"),
            sessions: vec![session_from_row(&row)],
        })
    }
}

fn session_from_row(row: &sqlx::postgres::PgRow) -> Session {
    Session {
        fingerprint: row.get("fingerprint"),
        refresh_hash: row.get("refresh_hash"),
        created_at: row.get("created_at"),
        expires_at: row.get("expires_at"),
    }
}
