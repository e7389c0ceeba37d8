//! In-memory session store.
//!
//! Test double for the Postgres store; the compare-and-swap in
//! [`replace_session`] happens under a single mutex acquisition, matching
//! the per-document atomicity the real store provides.
//!
//! [`replace_session`]: MemorySessionStore::replace_session

use super::{Session, SessionStore, StoreError, UserIdentity};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug)]
struct UserRecord {
    display_name: String,
    sessions: Vec<Session>,
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    users: Mutex<HashMap<Uuid, UserRecord>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user identity without any sessions.
    pub fn insert_user(&self, user_id: Uuid, display_name: &str) {
        if let Ok(mut users) = self.users.lock() {
            users.insert(
                user_id,
                UserRecord {
                    display_name: display_name.to_string(),
                    sessions: Vec::new(),
                },
            );
        }
    }

    /// Overwrite a user's sessions directly, bypassing the contract.
    ///
    /// Lets tests plant expired or crafted sessions.
    pub fn set_sessions(&self, user_id: Uuid, sessions: Vec<Session>) {
        if let Ok(mut users) = self.users.lock() {
            if let Some(record) = users.get_mut(&user_id) {
                record.sessions = sessions;
            }
        }
    }

    /// Number of sessions currently stored for a user.
    #[must_use]
    pub fn session_count(&self, user_id: Uuid) -> usize {
        self.users
            .lock()
            .ok()
            .and_then(|users| users.get(&user_id).map(|record| record.sessions.len()))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, UserRecord>>, StoreError> {
        self.users
            .lock()
            .map_err(|_| StoreError::Backend(anyhow!("session store mutex poisoned")))
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self, user_id: Uuid, session: Session) -> Result<(), StoreError> {
        let mut users = self.lock()?;
        let record = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        record.sessions = vec![session];
        Ok(())
    }

    async fn replace_session(
        &self,
        user_id: Uuid,
        fingerprint: &str,
        old_hash: &str,
        new_session: Session,
    ) -> Result<(), StoreError> {
        let mut users = self.lock()?;
        let record = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        let slot = record
            .sessions
            .iter_mut()
            .find(|session| session.fingerprint == fingerprint)
            .ok_or(StoreError::NotFound)?;
        if slot.refresh_hash != old_hash {
            return Err(StoreError::ConflictStale);
        }
        *slot = new_session;
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<UserIdentity, StoreError> {
        let users = self.lock()?;
        let record = users.get(&user_id).ok_or(StoreError::NotFound)?;
        Ok(UserIdentity {
            id: user_id,
            display_name: record.display_name.clone(),
            sessions: record.sessions.clone(),
        })
    }

    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<UserIdentity, StoreError> {
        let users = self.lock()?;
        for (id, record) in users.iter() {
            if let Some(session) = record
                .sessions
                .iter()
                .find(|session| session.fingerprint == fingerprint)
            {
                return Ok(UserIdentity {
                    id: *id,
                    display_name: record.display_name.clone(),
                    sessions: vec![session.clone()],
                });
            }
        }
        Err(StoreError::NotFound)
    }
}
