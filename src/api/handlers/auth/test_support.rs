//! Shared fixtures for handler tests.

use crate::auth::{jwt::AccessTokenIssuer, AuthConfig, SessionManager};
use crate::store::MemorySessionStore;
use secrecy::SecretString;
use std::sync::Arc;
use uuid::Uuid;

/// A manager over an in-memory store seeded with one user.
pub(crate) fn manager_with_user() -> (Arc<SessionManager>, Arc<MemorySessionStore>, Uuid) {
    let store = Arc::new(MemorySessionStore::new());
    let user_id = Uuid::new_v4();
    store.insert_user(user_id, "alice");
    let issuer = AccessTokenIssuer::new(&SecretString::from("test-signing-secret"), 3600);
    let manager = Arc::new(SessionManager::new(
        store.clone(),
        issuer,
        AuthConfig::new(),
    ));
    (manager, store, user_id)
}
