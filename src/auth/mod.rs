//! Credential primitives and the session lifecycle manager.

pub mod config;
pub mod error;
pub mod hasher;
pub mod jwt;
pub mod manager;
pub mod secret;

pub use config::AuthConfig;
pub use error::AuthError;
pub use manager::{IssuedCredentials, SessionManager};
