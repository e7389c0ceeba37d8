//! # Sesamo (Credential Issuance & Rotation)
//!
//! `sesamo` issues short-lived, signed access tokens and longer-lived,
//! session-bound refresh secrets for a user-identity service.
//!
//! ## Sessions & Rotation
//!
//! Each sign-in establishes a single session bound to a client-supplied
//! **fingerprint** (a device/installation identifier, not a secret). The
//! refresh secret handed to the client is random, shown exactly once, and
//! stored only as an Argon2 hash. A successful refresh atomically rotates
//! the session: the presented secret is invalidated and a new one issued
//! in a single conditional store operation, so a stolen-and-replayed
//! secret loses the race and is rejected.
//!
//! - **Sign-in** replaces the user's entire session set with the new
//!   session (single-session policy).
//! - **Refresh** rotates the per-fingerprint slot via compare-and-swap on
//!   the stored hash; concurrent refreshes with the same secret yield at
//!   most one winner.
//! - Access tokens are stateless `HS512` JWTs (`sub`, `iat`, `exp`) and
//!   are only issued after the session mutation has committed.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;
