//! Refresh secret generation.

use anyhow::{Context, Result};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};

/// Raw entropy per refresh secret, before encoding.
pub const SECRET_BYTES: usize = 32;

/// Create a new raw refresh secret.
///
/// The returned value is shown to the client exactly once; the store only
/// ever sees its hash. `OsRng` is the sole entropy source, with no
/// external seeding.
pub fn generate_refresh_secret() -> Result<String> {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate refresh secret")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}
