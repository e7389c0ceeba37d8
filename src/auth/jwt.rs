//! Stateless access token issuance.
//!
//! Access tokens are `HS512` JWTs carrying `{sub, iat, exp}` and nothing
//! else. They are never persisted; any verifier holding the shared secret
//! can check them offline.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::Error, Algorithm, DecodingKey, EncodingKey, Header, TokenData,
    Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct AccessTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl AccessTokenIssuer {
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            ttl_seconds,
        }
    }

    /// Mint a signed access token for `subject`.
    ///
    /// # Errors
    /// Returns an error when the signing secret is unusable.
    pub fn issue(&self, subject: &str) -> Result<String, Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };
        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
    }

    /// Decode and validate a token issued by [`AccessTokenIssuer::issue`].
    ///
    /// Kept alongside issuance so any verifying middleware stays
    /// interoperable with the claim shape and algorithm minted here.
    ///
    /// # Errors
    /// Returns an error for bad signatures, wrong algorithms, or expiry.
    pub fn decode(&self, token: &str) -> Result<TokenData<Claims>, Error> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = true;
        decode::<Claims>(token, &self.decoding_key, &validation)
    }
}
