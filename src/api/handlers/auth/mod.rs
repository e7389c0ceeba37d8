//! Sign-in and refresh endpoints.

pub mod cookie;
pub mod login;
pub mod refresh;
pub mod types;

pub use login::login;
pub use refresh::refresh;

#[cfg(test)]
pub(crate) mod test_support;

use crate::auth::{AuthError, IssuedCredentials, SessionManager};
use axum::{
    http::{
        header::{AUTHORIZATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use tracing::error;

/// Fingerprints are caller-chosen partition keys, not secrets; bound
/// their alphabet and length before they reach the store.
fn valid_fingerprint(fingerprint: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9._:-]{1,128}$").is_ok_and(|regex| regex.is_match(fingerprint))
}

/// Map a flow error to an opaque client response.
///
/// Which check failed (user, session, secret, expiry) stays
/// indistinguishable; infrastructure causes are logged, never serialized.
fn error_response(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        AuthError::Unauthorized | AuthError::ConflictStale => {
            (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
        }
        AuthError::Hashing(_) | AuthError::Signing(_) | AuthError::Store(_) => {
            error!("Credential flow failed: {err:?}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Credential issuance failed".to_string(),
            )
        }
    }
}

/// Serialize issued credentials into the shared response shape: bearer
/// header, refresh cookie, and JSON body.
fn credentials_response(manager: &SessionManager, issued: IssuedCredentials) -> Response {
    let cookie = match cookie::refresh_cookie(
        manager.config().secure_cookies(),
        &issued.refresh_token,
        issued.session_expires_at,
    ) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build refresh cookie: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Credential issuance failed".to_string(),
            )
                .into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", issued.access_token)) {
        headers.insert(AUTHORIZATION, value);
    }

    let body = types::TokensResponse {
        access_token: issued.access_token,
        refresh_token: issued.refresh_token,
    };
    (StatusCode::OK, headers, Json(body)).into_response()
}
