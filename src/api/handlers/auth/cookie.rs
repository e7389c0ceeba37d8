//! Refresh token cookie handling.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use chrono::{DateTime, Utc};

pub(super) const REFRESH_COOKIE_NAME: &str = "refresh-token";

/// Build the `HttpOnly` cookie carrying the raw refresh secret.
///
/// The cookie expires together with the session, so the browser drops it
/// once the store would reject it anyway.
pub(super) fn refresh_cookie(
    secure: bool,
    value: &str,
    expires_at: DateTime<Utc>,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let expires = expires_at.format("%a, %d %b %Y %H:%M:%S GMT");
    let mut cookie = format!(
        "{REFRESH_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Expires={expires}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == REFRESH_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}
