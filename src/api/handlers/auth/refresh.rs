//! Refresh endpoint: rotates the session secret and reissues credentials.

use super::{
    cookie, credentials_response, error_response,
    types::{RefreshRequest, TokensResponse},
    valid_fingerprint,
};
use crate::auth::SessionManager;
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Session rotated; fresh tokens issued", body = TokensResponse),
        (status = 400, description = "Validation error", body = String),
        (status = 401, description = "Missing, stale, or expired refresh secret", body = String),
        (status = 404, description = "No session for fingerprint", body = String)
    ),
    tag = "auth"
)]
pub async fn refresh(
    manager: Extension<Arc<SessionManager>>,
    headers: HeaderMap,
    payload: Option<Json<RefreshRequest>>,
) -> impl IntoResponse {
    let request: RefreshRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    if !valid_fingerprint(&request.fingerprint) {
        return (StatusCode::BAD_REQUEST, "Invalid fingerprint".to_string()).into_response();
    }

    let Some(presented) = cookie::extract_refresh_token(&headers) else {
        return (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()).into_response();
    };

    match manager.refresh(&request.fingerprint, &presented).await {
        Ok(issued) => credentials_response(&manager, issued),
        Err(err) => error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::refresh;
    use crate::api::handlers::auth::test_support::manager_with_user;
    use axum::{
        extract::Extension,
        http::{header::COOKIE, HeaderMap, HeaderValue, StatusCode},
        response::IntoResponse,
        Json,
    };
    use serde_json::from_value;

    fn cookie_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("refresh-token={token}")).expect("cookie"),
        );
        headers
    }

    fn request(fingerprint: &str) -> Json<crate::api::handlers::auth::types::RefreshRequest> {
        Json(
            from_value(serde_json::json!({ "fingerprint": fingerprint }))
                .expect("payload"),
        )
    }

    #[tokio::test]
    async fn refresh_missing_payload() {
        let (manager, _store, _user_id) = manager_with_user();
        let response = refresh(Extension(manager), HeaderMap::new(), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_missing_cookie_is_unauthorized() {
        let (manager, _store, user_id) = manager_with_user();
        manager.sign_in(user_id, "fp-A").await.expect("sign in");

        let response = refresh(Extension(manager), HeaderMap::new(), Some(request("fp-A")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_rotates_and_rejects_replay() {
        let (manager, _store, user_id) = manager_with_user();
        let issued = manager.sign_in(user_id, "fp-A").await.expect("sign in");

        let response = refresh(
            Extension(manager.clone()),
            cookie_headers(&issued.refresh_token),
            Some(request("fp-A")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        // The consumed secret no longer matches the stored hash.
        let replay = refresh(
            Extension(manager),
            cookie_headers(&issued.refresh_token),
            Some(request("fp-A")),
        )
        .await
        .into_response();
        assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_unknown_fingerprint_is_not_found() {
        let (manager, _store, user_id) = manager_with_user();
        let issued = manager.sign_in(user_id, "fp-A").await.expect("sign in");

        let response = refresh(
            Extension(manager),
            cookie_headers(&issued.refresh_token),
            Some(request("fp-B")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
