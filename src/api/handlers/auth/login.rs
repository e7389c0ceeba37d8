//! Sign-in endpoint: establishes a session and issues credentials.

use super::{
    credentials_response, error_response,
    types::{SignInRequest, TokensResponse},
    valid_fingerprint,
};
use crate::auth::SessionManager;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Session established; tokens issued", body = TokensResponse),
        (status = 400, description = "Validation error", body = String),
        (status = 404, description = "Unknown user", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    manager: Extension<Arc<SessionManager>>,
    payload: Option<Json<SignInRequest>>,
) -> impl IntoResponse {
    let request: SignInRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    if !valid_fingerprint(&request.fingerprint) {
        return (StatusCode::BAD_REQUEST, "Invalid fingerprint".to_string()).into_response();
    }

    // Malformed ids stay indistinguishable from unknown users.
    let Ok(user_id) = Uuid::parse_str(request.user_id.trim()) else {
        return (StatusCode::NOT_FOUND, "Not found".to_string()).into_response();
    };

    match manager.sign_in(user_id, &request.fingerprint).await {
        Ok(issued) => credentials_response(&manager, issued),
        Err(err) => error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::login;
    use crate::api::handlers::auth::test_support::manager_with_user;
    use axum::{
        extract::Extension,
        http::{
            header::{AUTHORIZATION, SET_COOKIE},
            StatusCode,
        },
        response::IntoResponse,
        Json,
    };
    use serde_json::from_value;

    #[tokio::test]
    async fn login_missing_payload() {
        let (manager, _store, _user_id) = manager_with_user();
        let response = login(Extension(manager), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_invalid_fingerprint() {
        let (manager, _store, user_id) = manager_with_user();
        let payload = from_value(serde_json::json!({
            "userId": user_id.to_string(),
            "fingerprint": "",
        }))
        .expect("payload");
        let response = login(Extension(manager), Some(Json(payload)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_malformed_user_id_is_opaque() {
        let (manager, _store, _user_id) = manager_with_user();
        let payload = from_value(serde_json::json!({
            "userId": "not-a-uuid",
            "fingerprint": "fp-A",
        }))
        .expect("payload");
        let response = login(Extension(manager), Some(Json(payload)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn login_sets_bearer_header_and_cookie() {
        let (manager, _store, user_id) = manager_with_user();
        let payload = from_value(serde_json::json!({
            "userId": user_id.to_string(),
            "fingerprint": "fp-A",
        }))
        .expect("payload");
        let response = login(Extension(manager), Some(Json(payload)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let authorization = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(authorization.starts_with("Bearer "));

        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(cookie.starts_with("refresh-token="));
        assert!(cookie.contains("HttpOnly"));
    }
}
