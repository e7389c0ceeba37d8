//! End-to-end credential flow against the router with an in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        Request, StatusCode,
    },
    Router,
};
use secrecy::SecretString;
use sesamo::{
    api,
    auth::{jwt::AccessTokenIssuer, AuthConfig, SessionManager},
    store::MemorySessionStore,
};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> (Router, Arc<SessionManager>, Uuid) {
    let store = Arc::new(MemorySessionStore::new());
    let user_id = Uuid::new_v4();
    store.insert_user(user_id, "alice");
    let issuer = AccessTokenIssuer::new(&SecretString::from("test-signing-secret"), 3600);
    let manager = Arc::new(SessionManager::new(store, issuer, AuthConfig::new()));
    (api::app(manager.clone()), manager, user_id)
}

fn login_request(user_id: Uuid, fingerprint: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({
                "userId": user_id.to_string(),
                "fingerprint": fingerprint,
            })
            .to_string(),
        ))
        .expect("request")
}

fn refresh_request(fingerprint: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/auth/refresh")
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, cookie)
        .body(Body::from(
            serde_json::json!({ "fingerprint": fingerprint }).to_string(),
        ))
        .expect("request")
}

/// The refresh-token pair from a Set-Cookie header, without attributes.
fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .expect("set-cookie")
        .to_string()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn login_issues_tokens_and_cookie() {
    let (app, manager, user_id) = test_app();

    let response = app
        .oneshot(login_request(user_id, "fp-A"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("refresh-token="));

    let body = json_body(response).await;
    let access_token = body["accessToken"].as_str().expect("access token");
    let data = manager.issuer().decode(access_token).expect("jwt");
    assert_eq!(data.claims.sub, user_id.to_string());
    assert_eq!(
        body["refreshToken"].as_str().expect("refresh token"),
        cookie.trim_start_matches("refresh-token=")
    );
}

#[tokio::test]
async fn login_unknown_user_is_opaque() {
    let (app, _manager, _user_id) = test_app();

    let response = app
        .oneshot(login_request(Uuid::new_v4(), "fp-A"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refresh_rotates_and_replay_is_rejected() {
    let (app, _manager, user_id) = test_app();

    let login = app
        .clone()
        .oneshot(login_request(user_id, "fp-A"))
        .await
        .expect("response");
    let first_cookie = session_cookie(&login);

    let refreshed = app
        .clone()
        .oneshot(refresh_request("fp-A", &first_cookie))
        .await
        .expect("response");
    assert_eq!(refreshed.status(), StatusCode::OK);
    let second_cookie = session_cookie(&refreshed);
    assert_ne!(second_cookie, first_cookie);

    // The consumed secret is dead after rotation.
    let replay = app
        .clone()
        .oneshot(refresh_request("fp-A", &first_cookie))
        .await
        .expect("response");
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    // The rotated secret still works.
    let again = app
        .oneshot(refresh_request("fp-A", &second_cookie))
        .await
        .expect("response");
    assert_eq!(again.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_unknown_fingerprint_is_not_found() {
    let (app, _manager, user_id) = test_app();

    let login = app
        .clone()
        .oneshot(login_request(user_id, "fp-A"))
        .await
        .expect("response");
    let cookie = session_cookie(&login);

    let response = app
        .oneshot(refresh_request("fp-B", &cookie))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_build() {
    let (app, _manager, _user_id) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = json_body(response).await;
    assert_eq!(body["name"], "sesamo");
}
