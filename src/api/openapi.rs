//! OpenAPI document generation.

use crate::api::handlers::auth::types::{RefreshRequest, SignInRequest, TokensResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sesamo",
        description = "Credential issuance and rotation for user identities"
    ),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::auth::login::login,
        crate::api::handlers::auth::refresh::refresh,
    ),
    components(schemas(SignInRequest, RefreshRequest, TokensResponse)),
    tags(
        (name = "auth", description = "Sign-in and refresh token rotation"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
