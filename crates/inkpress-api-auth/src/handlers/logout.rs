//! Logout endpoint handler.
//!
//! POST /auth/logout - Retire the caller's tokens.

use crate::error::ApiAuthError;
use crate::models::LogoutRequest;
use crate::services::AuthService;
use axum::{http::StatusCode, Extension, Json};
use inkpress_auth::TokenClaims;
use std::sync::Arc;

/// Handle user logout.
///
/// Revokes the access token the request authenticated with, so it is dead
/// for the rest of its validity window. A refresh token in the body is
/// revoked alongside it.
#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "Authentication",
    security(("bearerAuth" = []))
)]
pub async fn logout_handler(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Extension(claims): Extension<TokenClaims>,
    body: Option<Json<LogoutRequest>>,
) -> Result<StatusCode, ApiAuthError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    auth_service
        .logout(&claims, request.refresh_token.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
