//! Token refresh endpoint handler.
//!
//! POST /auth/refresh - Exchange a refresh token for a new pair.

use crate::error::ApiAuthError;
use crate::models::{RefreshRequest, TokenResponse};
use crate::services::AuthService;
use axum::{Extension, Json};
use std::sync::Arc;

/// Handle token refresh.
///
/// The presented refresh token is rotated out; the response carries its
/// replacement alongside the new access token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokenResponse),
        (status = 401, description = "Invalid, expired, or revoked refresh token"),
    ),
    tag = "Authentication"
)]
pub async fn refresh_handler(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiAuthError> {
    let pair = auth_service.refresh(&request.refresh_token).await?;
    Ok(Json(TokenResponse::from(pair)))
}
