//! Login endpoint handler.
//!
//! POST /auth/login - Authenticate and issue a token pair.

use crate::error::ApiAuthError;
use crate::models::{LoginRequest, SessionResponse, TokenResponse, UserResponse};
use crate::services::AuthService;
use axum::{Extension, Json};
use std::sync::Arc;
use validator::Validate;

/// Handle user login.
///
/// Accepts a username or an email address as the login. Unknown account
/// and wrong password are answered identically.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid credentials or disabled account"),
    ),
    tag = "Authentication"
)]
pub async fn login_handler(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiAuthError> {
    request
        .validate()
        .map_err(|e| ApiAuthError::Validation(e.to_string()))?;

    let (record, tokens) = auth_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(SessionResponse {
        user: UserResponse::from(&record),
        tokens: TokenResponse::from(tokens),
    }))
}
