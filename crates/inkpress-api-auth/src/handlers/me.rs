//! Current user endpoint handler.
//!
//! GET /auth/me - The authenticated caller's account.

use crate::error::ApiAuthError;
use crate::extract::CurrentUser;
use crate::models::UserResponse;
use crate::services::AuthService;
use axum::{Extension, Json};
use std::sync::Arc;

/// Return the authenticated caller's account.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "Authentication",
    security(("bearerAuth" = []))
)]
pub async fn me_handler(
    Extension(auth_service): Extension<Arc<AuthService>>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<UserResponse>, ApiAuthError> {
    let record = auth_service.current_account(identity.subject).await?;
    Ok(Json(UserResponse::from(&record)))
}
