//! Email verification endpoint handler.
//!
//! POST /auth/verify-email - Redeem an email verification token.

use crate::error::ApiAuthError;
use crate::models::{MessageResponse, VerifyEmailRequest};
use crate::services::AuthService;
use axum::{Extension, Json};
use std::sync::Arc;

/// Handle email verification.
#[utoipa::path(
    post,
    path = "/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 401, description = "Invalid, expired, or already-used token"),
    ),
    tag = "Authentication"
)]
pub async fn verify_email_handler(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, ApiAuthError> {
    auth_service.verify_email(&request.token).await?;
    Ok(Json(MessageResponse::new("Email verified")))
}
