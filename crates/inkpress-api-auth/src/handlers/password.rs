//! Password endpoints.
//!
//! PUT /auth/password - Change password (authenticated).
//! POST /auth/forgot-password - Request a reset token.
//! POST /auth/reset-password - Redeem a reset token.

use crate::error::ApiAuthError;
use crate::extract::CurrentUser;
use crate::models::{
    ForgotPasswordRequest, MessageResponse, PasswordChangeRequest, ResetPasswordRequest,
};
use crate::services::AuthService;
use axum::{http::StatusCode, Extension, Json};
use std::sync::Arc;
use validator::Validate;

/// Handle password change for the authenticated caller.
#[utoipa::path(
    put,
    path = "/auth/password",
    request_body = PasswordChangeRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Wrong current password or invalid token"),
    ),
    tag = "Authentication",
    security(("bearerAuth" = []))
)]
pub async fn password_change_handler(
    Extension(auth_service): Extension<Arc<AuthService>>,
    CurrentUser(identity): CurrentUser,
    Json(request): Json<PasswordChangeRequest>,
) -> Result<Json<MessageResponse>, ApiAuthError> {
    request
        .validate()
        .map_err(|e| ApiAuthError::Validation(e.to_string()))?;

    if request.new_password != request.confirm_password {
        return Err(ApiAuthError::Validation(
            "passwords do not match".to_string(),
        ));
    }

    auth_service
        .change_password(
            identity.subject,
            &request.current_password,
            &request.new_password,
        )
        .await?;

    Ok(Json(MessageResponse::new("Password changed")))
}

/// Handle a password reset request.
///
/// Always answers 202 with the same body: whether the address is
/// registered is not disclosed. When an account matches, the reset token
/// goes to the mail pipeline.
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 202, description = "Reset email sent if the account exists", body = MessageResponse),
        (status = 400, description = "Validation failed"),
    ),
    tag = "Authentication"
)]
pub async fn forgot_password_handler(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiAuthError> {
    request
        .validate()
        .map_err(|e| ApiAuthError::Validation(e.to_string()))?;

    if let Some(token) = auth_service.request_password_reset(&request.email).await? {
        // Delivery belongs to the mailer; the token never enters the response.
        tracing::debug!(token_len = token.len(), "reset token handed off for delivery");
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(
            "If the address is registered, a reset email is on its way",
        )),
    ))
}

/// Handle redemption of a password reset token.
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid, expired, or already-used token"),
    ),
    tag = "Authentication"
)]
pub async fn reset_password_handler(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiAuthError> {
    request
        .validate()
        .map_err(|e| ApiAuthError::Validation(e.to_string()))?;

    auth_service
        .reset_password(&request.token, &request.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password reset")))
}
