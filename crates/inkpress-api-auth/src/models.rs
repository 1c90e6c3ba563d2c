//! Request and response DTOs for the authentication endpoints.

use chrono::{DateTime, Utc};
use inkpress_auth::TokenPair;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::store::AccountRecord;

/// Registration request payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    /// User email address.
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email too long"))]
    pub email: String,

    /// User password.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Password repeated; must match `password`.
    pub confirm_password: String,
}

/// Login request payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Username or email address.
    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    pub username: String,

    /// User password.
    /// Length cap avoids hashing attacker-sized inputs.
    #[validate(length(min = 1, max = 1024, message = "Password must be 1-1024 characters"))]
    pub password: String,
}

/// Token refresh request payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    /// Refresh token from a previous login or refresh response.
    pub refresh_token: String,
}

/// Logout request payload.
///
/// The access token being retired comes from the Authorization header; the
/// body may carry the session's refresh token so it is retired in the same
/// call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LogoutRequest {
    /// Refresh token to revoke together with the access token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Password change request payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordChangeRequest {
    /// Current password for verification.
    pub current_password: String,

    /// New password.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,

    /// New password repeated; must match `new_password`.
    pub confirm_password: String,
}

/// Forgot password request payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    /// Email address of the account to reset.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Reset password request payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    /// Password reset token.
    pub token: String,

    /// New password.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,
}

/// Verify email request payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyEmailRequest {
    /// Email verification token.
    pub token: String,
}

/// Issued token pair response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
    /// Authorization scheme ("Bearer").
    pub token_type: String,
    /// Access token validity in seconds.
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Account id.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Whether the account holds the administrator role.
    pub is_admin: bool,
    /// Whether the email address has been confirmed.
    pub email_verified: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&AccountRecord> for UserResponse {
    fn from(record: &AccountRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            username: record.username.clone(),
            email: record.email.clone(),
            is_active: record.is_active,
            is_admin: record.is_admin,
            email_verified: record.email_verified,
            created_at: record.created_at,
        }
    }
}

/// Registration and login response: the account plus its tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    /// The authenticated account.
    pub user: UserResponse,
    /// The issued token pair.
    pub tokens: TokenResponse,
}

/// Generic confirmation response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Build a confirmation response.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
