//! API error types for the authentication endpoints.
//!
//! Maps the auth core's typed errors onto transport-level responses. The
//! response body carries a machine-readable code and a coarse message; it
//! never says which sub-check failed beyond the error kind, and the login
//! path collapses unknown-user and wrong-password into one response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inkpress_auth::{AuthError, ProviderError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Errors surfaced by the authentication API.
#[derive(Debug, Error)]
pub enum ApiAuthError {
    /// A failure from the auth core, surfaced by kind.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Login failed. Deliberately covers both unknown account and wrong
    /// password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Registration collided with an existing username or email.
    #[error("Username or email is already registered")]
    AccountExists,

    /// Request payload failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The account store could not answer.
    #[error("Account store unavailable: {0}")]
    Store(String),

    /// Anything else; details go to the log, not the response.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ProviderError> for ApiAuthError {
    fn from(err: ProviderError) -> Self {
        ApiAuthError::Store(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl ApiAuthError {
    /// Machine-readable code for the response body.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiAuthError::Auth(err) => match err {
                AuthError::MissingToken => "missing_token",
                AuthError::MalformedToken(_) => "malformed_token",
                AuthError::InvalidSignature => "invalid_signature",
                AuthError::ExpiredToken => "expired_token",
                AuthError::RevokedToken => "revoked_token",
                AuthError::TokenTypeMismatch { .. } => "token_type_mismatch",
                AuthError::AccountInactive => "account_inactive",
                AuthError::Forbidden => "forbidden",
                AuthError::StoreUnavailable(_) => "store_unavailable",
                AuthError::InvalidKey(_)
                | AuthError::SigningFailed(_)
                | AuthError::HashingFailed(_)
                | AuthError::InvalidHashFormat => "internal_error",
            },
            ApiAuthError::InvalidCredentials => "invalid_credentials",
            ApiAuthError::AccountExists => "account_exists",
            ApiAuthError::Validation(_) => "validation_error",
            ApiAuthError::Store(_) => "store_unavailable",
            ApiAuthError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiAuthError::Auth(err) => {
                if err.is_authorization() {
                    StatusCode::FORBIDDEN
                } else if err.is_authentication() {
                    StatusCode::UNAUTHORIZED
                } else if matches!(err, AuthError::StoreUnavailable(_)) {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
            ApiAuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiAuthError::AccountExists => StatusCode::CONFLICT,
            ApiAuthError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiAuthError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiAuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Infrastructure failures are operational incidents: log loudly and
        // answer with a generic message. Rejections get a warn so failed
        // credential replay shows up in the logs.
        let message = match &self {
            ApiAuthError::Auth(err) if err.is_infrastructure() => {
                tracing::error!(error = %err, "auth infrastructure failure");
                "Authentication is temporarily unavailable".to_string()
            }
            ApiAuthError::Store(detail) => {
                tracing::error!(error = %detail, "account store failure");
                "Authentication is temporarily unavailable".to_string()
            }
            ApiAuthError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                "An internal error occurred".to_string()
            }
            ApiAuthError::Auth(err) => {
                tracing::warn!(error = %err, "request rejected");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse {
            error: self.error_code().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_kinds_map_to_distinct_statuses() {
        assert_eq!(
            ApiAuthError::Auth(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiAuthError::Auth(AuthError::RevokedToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiAuthError::Auth(AuthError::Forbidden).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiAuthError::Auth(AuthError::StoreUnavailable("down".to_string())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiAuthError::Auth(AuthError::SigningFailed("oops".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn api_kinds_map_to_expected_statuses() {
        assert_eq!(
            ApiAuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiAuthError::AccountExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiAuthError::Validation("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            ApiAuthError::Auth(AuthError::ExpiredToken).error_code(),
            "expired_token"
        );
        assert_eq!(
            ApiAuthError::Auth(AuthError::RevokedToken).error_code(),
            "revoked_token"
        );
        assert_eq!(
            ApiAuthError::InvalidCredentials.error_code(),
            "invalid_credentials"
        );
    }

    #[test]
    fn invalid_credentials_message_does_not_name_the_failing_check() {
        let message = ApiAuthError::InvalidCredentials.to_string();
        assert!(!message.to_lowercase().contains("unknown"));
        assert!(!message.to_lowercase().contains("not found"));
    }
}
