//! Error types for authentication and authorization.
//!
//! One variant per failure kind so callers can distinguish authentication
//! failures from authorization failures and from infrastructure failures.

use crate::claims::TokenType;
use thiserror::Error;

/// Authentication and authorization error types.
///
/// No two variants share a meaning: a missing credential, a tampered
/// credential, an expired one, and a revoked one are all distinct, and
/// being authenticated but not permitted is distinct from all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential was presented where one is required.
    #[error("No credential presented")]
    MissingToken,

    /// The presented string is not decodable as a token.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// The signature does not match the payload (tampering, or a token
    /// signed with a different key or algorithm).
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The token is past its expiry.
    #[error("Token has expired")]
    ExpiredToken,

    /// The token's id is present in the revocation store.
    #[error("Token has been revoked")]
    RevokedToken,

    /// The token is valid but was issued for a different purpose.
    #[error("Token type mismatch: expected {expected}, got {actual}")]
    TokenTypeMismatch {
        /// The token type the operation requires.
        expected: TokenType,
        /// The token type actually presented.
        actual: TokenType,
    },

    /// The identity provider reports the account as missing or disabled.
    #[error("Account is inactive")]
    AccountInactive,

    /// Authenticated, but neither the resource owner nor an administrator.
    #[error("Not the resource owner or an administrator")]
    Forbidden,

    /// A backing store (revocation or identity) could not answer.
    /// Fail closed: the request is rejected, never silently allowed.
    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),

    /// The signing key is unusable (e.g. an empty secret).
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// Token encoding failed.
    #[error("Token encoding failed: {0}")]
    SigningFailed(String),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored password hash is not in a recognized format.
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

impl AuthError {
    /// True for failures of authentication (HTTP-equivalent 401).
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::MalformedToken(_)
                | AuthError::InvalidSignature
                | AuthError::ExpiredToken
                | AuthError::RevokedToken
                | AuthError::TokenTypeMismatch { .. }
                | AuthError::AccountInactive
        )
    }

    /// True for failures of authorization (HTTP-equivalent 403).
    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(self, AuthError::Forbidden)
    }

    /// True for infrastructure failures that are operational incidents
    /// rather than security decisions.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AuthError::StoreUnavailable(_)
                | AuthError::InvalidKey(_)
                | AuthError::SigningFailed(_)
                | AuthError::HashingFailed(_)
                | AuthError::InvalidHashFormat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(AuthError::ExpiredToken.to_string(), "Token has expired");
        assert_eq!(AuthError::RevokedToken.to_string(), "Token has been revoked");
        assert_eq!(
            AuthError::MalformedToken("bad base64".to_string()).to_string(),
            "Malformed token: bad base64"
        );

        let err = AuthError::TokenTypeMismatch {
            expected: TokenType::Access,
            actual: TokenType::Refresh,
        };
        assert_eq!(
            err.to_string(),
            "Token type mismatch: expected access, got refresh"
        );
    }

    #[test]
    fn authentication_kinds() {
        assert!(AuthError::MissingToken.is_authentication());
        assert!(AuthError::InvalidSignature.is_authentication());
        assert!(AuthError::ExpiredToken.is_authentication());
        assert!(AuthError::RevokedToken.is_authentication());
        assert!(AuthError::AccountInactive.is_authentication());

        assert!(!AuthError::Forbidden.is_authentication());
        assert!(!AuthError::StoreUnavailable("down".to_string()).is_authentication());
    }

    #[test]
    fn authorization_kinds() {
        assert!(AuthError::Forbidden.is_authorization());
        assert!(!AuthError::ExpiredToken.is_authorization());
    }

    #[test]
    fn infrastructure_kinds() {
        assert!(AuthError::StoreUnavailable("timeout".to_string()).is_infrastructure());
        assert!(AuthError::InvalidKey("empty".to_string()).is_infrastructure());

        assert!(!AuthError::RevokedToken.is_infrastructure());
        assert!(!AuthError::Forbidden.is_infrastructure());
    }

    #[test]
    fn kinds_are_disjoint() {
        let all = [
            AuthError::MissingToken,
            AuthError::MalformedToken("x".to_string()),
            AuthError::InvalidSignature,
            AuthError::ExpiredToken,
            AuthError::RevokedToken,
            AuthError::TokenTypeMismatch {
                expected: TokenType::Access,
                actual: TokenType::Refresh,
            },
            AuthError::AccountInactive,
            AuthError::Forbidden,
            AuthError::StoreUnavailable("x".to_string()),
        ];

        for err in &all {
            let classes = [
                err.is_authentication(),
                err.is_authorization(),
                err.is_infrastructure(),
            ];
            assert_eq!(classes.iter().filter(|c| **c).count(), 1, "{err}");
        }
    }
}
