//! Token claim sets.
//!
//! Provides the [`TokenClaims`] payload carried by every issued token, the
//! [`TokenType`] discriminator that binds a token to one purpose, and a
//! builder for constructing claim sets at issuance.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The purpose a token was issued for.
///
/// A token is only honored by operations expecting its exact type: a
/// refresh token cannot authenticate an API call, and a password-reset
/// token cannot mint new token pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived credential authorizing individual API calls.
    Access,
    /// Long-lived credential used only to mint new access/refresh pairs.
    Refresh,
    /// Single-purpose credential for completing a password reset.
    PasswordReset,
    /// Single-purpose credential for confirming an email address.
    EmailVerification,
}

impl TokenType {
    /// The wire representation of this type (the `type` claim value).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
            TokenType::PasswordReset => "password_reset",
            TokenType::EmailVerification => "email_verification",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed payload of a token.
///
/// # Claims
///
/// - `sub`: subject, the authenticated account's id
/// - `jti`: unique id of this token instance, the revocation key
/// - `type`: the purpose the token was issued for
/// - `iat` / `exp`: issuance and expiry as Unix timestamps
/// - `name` / `email`: convenience data for display, never consulted for
///   authorization decisions
/// - `auth_time`: timestamp of the original interactive login, preserved
///   across refreshes
///
/// Claim sets are immutable once issued; a refresh supersedes the old pair
/// with a new one, it never mutates claims in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - the account this token authenticates.
    pub sub: String,

    /// Unique id of this token instance.
    pub jti: String,

    /// The purpose this token was issued for.
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Issued at as Unix timestamp.
    pub iat: i64,

    /// Expiration time as Unix timestamp.
    pub exp: i64,

    /// Display name carried for convenience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address carried for convenience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Unix timestamp of the original interactive login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<i64>,
}

impl TokenClaims {
    /// Create a new builder for constructing a claim set.
    #[must_use]
    pub fn builder() -> TokenClaimsBuilder {
        TokenClaimsBuilder::default()
    }

    /// Check whether the token is past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// The expiry as a UTC timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Remaining validity window, zero if already expired.
    #[must_use]
    pub fn remaining_validity(&self) -> Duration {
        let remaining = self.exp - Utc::now().timestamp();
        Duration::seconds(remaining.max(0))
    }
}

/// Builder for constructing token claim sets.
#[derive(Debug, Default)]
pub struct TokenClaimsBuilder {
    sub: Option<String>,
    jti: Option<String>,
    token_type: Option<TokenType>,
    iat: Option<i64>,
    exp: Option<i64>,
    name: Option<String>,
    email: Option<String>,
    auth_time: Option<i64>,
}

impl TokenClaimsBuilder {
    /// Set the subject.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set the token id. Defaults to a fresh UUID v4.
    #[must_use]
    pub fn token_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Set the token type.
    #[must_use]
    pub fn token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = Some(token_type);
        self
    }

    /// Set the issued-at time.
    #[must_use]
    pub fn issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set the expiration as a Unix timestamp.
    #[must_use]
    pub fn expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set the expiration as a duration from now.
    #[must_use]
    pub fn expires_in(mut self, duration: Duration) -> Self {
        self.exp = Some((Utc::now() + duration).timestamp());
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the original login time.
    #[must_use]
    pub fn auth_time(mut self, auth_time: i64) -> Self {
        self.auth_time = Some(auth_time);
        self
    }

    /// Build the claim set.
    ///
    /// # Defaults
    ///
    /// - `jti`: new UUID v4
    /// - `token_type`: access
    /// - `iat`: now
    /// - `exp`: one hour from now
    #[must_use]
    pub fn build(self) -> TokenClaims {
        let now = Utc::now().timestamp();

        TokenClaims {
            sub: self.sub.unwrap_or_default(),
            jti: self.jti.unwrap_or_else(|| Uuid::new_v4().to_string()),
            token_type: self.token_type.unwrap_or(TokenType::Access),
            iat: self.iat.unwrap_or(now),
            exp: self.exp.unwrap_or(now + 3600),
            name: self.name,
            email: self.email,
            auth_time: self.auth_time,
        }
    }
}
