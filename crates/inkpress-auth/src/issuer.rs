//! Token issuance.
//!
//! Translates an authentication event into concrete signed tokens: an
//! access/refresh pair at login, or a single-purpose token for password
//! reset and email verification flows.

use crate::claims::{TokenClaims, TokenType};
use crate::error::AuthError;
use crate::signer::TokenSigner;
use chrono::{Duration, Utc};
use inkpress_core::UserId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default access token validity in minutes.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Default refresh token validity in days.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// Default password reset token validity in hours.
pub const PASSWORD_RESET_TTL_HOURS: i64 = 1;

/// Default email verification token validity in hours.
pub const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;

/// Validity windows for issued tokens.
///
/// All externally supplied; the defaults match a short access window, a
/// multi-week refresh window, and hour-scale single-purpose windows.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Access token validity.
    pub access_ttl: Duration,
    /// Refresh token validity.
    pub refresh_ttl: Duration,
    /// Password reset token validity.
    pub reset_ttl: Duration,
    /// Email verification token validity.
    pub verification_ttl: Duration,
    /// Absolute ceiling on a refreshed session, measured from the original
    /// login. `None` allows indefinite sliding refresh.
    pub max_session: Option<Duration>,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            access_ttl: Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
            refresh_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
            reset_ttl: Duration::hours(PASSWORD_RESET_TTL_HOURS),
            verification_ttl: Duration::hours(EMAIL_VERIFICATION_TTL_HOURS),
            max_session: None,
        }
    }
}

/// The purpose of a single-purpose token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Completing a password reset.
    PasswordReset,
    /// Confirming an email address.
    EmailVerification,
}

impl Purpose {
    /// The token type stamped on tokens issued for this purpose.
    #[must_use]
    pub fn token_type(self) -> TokenType {
        match self {
            Purpose::PasswordReset => TokenType::PasswordReset,
            Purpose::EmailVerification => TokenType::EmailVerification,
        }
    }

    fn default_ttl(self, config: &IssuerConfig) -> Duration {
        match self {
            Purpose::PasswordReset => config.reset_ttl,
            Purpose::EmailVerification => config.verification_ttl,
        }
    }
}

/// Convenience data carried in issued tokens for display purposes.
///
/// Never consulted for authorization decisions.
#[derive(Debug, Clone, Default)]
pub struct ExtraClaims {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// An issued access/refresh pair as handed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
    /// Authorization scheme for presenting the access token.
    pub token_type: String,
    /// Access token validity in seconds.
    pub expires_in: i64,
}

impl TokenPair {
    /// Assemble a pair response.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Issues signed tokens for authenticated subjects.
#[derive(Clone)]
pub struct TokenIssuer {
    signer: Arc<TokenSigner>,
    config: IssuerConfig,
}

impl TokenIssuer {
    /// Create an issuer over the given signer and validity configuration.
    #[must_use]
    pub fn new(signer: Arc<TokenSigner>, config: IssuerConfig) -> Self {
        Self { signer, config }
    }

    /// The configured validity windows.
    #[must_use]
    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Issue an access/refresh pair for a freshly authenticated subject.
    ///
    /// The two tokens share the subject but carry distinct token ids,
    /// types, and expiry horizons.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SigningFailed` if encoding fails.
    pub fn issue_pair(&self, subject: UserId, extra: ExtraClaims) -> Result<TokenPair, AuthError> {
        self.issue_pair_at(subject, extra, Utc::now().timestamp())
    }

    /// Issue a pair preserving an earlier original-login time.
    ///
    /// Used by the refresh path so the absolute session ceiling, when
    /// configured, is measured from the interactive login rather than the
    /// latest refresh.
    pub fn issue_pair_at(
        &self,
        subject: UserId,
        extra: ExtraClaims,
        auth_time: i64,
    ) -> Result<TokenPair, AuthError> {
        let access_claims = self
            .claims_for(subject, &extra, TokenType::Access, self.config.access_ttl)
            .auth_time(auth_time)
            .build();

        let refresh_claims = self
            .claims_for(subject, &extra, TokenType::Refresh, self.config.refresh_ttl)
            .auth_time(auth_time)
            .build();

        let access_token = self.signer.sign(&access_claims)?;
        let refresh_token = self.signer.sign(&refresh_claims)?;

        tracing::debug!(
            subject = %subject,
            access_jti = %access_claims.jti,
            refresh_jti = %refresh_claims.jti,
            "issued token pair"
        );

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_ttl.num_seconds(),
        ))
    }

    /// Issue a single-purpose token.
    ///
    /// The purpose becomes the token type, so the token is unusable for
    /// authentication or refresh. The default validity per purpose applies
    /// unless `ttl` overrides it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SigningFailed` if encoding fails.
    pub fn issue_single_purpose(
        &self,
        subject: UserId,
        purpose: Purpose,
        ttl: Option<Duration>,
    ) -> Result<String, AuthError> {
        let ttl = ttl.unwrap_or_else(|| purpose.default_ttl(&self.config));
        let claims = TokenClaims::builder()
            .subject(subject.to_string())
            .token_type(purpose.token_type())
            .expires_in(ttl)
            .build();

        tracing::debug!(
            subject = %subject,
            jti = %claims.jti,
            purpose = %claims.token_type,
            "issued single-purpose token"
        );

        self.signer.sign(&claims)
    }

    fn claims_for(
        &self,
        subject: UserId,
        extra: &ExtraClaims,
        token_type: TokenType,
        ttl: Duration,
    ) -> crate::claims::TokenClaimsBuilder {
        let mut builder = TokenClaims::builder()
            .subject(subject.to_string())
            .token_type(token_type)
            .expires_in(ttl);

        if let Some(ref name) = extra.name {
            builder = builder.name(name.clone());
        }
        if let Some(ref email) = extra.email {
            builder = builder.email(email.clone());
        }

        builder
    }
}
