//! Token verification.
//!
//! Determines whether a presented token is currently valid for a requested
//! purpose. A token moves through one of two terminal states: it expires
//! when wall-clock time passes its expiry, with no stored-state change, or
//! it is revoked at any time by an external write to the revocation store.
//!
//! Check order: signature and structure, then token type, then expiry,
//! then revocation. Each failure maps to its own error kind.

use crate::claims::{TokenClaims, TokenType};
use crate::error::AuthError;
use crate::issuer::{ExtraClaims, TokenIssuer, TokenPair};
use crate::revocation::RevocationStore;
use crate::signer::TokenSigner;
use chrono::Utc;
use inkpress_core::UserId;
use std::sync::Arc;

/// The authenticated identity derived from a verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// The authenticated account.
    pub subject: UserId,
    /// Display name carried in the token, if any.
    pub name: Option<String>,
    /// Email address carried in the token, if any.
    pub email: Option<String>,
    /// Id of the token this identity was derived from; the key to revoke
    /// at logout.
    pub token_id: String,
}

impl Identity {
    /// Derive an identity from a verified claim set.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MalformedToken` if the subject claim is not a
    /// valid user id.
    pub fn from_claims(claims: &TokenClaims) -> Result<Self, AuthError> {
        let subject = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::MalformedToken("subject is not a valid user id".to_string()))?;

        Ok(Self {
            subject,
            name: claims.name.clone(),
            email: claims.email.clone(),
            token_id: claims.jti.clone(),
        })
    }
}

/// Verifies presented tokens against the signer, the clock, and the
/// revocation store.
#[derive(Clone)]
pub struct TokenVerifier {
    signer: Arc<TokenSigner>,
    revocations: Arc<dyn RevocationStore>,
}

impl TokenVerifier {
    /// Create a verifier over the given signer and revocation store.
    #[must_use]
    pub fn new(signer: Arc<TokenSigner>, revocations: Arc<dyn RevocationStore>) -> Self {
        Self { signer, revocations }
    }

    /// The revocation store this verifier consults.
    #[must_use]
    pub fn revocations(&self) -> &Arc<dyn RevocationStore> {
        &self.revocations
    }

    /// Verify a token for the requested purpose and derive the identity.
    ///
    /// # Errors
    ///
    /// - `AuthError::MalformedToken` / `AuthError::InvalidSignature` -
    ///   undecodable or tampered input
    /// - `AuthError::TokenTypeMismatch` - wrong purpose
    /// - `AuthError::ExpiredToken` - past expiry
    /// - `AuthError::RevokedToken` - id present in the revocation store
    /// - `AuthError::StoreUnavailable` - the store could not answer;
    ///   the token is rejected, never allowed through
    pub async fn verify(&self, token: &str, expected: TokenType) -> Result<Identity, AuthError> {
        let claims = self.verify_claims(token, expected).await?;
        Identity::from_claims(&claims)
    }

    /// Verify a token for the requested purpose and return the full claim
    /// set.
    pub async fn verify_claims(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<TokenClaims, AuthError> {
        let claims = self.signer.verify_and_decode(token)?;

        if claims.token_type != expected {
            return Err(AuthError::TokenTypeMismatch {
                expected,
                actual: claims.token_type,
            });
        }

        if claims.is_expired() {
            return Err(AuthError::ExpiredToken);
        }

        match self.revocations.is_revoked(&claims.jti).await {
            Ok(false) => Ok(claims),
            Ok(true) => {
                tracing::warn!(jti = %claims.jti, "rejected revoked token");
                Err(AuthError::RevokedToken)
            }
            Err(e) => {
                // Cannot confirm non-revocation: reject and flag the outage.
                tracing::error!(jti = %claims.jti, error = %e, "revocation check failed, rejecting");
                Err(AuthError::StoreUnavailable(e.to_string()))
            }
        }
    }

    /// Exchange a valid refresh token for a fresh access/refresh pair.
    ///
    /// The presented refresh token is revoked on success, so each refresh
    /// token mints at most one new pair. The original login time is
    /// carried into the new pair; if the issuer configures an absolute
    /// session ceiling, a session refreshed past it ends with
    /// `ExpiredToken` and the client must authenticate again.
    ///
    /// # Errors
    ///
    /// All `verify` failures, with `expected = refresh`.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        issuer: &TokenIssuer,
    ) -> Result<TokenPair, AuthError> {
        let claims = self.verify_claims(refresh_token, TokenType::Refresh).await?;
        let identity = Identity::from_claims(&claims)?;
        let auth_time = claims.auth_time.unwrap_or(claims.iat);

        if let Some(max_session) = issuer.config().max_session {
            if Utc::now().timestamp() - auth_time >= max_session.num_seconds() {
                tracing::info!(subject = %identity.subject, "session ceiling reached, refresh denied");
                return Err(AuthError::ExpiredToken);
            }
        }

        // Rotation: the presented refresh token is spent.
        self.revocations
            .revoke(&claims.jti, claims.expires_at())
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        let extra = ExtraClaims {
            name: claims.name,
            email: claims.email,
        };

        issuer.issue_pair_at(identity.subject, extra, auth_time)
    }
}
