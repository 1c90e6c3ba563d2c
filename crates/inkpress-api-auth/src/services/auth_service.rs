//! Authentication service.
//!
//! Orchestrates the account store, the token issuer/verifier, and the
//! revocation store behind the HTTP handlers. Handlers stay thin; every
//! decision that matters lives here.

use crate::error::ApiAuthError;
use crate::store::{AccountRecord, AccountStore};
use inkpress_auth::{
    hash_password, AuthError, ExtraClaims, IdentityProvider, Purpose, RevocationStore,
    TokenClaims, TokenIssuer, TokenPair, TokenType, TokenVerifier,
};
use inkpress_core::UserId;
use std::sync::Arc;

/// Service backing the authentication endpoints.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    provider: Arc<dyn IdentityProvider>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    revocations: Arc<dyn RevocationStore>,
}

impl AuthService {
    /// Assemble the service from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn AccountStore>,
        provider: Arc<dyn IdentityProvider>,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            store,
            provider,
            issuer,
            verifier,
            revocations,
        }
    }

    /// Register a new account and log it in.
    ///
    /// Returns the account, its first token pair, and the email
    /// verification token for the mailer to deliver.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(AccountRecord, TokenPair, String), ApiAuthError> {
        if self.store.find_by_login(username).await?.is_some() {
            return Err(ApiAuthError::AccountExists);
        }
        if self.store.find_by_login(email).await?.is_some() {
            return Err(ApiAuthError::AccountExists);
        }

        let record = AccountRecord::new(
            username.to_string(),
            email.to_string(),
            hash_password(password)?,
        );
        self.store.insert(record.clone()).await?;

        let tokens = self.issue_for(&record)?;
        let verification = self.issuer.issue_single_purpose(
            record.id,
            Purpose::EmailVerification,
            None,
        )?;

        tracing::info!(user_id = %record.id, username = %record.username, "account registered");

        Ok((record, tokens, verification))
    }

    /// Authenticate a username-or-email plus password and issue a pair.
    ///
    /// Unknown account and wrong password produce the same error.
    pub async fn login(
        &self,
        login: &str,
        password: &str,
    ) -> Result<(AccountRecord, TokenPair), ApiAuthError> {
        let record = self
            .store
            .find_by_login(login)
            .await?
            .ok_or(ApiAuthError::InvalidCredentials)?;

        let password_ok = self.provider.verify_password(record.id, password).await?;
        if !password_ok {
            tracing::warn!(user_id = %record.id, "login rejected: bad credentials");
            return Err(ApiAuthError::InvalidCredentials);
        }

        if !record.is_active {
            tracing::warn!(user_id = %record.id, "login rejected: account disabled");
            return Err(ApiAuthError::Auth(AuthError::AccountInactive));
        }

        let tokens = self.issue_for(&record)?;
        tracing::info!(user_id = %record.id, "login succeeded");

        Ok((record, tokens))
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The account is re-checked against the store so a disabled account
    /// cannot keep a session alive by refreshing.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiAuthError> {
        let claims = self
            .verifier
            .verify_claims(refresh_token, TokenType::Refresh)
            .await?;
        let subject = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::MalformedToken("subject is not a valid user id".to_string()))?;

        match self.provider.find_account(subject).await? {
            Some(account) if account.is_active => {}
            _ => {
                tracing::warn!(user_id = %subject, "refresh rejected: account inactive");
                return Err(ApiAuthError::Auth(AuthError::AccountInactive));
            }
        }

        let pair = self.verifier.refresh(refresh_token, &self.issuer).await?;
        tracing::debug!(user_id = %subject, "token pair refreshed");
        Ok(pair)
    }

    /// Retire the presented access token, and optionally the session's
    /// refresh token.
    ///
    /// An unusable refresh token in the body is ignored: the caller is
    /// leaving either way, and the access token's revocation is what the
    /// logout guarantee rests on.
    pub async fn logout(
        &self,
        access_claims: &TokenClaims,
        refresh_token: Option<&str>,
    ) -> Result<(), ApiAuthError> {
        self.revocations
            .revoke(&access_claims.jti, access_claims.expires_at())
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        if let Some(token) = refresh_token {
            match self.verifier.verify_claims(token, TokenType::Refresh).await {
                Ok(claims) => {
                    self.revocations
                        .revoke(&claims.jti, claims.expires_at())
                        .await
                        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "logout body carried an unusable refresh token");
                }
            }
        }

        tracing::info!(sub = %access_claims.sub, jti = %access_claims.jti, "logged out");
        Ok(())
    }

    /// Change the caller's password after re-verifying the current one.
    pub async fn change_password(
        &self,
        subject: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiAuthError> {
        let current_ok = self
            .provider
            .verify_password(subject, current_password)
            .await?;
        if !current_ok {
            return Err(ApiAuthError::InvalidCredentials);
        }

        self.store
            .set_password_hash(subject, hash_password(new_password)?)
            .await?;

        tracing::info!(user_id = %subject, "password changed");
        Ok(())
    }

    /// Issue a password-reset token for the account behind `email`.
    ///
    /// Returns `None` when no active account matches; the handler answers
    /// identically either way, so the response does not disclose whether
    /// the address is registered. The token goes to the mailer, never into
    /// the HTTP response.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<String>, ApiAuthError> {
        let record = match self.store.find_by_login(email).await? {
            Some(record) if record.is_active => record,
            _ => return Ok(None),
        };

        let token = self
            .issuer
            .issue_single_purpose(record.id, Purpose::PasswordReset, None)?;

        tracing::info!(user_id = %record.id, "password reset token issued");
        Ok(Some(token))
    }

    /// Redeem a password-reset token and store the new password.
    ///
    /// The token is revoked on success, so it cannot be replayed inside
    /// its validity window.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), ApiAuthError> {
        let claims = self
            .verifier
            .verify_claims(token, TokenType::PasswordReset)
            .await?;
        let subject = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::MalformedToken("subject is not a valid user id".to_string()))?;

        self.store
            .set_password_hash(subject, hash_password(new_password)?)
            .await?;

        self.revocations
            .revoke(&claims.jti, claims.expires_at())
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        tracing::info!(user_id = %subject, "password reset completed");
        Ok(())
    }

    /// Redeem an email-verification token.
    ///
    /// Single-use, like the reset token.
    pub async fn verify_email(&self, token: &str) -> Result<(), ApiAuthError> {
        let claims = self
            .verifier
            .verify_claims(token, TokenType::EmailVerification)
            .await?;
        let subject = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::MalformedToken("subject is not a valid user id".to_string()))?;

        self.store.mark_email_verified(subject).await?;

        self.revocations
            .revoke(&claims.jti, claims.expires_at())
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        tracing::info!(user_id = %subject, "email verified");
        Ok(())
    }

    /// Load the caller's account record.
    pub async fn current_account(&self, subject: UserId) -> Result<AccountRecord, ApiAuthError> {
        self.store
            .find_by_id(subject)
            .await?
            .ok_or(ApiAuthError::Auth(AuthError::AccountInactive))
    }

    fn issue_for(&self, record: &AccountRecord) -> Result<TokenPair, ApiAuthError> {
        let extra = ExtraClaims {
            name: Some(record.username.clone()),
            email: Some(record.email.clone()),
        };
        Ok(self.issuer.issue_pair(record.id, extra)?)
    }
}
