//! Identity provider interface.
//!
//! The persistence layer owns account records; the auth core only needs
//! two answers from it: "is this account active and is it an
//! administrator", and "does this plaintext match the account's stored
//! credential". The stored credential format is the provider's business.

use async_trait::async_trait;
use inkpress_core::UserId;
use thiserror::Error;

/// The slice of an account the auth core is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    /// Account id, the subject of issued tokens.
    pub id: UserId,
    /// Disabled accounts are rejected even with a valid token.
    pub is_active: bool,
    /// Administrators may act on resources they do not own.
    pub is_admin: bool,
}

/// Errors returned by identity provider operations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider could not be reached or could not answer in time.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Resolves subjects to accounts and checks credentials.
///
/// Implemented by the persistence layer; the auth core never stores or
/// inspects credential secrets itself.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a subject to its account, if one exists.
    async fn find_account(&self, subject: UserId) -> Result<Option<Account>, ProviderError>;

    /// Check a plaintext credential against the account's stored secret.
    ///
    /// Returns `Ok(false)` for an unknown subject as well as for a
    /// mismatch, so callers cannot distinguish the two cases.
    async fn verify_password(
        &self,
        subject: UserId,
        plaintext: &str,
    ) -> Result<bool, ProviderError>;
}
