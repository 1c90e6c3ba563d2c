//! Account storage interface.
//!
//! The persistence layer owns account records; the handlers reach it
//! through the [`AccountStore`] trait. An in-memory implementation backs
//! the tests and the development server, and doubles as the
//! [`IdentityProvider`] the auth core consults.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inkpress_auth::{verify_password, Account, IdentityProvider, ProviderError};
use inkpress_core::UserId;
use std::collections::HashMap;
use std::sync::RwLock;

/// A stored account.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// Account id.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Disabled accounts cannot log in and fail every guard check.
    pub is_active: bool,
    /// Administrator role flag.
    pub is_admin: bool,
    /// Set once the verification token has been redeemed.
    pub email_verified: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl AccountRecord {
    /// Build a fresh, active, non-admin account.
    #[must_use]
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            is_active: true,
            is_admin: false,
            email_verified: false,
            created_at: Utc::now(),
        }
    }
}

/// Account lookup and mutation as needed by the auth endpoints.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<AccountRecord>, ProviderError>;

    /// Look up an account by username or email.
    async fn find_by_login(&self, login: &str) -> Result<Option<AccountRecord>, ProviderError>;

    /// Insert a new account. Fails quietly on nothing; uniqueness is the
    /// caller's concern via [`AccountStore::find_by_login`].
    async fn insert(&self, record: AccountRecord) -> Result<(), ProviderError>;

    /// Replace an account's password hash.
    async fn set_password_hash(&self, id: UserId, hash: String) -> Result<(), ProviderError>;

    /// Mark an account's email address as verified.
    async fn mark_email_verified(&self, id: UserId) -> Result<(), ProviderError>;
}

/// In-memory account store for tests and the development server.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<UserId, AccountRecord>>,
}

impl InMemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account directly, bypassing the trait. Test convenience.
    pub fn seed(&self, record: AccountRecord) {
        self.write().insert(record.id, record);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<UserId, AccountRecord>> {
        match self.accounts.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<UserId, AccountRecord>> {
        match self.accounts.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<AccountRecord>, ProviderError> {
        Ok(self.read().get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<AccountRecord>, ProviderError> {
        Ok(self
            .read()
            .values()
            .find(|a| a.username == login || a.email == login)
            .cloned())
    }

    async fn insert(&self, record: AccountRecord) -> Result<(), ProviderError> {
        self.write().insert(record.id, record);
        Ok(())
    }

    async fn set_password_hash(&self, id: UserId, hash: String) -> Result<(), ProviderError> {
        if let Some(account) = self.write().get_mut(&id) {
            account.password_hash = hash;
        }
        Ok(())
    }

    async fn mark_email_verified(&self, id: UserId) -> Result<(), ProviderError> {
        if let Some(account) = self.write().get_mut(&id) {
            account.email_verified = true;
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryAccountStore {
    async fn find_account(&self, subject: UserId) -> Result<Option<Account>, ProviderError> {
        Ok(self.read().get(&subject).map(|record| Account {
            id: record.id,
            is_active: record.is_active,
            is_admin: record.is_admin,
        }))
    }

    async fn verify_password(
        &self,
        subject: UserId,
        plaintext: &str,
    ) -> Result<bool, ProviderError> {
        let hash = match self.read().get(&subject) {
            Some(record) => record.password_hash.clone(),
            None => return Ok(false),
        };

        Ok(verify_password(plaintext, &hash).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpress_auth::hash_password;

    fn record(username: &str, email: &str, password: &str) -> AccountRecord {
        AccountRecord::new(
            username.to_string(),
            email.to_string(),
            hash_password(password).unwrap(),
        )
    }

    #[tokio::test]
    async fn find_by_login_matches_username_and_email() {
        let store = InMemoryAccountStore::new();
        store.seed(record("alice", "alice@example.com", "password-1"));

        assert!(store.find_by_login("alice").await.unwrap().is_some());
        assert!(store
            .find_by_login("alice@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(store.find_by_login("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn password_verification_through_provider() {
        let store = InMemoryAccountStore::new();
        let account = record("alice", "alice@example.com", "password-1");
        let id = account.id;
        store.seed(account);

        assert!(store.verify_password(id, "password-1").await.unwrap());
        assert!(!store.verify_password(id, "wrong").await.unwrap());
        assert!(!store
            .verify_password(UserId::new(), "password-1")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn provider_view_exposes_flags_only() {
        let store = InMemoryAccountStore::new();
        let mut account = record("admin", "admin@example.com", "password-1");
        account.is_admin = true;
        let id = account.id;
        store.seed(account);

        let view = store.find_account(id).await.unwrap().unwrap();
        assert!(view.is_admin);
        assert!(view.is_active);
    }

    #[tokio::test]
    async fn set_password_hash_replaces_credential() {
        let store = InMemoryAccountStore::new();
        let account = record("alice", "alice@example.com", "old-password");
        let id = account.id;
        store.seed(account);

        store
            .set_password_hash(id, hash_password("new-password").unwrap())
            .await
            .unwrap();

        assert!(!store.verify_password(id, "old-password").await.unwrap());
        assert!(store.verify_password(id, "new-password").await.unwrap());
    }

    #[tokio::test]
    async fn mark_email_verified_sets_flag() {
        let store = InMemoryAccountStore::new();
        let account = record("alice", "alice@example.com", "password-1");
        let id = account.id;
        store.seed(account);

        store.mark_email_verified(id).await.unwrap();
        let record = store.find_by_id(id).await.unwrap().unwrap();
        assert!(record.email_verified);
    }
}
