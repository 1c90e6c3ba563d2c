//! Ownership and admin authorization.
//!
//! Gates an operation on a specific resource to its owner or an
//! administrator. The guard composes the token verifier with the identity
//! provider's ownership/role answers and returns a typed verdict; it never
//! mutates account or token state.

use crate::claims::TokenType;
use crate::error::AuthError;
use crate::provider::{Account, IdentityProvider};
use crate::verifier::{Identity, TokenVerifier};
use inkpress_core::{Owned, UserId};
use std::sync::Arc;

/// Authorizes operations on owned resources.
#[derive(Clone)]
pub struct AuthorizationGuard {
    verifier: Arc<TokenVerifier>,
    provider: Arc<dyn IdentityProvider>,
}

impl AuthorizationGuard {
    /// Create a guard over the given verifier and identity provider.
    #[must_use]
    pub fn new(verifier: Arc<TokenVerifier>, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { verifier, provider }
    }

    /// Authorize an operation on a resource owned by `resource_owner`.
    ///
    /// The bearer must present a valid access token. The owner is allowed
    /// without an account lookup; anyone else must be an active
    /// administrator.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingToken` and every token-verification failure
    ///   (authentication, HTTP-equivalent 401)
    /// - `AuthError::AccountInactive` - the caller's account is missing or
    ///   disabled (401)
    /// - `AuthError::Forbidden` - authenticated but neither owner nor
    ///   admin (authorization, 403)
    pub async fn authorize(
        &self,
        bearer: Option<&str>,
        resource_owner: UserId,
    ) -> Result<Identity, AuthError> {
        let token = bearer.ok_or(AuthError::MissingToken)?;
        let identity = self.verifier.verify(token, TokenType::Access).await?;

        if identity.subject == resource_owner {
            return Ok(identity);
        }

        let account = self.active_account(identity.subject).await?;
        if account.is_admin {
            tracing::debug!(
                subject = %identity.subject,
                owner = %resource_owner,
                "admin override"
            );
            Ok(identity)
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// Authorize an operation on a resource that knows its owner.
    pub async fn authorize_owned<R: Owned + ?Sized>(
        &self,
        bearer: Option<&str>,
        resource: &R,
    ) -> Result<Identity, AuthError> {
        self.authorize(bearer, resource.owner_id()).await
    }

    /// Authorize a request that works with or without a caller identity.
    ///
    /// No token means an anonymous caller (`Ok(None)`); a valid token
    /// yields the identity; a present-but-invalid token is still an error,
    /// so bad credentials are never mistaken for anonymity.
    pub async fn authorize_optional(
        &self,
        bearer: Option<&str>,
    ) -> Result<Option<Identity>, AuthError> {
        match bearer {
            None => Ok(None),
            Some(token) => self
                .verifier
                .verify(token, TokenType::Access)
                .await
                .map(Some),
        }
    }

    /// Authorize an operation restricted to administrators.
    pub async fn require_admin(&self, bearer: Option<&str>) -> Result<Identity, AuthError> {
        let token = bearer.ok_or(AuthError::MissingToken)?;
        let identity = self.verifier.verify(token, TokenType::Access).await?;

        let account = self.active_account(identity.subject).await?;
        if account.is_admin {
            Ok(identity)
        } else {
            Err(AuthError::Forbidden)
        }
    }

    async fn active_account(&self, subject: UserId) -> Result<Account, AuthError> {
        let account = self
            .provider
            .find_account(subject)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        match account {
            Some(account) if account.is_active => Ok(account),
            _ => Err(AuthError::AccountInactive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::{ExtraClaims, IssuerConfig, TokenIssuer};
    use crate::provider::ProviderError;
    use crate::revocation::InMemoryRevocationStore;
    use crate::signer::TokenSigner;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::RwLock;

    const TEST_SECRET: &[u8] = b"test-signing-secret-not-for-production";

    #[derive(Default)]
    struct FakeProvider {
        accounts: RwLock<HashMap<UserId, Account>>,
        unavailable: bool,
    }

    impl FakeProvider {
        fn with_account(self, account: Account) -> Self {
            self.accounts.write().unwrap().insert(account.id, account);
            self
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        async fn find_account(&self, subject: UserId) -> Result<Option<Account>, ProviderError> {
            if self.unavailable {
                return Err(ProviderError::Unavailable("connection refused".to_string()));
            }
            Ok(self.accounts.read().unwrap().get(&subject).copied())
        }

        async fn verify_password(
            &self,
            _subject: UserId,
            _plaintext: &str,
        ) -> Result<bool, ProviderError> {
            Ok(false)
        }
    }

    struct Fixture {
        issuer: TokenIssuer,
        guard: AuthorizationGuard,
    }

    fn fixture(provider: FakeProvider) -> Fixture {
        let signer = Arc::new(TokenSigner::new(TEST_SECRET).unwrap());
        let revocations = Arc::new(InMemoryRevocationStore::new());
        let verifier = Arc::new(TokenVerifier::new(signer.clone(), revocations));
        Fixture {
            issuer: TokenIssuer::new(signer, IssuerConfig::default()),
            guard: AuthorizationGuard::new(verifier, Arc::new(provider)),
        }
    }

    fn access_token(issuer: &TokenIssuer, subject: UserId) -> String {
        issuer
            .issue_pair(subject, ExtraClaims::default())
            .unwrap()
            .access_token
    }

    #[tokio::test]
    async fn owner_is_allowed() {
        let owner = UserId::new();
        let fx = fixture(FakeProvider::default());
        let token = access_token(&fx.issuer, owner);

        let identity = fx.guard.authorize(Some(&token), owner).await.unwrap();
        assert_eq!(identity.subject, owner);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let owner = UserId::new();
        let stranger = UserId::new();
        let provider = FakeProvider::default().with_account(Account {
            id: stranger,
            is_active: true,
            is_admin: false,
        });
        let fx = fixture(provider);
        let token = access_token(&fx.issuer, stranger);

        let err = fx.guard.authorize(Some(&token), owner).await.unwrap_err();
        assert_eq!(err, AuthError::Forbidden);
    }

    #[tokio::test]
    async fn admin_overrides_ownership() {
        let owner = UserId::new();
        let admin = UserId::new();
        let provider = FakeProvider::default().with_account(Account {
            id: admin,
            is_active: true,
            is_admin: true,
        });
        let fx = fixture(provider);
        let token = access_token(&fx.issuer, admin);

        let identity = fx.guard.authorize(Some(&token), owner).await.unwrap();
        assert_eq!(identity.subject, admin);
    }

    #[tokio::test]
    async fn disabled_account_rejected_even_as_admin() {
        let owner = UserId::new();
        let admin = UserId::new();
        let provider = FakeProvider::default().with_account(Account {
            id: admin,
            is_active: false,
            is_admin: true,
        });
        let fx = fixture(provider);
        let token = access_token(&fx.issuer, admin);

        let err = fx.guard.authorize(Some(&token), owner).await.unwrap_err();
        assert_eq!(err, AuthError::AccountInactive);
    }

    #[tokio::test]
    async fn unknown_subject_rejected_for_foreign_resources() {
        let owner = UserId::new();
        let ghost = UserId::new();
        let fx = fixture(FakeProvider::default());
        let token = access_token(&fx.issuer, ghost);

        let err = fx.guard.authorize(Some(&token), owner).await.unwrap_err();
        assert_eq!(err, AuthError::AccountInactive);
    }

    #[tokio::test]
    async fn missing_token_is_its_own_error() {
        let fx = fixture(FakeProvider::default());
        let err = fx.guard.authorize(None, UserId::new()).await.unwrap_err();
        assert_eq!(err, AuthError::MissingToken);
    }

    #[tokio::test]
    async fn authorize_owned_uses_resource_owner() {
        struct Post {
            author: UserId,
        }
        impl Owned for Post {
            fn owner_id(&self) -> UserId {
                self.author
            }
        }

        let author = UserId::new();
        let fx = fixture(FakeProvider::default());
        let token = access_token(&fx.issuer, author);
        let post = Post { author };

        let identity = fx
            .guard
            .authorize_owned(Some(&token), &post)
            .await
            .unwrap();
        assert_eq!(identity.subject, author);
    }

    #[tokio::test]
    async fn optional_distinguishes_anonymous_from_invalid() {
        let fx = fixture(FakeProvider::default());

        // Anonymous: fine.
        assert_eq!(fx.guard.authorize_optional(None).await.unwrap(), None);

        // Valid token: identity.
        let subject = UserId::new();
        let token = access_token(&fx.issuer, subject);
        let identity = fx
            .guard
            .authorize_optional(Some(&token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.subject, subject);

        // Present but invalid: an error, not anonymity.
        let err = fx
            .guard
            .authorize_optional(Some("not-a-token"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[tokio::test]
    async fn require_admin_matrix() {
        let admin = UserId::new();
        let user = UserId::new();
        let provider = FakeProvider::default()
            .with_account(Account {
                id: admin,
                is_active: true,
                is_admin: true,
            })
            .with_account(Account {
                id: user,
                is_active: true,
                is_admin: false,
            });
        let fx = fixture(provider);

        let token = access_token(&fx.issuer, admin);
        assert!(fx.guard.require_admin(Some(&token)).await.is_ok());

        let token = access_token(&fx.issuer, user);
        assert_eq!(
            fx.guard.require_admin(Some(&token)).await.unwrap_err(),
            AuthError::Forbidden
        );

        assert_eq!(
            fx.guard.require_admin(None).await.unwrap_err(),
            AuthError::MissingToken
        );
    }

    #[tokio::test]
    async fn provider_outage_fails_closed() {
        let owner = UserId::new();
        let stranger = UserId::new();
        let provider = FakeProvider {
            unavailable: true,
            ..FakeProvider::default()
        };
        let fx = fixture(provider);
        let token = access_token(&fx.issuer, stranger);

        let err = fx.guard.authorize(Some(&token), owner).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }
}
