//! Token authentication and authorization for inkpress.
//!
//! This crate provides the credential core the API layers build on:
//!
//! - HS256 token signing and signature checking ([`TokenSigner`])
//! - access/refresh pair and single-purpose token issuance ([`TokenIssuer`])
//! - verification with expiry, type, and revocation checks ([`TokenVerifier`])
//! - a pluggable revocation store with in-process and cached
//!   implementations ([`RevocationStore`])
//! - ownership/admin authorization over verified identities
//!   ([`AuthorizationGuard`])
//! - Argon2id password hashing for identity providers
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use inkpress_auth::{
//!     ExtraClaims, InMemoryRevocationStore, IssuerConfig, TokenIssuer, TokenSigner,
//!     TokenType, TokenVerifier,
//! };
//! use inkpress_core::UserId;
//!
//! let signer = Arc::new(TokenSigner::new(b"shared-secret")?);
//! let issuer = TokenIssuer::new(signer.clone(), IssuerConfig::default());
//! let verifier = TokenVerifier::new(signer, Arc::new(InMemoryRevocationStore::new()));
//!
//! let subject = UserId::new();
//! let pair = issuer.issue_pair(subject, ExtraClaims::default())?;
//! let identity = verifier.verify(&pair.access_token, TokenType::Access).await?;
//! assert_eq!(identity.subject, subject);
//! ```

mod claims;
mod error;
mod guard;
mod issuer;
mod password;
mod provider;
mod revocation;
mod signer;
mod verifier;

// Re-export public API
pub use claims::{TokenClaims, TokenClaimsBuilder, TokenType};
pub use error::AuthError;
pub use guard::AuthorizationGuard;
pub use issuer::{
    ExtraClaims, IssuerConfig, Purpose, TokenIssuer, TokenPair, ACCESS_TOKEN_TTL_MINUTES,
    EMAIL_VERIFICATION_TTL_HOURS, PASSWORD_RESET_TTL_HOURS, REFRESH_TOKEN_TTL_DAYS,
};
pub use password::{hash_password, verify_password};
pub use provider::{Account, IdentityProvider, ProviderError};
pub use revocation::{
    CachedRevocationStore, InMemoryRevocationStore, RevocationError, RevocationStore,
};
pub use signer::TokenSigner;
pub use verifier::{Identity, TokenVerifier};
