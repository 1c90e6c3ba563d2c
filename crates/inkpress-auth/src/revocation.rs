//! Revocation store.
//!
//! Records the ids of tokens that must no longer be honored, independent of
//! their remaining validity window. The store is the only shared mutable
//! state in the auth core: read on every authenticated request, written at
//! logout or administrative revocation.
//!
//! Two implementations are provided: an in-process concurrent map for
//! single-node deployments, and a cache layering that fronts any shared
//! store with a short-TTL in-memory cache for multi-node deployments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;

/// Maximum number of entries in the revocation cache.
const MAX_CACHE_ENTRIES: u64 = 10_000;

/// Time-to-live for cache entries (seconds).
const CACHE_TTL_SECONDS: u64 = 30;

/// Errors returned by revocation store operations.
///
/// Distinct from the auth error taxonomy: a store failure is an
/// infrastructure incident, not a verdict about the token.
#[derive(Debug, Clone, Error)]
pub enum RevocationError {
    /// The store could not be reached or could not answer in time.
    #[error("revocation store unavailable: {0}")]
    Unavailable(String),
}

/// Record of tokens that must no longer be honored.
///
/// Both operations are idempotent. A revocation performed through one
/// handle must become visible to every other handle of the same store;
/// eventual visibility is sufficient, strict global ordering is not
/// required.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record a token id as revoked until its natural expiry.
    ///
    /// `expires_at` is the revoked token's own expiry: once past it the
    /// entry is dead weight, since the expiry check rejects the token
    /// anyway, and the store may discard it.
    async fn revoke(
        &self,
        token_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RevocationError>;

    /// Check whether a token id has been revoked.
    async fn is_revoked(&self, token_id: &str) -> Result<bool, RevocationError>;
}

/// In-process revocation store for single-node deployments.
///
/// A read-write-locked map of token id to natural expiry. Entries past
/// their expiry are pruned opportunistically on each write, keeping memory
/// bounded without a background sweeper.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryRevocationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries whose underlying token has expired. Returns the number
    /// of entries removed.
    pub fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// True if no entries are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(
        &self,
        token_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RevocationError> {
        let now = Utc::now();
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.retain(|_, entry_expiry| *entry_expiry > now);
        entries.insert(token_id.to_string(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RevocationError> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(entries.contains_key(token_id))
    }
}

/// Short-TTL cache in front of a shared revocation store.
///
/// For deployments where the inner store is shared across nodes, the cache
/// bounds per-request lookups without weakening the guarantee on the node
/// that performed the revocation: `revoke` writes through to the inner
/// store and poisons the local cache entry, so the same node rejects the
/// token immediately. Other nodes converge within the cache TTL.
#[derive(Clone)]
pub struct CachedRevocationStore {
    cache: Cache<String, bool>,
    inner: Arc<dyn RevocationStore>,
}

impl CachedRevocationStore {
    /// Wrap an inner store with the default cache sizing.
    #[must_use]
    pub fn new(inner: Arc<dyn RevocationStore>) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(Duration::from_secs(CACHE_TTL_SECONDS))
            .build();

        Self { cache, inner }
    }
}

#[async_trait]
impl RevocationStore for CachedRevocationStore {
    async fn revoke(
        &self,
        token_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RevocationError> {
        self.inner.revoke(token_id, expires_at).await?;
        // Mark revoked locally so the next check doesn't need the inner store.
        self.cache.insert(token_id.to_string(), true).await;
        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RevocationError> {
        if let Some(revoked) = self.cache.get(token_id).await {
            return Ok(revoked);
        }

        let revoked = self.inner.is_revoked(token_id).await?;
        self.cache.insert(token_id.to_string(), revoked).await;
        Ok(revoked)
    }
}
