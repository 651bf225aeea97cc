//! Per-domain response cache over a [`DirectoryLookup`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{Clock, ResponseCache};
use crate::error::CollaboratorResult;
use crate::traits::directory::{DirectoryContact, DirectoryLookup};

/// Reuses successful directory answers for `ttl`. Failures are never cached.
pub struct CachedDirectory<D: DirectoryLookup> {
    inner: D,
    cache: ResponseCache<Vec<DirectoryContact>>,
}

impl<D: DirectoryLookup> CachedDirectory<D> {
    pub fn new(inner: D, ttl: Duration) -> Self {
        Self {
            inner,
            cache: ResponseCache::new(ttl),
        }
    }

    /// Same, with an injected clock.
    pub fn with_clock(inner: D, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache: ResponseCache::with_clock(ttl, clock),
        }
    }
}

#[async_trait]
impl<D: DirectoryLookup> DirectoryLookup for CachedDirectory<D> {
    async fn domain_search(&self, domain: &str) -> CollaboratorResult<Vec<DirectoryContact>> {
        let key = domain.trim().to_lowercase();
        if let Some(hit) = self.cache.get(&key) {
            debug!(domain = %key, contacts = hit.len(), "Directory cache hit");
            return Ok(hit);
        }

        let contacts = self.inner.domain_search(domain).await?;
        self.cache.insert(key, contacts.clone());
        Ok(contacts)
    }
}
