//! Third-party contact directory lookups.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorResult;

/// One address a directory knows for a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryContact {
    /// The address as the provider returned it, unvalidated.
    pub value: String,
    /// Provider confidence, 0..=100.
    pub confidence: u8,
}

impl DirectoryContact {
    pub fn new(value: impl Into<String>, confidence: u8) -> Self {
        Self {
            value: value.into(),
            confidence,
        }
    }
}

#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Every contact the directory lists for `domain`.
    async fn domain_search(&self, domain: &str) -> CollaboratorResult<Vec<DirectoryContact>>;
}

#[async_trait]
impl<T: DirectoryLookup + ?Sized> DirectoryLookup for Arc<T> {
    async fn domain_search(&self, domain: &str) -> CollaboratorResult<Vec<DirectoryContact>> {
        (**self).domain_search(domain).await
    }
}
