//! LLM-backed grounded search used for business-data enrichment.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorResult;

/// Unstructured answer from a grounded search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchText {
    pub text: String,
}

impl SearchText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
pub trait BusinessSearch: Send + Sync {
    /// Run `prompt` against a search-grounded model and return its text.
    async fn grounded_business_search(&self, prompt: &str) -> CollaboratorResult<SearchText>;
}

#[async_trait]
impl<T: BusinessSearch + ?Sized> BusinessSearch for Arc<T> {
    async fn grounded_business_search(&self, prompt: &str) -> CollaboratorResult<SearchText> {
        (**self).grounded_business_search(prompt).await
    }
}
