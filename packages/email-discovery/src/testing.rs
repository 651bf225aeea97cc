//! Mock collaborators for testing.
//!
//! Every mock is cheap to clone and clones share state, so a test can hand one
//! copy to the engine and keep another to inspect the recorded calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::traits::directory::{DirectoryContact, DirectoryLookup};
use crate::traits::fetcher::{FetchedPage, PageFetcher};
use crate::traits::mx::MxResolver;
use crate::traits::renderer::PageRenderer;
use crate::traits::search::{BusinessSearch, SearchText};

pub use crate::cache::ManualClock;

/// Canned pages by URL. Unknown URLs fetch as empty.
#[derive(Clone, Default)]
pub struct MockPageFetcher {
    pages: Arc<RwLock<HashMap<String, FetchedPage>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(url.into(), FetchedPage::html(html));
        self
    }

    /// Answer `url` with an anti-bot challenge.
    pub fn with_blocked(self, url: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(url.into(), FetchedPage::blocked());
        self
    }

    /// URLs fetched, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch_page(&self, url: &str, _timeout: Duration) -> FetchedPage {
        self.calls.write().unwrap().push(url.to_string());
        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_default()
    }
}

/// Canned headless renders by URL.
#[derive(Clone, Default)]
pub struct MockRenderer {
    pages: Arc<RwLock<HashMap<String, String>>>,
    failure: Arc<RwLock<Option<String>>>,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), html.into());
        self
    }

    /// Fail every render with an API error carrying `message`.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.write().unwrap() = Some(message.into());
        self
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn render_page(&self, url: &str) -> CollaboratorResult<Option<String>> {
        self.calls.write().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(CollaboratorError::Api {
                status: 500,
                message,
            });
        }
        Ok(self.pages.read().unwrap().get(url).cloned())
    }
}

/// MX answers by domain. Unknown domains have no MX.
#[derive(Clone, Default)]
pub struct MockMxResolver {
    answers: Arc<RwLock<HashMap<String, bool>>>,
    failure: Arc<RwLock<Option<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockMxResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mx(self, domain: impl Into<String>, has_mx: bool) -> Self {
        self.answers.write().unwrap().insert(domain.into(), has_mx);
        self
    }

    /// Fail every lookup with a DNS error.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.write().unwrap() = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl MxResolver for MockMxResolver {
    async fn has_mx(&self, domain: &str) -> CollaboratorResult<bool> {
        self.calls.write().unwrap().push(domain.to_string());
        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(CollaboratorError::Dns(message));
        }
        Ok(self
            .answers
            .read()
            .unwrap()
            .get(domain)
            .copied()
            .unwrap_or(false))
    }
}

/// What the mock search does when called.
#[derive(Clone, Debug)]
enum SearchBehavior {
    Text(String),
    RateLimited(Duration),
    Fail(String),
}

/// Grounded search with one canned behavior. Records every prompt.
#[derive(Clone)]
pub struct MockBusinessSearch {
    behavior: Arc<RwLock<SearchBehavior>>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl Default for MockBusinessSearch {
    fn default() -> Self {
        Self {
            behavior: Arc::new(RwLock::new(SearchBehavior::Text(String::new()))),
            prompts: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl MockBusinessSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        *self.behavior.write().unwrap() = SearchBehavior::Text(text.into());
        self
    }

    /// Answer every call with a rate-limit error.
    pub fn with_rate_limit(self, retry_after: Duration) -> Self {
        *self.behavior.write().unwrap() = SearchBehavior::RateLimited(retry_after);
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.behavior.write().unwrap() = SearchBehavior::Fail(message.into());
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.read().unwrap().len()
    }
}

#[async_trait]
impl BusinessSearch for MockBusinessSearch {
    async fn grounded_business_search(&self, prompt: &str) -> CollaboratorResult<SearchText> {
        self.prompts.write().unwrap().push(prompt.to_string());
        match self.behavior.read().unwrap().clone() {
            SearchBehavior::Text(text) => Ok(SearchText { text }),
            SearchBehavior::RateLimited(retry_after) => {
                Err(CollaboratorError::RateLimited { retry_after })
            }
            SearchBehavior::Fail(message) => Err(CollaboratorError::Api {
                status: 500,
                message,
            }),
        }
    }
}

/// Directory contacts by domain. Unknown domains have none.
#[derive(Clone, Default)]
pub struct MockDirectory {
    contacts: Arc<RwLock<HashMap<String, Vec<DirectoryContact>>>>,
    failure: Arc<RwLock<Option<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(self, domain: impl Into<String>, contacts: Vec<DirectoryContact>) -> Self {
        self.contacts.write().unwrap().insert(domain.into(), contacts);
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.write().unwrap() = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl DirectoryLookup for MockDirectory {
    async fn domain_search(&self, domain: &str) -> CollaboratorResult<Vec<DirectoryContact>> {
        self.calls.write().unwrap().push(domain.to_string());
        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(CollaboratorError::Api {
                status: 429,
                message,
            });
        }
        Ok(self
            .contacts
            .read()
            .unwrap()
            .get(domain)
            .cloned()
            .unwrap_or_default())
    }
}
