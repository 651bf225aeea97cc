//! Plain page fetching.

use async_trait::async_trait;
use std::time::Duration;

/// Outcome of one page fetch.
///
/// `html` is `None` whenever the fetch produced nothing usable. A challenge
/// interstitial sets `cloudflare_blocked` and never carries its markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    pub html: Option<String>,
    pub cloudflare_blocked: bool,
}

impl FetchedPage {
    /// Nothing usable, not blocked.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A usable document.
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            cloudflare_blocked: false,
        }
    }

    /// An anti-bot challenge was served instead of content.
    pub fn blocked() -> Self {
        Self {
            html: None,
            cloudflare_blocked: true,
        }
    }
}

/// Bounded-time GET of a single page.
///
/// Implementations never fail: transport problems collapse into
/// [`FetchedPage::empty`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str, timeout: Duration) -> FetchedPage;
}
