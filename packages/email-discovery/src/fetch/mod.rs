//! Page fetching with an anti-bot escalation path.
//!
//! [`HttpFetcher`] does the cheap plain GET. [`Fetcher`] pairs it with an
//! optional [`PageRenderer`] and escalates only when the plain fetch was
//! answered by a challenge interstitial. Timeouts, error statuses and wrong
//! content types never reach the (paid) renderer.

mod http;

pub use http::HttpFetcher;
pub use crate::traits::fetcher::{FetchedPage, PageFetcher};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::traits::renderer::PageRenderer;

/// Budget for one plain fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Budget for one headless render.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Retained body size, in characters.
pub const MAX_BODY_CHARS: usize = 2_000_000;

/// Markup that only appears on anti-bot interstitials.
pub const CHALLENGE_MARKERS: &[&str] = &[
    "<title>Just a moment...</title>",
    "cf-browser-verification",
    "cf-challenge-running",
    "cf_chl_opt",
];

/// Whether `body` is a challenge page rather than site content.
pub fn is_challenge_page(body: &str) -> bool {
    CHALLENGE_MARKERS.iter().any(|marker| body.contains(marker))
}

/// Plain fetcher plus optional headless fallback.
#[derive(Clone)]
pub struct Fetcher {
    plain: Arc<dyn PageFetcher>,
    renderer: Option<Arc<dyn PageRenderer>>,
    fetch_timeout: Duration,
    render_timeout: Duration,
}

impl Fetcher {
    pub fn new(plain: Arc<dyn PageFetcher>) -> Self {
        Self {
            plain,
            renderer: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    /// Enable challenge escalation through `renderer`.
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }

    /// Whether a renderer is wired in.
    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Plain fetch only, with the configured timeout.
    pub async fn fetch_page(&self, url: &str) -> FetchedPage {
        self.plain.fetch_page(url, self.fetch_timeout).await
    }

    /// Plain fetch; on a challenge, render the page headlessly instead.
    pub async fn fetch_page_with_fallback(&self, url: &str) -> Option<String> {
        let page = self.fetch_page(url).await;
        if page.html.is_some() || !page.cloudflare_blocked {
            return page.html;
        }

        let Some(renderer) = &self.renderer else {
            warn!(url = %url, "Challenge served but no headless renderer configured");
            return None;
        };

        info!(url = %url, "Challenge detected, falling back to headless renderer");
        match tokio::time::timeout(self.render_timeout, renderer.render_page(url)).await {
            Ok(Ok(Some(html))) if !html.trim().is_empty() => {
                debug!(url = %url, bytes = html.len(), "Headless render succeeded");
                Some(html)
            }
            Ok(Ok(_)) => {
                debug!(url = %url, "Headless render returned no HTML");
                None
            }
            Ok(Err(e)) => {
                warn!(url = %url, error = %e, "Headless render failed");
                None
            }
            Err(_) => {
                warn!(
                    url = %url,
                    timeout_ms = self.render_timeout.as_millis() as u64,
                    "Headless render timed out"
                );
                None
            }
        }
    }
}
