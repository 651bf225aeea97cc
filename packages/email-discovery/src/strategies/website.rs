//! Homepage, contact page, then a short list of common paths.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{Strategy, StrategyContext, StrategyOutput};
use crate::contact_page::find_contact_page_url;
use crate::error::StrategyRunResult;
use crate::extract::extract_emails;
use crate::fetch::Fetcher;
use crate::types::{Confidence, EmailCandidate, StrategyName};

pub struct WebsiteScrapeStrategy {
    fetcher: Fetcher,
    common_paths: Vec<String>,
}

impl WebsiteScrapeStrategy {
    pub fn new(fetcher: Fetcher, common_paths: Vec<String>) -> Self {
        Self {
            fetcher,
            common_paths,
        }
    }

    /// Probe the common paths with the plain fetcher, stopping at the first
    /// page that yields anything.
    async fn probe_common_paths(&self, homepage: &str, domain: &str) -> Vec<EmailCandidate> {
        let Ok(base) = Url::parse(homepage) else {
            debug!(url = %homepage, "Homepage URL does not parse, skipping path probes");
            return Vec::new();
        };

        for path in &self.common_paths {
            let Ok(url) = base.join(path) else {
                continue;
            };
            let url = url.to_string();
            let Some(html) = self.fetcher.fetch_page(&url).await.html else {
                continue;
            };
            let found = extract_emails(&html, domain, Some(&url));
            if !found.is_empty() {
                debug!(url = %url, candidates = found.len(), "Common path yielded candidates");
                return found;
            }
        }
        Vec::new()
    }
}

#[async_trait]
impl Strategy for WebsiteScrapeStrategy {
    fn name(&self) -> StrategyName {
        StrategyName::WebsiteScrape
    }

    fn is_applicable(&self, ctx: &StrategyContext<'_>) -> bool {
        ctx.website.is_some()
    }

    fn exits_early_on_high(&self) -> bool {
        true
    }

    async fn run(&self, ctx: &StrategyContext<'_>) -> StrategyRunResult<StrategyOutput> {
        let Some(homepage) = ctx.website.as_deref() else {
            return Ok(StrategyOutput::default());
        };
        let domain = ctx.domain.as_str();
        let mut found = Vec::new();

        if let Some(html) = self.fetcher.fetch_page_with_fallback(homepage).await {
            found = extract_emails(&html, domain, Some(homepage));
            if found.iter().any(|c| c.confidence == Confidence::High) {
                return Ok(StrategyOutput::candidates(found));
            }

            if let Some(contact_url) = find_contact_page_url(&html, homepage) {
                debug!(url = %contact_url, "Following contact page");
                if let Some(contact_html) = self.fetcher.fetch_page_with_fallback(&contact_url).await
                {
                    found.extend(extract_emails(&contact_html, domain, Some(&contact_url)));
                }
            }
        }

        if found.is_empty() {
            found = self.probe_common_paths(homepage, domain).await;
        }

        Ok(StrategyOutput::candidates(found))
    }
}
