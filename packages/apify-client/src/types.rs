use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Browser-side function run by `apify/web-scraper` for each page. Returns the
/// fully rendered document so challenge interstitials have already resolved.
pub const RENDER_PAGE_FUNCTION: &str = r#"async function pageFunction(context) {
    return {
        url: context.request.url,
        html: document.documentElement.outerHTML,
    };
}"#;

/// Input for the apify/web-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct WebScraperInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "pageFunction")]
    pub page_function: String,
    #[serde(rename = "maxPagesPerCrawl")]
    pub max_pages_per_crawl: u32,
    #[serde(rename = "proxyConfiguration")]
    pub proxy_configuration: ProxyConfiguration,
}

impl WebScraperInput {
    /// Render exactly one page through Apify's proxy pool.
    pub fn single_page(url: &str) -> Self {
        Self {
            start_urls: vec![StartUrl {
                url: url.to_string(),
            }],
            page_function: RENDER_PAGE_FUNCTION.to_string(),
            max_pages_per_crawl: 1,
            proxy_configuration: ProxyConfiguration {
                use_apify_proxy: true,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProxyConfiguration {
    #[serde(rename = "useApifyProxy")]
    pub use_apify_proxy: bool,
}

/// A single rendered page from the web-scraper dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderedPage {
    pub url: Option<String>,
    pub html: Option<String>,
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunData {
    /// Wall-clock run time, once the run has finished.
    pub fn duration(&self) -> Option<TimeDelta> {
        Some(self.finished_at? - self.started_at?)
    }
}
