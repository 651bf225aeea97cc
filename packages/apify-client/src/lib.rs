//! Pure Apify REST API client.
//!
//! A minimal client for the Apify platform API. Supports starting actor runs,
//! polling for completion, and fetching dataset results. The only actor wired
//! up end-to-end is `apify/web-scraper`, used to render a single page in a real
//! browser when a site serves an anti-bot interstitial to plain HTTP clients.
//!
//! # Example
//!
//! ```rust,ignore
//! use apify_client::ApifyClient;
//!
//! let client = ApifyClient::new("your-api-token".into());
//!
//! if let Some(html) = client.render_page("https://example.com").await? {
//!     println!("{} bytes of rendered HTML", html.len());
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{RenderedPage, RunData, WebScraperInput};

use std::time::Duration;

use serde::de::DeserializeOwned;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for apify/web-scraper.
const WEB_SCRAPER: &str = "apify~web-scraper";

/// Actor-side run timeout, in seconds. Callers apply their own budget on top.
const RUN_TIMEOUT_SECS: u32 = 60;

/// Default end-to-end budget for [`ApifyClient::render_page`].
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound on the abort request sent when a render runs out of budget.
pub const ABORT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    render_timeout: Duration,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    /// Point the client at a different API root (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Budget covering start, polling and the dataset fetch of one render.
    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }

    pub fn render_timeout(&self) -> Duration {
        self.render_timeout
    }

    /// Start a single-page web-scraper run. Returns immediately with run metadata.
    pub async fn start_render(&self, url: &str) -> Result<RunData> {
        let input = WebScraperInput::single_page(url);

        let endpoint = format!(
            "{}/acts/{}/runs?timeout={}",
            self.base_url, WEB_SCRAPER, RUN_TIMEOUT_SECS
        );
        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.token)
            .json(&input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!(
                "{}/actor-runs/{}?waitForFinish=60",
                self.base_url, run_id
            );
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ApifyError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let api_resp: ApiResponse<RunData> = resp.json().await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed(api_resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(
        &self,
        dataset_id: &str,
    ) -> Result<Vec<T>> {
        let url = format!(
            "{}/datasets/{}/items?format=json",
            self.base_url, dataset_id
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Abort a run that is still going.
    pub async fn abort_run(&self, run_id: &str) -> Result<RunData> {
        let url = format!("{}/actor-runs/{}/abort", self.base_url, run_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .timeout(ABORT_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Render one page end-to-end: start run, poll, fetch the HTML.
    ///
    /// The whole render shares one budget (see [`Self::with_render_timeout`]).
    /// A run still going when the budget runs out is aborted and
    /// [`ApifyError::Timeout`] is returned.
    ///
    /// Returns `None` when the run succeeded but produced no HTML.
    pub async fn render_page(&self, url: &str) -> Result<Option<String>> {
        tracing::info!(url, "Starting Apify page render");
        let deadline = tokio::time::Instant::now() + self.render_timeout;

        let run = tokio::time::timeout_at(deadline, self.start_render(url))
            .await
            .map_err(|_| ApifyError::Timeout(self.render_timeout))??;
        tracing::info!(run_id = %run.id, "Apify run started, polling for completion");

        match tokio::time::timeout_at(deadline, self.collect_html(&run.id)).await {
            Ok(html) => html,
            Err(_) => {
                tracing::warn!(
                    run_id = %run.id,
                    timeout_ms = self.render_timeout.as_millis() as u64,
                    "Render budget exhausted, aborting run"
                );
                if let Err(e) = self.abort_run(&run.id).await {
                    tracing::warn!(run_id = %run.id, error = %e, "Failed to abort run");
                }
                Err(ApifyError::Timeout(self.render_timeout))
            }
        }
    }

    async fn collect_html(&self, run_id: &str) -> Result<Option<String>> {
        let completed = self.wait_for_run(run_id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            run_ms = ?completed.duration().map(|d| d.num_milliseconds()),
            "Run completed, fetching rendered page"
        );

        let pages: Vec<RenderedPage> = self
            .get_dataset_items(&completed.default_dataset_id)
            .await?;

        let html = pages
            .into_iter()
            .filter_map(|p| p.html)
            .find(|html| !html.trim().is_empty());
        tracing::info!(found = html.is_some(), "Fetched rendered page");

        Ok(html)
    }
}
