//! reqwest-backed [`PageFetcher`] with browser-like headers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use super::{is_challenge_page, FetchedPage, PageFetcher, MAX_BODY_CHARS};
use crate::error::{ConfigError, FetchError, FetchResult};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Worst case UTF-8 width, so the character cap survives decoding.
const MAX_BODY_BYTES: usize = MAX_BODY_CHARS * 4;

/// Plain HTTP fetcher.
///
/// Sends the header set a desktop Chrome would, follows up to five
/// redirects, and only keeps `text/html` or `text/plain` bodies.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self { client })
    }

    /// Use a preconfigured client instead of the default one.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn try_fetch(&self, url: &str, timeout: Duration) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            // Challenge interstitials are usually served as 403/503.
            if matches!(status.as_u16(), 403 | 503) {
                if let Ok(body) = read_capped(url, response).await {
                    if is_challenge_page(&body) {
                        return Err(FetchError::Challenge {
                            url: url.to_string(),
                        });
                    }
                }
            }
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase());
        let textual = content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("text/html") || ct.contains("text/plain"));
        if !textual {
            return Err(FetchError::ContentType {
                url: url.to_string(),
                content_type,
            });
        }

        let body = read_capped(url, response).await?;
        if is_challenge_page(&body) {
            return Err(FetchError::Challenge {
                url: url.to_string(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str, timeout: Duration) -> FetchedPage {
        match self.try_fetch(url, timeout).await {
            Ok(html) => {
                debug!(url = %url, chars = html.len(), "Fetched page");
                FetchedPage::html(html)
            }
            Err(FetchError::Challenge { .. }) => {
                debug!(url = %url, "Anti-bot challenge served");
                FetchedPage::blocked()
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Fetch produced no data");
                FetchedPage::empty()
            }
        }
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    for (name, value) in [
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport(e)
    }
}

async fn read_capped(url: &str, mut response: reqwest::Response) -> FetchResult<String> {
    let mut bytes = Vec::new();
    loop {
        let chunk = response.chunk().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body(e)
            }
        })?;
        let Some(chunk) = chunk else { break };
        bytes.extend_from_slice(&chunk);
        if bytes.len() >= MAX_BODY_BYTES {
            break;
        }
    }

    let mut body = String::from_utf8_lossy(&bytes).into_owned();
    if let Some((cut, _)) = body.char_indices().nth(MAX_BODY_CHARS) {
        body.truncate(cut);
    }
    Ok(body)
}
