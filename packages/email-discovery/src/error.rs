//! Typed errors for the discovery engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::time::Duration;

use thiserror::Error;

use crate::types::DiscoveryResult;

/// Why a single page fetch produced no HTML.
///
/// These never escape the fetcher: the [`PageFetcher`](crate::fetch::PageFetcher)
/// boundary collapses them into "no data".
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request exceeded its time budget
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Non-2xx response
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Response is not HTML or plain text
    #[error("unsupported content type {content_type:?} for {url}")]
    ContentType {
        url: String,
        content_type: Option<String>,
    },

    /// Body is an anti-bot interstitial, not page content
    #[error("anti-bot challenge served for: {url}")]
    Challenge { url: String },

    /// Connection, TLS or redirect failure
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Body could not be read
    #[error("failed reading body: {0}")]
    Body(#[source] reqwest::Error),
}

/// A single extraction signal that could not be interpreted.
///
/// Each one is local to one element; the technique carries on with the rest.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// `application/ld+json` block is not valid JSON
    #[error("malformed JSON-LD: {0}")]
    MalformedJsonLd(#[from] serde_json::Error),

    /// Percent-encoded value could not be decoded
    #[error("malformed URI encoding in {value:?}")]
    MalformedUri { value: String },

    /// Cloudflare-obfuscated address is not valid hex or not UTF-8
    #[error("invalid cfemail payload {encoded:?}: {reason}")]
    InvalidCfEmail { encoded: String, reason: String },
}

/// Failures reported by external collaborators (renderer, DNS, search, directory).
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Request could not be sent or its body read
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Provider answered with an unexpected shape
    #[error("parse error: {0}")]
    Parse(String),

    /// Call exceeded its time budget
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Call-rate quota exhausted; retry no sooner than `retry_after`
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// DNS resolution failed for a reason other than "no records"
    #[error("DNS error: {0}")]
    Dns(String),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(e: reqwest::Error) -> Self {
        CollaboratorError::Http(Box::new(e))
    }
}

impl From<apify_client::ApifyError> for CollaboratorError {
    fn from(e: apify_client::ApifyError) -> Self {
        match e {
            apify_client::ApifyError::Api { status, message } => {
                CollaboratorError::Api { status, message }
            }
            apify_client::ApifyError::Timeout(budget) => CollaboratorError::Timeout(budget),
            other => CollaboratorError::Http(Box::new(other)),
        }
    }
}

/// Failure of one discovery strategy. Caught at the orchestrator boundary.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The LLM collaborator refused the call for quota reasons
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Any other collaborator failure
    #[error(transparent)]
    Collaborator(CollaboratorError),
}

impl From<CollaboratorError> for StrategyError {
    fn from(e: CollaboratorError) -> Self {
        match e {
            CollaboratorError::RateLimited { retry_after } => {
                StrategyError::RateLimited { retry_after }
            }
            other => StrategyError::Collaborator(other),
        }
    }
}

/// The only condition `discover` surfaces instead of folding into the result.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Business-data enrichment hit the LLM rate limit. `partial` holds
    /// everything gathered before the limit was hit.
    #[error("business-data enrichment rate limited, retry after {retry_after:?}")]
    RateLimited {
        retry_after: Duration,
        partial: Box<DiscoveryResult>,
    },
}

/// Missing or invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable present but unusable
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for collaborator calls.
pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;

/// Result type alias for strategies.
pub type StrategyRunResult<T> = std::result::Result<T, StrategyError>;
