//! Error types for the Apify client.

use thiserror::Error;

/// Result type for Apify client operations.
pub type Result<T> = std::result::Result<T, ApifyError>;

/// Apify client errors.
#[derive(Debug, Error)]
pub enum ApifyError {
    /// Network error (connection failed, timeout, bad body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the Apify API
    #[error("Apify API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Render did not finish within its budget; the run was aborted
    #[error("Render timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Actor run finished in a terminal non-success state
    #[error("Actor run ended with status {0}")]
    RunFailed(String),
}
