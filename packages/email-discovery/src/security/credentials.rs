//! Provider API keys held in secure memory.
//!
//! Uses the `secrecy` crate so keys never show up in logs or `Debug` output.

use std::fmt;

pub use secrecy::{ExposeSecret, SecretString};

/// Default Gemini model for business-data enrichment.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Keys for the optional paid collaborators.
///
/// A missing key leaves its collaborator unset, and the strategy that needs
/// it is recorded as skipped.
#[derive(Clone)]
pub struct ProviderCredentials {
    /// Headless rendering (Apify)
    pub apify_api_token: Option<SecretString>,
    /// Grounded search (Gemini)
    pub gemini_api_key: Option<SecretString>,
    pub gemini_model: String,
    /// Contact directory (Hunter)
    pub hunter_api_key: Option<SecretString>,
}

impl Default for ProviderCredentials {
    fn default() -> Self {
        Self {
            apify_api_token: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            hunter_api_key: None,
        }
    }
}

impl ProviderCredentials {
    /// Load from the environment, reading `.env` first if present.
    ///
    /// `APIFY_API_TOKEN`, `GEMINI_API_KEY`, `GEMINI_MODEL`, `HUNTER_API_KEY`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
        };
        Self {
            apify_api_token: secret("APIFY_API_TOKEN"),
            gemini_api_key: secret("GEMINI_API_KEY"),
            gemini_model: lookup("GEMINI_MODEL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            hunter_api_key: secret("HUNTER_API_KEY"),
        }
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = |s: &Option<SecretString>| s.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ProviderCredentials")
            .field("apify_api_token", &present(&self.apify_api_token))
            .field("gemini_api_key", &present(&self.gemini_api_key))
            .field("gemini_model", &self.gemini_model)
            .field("hunter_api_key", &present(&self.hunter_api_key))
            .finish()
    }
}
