//! Email sightings with provenance.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::extract::filters::{is_valid_email, normalize_email};

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailSource {
    WebsiteScrape,
    PatternGuess,
    DirectoryApi,
}

impl EmailSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailSource::WebsiteScrape => "website_scrape",
            EmailSource::PatternGuess => "pattern_guess",
            EmailSource::DirectoryApi => "directory_api",
        }
    }
}

impl fmt::Display for EmailSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal strength of the technique that produced a candidate.
///
/// Variant order matters: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unverified email sighting.
///
/// The address is always lowercase and shaped like `local@domain.tld`;
/// [`EmailCandidate::new`] refuses anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailCandidate {
    pub email: String,
    pub source: EmailSource,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_page: Option<String>,
}

impl EmailCandidate {
    /// Build a candidate, normalizing the address. Returns `None` when the
    /// address is not email-shaped.
    pub fn new(email: &str, source: EmailSource, confidence: Confidence) -> Option<Self> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return None;
        }
        Some(Self {
            email,
            source,
            confidence,
            origin_page: None,
        })
    }

    /// Record the page the address was seen on.
    pub fn with_origin_page(mut self, url: impl Into<String>) -> Self {
        self.origin_page = Some(url.into());
        self
    }

    /// Part before the `@`.
    pub fn local_part(&self) -> &str {
        self.email.split('@').next().unwrap_or_default()
    }

    /// Part after the `@`.
    pub fn domain(&self) -> &str {
        self.email.rsplit('@').next().unwrap_or_default()
    }
}
