//! Engine tuning knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fetch::{DEFAULT_FETCH_TIMEOUT, DEFAULT_RENDER_TIMEOUT};
use crate::score::ScoringWeights;

/// Paths probed when neither the homepage nor its contact page had an address.
pub const COMMON_CONTACT_PATHS: &[&str] = &[
    "/contact",
    "/contact-us",
    "/about",
    "/about-us",
    "/reach-us",
    "/get-in-touch",
    "/connect",
    "/support",
    "/info",
];

/// Mailboxes guessed when a domain accepts mail.
pub const PATTERN_PREFIXES: &[&str] = &[
    "info", "contact", "hello", "office", "admin", "support", "sales",
];

/// Runtime configuration for [`EmailDiscovery`](crate::EmailDiscovery).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryConfig {
    /// Budget for one plain page fetch
    pub fetch_timeout: Duration,
    /// Budget for one headless render
    pub render_timeout: Duration,
    pub common_contact_paths: Vec<String>,
    pub pattern_prefixes: Vec<String>,
    pub scoring: ScoringWeights,
    /// How long directory answers are reused per domain
    pub directory_cache_ttl: Duration,
    /// Grounded-search calls allowed per minute
    pub search_requests_per_minute: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            common_contact_paths: COMMON_CONTACT_PATHS.iter().map(|p| p.to_string()).collect(),
            pattern_prefixes: PATTERN_PREFIXES.iter().map(|p| p.to_string()).collect(),
            scoring: ScoringWeights::default(),
            directory_cache_ttl: Duration::from_secs(24 * 60 * 60),
            search_requests_per_minute: 10,
        }
    }
}

impl DiscoveryConfig {
    /// Defaults, overridden by `EMAIL_DISCOVERY_*` environment variables.
    ///
    /// - `EMAIL_DISCOVERY_FETCH_TIMEOUT_MS`
    /// - `EMAIL_DISCOVERY_RENDER_TIMEOUT_MS`
    /// - `EMAIL_DISCOVERY_DIRECTORY_CACHE_TTL_SECS`
    /// - `EMAIL_DISCOVERY_SEARCH_RPM`
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ms) = parse_number(&lookup, "EMAIL_DISCOVERY_FETCH_TIMEOUT_MS")? {
            config.fetch_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_number(&lookup, "EMAIL_DISCOVERY_RENDER_TIMEOUT_MS")? {
            config.render_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_number(&lookup, "EMAIL_DISCOVERY_DIRECTORY_CACHE_TTL_SECS")? {
            config.directory_cache_ttl = Duration::from_secs(secs);
        }
        if let Some(rpm) = parse_number(&lookup, "EMAIL_DISCOVERY_SEARCH_RPM")? {
            config.search_requests_per_minute =
                u32::try_from(rpm).map_err(|_| ConfigError::Invalid {
                    key: "EMAIL_DISCOVERY_SEARCH_RPM".to_string(),
                    reason: format!("{rpm} is out of range"),
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout.is_zero() {
            return Err(invalid("fetch_timeout", "must be greater than zero"));
        }
        if self.render_timeout.is_zero() {
            return Err(invalid("render_timeout", "must be greater than zero"));
        }
        if self.search_requests_per_minute == 0 {
            return Err(invalid(
                "search_requests_per_minute",
                "must be greater than zero",
            ));
        }
        if let Some(bad) = self.common_contact_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(invalid(
                "common_contact_paths",
                &format!("{bad:?} must start with '/'"),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| invalid(key, &format!("{raw:?} is not a number: {e}"))),
    }
}
