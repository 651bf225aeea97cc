//! Per-strategy execution records and the run's output.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BusinessData, EmailCandidate};

/// The strategies the orchestrator knows about, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyName {
    WebsiteScrape,
    PatternMx,
    GeminiBusinessData,
    HunterApi,
}

impl StrategyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyName::WebsiteScrape => "website_scrape",
            StrategyName::PatternMx => "pattern_mx",
            StrategyName::GeminiBusinessData => "gemini_business_data",
            StrategyName::HunterApi => "hunter_api",
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyOutcome {
    Found,
    NotFound,
    Error,
    Skipped,
}

/// What happened to one strategy during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResult {
    pub name: StrategyName,
    pub attempted: bool,
    pub duration_ms: u64,
    pub outcome: StrategyOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StrategyResult {
    /// Record for a strategy that did not run.
    pub fn skipped(name: StrategyName) -> Self {
        Self {
            name,
            attempted: false,
            duration_ms: 0,
            outcome: StrategyOutcome::Skipped,
            error: None,
        }
    }

    /// Record for a strategy that ran to completion.
    pub fn completed(name: StrategyName, duration_ms: u64, found: bool) -> Self {
        Self {
            name,
            attempted: true,
            duration_ms,
            outcome: if found {
                StrategyOutcome::Found
            } else {
                StrategyOutcome::NotFound
            },
            error: None,
        }
    }

    /// Record for a strategy that failed.
    pub fn failed(name: StrategyName, duration_ms: u64, error: impl Into<String>) -> Self {
        Self {
            name,
            attempted: true,
            duration_ms,
            outcome: StrategyOutcome::Error,
            error: Some(error.into()),
        }
    }
}

/// Output of one discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    /// Resolved winner, or empty when nothing was found.
    pub email: String,
    /// Every candidate seen, losers included.
    pub all_candidates: Vec<EmailCandidate>,
    pub strategies: Vec<StrategyResult>,
    pub total_duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_data: Option<BusinessData>,
}

impl DiscoveryResult {
    /// Whether a winner was resolved.
    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }

    /// Look up the record for one strategy.
    pub fn strategy(&self, name: StrategyName) -> Option<&StrategyResult> {
        self.strategies.iter().find(|s| s.name == name)
    }
}
