//! Discovery strategies.
//!
//! Each strategy is one self-contained way of finding candidates. The
//! orchestrator runs them in a fixed order through [`run_strategy`], which
//! owns timing, precondition gating and error capture so that individual
//! strategies only describe the work itself.

mod business_data;
mod directory;
mod pattern;
mod website;

pub use business_data::{build_prompt, parse_business_data, BusinessDataStrategy};
pub use directory::DirectoryStrategy;
pub use pattern::PatternMxStrategy;
pub use website::WebsiteScrapeStrategy;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{StrategyError, StrategyRunResult};
use crate::normalize::{extract_domain, normalize_url};
use crate::types::{BusinessData, DiscoveryInput, EmailCandidate, StrategyName, StrategyResult};

/// Per-run facts every strategy can read.
#[derive(Debug, Clone)]
pub struct StrategyContext<'a> {
    pub input: &'a DiscoveryInput,
    /// Normalized homepage URL, when a website was given.
    pub website: Option<String>,
    /// Bare domain of the website; empty when unknown.
    pub domain: String,
}

impl<'a> StrategyContext<'a> {
    pub fn new(input: &'a DiscoveryInput) -> Self {
        let website = input.website().map(normalize_url);
        let domain = website.as_deref().map(extract_domain).unwrap_or_default();
        Self {
            input,
            website,
            domain,
        }
    }

    /// Domain, if one was resolved.
    pub fn domain(&self) -> Option<&str> {
        Some(self.domain.as_str()).filter(|d| !d.is_empty())
    }
}

/// What a successful strategy produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyOutput {
    pub candidates: Vec<EmailCandidate>,
    pub business_data: Option<BusinessData>,
}

impl StrategyOutput {
    pub fn candidates(candidates: Vec<EmailCandidate>) -> Self {
        Self {
            candidates,
            business_data: None,
        }
    }

    /// Whether anything worth reporting came back.
    pub fn found(&self) -> bool {
        !self.candidates.is_empty() || self.business_data.as_ref().is_some_and(|b| !b.is_empty())
    }
}

/// One way of discovering candidates.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> StrategyName;

    /// Whether the preconditions for running hold. `false` records a skip.
    fn is_applicable(&self, ctx: &StrategyContext<'_>) -> bool;

    async fn run(&self, ctx: &StrategyContext<'_>) -> StrategyRunResult<StrategyOutput>;

    /// Whether a high-confidence candidate from this strategy ends the run.
    fn exits_early_on_high(&self) -> bool {
        false
    }
}

/// A strategy's record plus whatever it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyRun {
    pub result: StrategyResult,
    pub output: StrategyOutput,
    /// Set when the strategy failed because a collaborator quota ran out.
    pub rate_limited: Option<Duration>,
}

/// Run one strategy with gating, timing and error capture.
pub async fn run_strategy(strategy: &dyn Strategy, ctx: &StrategyContext<'_>) -> StrategyRun {
    let name = strategy.name();
    if !strategy.is_applicable(ctx) {
        info!(strategy = %name, "Strategy skipped: precondition not met");
        return StrategyRun {
            result: StrategyResult::skipped(name),
            output: StrategyOutput::default(),
            rate_limited: None,
        };
    }

    info!(strategy = %name, "Strategy starting");
    let start = Instant::now();
    let outcome = strategy.run(ctx).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(output) => {
            info!(
                strategy = %name,
                duration_ms,
                candidates = output.candidates.len(),
                "Strategy finished"
            );
            StrategyRun {
                result: StrategyResult::completed(name, duration_ms, output.found()),
                output,
                rate_limited: None,
            }
        }
        Err(e) => {
            warn!(strategy = %name, duration_ms, error = %e, "Strategy failed");
            let rate_limited = match &e {
                StrategyError::RateLimited { retry_after } => Some(*retry_after),
                StrategyError::Collaborator(_) => None,
            };
            StrategyRun {
                result: StrategyResult::failed(name, duration_ms, e.to_string()),
                output: StrategyOutput::default(),
                rate_limited,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollaboratorError;
    use crate::types::{Confidence, EmailSource, StrategyOutcome};

    struct Fixed(StrategyRunResult<StrategyOutput>, bool);

    #[async_trait]
    impl Strategy for Fixed {
        fn name(&self) -> StrategyName {
            StrategyName::HunterApi
        }

        fn is_applicable(&self, _ctx: &StrategyContext<'_>) -> bool {
            self.1
        }

        async fn run(&self, _ctx: &StrategyContext<'_>) -> StrategyRunResult<StrategyOutput> {
            match &self.0 {
                Ok(output) => Ok(output.clone()),
                Err(StrategyError::RateLimited { retry_after }) => Err(StrategyError::RateLimited {
                    retry_after: *retry_after,
                }),
                Err(StrategyError::Collaborator(_)) => Err(StrategyError::Collaborator(
                    CollaboratorError::Parse("bad payload".into()),
                )),
            }
        }
    }

    #[test]
    fn test_context_normalizes_website() {
        let input = DiscoveryInput::new("Acme", "www.Acme.com/");
        let ctx = StrategyContext::new(&input);
        assert_eq!(ctx.website.as_deref(), Some("https://www.Acme.com"));
        assert_eq!(ctx.domain(), Some("acme.com"));

        let input = DiscoveryInput::new("Acme", "  ");
        let ctx = StrategyContext::new(&input);
        assert_eq!(ctx.website, None);
        assert_eq!(ctx.domain(), None);
    }

    #[tokio::test]
    async fn test_skipped_when_not_applicable() {
        let input = DiscoveryInput::new("Acme", "acme.com");
        let ctx = StrategyContext::new(&input);
        let run = run_strategy(&Fixed(Ok(StrategyOutput::default()), false), &ctx).await;
        assert_eq!(run.result, StrategyResult::skipped(StrategyName::HunterApi));
    }

    #[tokio::test]
    async fn test_found_and_not_found() {
        let input = DiscoveryInput::new("Acme", "acme.com");
        let ctx = StrategyContext::new(&input);

        let candidate =
            EmailCandidate::new("jane@acme.com", EmailSource::DirectoryApi, Confidence::High)
                .unwrap();
        let run = run_strategy(
            &Fixed(Ok(StrategyOutput::candidates(vec![candidate])), true),
            &ctx,
        )
        .await;
        assert!(run.result.attempted);
        assert_eq!(run.result.outcome, StrategyOutcome::Found);
        assert_eq!(run.output.candidates.len(), 1);

        let run = run_strategy(&Fixed(Ok(StrategyOutput::default()), true), &ctx).await;
        assert_eq!(run.result.outcome, StrategyOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_errors_are_captured() {
        let input = DiscoveryInput::new("Acme", "acme.com");
        let ctx = StrategyContext::new(&input);

        let failing = Fixed(
            Err(StrategyError::Collaborator(CollaboratorError::Parse(String::new()))),
            true,
        );
        let run = run_strategy(&failing, &ctx).await;
        assert_eq!(run.result.outcome, StrategyOutcome::Error);
        assert_eq!(run.result.error.as_deref(), Some("parse error: bad payload"));
        assert_eq!(run.rate_limited, None);

        let limited = Fixed(
            Err(StrategyError::RateLimited {
                retry_after: Duration::from_secs(30),
            }),
            true,
        );
        let run = run_strategy(&limited, &ctx).await;
        assert_eq!(run.result.outcome, StrategyOutcome::Error);
        assert_eq!(run.rate_limited, Some(Duration::from_secs(30)));
    }
}
