//! Generic-mailbox guesses for domains that accept mail.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{Strategy, StrategyContext, StrategyOutput};
use crate::error::StrategyRunResult;
use crate::traits::mx::MxResolver;
use crate::types::{Confidence, EmailCandidate, EmailSource, StrategyName};

/// Emits one low-confidence `prefix@domain` guess per prefix when the domain
/// has MX records. Guesses are never corroborated by content.
pub struct PatternMxStrategy {
    resolver: Arc<dyn MxResolver>,
    prefixes: Vec<String>,
}

impl PatternMxStrategy {
    pub fn new(resolver: Arc<dyn MxResolver>, prefixes: Vec<String>) -> Self {
        Self { resolver, prefixes }
    }
}

#[async_trait]
impl Strategy for PatternMxStrategy {
    fn name(&self) -> StrategyName {
        StrategyName::PatternMx
    }

    fn is_applicable(&self, ctx: &StrategyContext<'_>) -> bool {
        ctx.domain().is_some()
    }

    async fn run(&self, ctx: &StrategyContext<'_>) -> StrategyRunResult<StrategyOutput> {
        let Some(domain) = ctx.domain() else {
            return Ok(StrategyOutput::default());
        };

        if !self.resolver.has_mx(domain).await? {
            debug!(domain, "Domain has no MX records, no guesses");
            return Ok(StrategyOutput::default());
        }

        let guesses = self
            .prefixes
            .iter()
            .filter_map(|prefix| {
                EmailCandidate::new(
                    &format!("{prefix}@{domain}"),
                    EmailSource::PatternGuess,
                    Confidence::Low,
                )
            })
            .collect();
        Ok(StrategyOutput::candidates(guesses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PATTERN_PREFIXES;
    use crate::error::{CollaboratorError, StrategyError};
    use crate::testing::MockMxResolver;
    use crate::types::DiscoveryInput;

    fn strategy(resolver: MockMxResolver) -> PatternMxStrategy {
        PatternMxStrategy::new(
            Arc::new(resolver),
            PATTERN_PREFIXES.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn test_guesses_when_mx_present() {
        let resolver = MockMxResolver::new().with_mx("acme.com", true);
        let input = DiscoveryInput::new("Acme", "https://www.acme.com");
        let output = strategy(resolver.clone())
            .run(&StrategyContext::new(&input))
            .await
            .unwrap();

        let emails: Vec<_> = output.candidates.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(
            emails,
            vec![
                "info@acme.com",
                "contact@acme.com",
                "hello@acme.com",
                "office@acme.com",
                "admin@acme.com",
                "support@acme.com",
                "sales@acme.com",
            ]
        );
        assert!(output.candidates.iter().all(|c| c.source == EmailSource::PatternGuess
            && c.confidence == Confidence::Low
            && c.origin_page.is_none()));
        assert_eq!(resolver.calls(), vec!["acme.com".to_string()]);
    }

    #[tokio::test]
    async fn test_no_mx_means_no_guesses() {
        let input = DiscoveryInput::new("Acme", "acme.com");
        let output = strategy(MockMxResolver::new())
            .run(&StrategyContext::new(&input))
            .await
            .unwrap();
        assert!(output.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_dns_failure_is_an_error() {
        let input = DiscoveryInput::new("Acme", "acme.com");
        let err = strategy(MockMxResolver::new().with_failure("SERVFAIL"))
            .run(&StrategyContext::new(&input))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StrategyError::Collaborator(CollaboratorError::Dns(_))
        ));
    }

    #[test]
    fn test_needs_domain() {
        let input = DiscoveryInput::new("Acme", "");
        let s = strategy(MockMxResolver::new());
        assert!(!s.is_applicable(&StrategyContext::new(&input)));
        assert!(!s.exits_early_on_high());
    }
}
