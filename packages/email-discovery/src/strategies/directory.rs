//! Paid contact-directory lookup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{Strategy, StrategyContext, StrategyOutput};
use crate::error::StrategyRunResult;
use crate::traits::directory::{DirectoryContact, DirectoryLookup};
use crate::types::{Confidence, EmailCandidate, EmailSource, StrategyName};

/// Provider confidence above which a directory hit counts as high.
pub const HIGH_CONFIDENCE_THRESHOLD: u8 = 80;

/// Runs only when a directory collaborator is configured.
pub struct DirectoryStrategy {
    directory: Option<Arc<dyn DirectoryLookup>>,
}

impl DirectoryStrategy {
    pub fn new(directory: Option<Arc<dyn DirectoryLookup>>) -> Self {
        Self { directory }
    }
}

fn to_candidate(contact: &DirectoryContact) -> Option<EmailCandidate> {
    let confidence = if contact.confidence > HIGH_CONFIDENCE_THRESHOLD {
        Confidence::High
    } else {
        Confidence::Medium
    };
    let candidate = EmailCandidate::new(&contact.value, EmailSource::DirectoryApi, confidence);
    if candidate.is_none() {
        debug!(value = %contact.value, "Dropping malformed directory address");
    }
    candidate
}

#[async_trait]
impl Strategy for DirectoryStrategy {
    fn name(&self) -> StrategyName {
        StrategyName::HunterApi
    }

    fn is_applicable(&self, ctx: &StrategyContext<'_>) -> bool {
        self.directory.is_some() && ctx.domain().is_some()
    }

    async fn run(&self, ctx: &StrategyContext<'_>) -> StrategyRunResult<StrategyOutput> {
        let (Some(directory), Some(domain)) = (&self.directory, ctx.domain()) else {
            return Ok(StrategyOutput::default());
        };

        let contacts = directory.domain_search(domain).await?;
        Ok(StrategyOutput::candidates(
            contacts.iter().filter_map(to_candidate).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDirectory;
    use crate::types::DiscoveryInput;

    #[tokio::test]
    async fn test_maps_provider_confidence() {
        let directory = MockDirectory::new().with_contacts(
            "acme.com",
            vec![
                DirectoryContact::new("Jane@Acme.com", 81),
                DirectoryContact::new("info@acme.com", 80),
                DirectoryContact::new("not an email", 99),
            ],
        );
        let strategy = DirectoryStrategy::new(Some(Arc::new(directory)));
        let input = DiscoveryInput::new("Acme", "acme.com");
        let output = strategy.run(&StrategyContext::new(&input)).await.unwrap();

        let got: Vec<_> = output
            .candidates
            .iter()
            .map(|c| (c.email.as_str(), c.confidence, c.source))
            .collect();
        assert_eq!(
            got,
            vec![
                ("jane@acme.com", Confidence::High, EmailSource::DirectoryApi),
                ("info@acme.com", Confidence::Medium, EmailSource::DirectoryApi),
            ]
        );
    }

    #[test]
    fn test_gated_on_collaborator_and_domain() {
        let input = DiscoveryInput::new("Acme", "acme.com");
        let ctx = StrategyContext::new(&input);
        assert!(!DirectoryStrategy::new(None).is_applicable(&ctx));

        let with_directory = DirectoryStrategy::new(Some(Arc::new(MockDirectory::new())));
        assert!(with_directory.is_applicable(&ctx));

        let no_site = DiscoveryInput::new("Acme", "");
        assert!(!with_directory.is_applicable(&StrategyContext::new(&no_site)));
    }
}
