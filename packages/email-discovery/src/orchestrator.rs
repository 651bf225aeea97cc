//! The discovery entry point.
//!
//! [`EmailDiscovery`] owns the ordered strategy list and resolves the winner.
//! Collaborators are wired once, through [`EmailDiscovery::builder`] or
//! [`EmailDiscovery::from_env`], and the engine is then shared freely: it
//! holds no per-run state.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::DiscoveryConfig;
use crate::error::{ConfigError, DiscoveryError};
use crate::fetch::{Fetcher, HttpFetcher, PageFetcher};
use crate::providers::{
    ApifyRenderer, CachedDirectory, DnsMxResolver, GeminiClient, HunterClient, RateLimitedSearch,
};
use crate::score::select_best;
use crate::security::ProviderCredentials;
use crate::strategies::{
    run_strategy, BusinessDataStrategy, DirectoryStrategy, PatternMxStrategy, Strategy,
    StrategyContext, WebsiteScrapeStrategy,
};
use crate::traits::directory::DirectoryLookup;
use crate::traits::mx::MxResolver;
use crate::traits::renderer::PageRenderer;
use crate::traits::search::BusinessSearch;
use crate::types::{
    Confidence, DiscoveryInput, DiscoveryResult, EmailCandidate, StrategyName, StrategyResult,
};

/// Finds a best-guess contact address for one business at a time.
///
/// # Example
///
/// ```rust,ignore
/// let discovery = EmailDiscovery::from_env()?;
/// let input = DiscoveryInput::new("Acme Plumbing", "acme.com");
/// let result = discovery.discover(&input).await?;
/// println!("{}", result.email);
/// ```
pub struct EmailDiscovery {
    strategies: Vec<Box<dyn Strategy>>,
    config: DiscoveryConfig,
}

impl EmailDiscovery {
    pub fn builder() -> EmailDiscoveryBuilder {
        EmailDiscoveryBuilder::default()
    }

    /// Production collaborators from `.env` / the process environment.
    ///
    /// Missing provider keys leave their strategies permanently skipped.
    pub fn from_env() -> Result<Self, ConfigError> {
        let credentials = ProviderCredentials::from_env();
        let config = DiscoveryConfig::from_env()?;
        Self::from_credentials(&credentials, config)
    }

    /// Production collaborators for whichever keys are present.
    pub fn from_credentials(
        credentials: &ProviderCredentials,
        config: DiscoveryConfig,
    ) -> Result<Self, ConfigError> {
        let render_timeout = config.render_timeout;
        let mut builder = Self::builder().with_config(config);

        if let Some(token) = &credentials.apify_api_token {
            builder = builder.with_renderer(ApifyRenderer::new(token, render_timeout));
        }
        if let Some(key) = &credentials.gemini_api_key {
            builder = builder.with_business_search(GeminiClient::new(
                key.clone(),
                credentials.gemini_model.clone(),
            ));
        }
        if let Some(key) = &credentials.hunter_api_key {
            builder = builder.with_directory(HunterClient::new(key.clone()));
        }

        info!(
            renderer = credentials.apify_api_token.is_some(),
            business_search = credentials.gemini_api_key.is_some(),
            directory = credentials.hunter_api_key.is_some(),
            "Email discovery configured"
        );
        builder.build()
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Strategy names in execution order.
    pub fn strategy_names(&self) -> Vec<StrategyName> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run every strategy in order and resolve the best address.
    ///
    /// Strategy failures are recorded in the result, never returned. The
    /// one exception is a search quota running out, which comes back as
    /// [`DiscoveryError::RateLimited`] carrying everything gathered so far.
    pub async fn discover(&self, input: &DiscoveryInput) -> Result<DiscoveryResult, DiscoveryError> {
        let start = Instant::now();
        let ctx = StrategyContext::new(input);
        info!(
            business = %input.business_name,
            website = ctx.website.as_deref().unwrap_or_default(),
            "Starting email discovery"
        );

        let mut result = DiscoveryResult::default();
        let mut early_winner: Option<String> = None;
        let mut rate_limited = None;

        let mut pending = self.strategies.iter();
        for strategy in pending.by_ref() {
            let run = run_strategy(strategy.as_ref(), &ctx).await;
            let found_high = run
                .output
                .candidates
                .iter()
                .any(|c| c.confidence == Confidence::High);

            result.strategies.push(run.result);
            result.all_candidates.extend(run.output.candidates);
            if let Some(data) = run.output.business_data {
                result.business_data = Some(data);
            }

            if let Some(retry_after) = run.rate_limited {
                rate_limited = Some(retry_after);
                break;
            }
            if found_high && strategy.exits_early_on_high() {
                let high = high_confidence(&result.all_candidates);
                let winner = select_best(&high, ctx.domain(), &self.config.scoring);
                info!(strategy = %strategy.name(), email = %winner, "High-confidence hit, stopping early");
                early_winner = Some(winner);
                break;
            }
        }
        for strategy in pending {
            result.strategies.push(StrategyResult::skipped(strategy.name()));
        }

        result.email = early_winner.unwrap_or_else(|| {
            select_best(&result.all_candidates, ctx.domain(), &self.config.scoring)
        });
        result.total_duration_ms = start.elapsed().as_millis() as u64;

        if let Some(retry_after) = rate_limited {
            warn!(
                retry_after_ms = retry_after.as_millis() as u64,
                candidates = result.all_candidates.len(),
                "Discovery interrupted by search rate limit"
            );
            return Err(DiscoveryError::RateLimited {
                retry_after,
                partial: Box::new(result),
            });
        }

        info!(
            email = %result.email,
            candidates = result.all_candidates.len(),
            duration_ms = result.total_duration_ms,
            "Email discovery finished"
        );
        Ok(result)
    }
}

fn high_confidence(candidates: &[EmailCandidate]) -> Vec<EmailCandidate> {
    candidates
        .iter()
        .filter(|c| c.confidence == Confidence::High)
        .cloned()
        .collect()
}

/// Wires collaborators into an [`EmailDiscovery`].
///
/// Unset plain fetcher and MX resolver default to the network-backed
/// implementations. Unset renderer, search and directory stay unset and
/// their strategies (or the challenge fallback) are skipped.
#[derive(Default)]
pub struct EmailDiscoveryBuilder {
    fetcher: Option<Arc<dyn PageFetcher>>,
    renderer: Option<Arc<dyn PageRenderer>>,
    mx_resolver: Option<Arc<dyn MxResolver>>,
    search: Option<Arc<dyn BusinessSearch>>,
    directory: Option<Arc<dyn DirectoryLookup>>,
    config: Option<DiscoveryConfig>,
}

impl EmailDiscoveryBuilder {
    pub fn with_fetcher(mut self, fetcher: impl PageFetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Headless fallback for challenge pages.
    pub fn with_renderer(mut self, renderer: impl PageRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn with_mx_resolver(mut self, resolver: impl MxResolver + 'static) -> Self {
        self.mx_resolver = Some(Arc::new(resolver));
        self
    }

    /// Grounded search. Wrapped in a per-minute quota at build time.
    pub fn with_business_search(mut self, search: impl BusinessSearch + 'static) -> Self {
        self.search = Some(Arc::new(search));
        self
    }

    /// Contact directory. Wrapped in a per-domain cache at build time.
    pub fn with_directory(mut self, directory: impl DirectoryLookup + 'static) -> Self {
        self.directory = Some(Arc::new(directory));
        self
    }

    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<EmailDiscovery, ConfigError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let plain: Arc<dyn PageFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new()?),
        };
        let mut fetcher = Fetcher::new(plain)
            .with_fetch_timeout(config.fetch_timeout)
            .with_render_timeout(config.render_timeout);
        if let Some(renderer) = self.renderer {
            fetcher = fetcher.with_renderer(renderer);
        }

        let mx_resolver = self
            .mx_resolver
            .unwrap_or_else(|| Arc::new(DnsMxResolver::new()));

        let search = match self.search {
            Some(search) => {
                let rpm = NonZeroU32::new(config.search_requests_per_minute).ok_or_else(|| {
                    ConfigError::Invalid {
                        key: "search_requests_per_minute".to_string(),
                        reason: "must be greater than zero".to_string(),
                    }
                })?;
                Some(Arc::new(RateLimitedSearch::per_minute(search, rpm)) as Arc<dyn BusinessSearch>)
            }
            None => None,
        };

        let directory = self.directory.map(|directory| {
            Arc::new(CachedDirectory::new(directory, config.directory_cache_ttl))
                as Arc<dyn DirectoryLookup>
        });

        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(WebsiteScrapeStrategy::new(
                fetcher,
                config.common_contact_paths.clone(),
            )),
            Box::new(PatternMxStrategy::new(
                mx_resolver,
                config.pattern_prefixes.clone(),
            )),
            Box::new(BusinessDataStrategy::new(search)),
            Box::new(DirectoryStrategy::new(directory)),
        ];

        Ok(EmailDiscovery { strategies, config })
    }
}
