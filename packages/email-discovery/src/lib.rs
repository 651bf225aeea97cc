//! Business Contact Email Discovery
//!
//! Finds a best-guess contact address for a business from its name and
//! (optionally) its website. Strategies run in a fixed order, each one more
//! speculative or more expensive than the last:
//!
//! 1. `website_scrape` - homepage, contact page, then common paths
//! 2. `pattern_mx` - `info@`, `contact@`... guesses when the domain accepts mail
//! 3. `gemini_business_data` - owner and services enrichment, never addresses
//! 4. `hunter_api` - third-party contact directory
//!
//! A high-confidence hit from the website stops the run. Everything else is
//! pooled and ranked by [`score::select_best`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use email_discovery::{DiscoveryInput, EmailDiscovery};
//!
//! let discovery = EmailDiscovery::from_env()?;
//! let result = discovery
//!     .discover(&DiscoveryInput::new("Acme Plumbing", "acme.com"))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`normalize`] - URL and domain normalization
//! - [`fetch`] - Plain fetching with a headless fallback for challenge pages
//! - [`extract`] - The nine extraction techniques and their filters
//! - [`contact_page`] - Contact/about link discovery
//! - [`strategies`] - The ordered discovery strategies
//! - [`score`] - Candidate ranking
//! - [`providers`] - Production collaborators (Apify, DNS, Gemini, Hunter)
//! - [`testing`] - Mock collaborators for testing

pub mod cache;
pub mod config;
pub mod contact_page;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod orchestrator;
pub mod providers;
pub mod score;
pub mod security;
pub mod strategies;
pub mod testing;
pub mod traits;
pub mod types;

pub use config::DiscoveryConfig;
pub use error::{
    CollaboratorError, ConfigError, DiscoveryError, ExtractionError, FetchError, StrategyError,
};
pub use orchestrator::{EmailDiscovery, EmailDiscoveryBuilder};
pub use score::ScoringWeights;
pub use security::{ExposeSecret, ProviderCredentials, SecretString};
pub use traits::{
    directory::{DirectoryContact, DirectoryLookup},
    fetcher::{FetchedPage, PageFetcher},
    mx::MxResolver,
    renderer::PageRenderer,
    search::{BusinessSearch, SearchText},
};
pub use types::{
    BusinessData, Confidence, DiscoveryInput, DiscoveryResult, EmailCandidate, EmailSource,
    StrategyName, StrategyOutcome, StrategyResult,
};
