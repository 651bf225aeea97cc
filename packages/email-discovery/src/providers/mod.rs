//! Production collaborators and the wrappers that sit in front of them.

mod apify;
mod cached;
mod dns;
mod gemini;
mod hunter;
mod rate_limited;

pub use apify::ApifyRenderer;
pub use cached::CachedDirectory;
pub use dns::DnsMxResolver;
pub use gemini::{GeminiClient, GEMINI_API_URL};
pub use hunter::{HunterClient, HUNTER_API_URL};
pub use rate_limited::RateLimitedSearch;
