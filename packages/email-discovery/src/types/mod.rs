pub mod business;
pub mod candidate;
pub mod input;
pub mod result;

pub use business::BusinessData;
pub use candidate::{Confidence, EmailCandidate, EmailSource};
pub use input::DiscoveryInput;
pub use result::{DiscoveryResult, StrategyName, StrategyOutcome, StrategyResult};
