//! Run one discovery against the live network.
//!
//! ```text
//! RUST_LOG=email_discovery=debug cargo run --example discover -- "Acme Plumbing" acme.com [--business-data]
//! ```
//!
//! Provider keys are read from `.env` / the environment: `APIFY_API_TOKEN`,
//! `GEMINI_API_KEY`, `HUNTER_API_KEY`. Missing keys skip their strategies.

use std::process::ExitCode;

use email_discovery::{DiscoveryError, DiscoveryInput, EmailDiscovery};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("email_discovery=info")),
        )
        .init();

    let (flags, mut positional): (Vec<String>, Vec<String>) =
        std::env::args().skip(1).partition(|a| a.starts_with("--"));
    if positional.is_empty() {
        eprintln!("usage: discover <business name> [website] [--business-data]");
        return ExitCode::from(2);
    }
    let name = positional.remove(0);
    let website = positional.into_iter().next().unwrap_or_default();

    let mut input = DiscoveryInput::new(name, website);
    if flags.iter().any(|f| f == "--business-data") {
        input = input.with_business_data();
    }

    let discovery = match EmailDiscovery::from_env() {
        Ok(discovery) => discovery,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (result, code) = match discovery.discover(&input).await {
        Ok(result) => (result, ExitCode::SUCCESS),
        Err(DiscoveryError::RateLimited {
            retry_after,
            partial,
        }) => {
            eprintln!("rate limited, retry in {}s", retry_after.as_secs());
            (*partial, ExitCode::FAILURE)
        }
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize result: {e}"),
    }
    code
}
