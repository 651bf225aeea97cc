//! End-to-end discovery runs through `EmailDiscovery` with mock collaborators.
//!
//! Each test wires a complete engine and checks the final address together
//! with the per-strategy records.

use std::sync::Arc;
use std::time::Duration;

use email_discovery::providers::HunterClient;
use email_discovery::testing::{
    MockBusinessSearch, MockDirectory, MockMxResolver, MockPageFetcher, MockRenderer,
};
use email_discovery::{
    Confidence, DirectoryContact, DiscoveryError, DiscoveryInput, EmailDiscovery, EmailSource,
    SecretString, StrategyName, StrategyOutcome,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUSINESS_TEXT: &str = "\
**Owner Name:** Maria Lopez
**Services:** Residential cleaning, Move-out cleaning
**Pain Points:** Scheduling, Staff turnover
**Social Media:** https://facebook.com/sparkle-mpls
";

fn outcomes(result: &email_discovery::DiscoveryResult) -> Vec<StrategyOutcome> {
    result.strategies.iter().map(|s| s.outcome).collect()
}

#[tokio::test]
async fn test_mailto_on_homepage_wins_immediately() {
    let mx = MockMxResolver::new().with_mx("acme.com", true);
    let directory = MockDirectory::new();
    let discovery = EmailDiscovery::builder()
        .with_fetcher(MockPageFetcher::new().with_page(
            "https://acme.com",
            r#"<html><body>
                <nav><a href="/contact">Contact</a></nav>
                <footer><a href="mailto:sales@acme.com">Email sales</a></footer>
            </body></html>"#,
        ))
        .with_mx_resolver(mx.clone())
        .with_directory(directory.clone())
        .build()
        .unwrap();

    let result = discovery
        .discover(&DiscoveryInput::new("Acme Supply", "acme.com"))
        .await
        .unwrap();

    assert_eq!(result.email, "sales@acme.com");
    assert_eq!(
        outcomes(&result),
        vec![
            StrategyOutcome::Found,
            StrategyOutcome::Skipped,
            StrategyOutcome::Skipped,
            StrategyOutcome::Skipped,
        ]
    );
    assert!(result.strategies[1..].iter().all(|s| !s.attempted));
    assert_eq!(mx.call_count(), 0);
    assert_eq!(directory.call_count(), 0);
}

#[tokio::test]
async fn test_no_website_with_business_data() {
    let search = MockBusinessSearch::new().with_text(BUSINESS_TEXT);
    let discovery = EmailDiscovery::builder()
        .with_fetcher(MockPageFetcher::new())
        .with_mx_resolver(MockMxResolver::new())
        .with_business_search(search.clone())
        .with_directory(MockDirectory::new())
        .build()
        .unwrap();

    let input = DiscoveryInput::new("Sparkle Cleaning", "")
        .with_location("Minneapolis, MN")
        .with_business_data();
    let result = discovery.discover(&input).await.unwrap();

    assert_eq!(result.email, "");
    assert!(result.all_candidates.is_empty());
    assert_eq!(
        outcomes(&result),
        vec![
            StrategyOutcome::Skipped,
            StrategyOutcome::Skipped,
            StrategyOutcome::Found,
            StrategyOutcome::Skipped,
        ]
    );
    assert!(result.strategy(StrategyName::GeminiBusinessData).unwrap().attempted);

    let data = result.business_data.unwrap();
    assert_eq!(data.owner_name.as_deref(), Some("Maria Lopez"));
    assert_eq!(
        data.services,
        vec!["Residential cleaning", "Move-out cleaning"]
    );
    assert_eq!(data.social_links, vec!["https://facebook.com/sparkle-mpls"]);

    let prompts = search.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Sparkle Cleaning"));
    assert!(prompts[0].contains("Minneapolis, MN"));
}

#[tokio::test]
async fn test_challenge_then_headless_recovery() {
    let fetcher = MockPageFetcher::new().with_blocked("https://shielded.com");
    let renderer = MockRenderer::new().with_html(
        "https://shielded.com",
        r#"<p>Questions? <a href="mailto:team@shielded.com">Email the team</a></p>"#,
    );
    let discovery = EmailDiscovery::builder()
        .with_fetcher(fetcher.clone())
        .with_renderer(renderer.clone())
        .with_mx_resolver(MockMxResolver::new())
        .build()
        .unwrap();

    let result = discovery
        .discover(&DiscoveryInput::new("Shielded", "https://shielded.com/"))
        .await
        .unwrap();

    assert_eq!(result.email, "team@shielded.com");
    assert_eq!(result.strategies[0].outcome, StrategyOutcome::Found);
    assert_eq!(renderer.calls(), vec!["https://shielded.com"]);
    assert_eq!(fetcher.calls(), vec!["https://shielded.com"]);
}

#[tokio::test]
async fn test_challenge_without_renderer_falls_through() {
    let discovery = EmailDiscovery::builder()
        .with_fetcher(MockPageFetcher::new().with_blocked("https://shielded.com"))
        .with_mx_resolver(MockMxResolver::new().with_mx("shielded.com", true))
        .build()
        .unwrap();

    let result = discovery
        .discover(&DiscoveryInput::new("Shielded", "shielded.com"))
        .await
        .unwrap();

    assert_eq!(result.strategies[0].outcome, StrategyOutcome::NotFound);
    assert_eq!(result.email, "info@shielded.com");
}

#[tokio::test]
async fn test_junk_only_site_proceeds_to_pattern_guess() {
    let mx = MockMxResolver::new().with_mx("site.com", true);
    let discovery = EmailDiscovery::builder()
        .with_fetcher(MockPageFetcher::new().with_page(
            "https://site.com",
            r#"<p>Do not reply: noreply@site.com</p><p>logo@2x.png</p><img src="/img/logo@2x.png">"#,
        ))
        .with_mx_resolver(mx.clone())
        .build()
        .unwrap();

    let result = discovery
        .discover(&DiscoveryInput::new("Site", "site.com"))
        .await
        .unwrap();

    assert_eq!(result.strategies[0].outcome, StrategyOutcome::NotFound);
    assert_eq!(result.strategies[1].outcome, StrategyOutcome::Found);
    assert_eq!(mx.calls(), vec!["site.com"]);
    assert!(result
        .all_candidates
        .iter()
        .all(|c| c.source == EmailSource::PatternGuess && c.confidence == Confidence::Low));
    assert!(!result.all_candidates.iter().any(|c| c.email.contains("noreply")));
    assert_eq!(result.email, "info@site.com");
}

#[tokio::test]
async fn test_contact_page_beats_pattern_guess() {
    let discovery = EmailDiscovery::builder()
        .with_fetcher(
            MockPageFetcher::new()
                .with_page(
                    "https://bakery.com",
                    r#"<a href="/about">Our story</a> <a href="/get-in-touch">Say hi</a>"#,
                )
                .with_page(
                    "https://bakery.com/get-in-touch",
                    "<p>Orders: orders [at] bakery [dot] com</p>",
                ),
        )
        .with_mx_resolver(MockMxResolver::new().with_mx("bakery.com", true))
        .build()
        .unwrap();

    let result = discovery
        .discover(&DiscoveryInput::new("Bakery", "bakery.com"))
        .await
        .unwrap();

    assert_eq!(result.email, "orders@bakery.com");
    let orders = result
        .all_candidates
        .iter()
        .find(|c| c.email == "orders@bakery.com")
        .unwrap();
    assert_eq!(orders.confidence, Confidence::Medium);
    assert_eq!(
        orders.origin_page.as_deref(),
        Some("https://bakery.com/get-in-touch")
    );
    assert_eq!(result.strategies[1].outcome, StrategyOutcome::Found);
}

#[tokio::test]
async fn test_rate_limited_enrichment_returns_partial() {
    let directory = MockDirectory::new()
        .with_contacts("acme.com", vec![DirectoryContact::new("owner@acme.com", 99)]);
    let discovery = EmailDiscovery::builder()
        .with_fetcher(
            MockPageFetcher::new().with_page("https://acme.com", "<p>jane@acme.com</p>"),
        )
        .with_mx_resolver(MockMxResolver::new())
        .with_business_search(MockBusinessSearch::new().with_rate_limit(Duration::from_secs(12)))
        .with_directory(directory.clone())
        .build()
        .unwrap();

    let err = discovery
        .discover(&DiscoveryInput::new("Acme", "acme.com").with_business_data())
        .await
        .unwrap_err();

    let DiscoveryError::RateLimited {
        retry_after,
        partial,
    } = err;
    assert_eq!(retry_after, Duration::from_secs(12));
    assert_eq!(partial.email, "jane@acme.com");
    assert_eq!(
        outcomes(&partial),
        vec![
            StrategyOutcome::Found,
            StrategyOutcome::NotFound,
            StrategyOutcome::Error,
            StrategyOutcome::Skipped,
        ]
    );
    assert_eq!(directory.call_count(), 0);
}

#[tokio::test]
async fn test_enrichment_failure_is_recorded_not_raised() {
    let discovery = EmailDiscovery::builder()
        .with_fetcher(MockPageFetcher::new())
        .with_mx_resolver(MockMxResolver::new().with_failure("SERVFAIL"))
        .with_business_search(MockBusinessSearch::new().with_failure("model overloaded"))
        .build()
        .unwrap();

    let result = discovery
        .discover(&DiscoveryInput::new("Acme", "acme.com").with_business_data())
        .await
        .unwrap();

    assert_eq!(result.email, "");
    let pattern = result.strategy(StrategyName::PatternMx).unwrap();
    assert_eq!(pattern.outcome, StrategyOutcome::Error);
    assert!(pattern.error.as_deref().unwrap().contains("SERVFAIL"));
    let enrichment = result.strategy(StrategyName::GeminiBusinessData).unwrap();
    assert_eq!(enrichment.outcome, StrategyOutcome::Error);
    assert!(enrichment.error.as_deref().unwrap().contains("model overloaded"));
}

#[tokio::test]
async fn test_hunter_directory_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/domain-search"))
        .and(query_param("domain", "acme.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "emails": [
                    {"value": "info@acme.com", "confidence": 70},
                    {"value": "jane.doe@acme.com", "confidence": 92},
                    {"value": "not an email", "confidence": 99}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hunter = HunterClient::new(SecretString::from("hunter-key")).with_base_url(server.uri());
    let discovery = EmailDiscovery::builder()
        .with_fetcher(MockPageFetcher::new())
        .with_mx_resolver(MockMxResolver::new())
        .with_directory(hunter)
        .build()
        .unwrap();

    let input = DiscoveryInput::new("Acme", "acme.com");
    let result = discovery.discover(&input).await.unwrap();
    // Second run is served from the directory cache.
    discovery.discover(&input).await.unwrap();

    assert_eq!(result.email, "jane.doe@acme.com");
    assert_eq!(result.all_candidates.len(), 2);
    let info = result
        .all_candidates
        .iter()
        .find(|c| c.email == "info@acme.com")
        .unwrap();
    assert_eq!(info.confidence, Confidence::Medium);
    assert_eq!(info.source, EmailSource::DirectoryApi);
}

#[tokio::test]
async fn test_shared_engine_across_tasks() {
    let discovery = Arc::new(
        EmailDiscovery::builder()
            .with_fetcher(
                MockPageFetcher::new()
                    .with_page("https://one.com", r#"<a href="mailto:a@one.com">a</a>"#)
                    .with_page("https://two.com", r#"<a href="mailto:b@two.com">b</a>"#),
            )
            .with_mx_resolver(MockMxResolver::new())
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = [("One", "one.com"), ("Two", "two.com")]
        .into_iter()
        .map(|(name, site)| {
            let discovery = Arc::clone(&discovery);
            tokio::spawn(async move {
                discovery
                    .discover(&DiscoveryInput::new(name, site))
                    .await
                    .unwrap()
                    .email
            })
        })
        .collect();

    let mut emails = Vec::new();
    for handle in handles {
        emails.push(handle.await.unwrap());
    }
    assert_eq!(emails, vec!["a@one.com", "b@two.com"]);
}

#[tokio::test]
async fn test_result_wire_shape() {
    let discovery = EmailDiscovery::builder()
        .with_fetcher(
            MockPageFetcher::new()
                .with_page("https://acme.com", r#"<a href="mailto:sales@acme.com">s</a>"#),
        )
        .with_mx_resolver(MockMxResolver::new())
        .build()
        .unwrap();

    let result = discovery
        .discover(&DiscoveryInput::new("Acme", "acme.com"))
        .await
        .unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["email"], "sales@acme.com");
    assert_eq!(value["allCandidates"][0]["source"], "website_scrape");
    assert_eq!(value["allCandidates"][0]["confidence"], "high");
    assert_eq!(value["strategies"][0]["name"], "website_scrape");
    assert_eq!(value["strategies"][1]["outcome"], "skipped");
    assert!(value["totalDurationMs"].is_u64());
    assert!(value.get("businessData").is_none());
}
