//! Candidate scoring and final resolution.
//!
//! Composite score = source weight + confidence weight, plus a bonus for a
//! personal (non-generic) local part, minus a penalty when the address is not
//! on the site's domain.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::normalize::email_domain_matches_site;
use crate::types::{Confidence, EmailCandidate, EmailSource};

/// Local parts that name a shared mailbox rather than a person.
pub const GENERIC_PREFIXES: &[&str] = &[
    "info",
    "contact",
    "hello",
    "office",
    "admin",
    "support",
    "help",
    "sales",
    "team",
    "service",
    "enquiries",
    "inquiries",
    "mail",
];

/// Every constant the scorer uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringWeights {
    pub website_scrape: i32,
    pub directory_api: i32,
    pub pattern_guess: i32,
    pub high: i32,
    pub medium: i32,
    pub low: i32,
    pub non_generic_bonus: i32,
    pub off_site_penalty: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            website_scrape: 50,
            directory_api: 40,
            pattern_guess: 10,
            high: 30,
            medium: 15,
            low: 5,
            non_generic_bonus: 10,
            off_site_penalty: 20,
        }
    }
}

impl ScoringWeights {
    pub fn source_weight(&self, source: EmailSource) -> i32 {
        match source {
            EmailSource::WebsiteScrape => self.website_scrape,
            EmailSource::DirectoryApi => self.directory_api,
            EmailSource::PatternGuess => self.pattern_guess,
        }
    }

    pub fn confidence_weight(&self, confidence: Confidence) -> i32 {
        match confidence {
            Confidence::High => self.high,
            Confidence::Medium => self.medium,
            Confidence::Low => self.low,
        }
    }
}

/// A candidate with its composite score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub candidate: EmailCandidate,
    pub score: i32,
}

pub fn is_generic_prefix(email: &str) -> bool {
    let local = email.split('@').next().unwrap_or_default();
    GENERIC_PREFIXES.contains(&local)
}

/// Composite score of one candidate.
///
/// The off-site penalty only applies when a non-empty `site_domain` is known.
pub fn score(candidate: &EmailCandidate, site_domain: Option<&str>, weights: &ScoringWeights) -> i32 {
    let mut total =
        weights.source_weight(candidate.source) + weights.confidence_weight(candidate.confidence);
    if !is_generic_prefix(&candidate.email) {
        total += weights.non_generic_bonus;
    }
    if let Some(site) = site_domain.filter(|s| !s.is_empty()) {
        if !email_domain_matches_site(&candidate.email, site) {
            total -= weights.off_site_penalty;
        }
    }
    total
}

/// Deduplicate by address (keeping the higher-scoring instance) and order
/// best first. Equal scores keep first-seen order.
pub fn rank(
    candidates: &[EmailCandidate],
    site_domain: Option<&str>,
    weights: &ScoringWeights,
) -> Vec<ScoredCandidate> {
    let mut best: IndexMap<&str, ScoredCandidate> = IndexMap::new();
    for candidate in candidates {
        let scored = ScoredCandidate {
            candidate: candidate.clone(),
            score: score(candidate, site_domain, weights),
        };
        match best.get_mut(candidate.email.as_str()) {
            Some(existing) if scored.score > existing.score => *existing = scored,
            Some(_) => {}
            None => {
                best.insert(candidate.email.as_str(), scored);
            }
        }
    }

    let mut ranked: Vec<ScoredCandidate> = best.into_values().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// The winning address, or `""` when there are no candidates.
pub fn select_best(
    candidates: &[EmailCandidate],
    site_domain: Option<&str>,
    weights: &ScoringWeights,
) -> String {
    rank(candidates, site_domain, weights)
        .into_iter()
        .next()
        .map(|scored| scored.candidate.email)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn candidate(email: &str, source: EmailSource, confidence: Confidence) -> EmailCandidate {
        EmailCandidate::new(email, source, confidence).unwrap()
    }

    #[test]
    fn test_default_weights() {
        let w = ScoringWeights::default();
        let scraped = candidate("info@acme.com", EmailSource::WebsiteScrape, Confidence::High);
        assert_eq!(score(&scraped, Some("acme.com"), &w), 80);

        let guess = candidate("info@acme.com", EmailSource::PatternGuess, Confidence::Low);
        assert_eq!(score(&guess, Some("acme.com"), &w), 15);

        let personal = candidate("jane@acme.com", EmailSource::DirectoryApi, Confidence::Medium);
        assert_eq!(score(&personal, Some("acme.com"), &w), 65);

        let off_site = candidate("jane@gmail.com", EmailSource::WebsiteScrape, Confidence::Medium);
        assert_eq!(score(&off_site, Some("acme.com"), &w), 55);
    }

    #[test]
    fn test_no_site_domain_means_no_penalty() {
        let w = ScoringWeights::default();
        let c = candidate("jane@gmail.com", EmailSource::WebsiteScrape, Confidence::Medium);
        assert_eq!(score(&c, None, &w), 75);
        assert_eq!(score(&c, Some(""), &w), 75);
    }

    #[test]
    fn test_subdomain_counts_as_on_site() {
        let w = ScoringWeights::default();
        let c = candidate("info@mail.acme.com", EmailSource::WebsiteScrape, Confidence::High);
        assert_eq!(score(&c, Some("acme.com"), &w), 80);
    }

    #[test]
    fn test_select_best_prefers_scrape_over_guess() {
        let candidates = vec![
            candidate("info@acme.com", EmailSource::PatternGuess, Confidence::Low),
            candidate("office@acme.com", EmailSource::WebsiteScrape, Confidence::Medium),
        ];
        assert_eq!(
            select_best(&candidates, Some("acme.com"), &ScoringWeights::default()),
            "office@acme.com"
        );
    }

    #[test]
    fn test_dedup_keeps_higher_scoring_instance() {
        let candidates = vec![
            candidate("info@acme.com", EmailSource::PatternGuess, Confidence::Low),
            candidate("info@acme.com", EmailSource::DirectoryApi, Confidence::High),
            candidate("sales@acme.com", EmailSource::WebsiteScrape, Confidence::Low),
        ];
        let ranked = rank(&candidates, Some("acme.com"), &ScoringWeights::default());
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate.email, "info@acme.com");
        assert_eq!(ranked[0].candidate.source, EmailSource::DirectoryApi);
        assert_eq!(ranked[0].score, 70);
        assert_eq!(ranked[1].score, 55);
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let candidates = vec![
            candidate("sales@acme.com", EmailSource::WebsiteScrape, Confidence::High),
            candidate("info@acme.com", EmailSource::WebsiteScrape, Confidence::High),
        ];
        assert_eq!(
            select_best(&candidates, Some("acme.com"), &ScoringWeights::default()),
            "sales@acme.com"
        );
    }

    #[test]
    fn test_empty_is_empty_string() {
        assert_eq!(select_best(&[], Some("acme.com"), &ScoringWeights::default()), "");
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            pattern_guess: 100,
            ..ScoringWeights::default()
        };
        let candidates = vec![
            candidate("office@acme.com", EmailSource::WebsiteScrape, Confidence::High),
            candidate("info@acme.com", EmailSource::PatternGuess, Confidence::Low),
        ];
        assert_eq!(select_best(&candidates, Some("acme.com"), &weights), "info@acme.com");
    }

    #[test]
    fn test_weights_deserialize_partially() {
        let w: ScoringWeights = serde_json::from_str(r#"{"offSitePenalty": 5}"#).unwrap();
        assert_eq!(w.off_site_penalty, 5);
        assert_eq!(w.website_scrape, 50);
    }

    fn arb_candidate() -> impl Strategy<Value = EmailCandidate> {
        let local = prop::sample::select(vec!["info", "sales", "jane", "bob"]);
        let domain = prop::sample::select(vec!["acme.com", "mail.acme.com", "gmail.com"]);
        let source = prop::sample::select(vec![
            EmailSource::WebsiteScrape,
            EmailSource::DirectoryApi,
            EmailSource::PatternGuess,
        ]);
        let confidence =
            prop::sample::select(vec![Confidence::High, Confidence::Medium, Confidence::Low]);
        (local, domain, source, confidence).prop_map(|(l, d, s, c)| {
            EmailCandidate::new(&format!("{l}@{d}"), s, c).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_rank_keeps_one_max_per_address(candidates in prop::collection::vec(arb_candidate(), 0..20)) {
            let weights = ScoringWeights::default();
            let ranked = rank(&candidates, Some("acme.com"), &weights);

            let mut seen = std::collections::HashSet::new();
            for scored in &ranked {
                prop_assert!(seen.insert(scored.candidate.email.clone()));
                let max = candidates
                    .iter()
                    .filter(|c| c.email == scored.candidate.email)
                    .map(|c| score(c, Some("acme.com"), &weights))
                    .max();
                prop_assert_eq!(Some(scored.score), max);
            }
            prop_assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}
