//! Business-data enrichment through a grounded LLM search.
//!
//! This strategy never contributes email candidates. Its answer is parsed by
//! label into [`BusinessData`], and anything email-shaped is scrubbed from the
//! parsed values so the candidate pool stays uncontaminated.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{Strategy, StrategyContext, StrategyOutput};
use crate::error::StrategyRunResult;
use crate::extract::text::emails_in;
use crate::traits::search::BusinessSearch;
use crate::types::{BusinessData, DiscoveryInput, StrategyName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    OwnerName,
    Services,
    PainPoints,
    SocialMedia,
}

/// Answer labels, matched case-insensitively against the text before `:`.
const LABELS: &[(&str, Field)] = &[
    ("owner name", Field::OwnerName),
    ("owner", Field::OwnerName),
    ("services", Field::Services),
    ("pain points", Field::PainPoints),
    ("social media", Field::SocialMedia),
    ("social links", Field::SocialMedia),
];

/// Values the model uses to say it found nothing.
const PLACEHOLDERS: &[&str] = &["unknown", "n/a", "na", "none", "not found", "not available"];

pub struct BusinessDataStrategy {
    search: Option<Arc<dyn BusinessSearch>>,
}

impl BusinessDataStrategy {
    pub fn new(search: Option<Arc<dyn BusinessSearch>>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Strategy for BusinessDataStrategy {
    fn name(&self) -> StrategyName {
        StrategyName::GeminiBusinessData
    }

    fn is_applicable(&self, ctx: &StrategyContext<'_>) -> bool {
        self.search.is_some()
            && ctx.input.wants_business_data()
            && !ctx.input.business_name.trim().is_empty()
    }

    async fn run(&self, ctx: &StrategyContext<'_>) -> StrategyRunResult<StrategyOutput> {
        let Some(search) = &self.search else {
            return Ok(StrategyOutput::default());
        };

        let prompt = build_prompt(ctx.input, ctx.website.as_deref());
        let answer = search.grounded_business_search(&prompt).await?;
        let data = parse_business_data(&answer.text);
        debug!(
            owner = data.owner_name.is_some(),
            services = data.services.len(),
            pain_points = data.pain_points.len(),
            social_links = data.social_links.len(),
            "Parsed business data"
        );

        Ok(StrategyOutput {
            candidates: Vec::new(),
            business_data: Some(data).filter(|d| !d.is_empty()),
        })
    }
}

/// Prompt for the grounded search. Forbids email addresses in the answer.
pub fn build_prompt(input: &DiscoveryInput, website: Option<&str>) -> String {
    let mut subject = format!("the business \"{}\"", input.business_name.trim());
    if let Some(location) = input.location.as_deref().filter(|l| !l.trim().is_empty()) {
        subject.push_str(&format!(" located in {}", location.trim()));
    }
    if let Some(industry) = input.industry.as_deref().filter(|i| !i.trim().is_empty()) {
        subject.push_str(&format!(" (industry: {})", industry.trim()));
    }
    if let Some(website) = website {
        subject.push_str(&format!(", website {website}"));
    }

    format!(
        "Use Google Search to research {subject}.\n\
         \n\
         Answer with exactly these four labels, one per line:\n\
         Owner Name: the full name of the owner or principal\n\
         Services: comma-separated list of the main services offered\n\
         Pain Points: comma-separated list of likely operational challenges for this business\n\
         Social Media: comma-separated list of official social media profile URLs\n\
         \n\
         Write \"Unknown\" for any label you cannot find.\n\
         Never include an email address anywhere in your answer."
    )
}

/// Parse a labelled answer into [`BusinessData`].
///
/// Accepts markdown decoration (`**Services:**`, bullets) and list items on
/// the lines following a label.
pub fn parse_business_data(text: &str) -> BusinessData {
    let mut data = BusinessData::default();
    let mut current: Option<Field> = None;

    for line in text.lines() {
        let cleaned = clean_line(line);
        if cleaned.is_empty() {
            continue;
        }

        let (field, value) = match split_label(&cleaned) {
            Some((field, value)) => {
                current = Some(field);
                (field, value)
            }
            None if looks_like_label(&cleaned) && current != Some(Field::SocialMedia) => {
                current = None;
                continue;
            }
            None => match current {
                Some(field) if field != Field::OwnerName => (field, cleaned.as_str()),
                _ => continue,
            },
        };

        match field {
            Field::OwnerName => {
                if data.owner_name.is_none() {
                    data.owner_name = scrub(value);
                }
            }
            Field::Services => data.services.extend(list_items(value)),
            Field::PainPoints => data.pain_points.extend(list_items(value)),
            Field::SocialMedia => data
                .social_links
                .extend(list_items(value).into_iter().map(|item| social_url(&item))),
        }
    }

    data
}

fn clean_line(line: &str) -> String {
    line.replace("**", "")
        .trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '#' | '•') || c.is_whitespace())
        .trim()
        .to_string()
}

fn split_label(line: &str) -> Option<(Field, &str)> {
    let (label, value) = line.split_once(':')?;
    let label = label.trim().to_lowercase();
    LABELS
        .iter()
        .find(|(name, _)| label == *name)
        .map(|(_, field)| (*field, value.trim()))
}

/// `Something: value` with a short alphabetic label we do not know.
fn looks_like_label(line: &str) -> bool {
    line.split_once(':').is_some_and(|(label, _)| {
        let label = label.trim();
        !label.is_empty()
            && label.split_whitespace().count() <= 3
            && label.chars().all(|c| c.is_alphabetic() || c.is_whitespace())
    })
}

/// Remove email-shaped tokens and placeholder answers.
fn scrub(value: &str) -> Option<String> {
    let mut cleaned = value.to_string();
    for email in emails_in(value) {
        cleaned = cleaned.replace(&email, "");
    }
    let cleaned = cleaned
        .trim()
        .trim_matches(|c: char| matches!(c, ',' | ';' | '.' | '(' | ')') || c.is_whitespace())
        .to_string();

    let is_placeholder = PLACEHOLDERS.contains(&cleaned.to_lowercase().as_str());
    (!cleaned.is_empty() && !is_placeholder).then_some(cleaned)
}

fn list_items(value: &str) -> Vec<String> {
    value.split([',', ';']).filter_map(scrub).collect()
}

/// Pull the URL out of items like `Facebook: https://facebook.com/acme`.
fn social_url(item: &str) -> String {
    item.find("http")
        .map(|start| {
            item[start..]
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string()
        })
        .unwrap_or_else(|| item.to_string())
}
