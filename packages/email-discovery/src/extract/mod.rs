//! Email extraction from a single HTML document.
//!
//! A fixed, ordered set of independent techniques runs over the same parsed
//! document. Each technique emits raw values at a fixed confidence tier; every
//! value then goes through the same acceptance filters before it becomes an
//! [`EmailCandidate`]. Per-signal parse failures are kept in the
//! [`ExtractionReport`] instead of being swallowed.
//!
//! # Techniques, in order
//!
//! | Technique | Tier |
//! |---|---|
//! | `mailto:` anchors | high |
//! | JSON-LD `email` / `contactPoint` / `@graph` | high |
//! | Cloudflare `data-cfemail` and email-protection links | high |
//! | `itemprop="email"`, vCard/hCard | high |
//! | `data-email`, `data-mail`, `data-contact`, `data-address` | high |
//! | contact meta tags / `meta[name=author]` | high / medium |
//! | rendered text | medium |
//! | `[at]`/`[dot]` obfuscation | medium |
//! | HTML comments | low |

pub mod cloudflare;
pub mod filters;
pub mod structured;
pub mod text;

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::ExtractionError;
use crate::normalize::email_domain_matches_site;
use crate::types::{Confidence, EmailCandidate, EmailSource};

use filters::{normalize_email, passes_filters};

/// One extraction technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technique {
    Mailto,
    JsonLd,
    CloudflareObfuscation,
    Microdata,
    DataAttribute,
    MetaTag,
    PlainText,
    ObfuscatedText,
    HtmlComment,
}

impl Technique {
    /// All techniques in the order they run.
    pub const ALL: [Technique; 9] = [
        Technique::Mailto,
        Technique::JsonLd,
        Technique::CloudflareObfuscation,
        Technique::Microdata,
        Technique::DataAttribute,
        Technique::MetaTag,
        Technique::PlainText,
        Technique::ObfuscatedText,
        Technique::HtmlComment,
    ];

    fn run(self, page: &ParsedPage<'_>) -> Vec<Signal> {
        match self {
            Technique::Mailto => mailto_links(page),
            Technique::JsonLd => jsonld_blocks(page),
            Technique::CloudflareObfuscation => cloudflare_obfuscation(page),
            Technique::Microdata => microdata(page),
            Technique::DataAttribute => data_attributes(page),
            Technique::MetaTag => meta_tags(page),
            Technique::PlainText => plain_text(page),
            Technique::ObfuscatedText => obfuscated_text(page),
            Technique::HtmlComment => html_comments(page),
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technique::Mailto => "mailto",
            Technique::JsonLd => "json_ld",
            Technique::CloudflareObfuscation => "cloudflare_obfuscation",
            Technique::Microdata => "microdata",
            Technique::DataAttribute => "data_attribute",
            Technique::MetaTag => "meta_tag",
            Technique::PlainText => "plain_text",
            Technique::ObfuscatedText => "obfuscated_text",
            Technique::HtmlComment => "html_comment",
        };
        f.write_str(name)
    }
}

/// A parse failure attributed to the technique that hit it.
#[derive(Debug)]
pub struct TechniqueError {
    pub technique: Technique,
    pub error: ExtractionError,
}

/// Everything one extraction pass produced.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Accepted candidates, deduplicated by address, in first-seen order.
    pub candidates: Vec<EmailCandidate>,
    /// Signals that could not be interpreted.
    pub errors: Vec<TechniqueError>,
    /// Email-shaped values dropped by the acceptance filters.
    pub rejected: Vec<String>,
}

/// One raw value emitted by a technique, before filtering.
type Signal = Result<(String, Confidence), ExtractionError>;

struct ParsedPage<'a> {
    html: &'a str,
    document: Html,
    text: String,
}

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect(concat!("valid selector: ", $css)));
    };
}

selector!(ANCHORS, "a[href]");
selector!(SCRIPTS_WITH_TYPE, "script[type]");
selector!(CFEMAIL, "[data-cfemail]");
selector!(
    MICRODATA_EMAIL,
    "[itemprop='email'], .vcard .email, .h-card .u-email, .h-card .p-email"
);
selector!(
    DATA_ATTRS,
    "[data-email], [data-mail], [data-contact], [data-address]"
);
selector!(
    CONTACT_META,
    "meta[property='og:email'], meta[name='og:email'], \
     meta[property='business:contact_data:email'], meta[name='email'], \
     meta[name='contact:email'], meta[property='contact:email']"
);
selector!(AUTHOR_META, "meta[name='author']");

const DATA_ATTR_NAMES: [&str; 4] = ["data-email", "data-mail", "data-contact", "data-address"];

/// Extract candidate emails from one HTML document.
///
/// `base_domain` is the site's registrable domain (may be empty) and
/// `page_url` the page the HTML came from, recorded as provenance.
pub fn extract_emails(html: &str, base_domain: &str, page_url: Option<&str>) -> Vec<EmailCandidate> {
    extract_emails_with_report(html, base_domain, page_url).candidates
}

/// Like [`extract_emails`], but also returns per-signal errors and rejections.
pub fn extract_emails_with_report(
    html: &str,
    base_domain: &str,
    page_url: Option<&str>,
) -> ExtractionReport {
    let page = ParsedPage {
        html,
        document: Html::parse_document(html),
        text: text::visible_text(html),
    };

    let mut accepted: IndexMap<String, EmailCandidate> = IndexMap::new();
    let mut report = ExtractionReport::default();

    for technique in Technique::ALL {
        for signal in technique.run(&page) {
            let (raw, confidence) = match signal {
                Ok(found) => found,
                Err(error) => {
                    debug!(%technique, %error, "Skipping unreadable signal");
                    report.errors.push(TechniqueError { technique, error });
                    continue;
                }
            };

            for value in text::emails_in(&raw) {
                let email = normalize_email(&value);
                if !passes_filters(&email) {
                    report.rejected.push(email);
                    continue;
                }
                match accepted.get_mut(&email) {
                    Some(existing) if confidence > existing.confidence => {
                        existing.confidence = confidence;
                    }
                    Some(_) => {}
                    None => {
                        if let Some(mut candidate) =
                            EmailCandidate::new(&email, EmailSource::WebsiteScrape, confidence)
                        {
                            if let Some(url) = page_url {
                                candidate = candidate.with_origin_page(url);
                            }
                            accepted.insert(email, candidate);
                        }
                    }
                }
            }
        }
    }

    report.candidates = accepted.into_values().collect();

    let on_site = report
        .candidates
        .iter()
        .filter(|c| email_domain_matches_site(&c.email, base_domain))
        .count();
    debug!(
        page = page_url.unwrap_or("<inline>"),
        base_domain,
        candidates = report.candidates.len(),
        on_site,
        rejected = report.rejected.len(),
        errors = report.errors.len(),
        "Extraction finished"
    );

    report
}

fn high(value: impl Into<String>) -> Signal {
    Ok((value.into(), Confidence::High))
}

fn percent_decode(value: &str) -> Result<String, ExtractionError> {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ExtractionError::MalformedUri {
            value: value.to_string(),
        })
}

fn mailto_target(href: &str) -> Option<&str> {
    let href = href.trim();
    href.get(..7)
        .filter(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
        .map(|_| &href[7..])
}

fn mailto_links(page: &ParsedPage<'_>) -> Vec<Signal> {
    page.document
        .select(&ANCHORS)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(mailto_target)
        .map(|target| {
            let addresses = target.split('?').next().unwrap_or_default();
            percent_decode(addresses).map(|decoded| (decoded, Confidence::High))
        })
        .collect()
}

fn jsonld_blocks(page: &ParsedPage<'_>) -> Vec<Signal> {
    let mut signals = Vec::new();
    for script in page.document.select(&SCRIPTS_WITH_TYPE) {
        let is_jsonld = script
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_jsonld {
            continue;
        }
        let body: String = script.text().collect();
        match serde_json::from_str::<serde_json::Value>(body.trim()) {
            Ok(value) => {
                let mut found = Vec::new();
                structured::jsonld_emails(&value, &mut found);
                signals.extend(found.into_iter().map(high));
            }
            Err(e) => signals.push(Err(ExtractionError::MalformedJsonLd(e))),
        }
    }
    signals
}

fn cloudflare_obfuscation(page: &ParsedPage<'_>) -> Vec<Signal> {
    let attrs = page
        .document
        .select(&CFEMAIL)
        .filter_map(|el| el.value().attr("data-cfemail"));
    let links = page
        .document
        .select(&ANCHORS)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(cloudflare::payload_from_href);

    attrs
        .chain(links)
        .map(|encoded| cloudflare::decode_cfemail(encoded).map(|email| (email, Confidence::High)))
        .collect()
}

/// Candidate-bearing values of an element: `content`, `href`, `value`, then text.
fn element_values(el: ElementRef<'_>) -> Vec<Signal> {
    let mut values = Vec::new();
    for attr in ["content", "value"] {
        if let Some(v) = el.value().attr(attr) {
            values.push(high(v));
        }
    }
    if let Some(href) = el.value().attr("href") {
        match mailto_target(href) {
            Some(target) => values.push(percent_decode(target).map(|v| (v, Confidence::High))),
            None => values.push(high(href)),
        }
    }
    let text: String = el.text().collect();
    if !text.trim().is_empty() {
        values.push(high(text));
    }
    values
}

fn microdata(page: &ParsedPage<'_>) -> Vec<Signal> {
    page.document
        .select(&MICRODATA_EMAIL)
        .flat_map(element_values)
        .collect()
}

fn data_attributes(page: &ParsedPage<'_>) -> Vec<Signal> {
    page.document
        .select(&DATA_ATTRS)
        .flat_map(|el| {
            DATA_ATTR_NAMES
                .iter()
                .filter_map(move |name| el.value().attr(name))
                .filter(|value| value.contains('@'))
                .map(high)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn meta_tags(page: &ParsedPage<'_>) -> Vec<Signal> {
    let contact = page
        .document
        .select(&CONTACT_META)
        .filter_map(|m| m.value().attr("content"))
        .map(high);
    let author = page
        .document
        .select(&AUTHOR_META)
        .filter_map(|m| m.value().attr("content"))
        .filter(|content| content.contains('@'))
        .map(|content| Ok((content.to_string(), Confidence::Medium)));
    contact.chain(author).collect()
}

fn plain_text(page: &ParsedPage<'_>) -> Vec<Signal> {
    vec![Ok((page.text.clone(), Confidence::Medium))]
}

fn obfuscated_text(page: &ParsedPage<'_>) -> Vec<Signal> {
    text::deobfuscate(&page.text)
        .into_iter()
        .map(|email| Ok((email, Confidence::Medium)))
        .collect()
}

fn html_comments(page: &ParsedPage<'_>) -> Vec<Signal> {
    text::comments(page.html)
        .into_iter()
        .map(|comment| Ok((text::decode_entities(&comment), Confidence::Low)))
        .collect()
}
