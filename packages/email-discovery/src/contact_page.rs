//! Heuristic "contact" / "about" page lookup on a homepage.

use scraper::{Html, Selector};
use url::Url;

/// Phrases that mark a link as leading to a contact page.
const CONTACT_KEYWORDS: &[&str] = &[
    "contact",
    "get in touch",
    "get-in-touch",
    "reach us",
    "reach-us",
    "email us",
    "email-us",
    "connect",
    "enquire",
    "enquiry",
    "inquire",
    "inquiry",
    "let's talk",
    "lets-talk",
    "write to",
    "speak with",
];

/// Phrases that mark a link as leading to an about page.
const ABOUT_KEYWORDS: &[&str] = &[
    "about",
    "about us",
    "about-us",
    "our story",
    "our-story",
    "who we are",
    "who-we-are",
    "our team",
    "meet the team",
];

/// Find the most likely contact page linked from `html`.
///
/// Only anchors on the same host as `base_url` count (a leading `www.` is
/// ignored). The first contact-style link wins; failing that, the first
/// about-style link; otherwise `None`.
pub fn find_contact_page_url(html: &str, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    let base_host = bare_host(&base)?;

    let Ok(link_selector) = Selector::parse("a[href]") else {
        return None;
    };
    let document = Html::parse_document(html);

    let mut about: Option<String> = None;

    for anchor in document.select(&link_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        let Ok(resolved) = base.join(href) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        if bare_host(&resolved).as_deref() != Some(base_host.as_str()) {
            continue;
        }
        if is_same_page(&resolved, &base) {
            continue;
        }

        let href_lower = href.to_lowercase();
        let text = anchor.text().collect::<String>().to_lowercase();
        let matches_any =
            |keywords: &[&str]| keywords.iter().any(|k| href_lower.contains(k) || text.contains(k));

        if matches_any(CONTACT_KEYWORDS) {
            return Some(resolved.to_string());
        }
        if about.is_none() && matches_any(ABOUT_KEYWORDS) {
            about = Some(resolved.to_string());
        }
    }

    about
}

fn bare_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

fn is_same_page(a: &Url, b: &Url) -> bool {
    a.path().trim_end_matches('/') == b.path().trim_end_matches('/') && a.query() == b.query()
}
