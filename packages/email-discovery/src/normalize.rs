//! Website canonicalization.
//!
//! Everything here is pure: no network, no errors. An unusable website simply
//! yields an empty domain, which gates the domain-dependent strategies off.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid scheme regex"));

/// Turn a raw website string into a fetchable URL.
///
/// Prepends `https://` when no scheme is present and strips trailing slashes.
/// Idempotent: `normalize_url(&normalize_url(x)) == normalize_url(x)`.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let (scheme, rest) = match SCHEME.find(trimmed) {
        Some(m) => trimmed.split_at(m.end()),
        None => ("https://", trimmed),
    };
    let rest = rest.trim_end_matches(|c: char| c == '/' || c.is_whitespace());
    format!("{scheme}{rest}")
}

/// Bare registrable host of a website, without a leading `www.`.
///
/// Returns an empty string when the website cannot be parsed.
pub fn extract_domain(website: &str) -> String {
    if website.trim().is_empty() {
        return String::new();
    }
    Url::parse(&normalize_url(website))
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .map(|host| host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
        .unwrap_or_default()
}

/// Whether the email's domain belongs to the site: equal, or either one is a
/// subdomain of the other.
pub fn email_domain_matches_site(email: &str, site_domain: &str) -> bool {
    let Some((_, email_domain)) = email.rsplit_once('@') else {
        return false;
    };
    let email_domain = email_domain.trim().to_lowercase();
    let site = site_domain.trim().to_lowercase();
    let site = site.strip_prefix("www.").unwrap_or(&site);
    if email_domain.is_empty() || site.is_empty() {
        return false;
    }
    email_domain == site
        || email_domain.ends_with(&format!(".{site}"))
        || site.ends_with(&format!(".{email_domain}"))
}
