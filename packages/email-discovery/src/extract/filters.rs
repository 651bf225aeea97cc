//! Acceptance filters every candidate passes, whatever technique found it.

use std::sync::LazyLock;

use regex::Regex;

/// Basic `local@domain.tld` shape, applied to already-lowercased addresses.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?)*\.[a-z]{2,}$")
        .expect("valid email shape regex")
});

/// `logo@2x.png`, `hero@1280x720.jpg`: retina/size suffixes in asset names.
static ASSET_SIZE_DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+x\d*\.[a-z0-9]+$").expect("valid asset regex"));

/// Local parts that never reach a human.
pub const EXCLUDED_PREFIXES: &[&str] = &[
    "noreply",
    "no-reply",
    "mailer-daemon",
    "webmaster",
    "postmaster",
    "daemon",
];

/// Placeholder, CDN and analytics domains that never host a business inbox.
/// Subdomains match too.
pub const JUNK_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "domain.com",
    "yourdomain.com",
    "yoursite.com",
    "yourcompany.com",
    "website.com",
    "test.com",
    "email.example",
    "sentry.io",
    "wixpress.com",
    "cloudflare.com",
    "googleapis.com",
    "google-analytics.com",
    "googletagmanager.com",
    "gstatic.com",
    "w3.org",
    "schema.org",
    "jquery.com",
    "jsdelivr.net",
    "unpkg.com",
    "bootstrapcdn.com",
    "fontawesome.com",
];

/// File extensions that show up as fake TLDs when asset names contain `@`.
const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "avif", "ico", "bmp", "css", "js",
];

/// Canonical form used for every comparison: trimmed, lowercased, no `mailto:`.
pub fn normalize_email(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .get(..7)
        .filter(|p| p.eq_ignore_ascii_case("mailto:"))
        .map(|_| &trimmed[7..])
        .unwrap_or(trimmed);
    without_scheme.trim().to_lowercase()
}

/// Whether the address has a basic `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_SHAPE.is_match(email)
}

/// Whether the local part is an automated mailbox.
pub fn is_excluded_prefix(email: &str) -> bool {
    let local = email.split('@').next().unwrap_or_default();
    EXCLUDED_PREFIXES.contains(&local)
}

/// Whether the domain is a placeholder, CDN, or an asset filename in disguise.
pub fn is_junk_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return true;
    };
    if JUNK_DOMAINS
        .iter()
        .any(|junk| domain == *junk || domain.ends_with(&format!(".{junk}")))
    {
        return true;
    }
    if ASSET_SIZE_DOMAIN.is_match(domain) {
        return true;
    }
    domain
        .rsplit('.')
        .next()
        .is_some_and(|tld| ASSET_EXTENSIONS.contains(&tld))
}

/// All three filters together, on a normalized address.
pub fn passes_filters(email: &str) -> bool {
    is_valid_email(email) && !is_excluded_prefix(email) && !is_junk_domain(email)
}
