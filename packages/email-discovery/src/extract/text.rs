//! Text-level scanning: rendered text, entity decoding, `[at]`/`[dot]`
//! obfuscation and HTML comments.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Permissive pattern for addresses embedded in arbitrary text.
static EMAIL_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}")
        .expect("valid email text regex")
});

static SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid script regex"));
static STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid style regex"));
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("valid comment regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([A-Za-z]+));")
        .expect("valid entity regex")
});

/// `name [at] domain [dot] tld` and its `(at)`, `{at}`, `<at>` siblings.
static OBFUSCATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([a-z0-9._%+\-]+)\s*(?:\[\s*at\s*\]|\(\s*at\s*\)|\{\s*at\s*\}|<\s*at\s*>)\s*([a-z0-9\-]+(?:(?:\s*(?:\[\s*dot\s*\]|\(\s*dot\s*\)|\{\s*dot\s*\}|<\s*dot\s*>)\s*|\.)[a-z0-9\-]+)+)",
    )
    .expect("valid obfuscation regex")
});

static DOT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:\[\s*dot\s*\]|\(\s*dot\s*\)|\{\s*dot\s*\}|<\s*dot\s*>)\s*")
        .expect("valid dot regex")
});

/// Every email-shaped substring of `text`, in order of appearance.
pub fn emails_in(text: &str) -> Vec<String> {
    EMAIL_IN_TEXT
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Decode numeric and the common named HTML entities. Unknown names are kept.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_entity(name.as_str()))
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "commat" => '@',
        "period" => '.',
        "hyphen" | "dash" => '-',
        "lowbar" => '_',
        "plus" => '+',
        _ => return None,
    };
    Some(c)
}

/// Rendered text of a document: scripts, styles and comments removed, tags
/// replaced by spaces, entities decoded, whitespace collapsed.
pub fn visible_text(html: &str) -> String {
    let text = SCRIPT.replace_all(html, " ");
    let text = STYLE.replace_all(&text, " ");
    let text = COMMENT.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Rewrite `name [at] domain [dot] tld` spellings into real addresses.
pub fn deobfuscate(text: &str) -> Vec<String> {
    OBFUSCATED
        .captures_iter(text)
        .map(|caps| {
            let domain = DOT_TOKEN.replace_all(&caps[2], ".");
            format!("{}@{}", &caps[1], domain)
        })
        .collect()
}

/// Raw contents of every HTML comment.
pub fn comments(html: &str) -> Vec<String> {
    COMMENT
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}
