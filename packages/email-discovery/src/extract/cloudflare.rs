//! Cloudflare email-obfuscation decoding.
//!
//! Cloudflare rewrites addresses into `data-cfemail="<hex>"` (and
//! `/cdn-cgi/l/email-protection#<hex>` links). The first byte is the key; every
//! following byte is XORed with it.

use crate::error::ExtractionError;

/// Path prefix Cloudflare uses for obfuscated `mailto:` links.
pub const EMAIL_PROTECTION_PATH: &str = "/cdn-cgi/l/email-protection#";

/// Decode a `data-cfemail` payload back into the literal address.
pub fn decode_cfemail(encoded: &str) -> Result<String, ExtractionError> {
    let encoded = encoded.trim();
    let invalid = |reason: &str| ExtractionError::InvalidCfEmail {
        encoded: encoded.to_string(),
        reason: reason.to_string(),
    };

    if encoded.len() < 4 || encoded.len() % 2 != 0 {
        return Err(invalid("length must be an even number of hex digits, at least 4"));
    }
    if !encoded.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("not hex"));
    }

    let bytes = (0..encoded.len())
        .step_by(2)
        .map(|i| {
            encoded
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        })
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| invalid("not hex"))?;

    let key = bytes[0];
    let decoded: Vec<u8> = bytes[1..].iter().map(|b| b ^ key).collect();
    String::from_utf8(decoded).map_err(|_| invalid("decoded bytes are not UTF-8"))
}

/// Pull the payload out of an `/cdn-cgi/l/email-protection#<hex>` href.
pub fn payload_from_href(href: &str) -> Option<&str> {
    href.find(EMAIL_PROTECTION_PATH)
        .map(|idx| &href[idx + EMAIL_PROTECTION_PATH.len()..])
        .filter(|payload| !payload.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(key: u8, plain: &str) -> String {
        std::iter::once(key)
            .chain(plain.bytes().map(|b| b ^ key))
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    #[test]
    fn test_decode_known_pair() {
        let encoded = encode(0x1e, "sales@acme.com");
        assert!(encoded.starts_with("1e"));
        assert_eq!(decode_cfemail(&encoded).unwrap(), "sales@acme.com");
    }

    #[test]
    fn test_decode_literal_fixture() {
        // key 0x42 applied to "hi@a.io"
        assert_eq!(decode_cfemail("422a2b02236c2b2d").unwrap(), "hi@a.io");
    }

    #[test]
    fn test_decode_uppercase_hex() {
        let encoded = encode(0xA7, "info@shop.example.net").to_uppercase();
        assert_eq!(decode_cfemail(&encoded).unwrap(), "info@shop.example.net");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_cfemail("").is_err());
        assert!(decode_cfemail("1e7").is_err());
        assert!(decode_cfemail("zz7f7f").is_err());
    }

    #[test]
    fn test_payload_from_href() {
        assert_eq!(
            payload_from_href("/cdn-cgi/l/email-protection#1e7f"),
            Some("1e7f")
        );
        assert_eq!(
            payload_from_href("https://acme.com/cdn-cgi/l/email-protection#abcd"),
            Some("abcd")
        );
        assert_eq!(payload_from_href("/cdn-cgi/l/email-protection#"), None);
        assert_eq!(payload_from_href("/contact"), None);
    }
}
