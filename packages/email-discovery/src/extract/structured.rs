//! JSON-LD (`application/ld+json`) email walking.

use serde_json::Value;

/// Collect `email` values reachable through the shapes organizations actually
/// publish: top-level `email`, `contactPoint` (object or array) and `@graph`.
pub fn jsonld_emails(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                jsonld_emails(item, out);
            }
        }
        Value::Object(map) => {
            match map.get("email") {
                Some(Value::String(email)) => out.push(email.clone()),
                Some(Value::Array(emails)) => out.extend(
                    emails
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string),
                ),
                _ => {}
            }
            if let Some(contact) = map.get("contactPoint") {
                jsonld_emails(contact, out);
            }
            if let Some(graph) = map.get("@graph") {
                jsonld_emails(graph, out);
            }
        }
        _ => {}
    }
}
