//! Codec for string lists stored as JSON array text in a single column
//! (ingredients, allergens, image URLs).
//!
//! Decoding never fails: anything that is not a JSON array decodes to an
//! empty list, and non-string elements are dropped.
//!
//! Used by services that persist menu items into text columns; the billing
//! service stores nothing.

use serde_json::Value;

/// Encode a list as JSON array text, e.g. `["nuts","dairy"]`.
pub fn encode_string_list<S: AsRef<str>>(items: &[S]) -> String {
    let values: Vec<Value> = items
        .iter()
        .map(|s| Value::String(s.as_ref().to_string()))
        .collect();
    Value::Array(values).to_string()
}

/// Decode JSON array text back into a list.
pub fn decode_string_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(values)) => values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Ok(_) => Vec::new(),
        Err(e) => {
            tracing::debug!(error = %e, "Discarding malformed JSON list column");
            Vec::new()
        }
    }
}

/// Decode a nullable column.
pub fn decode_optional_string_list(raw: Option<&str>) -> Vec<String> {
    raw.map(decode_string_list).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode_string_list(&["nuts", "dairy"]), r#"["nuts","dairy"]"#);
        assert_eq!(encode_string_list::<&str>(&[]), "[]");
    }

    #[test]
    fn test_encode_escapes_quotes_and_unicode() {
        let encoded = encode_string_list(&["say \"hi\"", "حليب"]);
        assert_eq!(decode_string_list(&encoded), vec!["say \"hi\"", "حليب"]);
    }

    #[test]
    fn test_decode_valid_array() {
        assert_eq!(
            decode_string_list(r#"["https://cdn/a.jpg", "https://cdn/b.jpg"]"#),
            vec!["https://cdn/a.jpg", "https://cdn/b.jpg"]
        );
    }

    #[test]
    fn test_decode_malformed_is_empty() {
        assert!(decode_string_list("").is_empty());
        assert!(decode_string_list("   ").is_empty());
        assert!(decode_string_list("[\"unterminated").is_empty());
        assert!(decode_string_list("nuts, dairy").is_empty());
        assert!(decode_string_list("null").is_empty());
        assert!(decode_string_list(r#"{"a": "b"}"#).is_empty());
        assert!(decode_string_list("\"nuts\"").is_empty());
    }

    #[test]
    fn test_decode_skips_non_strings() {
        assert_eq!(
            decode_string_list(r#"["gluten", 3, null, {"x": 1}, "soy"]"#),
            vec!["gluten", "soy"]
        );
    }

    #[test]
    fn test_decode_optional() {
        assert!(decode_optional_string_list(None).is_empty());
        assert_eq!(decode_optional_string_list(Some(r#"["egg"]"#)), vec!["egg"]);
    }
}
