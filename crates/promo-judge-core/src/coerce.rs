//! Defensive coercion for loosely-typed brief fields.
//!
//! Briefs arrive from form posts, spreadsheets and earlier pipeline phases, so
//! the same field can be a number, a numeric string, `"yes"`, or an array
//! flattened into a comma list. Every accessor here degrades to `None` or an
//! empty list instead of failing deserialization.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

lazy_static! {
    /// First number in a string, tolerating thousands separators (`1,200`).
    static ref NUMBER_TOKEN: Regex = Regex::new(r"-?\d{1,3}(?:,\d{3})+(?:\.\d+)?|-?\d+(?:\.\d+)?").unwrap();
}

/// Parses a number out of a JSON value: numbers pass through, strings yield
/// their first numeric token (`"1,200 winners"` -> 1200).
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => number_from_text(s),
        _ => None,
    }
}

pub fn number_from_text(text: &str) -> Option<f64> {
    let token = NUMBER_TOKEN.find(text)?;
    token.as_str().replace(',', "").parse::<f64>().ok()
}

/// Non-negative integer view of [`number_from_value`]; fractions truncate.
pub fn count_from_value(value: &Value) -> Option<u64> {
    number_from_value(value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc() as u64)
}

pub fn boolish_from_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Some(true),
            "false" | "no" | "n" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn list_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text_from_value).collect(),
        Value::String(s) => split_list(s)
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Splits on `;`, newlines and commas, except a comma acting as a thousands
/// separator (`1,200`).
fn split_list(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let is_break = match b {
            b';' | b'\n' => true,
            b',' => !is_thousands_comma(bytes, i),
            _ => false,
        };
        if is_break {
            parts.push(&text[start..i]);
            start = i + 1;
        }
    }
    parts.push(&text[start..]);
    parts
}

fn is_thousands_comma(bytes: &[u8], at: usize) -> bool {
    let before = at.checked_sub(1).map(|i| bytes[i]);
    let group = bytes.get(at + 1..at + 4);
    let after = bytes.get(at + 4).copied();
    before.is_some_and(|b| b.is_ascii_digit())
        && group.is_some_and(|g| g.iter().all(u8::is_ascii_digit))
        && !after.is_some_and(|b| b.is_ascii_digit())
}

pub fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// --- serde adapters (`#[serde(default, deserialize_with = "...")]`) ---

pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(list_from_value(&value))
}

pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

/// Like [`opt_text`] for required text ids: numbers stringify, anything
/// else reads as empty.
pub fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_from_strings_tolerate_separators_and_prose() {
        assert_eq!(number_from_value(&json!("1,200 winners")), Some(1200.0));
        assert_eq!(number_from_value(&json!("$25.50 back")), Some(25.5));
        assert_eq!(number_from_value(&json!(42)), Some(42.0));
        assert_eq!(number_from_value(&json!("uncapped")), None);
        assert_eq!(number_from_value(&json!(null)), None);
        assert_eq!(number_from_value(&json!({"n": 1})), None);
    }

    #[test]
    fn counts_reject_negatives() {
        assert_eq!(count_from_value(&json!(-3)), None);
        assert_eq!(count_from_value(&json!("3.9")), Some(3));
    }

    #[test]
    fn boolish_parsing() {
        assert_eq!(boolish_from_value(&json!("Yes")), Some(true));
        assert_eq!(boolish_from_value(&json!("off")), Some(false));
        assert_eq!(boolish_from_value(&json!(0)), Some(false));
        assert_eq!(boolish_from_value(&json!("maybe")), None);
    }

    #[test]
    fn lists_from_string_or_array() {
        assert_eq!(
            list_from_value(&json!("10 x $50 vouchers; 20 x caps")),
            vec!["10 x $50 vouchers", "20 x caps"]
        );
        assert_eq!(
            list_from_value(&json!(["a", 2, null, "  "])),
            vec!["a".to_string(), "2".to_string()]
        );
        assert!(list_from_value(&json!(7)).is_empty());
    }

    #[test]
    fn list_split_keeps_thousands_separators() {
        assert_eq!(
            list_from_value(&json!("1,200 instant winners of a $10 voucher")),
            vec!["1,200 instant winners of a $10 voucher"]
        );
        assert_eq!(
            list_from_value(&json!("50 x hoodies, 1,000 x caps,2 x bikes")),
            vec!["50 x hoodies", "1,000 x caps", "2 x bikes"]
        );
        assert_eq!(list_from_value(&json!("1,2,3")), vec!["1", "2", "3"]);
    }

    #[test]
    fn malformed_fields_default_instead_of_failing() {
        #[derive(Deserialize)]
        struct LooseFields {
            #[serde(default, deserialize_with = "opt_text")]
            label: Option<String>,
            #[serde(default, deserialize_with = "string_list")]
            items: Vec<String>,
        }
        let fields: LooseFields =
            serde_json::from_value(json!({"label": {"bad": true}, "items": false})).unwrap();
        assert_eq!(fields.label, None);
        assert!(fields.items.is_empty());
    }
}
