//! Lenient field readers for untyped agent records.
//!
//! Agents are inconsistent about types: counts arrive as numbers or strings,
//! lists as arrays or missing. Each reader returns `None` for anything it
//! cannot use so callers decide the default.

use serde_json::Value;

/// Non-blank string, trimmed
pub fn string(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// String or number rendered as text
pub fn text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        _ => string(record, key),
    }
}

/// Non-negative integer given as a number or numeric string
pub fn count(record: &Value, key: &str) -> Option<u64> {
    match record.get(key)? {
        Value::Number(n) => {
            n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// HTTP-style status code given as a number or numeric string
pub fn status_code(record: &Value, key: &str) -> Option<u16> {
    count(record, key).and_then(|n| u16::try_from(n).ok())
}

/// Boolean, also accepting "true"/"false" strings
pub fn flag(record: &Value, key: &str) -> Option<bool> {
    match record.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-blank strings from an array, skipping other element types
pub fn string_list(record: &Value, key: &str) -> Option<Vec<String>> {
    let items = record.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}
