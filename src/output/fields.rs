//! Field-path resolution over search hits
//!
//! `resolve("user.name", hit)` walks `hit._source.user.name`. When the walk
//! hits a missing key or a falsy value (`null`, `false`, `0`, `""`), it falls
//! back to the literal key `"user.name"` on the hit itself, then to `""`.
//! A real `0`, `false` or empty string in `_source` is therefore
//! indistinguishable from a missing field.

use serde_json::{Number, Value as JsonValue};

/// Resolve a dot-separated `path` against `hit`
pub fn resolve(path: &str, hit: &JsonValue) -> JsonValue {
    if let Some(found) = walk(hit.get("_source"), path).filter(|v| is_truthy(v)) {
        return found.clone();
    }

    match hit.get(path) {
        Some(value) if is_truthy(value) => value.clone(),
        _ => JsonValue::String(String::new()),
    }
}

fn walk<'a>(root: Option<&'a JsonValue>, path: &str) -> Option<&'a JsonValue> {
    path.split('.').try_fold(root?, |current, segment| match current {
        JsonValue::Object(map) => map.get(segment),
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// JavaScript truthiness; empty objects and arrays are truthy
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Text form of a value the way a JavaScript console shows it:
/// `1.0` as `1`, strings without quotes, containers as compact JSON
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => display_number(n),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

/// Optional value for the summary line; missing prints `null`
pub fn display_optional(value: Option<&JsonValue>) -> String {
    value.map(display_value).unwrap_or_else(|| "null".to_string())
}

fn display_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
