//! Predicates and renderings over JSON documents.
//!
//! Documents are plain `serde_json::Value`s. Emptiness is the one derived
//! notion the merge engine needs: it decides whether a value is a gap that
//! may be filled.

use serde_json::Value;

/// Returns `true` if `value` counts as a gap for merging purposes.
///
/// `Null`, whitespace-only strings, empty objects and empty arrays are
/// empty. Numbers and booleans are never empty, so `0` and `false` are
/// treated as real data.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Render `value` for a change log entry, cut to at most `width` characters.
///
/// Strings render without quotes; everything else renders as compact JSON.
/// Truncated output ends in `...`.
pub fn preview(value: &Value, width: usize) -> String {
    let rendered = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate(rendered, width)
}

fn truncate(text: String, width: usize) -> String {
    if text.chars().count() <= width {
        return text;
    }
    let keep = width.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Returns `true` if every element of `items` is a string.
pub(crate) fn all_strings(items: &[Value]) -> bool {
    items.iter().all(Value::is_string)
}

/// Returns `true` if every element of `items` is an object.
pub(crate) fn all_objects(items: &[Value]) -> bool {
    items.iter().all(Value::is_object)
}
