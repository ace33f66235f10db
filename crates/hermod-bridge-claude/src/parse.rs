//! Field access helpers for Claude Code hook payloads.
//!
//! Hook payloads have shipped with both snake_case and camelCase
//! field names across Claude Code versions, so lookups try both.

use serde_json::Value;

/// String field lookup, trying the snake_case name then its
/// camelCase form.
pub(crate) fn get_str(v: &Value, snake_key: &str) -> String {
    if let Some(s) = v.get(snake_key).and_then(Value::as_str) {
        return s.to_string();
    }
    let camel = snake_to_camel(snake_key);
    v.get(&camel)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Whole-value lookup with the same dual-name treatment. Missing
/// fields come back as `Value::Null`.
pub(crate) fn get_value(v: &Value, snake_key: &str) -> Value {
    if let Some(found) = v.get(snake_key) {
        return found.clone();
    }
    let camel = snake_to_camel(snake_key);
    v.get(&camel).cloned().unwrap_or(Value::Null)
}

pub(crate) fn snake_to_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for c in s.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
