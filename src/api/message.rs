//! Turning API response bodies into notification text.
//!
use serde_json::Value;

/// The `detail` string of an error body, e.g. `{"detail": "Not found."}`.
pub fn detail_message(body: &Value) -> Option<String> {
    body.get("detail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Every top-level value of an error body joined with `", "`.
///
/// Field errors come as `{"field": ["msg", ...]}`, so arrays are flattened
/// first. Returns `None` when nothing printable is found.
pub fn flatten_message(body: &Value) -> Option<String> {
    let mut parts = Vec::new();
    match body {
        Value::Object(map) => {
            for value in map.values() {
                collect_parts(value, &mut parts);
            }
        }
        other => collect_parts(other, &mut parts),
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn collect_parts(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            if !s.is_empty() {
                out.push(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_parts(item, out);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                collect_parts(item, out);
            }
        }
        Value::Bool(_) | Value::Number(_) => out.push(value.to_string()),
    }
}

/// Confirmation text from a success envelope such as
/// `{"message": "User created successfully!", "data": {...}}`.
pub fn success_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
