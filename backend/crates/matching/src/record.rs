//! Dot-path reads over JSON records. Arrays along a path are flattened.

use std::collections::BTreeSet;

use serde_json::Value;

/// All non-empty leaf values reachable by `path`, rendered as strings.
pub fn values_at(record: &Value, path: &str) -> Vec<String> {
    let mut current: Vec<&Value> = vec![record];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            collect_field(value, segment, &mut next);
        }
        current = next;
    }

    current
        .into_iter()
        .flat_map(|v| match v {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .filter_map(render_scalar)
        .collect()
}

fn collect_field<'a>(value: &'a Value, segment: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(v) = map.get(segment) {
                if !v.is_null() {
                    out.push(v);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_field(item, segment, out);
            }
        }
        _ => {}
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First scalar value at `path`, or `None` when the field is null or missing.
pub fn scalar_at(record: &Value, path: &str) -> Option<String> {
    values_at(record, path).into_iter().next()
}

/// Union of the values found at each of `paths`.
pub fn value_set(record: &Value, paths: &[&str]) -> BTreeSet<String> {
    paths
        .iter()
        .flat_map(|path| values_at(record, path))
        .collect()
}

/// Non-null object stored under `key`.
pub fn object_at<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| v.is_object())
}

/// The `id` field as it appears on the wire (still encoded).
pub fn record_id(record: &Value) -> Option<String> {
    scalar_at(record, "id")
}
