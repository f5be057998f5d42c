//! Shared test utilities for the cuiscope workspace.
//!
//! `xtask` needs `normalize_nondeterministic` at runtime, so this lives in
//! its own crate instead of a `#[cfg(test)]` module.

use serde_json::Value;

pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
pub const VERSION_PLACEHOLDER: &str = "__VERSION__";

const TIMESTAMP_KEYS: [&str; 3] = ["started_at", "ended_at", "created_at"];

/// Normalize nondeterministic JSON fields for golden-file comparison.
///
/// `tool.version` is replaced only when the root is a report envelope (has
/// `schema`, `tool`, `run` and `data`). Timestamp keys and `duration_ms`
/// are replaced at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "run", "data"]
            .iter()
            .all(|key| obj.contains_key(*key));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String(VERSION_PLACEHOLDER.to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

/// Parse report text and normalize it.
pub fn normalize_report_text(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(text).map(normalize_nondeterministic)
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if map.contains_key(key) {
                    map.insert(
                        key.to_string(),
                        Value::String(TIMESTAMP_PLACEHOLDER.to_string()),
                    );
                }
            }
            if map.contains_key("duration_ms") {
                map.insert("duration_ms".to_string(), Value::Number(0.into()));
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}
