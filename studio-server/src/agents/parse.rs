//! Lenient JSON extraction from model output

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use super::AgentError;

/// Parse the outermost `{ ... }` span of `text`.
///
/// Models tend to wrap JSON in code fences or a sentence of prose, so
/// everything before the first `{` and after the last `}` is ignored.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, AgentError> {
    let start = text.find('{');
    let end = text.rfind('}');

    match (start, end) {
        (Some(start), Some(end)) if end > start => serde_json::from_str(&text[start..=end])
            .map_err(|e| AgentError::Parse(format!("Invalid JSON in model response: {}", e))),
        _ => Err(AgentError::Parse(
            "Model response did not contain a JSON object".to_string(),
        )),
    }
}

// Model output is loosely typed. The `lenient_*` helpers are used with
// `#[serde(default, deserialize_with = ...)]` and turn a field of the wrong
// shape into its default instead of failing the whole reply.

/// Number, or a string holding one
pub fn lenient_f64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// String; numbers and booleans are rendered as text
pub fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Array of strings, or one comma-separated string
pub fn lenient_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    })
}

/// Array of objects; elements that do not deserialize are skipped
pub fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Clamp to [0, 1]; non-finite or missing values become `default`
pub fn clamp_unit(value: Option<f64>, default: f64) -> f64 {
    clamp_range(value, 0.0, 1.0, default)
}

/// Clamp to [min, max]; non-finite or missing values become `default`
pub fn clamp_range(value: Option<f64>, min: f64, max: f64, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(min, max),
        _ => default,
    }
}

/// Trimmed non-empty string, or `default`
pub fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}
