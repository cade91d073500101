//! Parse the usage endpoint's JSON body.

use serde_json::Value;

use super::types::UsageSnapshot;
use crate::error::UsageError;

/// Parse a usage response body.
///
/// Expected shape:
/// ```text
/// {
///   "five_hour":        { "utilization": 45.0, "resets_at": "2026-01-01T17:00:00+00:00" },
///   "seven_day":        { "utilization": 28.0, "resets_at": "2026-01-06T12:00:00+00:00" },
///   "seven_day_sonnet": null
/// }
/// ```
///
/// A top-level `error` field is reported as [`UsageError::FetchFailed`].
/// Unknown fields are ignored.
pub fn parse_usage_response(body: &str) -> Result<UsageSnapshot, UsageError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| UsageError::FetchFailed(format!("invalid response JSON: {}", e)))?;

    if let Some(err) = value.get("error").filter(|e| !e.is_null()) {
        return Err(UsageError::FetchFailed(error_message(err)));
    }

    serde_json::from_value(value)
        .map_err(|e| UsageError::FetchFailed(format!("unexpected response shape: {}", e)))
}

/// Pull a readable message out of an `error` field
fn error_message(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| map.get("type").and_then(Value::as_str))
            .unwrap_or("endpoint returned an error")
            .to_string(),
        other => other.to_string(),
    }
}
