//! Mapping of transport failures and error bodies onto [`PortalError`].
//!
//! The backend reports failures as `{"detail": ...}` where `detail` is either
//! a plain string or a list of validation entries with a `msg` field.

use campus_core::PortalError;
use serde_json::Value;

const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

/// Extracts the human readable message from an error body.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("detail") {
        Some(Value::String(detail)) => non_empty(detail),
        Some(Value::Array(entries)) => {
            let messages: Vec<String> = entries.iter().filter_map(validation_entry).collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Some(Value::Object(_)) => value.get("detail").and_then(validation_entry),
        _ => value
            .get("message")
            .and_then(Value::as_str)
            .and_then(non_empty),
    }
}

fn validation_entry(entry: &Value) -> Option<String> {
    let msg = entry.get("msg").and_then(Value::as_str)?;
    let field = entry
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| loc.last())
        .and_then(Value::as_str);
    Some(match field {
        Some(field) => format!("{field}: {msg}"),
        None => msg.to_string(),
    })
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Maps a non-success response onto a [`PortalError`].
pub fn map_http_error(status: u16, body: &str) -> PortalError {
    let detail = extract_detail(body);
    match status {
        401 => PortalError::Unauthorized(detail.unwrap_or_else(|| SESSION_EXPIRED.to_string())),
        _ => PortalError::api(
            status,
            detail.unwrap_or_else(|| format!("Request failed with status {status}")),
        ),
    }
}

/// Maps a failed send onto [`PortalError::Timeout`] or [`PortalError::Network`].
pub fn map_transport_error(err: &reqwest::Error, timeout_secs: u64) -> PortalError {
    if err.is_timeout() {
        PortalError::Timeout {
            seconds: timeout_secs,
        }
    } else {
        PortalError::Network(err.to_string())
    }
}
