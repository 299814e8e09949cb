//! Extraction of human-readable notices from backend responses.
//!
//! The backend attaches an optional `message` (or legacy `msg`) field to its
//! JSON bodies. The console surfaces it as a transient toast: success styling
//! for 2xx responses, error styling otherwise.

use serde_json::Value;

/// Pull the `message`/`msg` field out of a response body, if present.
///
/// `message` wins when both fields are set. Empty strings are treated as
/// absent.
pub fn extract_notice(body: &Value) -> Option<String> {
    let text = body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("msg").and_then(Value::as_str))?;

    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}
