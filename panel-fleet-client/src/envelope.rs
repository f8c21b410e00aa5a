//! Response envelope normalization.
//!
//! The panel wraps results in several shapes depending on the API family:
//!
//! | Family | Success shape | Failure signal |
//! |--------|---------------|----------------|
//! | WHM v1 | `{ "metadata": {...}, "data": {...} }` | `metadata.result == 0`, `metadata.reason` |
//! | WHM legacy | `{ "status": 1, ... }` | top-level `error`, or `status == 0` with `statusmsg` |
//! | cPanel API 2 | `{ "cpanelresult": { "data": [...] } }` | `cpanelresult.error`, `cpanelresult.event.result == 0` |
//! | UAPI | `{ "result": { "status": 1, "data": [...] } }` | `result.status == 0`, `result.errors` |
//!
//! [`normalize`] accepts any of them and either passes the body through or
//! returns the matching [`ApiError`].

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::types::Endpoint;

/// Phrases a panel uses when it rejects the caller's credentials.
const AUTH_MARKERS: &[&str] = &[
    "access denied",
    "unauthorized",
    "authentication failed",
    "invalid api token",
    "token denied",
    "login failed",
];

/// A failure reported inside an otherwise valid envelope.
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    pub code: Option<String>,
    pub message: String,
}

impl RawApiError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    fn with_code(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Map to [`ApiError`], recognizing credential rejections.
    pub(crate) fn into_api_error(self, server_id: &str) -> ApiError {
        if is_auth_message(&self.message) {
            ApiError::AuthError {
                server: server_id.to_string(),
                raw_message: Some(self.message),
            }
        } else {
            ApiError::RemoteError {
                server: server_id.to_string(),
                raw_code: self.code,
                message: self.message,
            }
        }
    }
}

fn is_auth_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    AUTH_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// `0`, `"0"` and `false` all mean failure in panel status fields.
fn is_failure_flag(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_i64() == Some(0),
        Value::String(s) => s.trim() == "0",
        Value::Bool(b) => !b,
        _ => false,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn join_errors(value: Option<&Value>) -> Option<String> {
    let errors: Vec<String> = value?
        .as_array()?
        .iter()
        .filter_map(|e| match e {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect();
    (!errors.is_empty()).then(|| errors.join("; "))
}

fn detect_failure(body: &Value) -> Option<RawApiError> {
    if let Some(message) = non_empty_str(body.get("error")) {
        return Some(RawApiError::new(message));
    }

    if let Some(metadata) = body.get("metadata")
        && metadata.get("result").is_some_and(is_failure_flag)
    {
        let reason = non_empty_str(metadata.get("reason")).unwrap_or("operation failed");
        let command = non_empty_str(metadata.get("command")).map(str::to_string);
        return Some(RawApiError::with_code(command, reason));
    }

    if body.get("status").is_some_and(is_failure_flag) {
        let reason = non_empty_str(body.get("statusmsg")).unwrap_or("operation failed");
        return Some(RawApiError::new(reason));
    }

    if let Some(cpanel) = body.get("cpanelresult") {
        if let Some(message) = non_empty_str(cpanel.get("error")) {
            return Some(RawApiError::new(message));
        }
        if cpanel
            .get("event")
            .and_then(|e| e.get("result"))
            .is_some_and(is_failure_flag)
        {
            let reason = non_empty_str(cpanel.get("event").and_then(|e| e.get("reason")))
                .unwrap_or("operation failed");
            return Some(RawApiError::new(reason));
        }
    }

    if let Some(result) = body.get("result").filter(|r| r.is_object())
        && result.get("status").is_some_and(is_failure_flag)
    {
        let message =
            join_errors(result.get("errors")).unwrap_or_else(|| "operation failed".to_string());
        return Some(RawApiError::new(message));
    }

    None
}

fn has_payload(endpoint: &Endpoint, body: &Value) -> bool {
    if endpoint.is_whm() {
        body.get("data").is_some() || body.get("metadata").is_some()
    } else {
        body.get("cpanelresult").is_some()
            || body.get("result").is_some_and(Value::is_object)
            || body.get("data").is_some()
    }
}

/// Normalize a decoded response body.
///
/// Returns the body unchanged when it is a recognized success envelope.
pub fn normalize(server_id: &str, endpoint: &Endpoint, body: Value) -> Result<Value> {
    if !body.is_object() {
        return Err(ApiError::MalformedResponse {
            server: server_id.to_string(),
            detail: format!("{}: response is not a JSON object", endpoint.label()),
        });
    }

    if let Some(raw) = detect_failure(&body) {
        let error = raw.into_api_error(server_id);
        log::debug!("[{server_id}] {endpoint} reported failure: {error}");
        return Err(error);
    }

    if !has_payload(endpoint, &body) {
        return Err(ApiError::MalformedResponse {
            server: server_id.to_string(),
            detail: format!("{}: invalid response format", endpoint.label()),
        });
    }

    Ok(body)
}
