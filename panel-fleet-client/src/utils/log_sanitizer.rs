//! Log sanitization helpers.
//!
//! Panel responses can be large (full account listings) and occasionally echo
//! request details back, so bodies are clipped before they reach a log line.

/// Maximum number of bytes of a response body included in a log line.
const BODY_LOG_LIMIT: usize = 256;

/// Clip `s` to [`BODY_LOG_LIMIT`] bytes on a char boundary.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= BODY_LOG_LIMIT {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= BODY_LOG_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// Replace every occurrence of `secret` in `text`.
///
/// Empty secrets leave the text untouched.
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        text.to_string()
    } else {
        text.replace(secret, "<redacted>")
    }
}
