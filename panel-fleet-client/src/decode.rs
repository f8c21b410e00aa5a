//! Typed decoding of normalized panel payloads.
//!
//! Field types drift between panel releases (numbers arrive as strings, flags
//! as `0`/`1`/`"1"`), so decoding works from [`Value`] and is lenient per
//! field but strict about the container a listing lives in.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// One hosting account as reported by `listaccts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub user: String,
    pub domain: String,
    pub suspended: bool,
    /// Creation time as Unix seconds.
    pub unix_startdate: Option<i64>,
    /// Disk usage in megabytes.
    pub disk_used_mb: Option<f64>,
    /// Hosting package name.
    pub plan: Option<String>,
    pub email: Option<String>,
}

fn malformed(server_id: &str, detail: impl Into<String>) -> ApiError {
    ApiError::MalformedResponse {
        server: server_id.to_string(),
        detail: detail.into(),
    }
}

fn as_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "yes"),
        _ => false,
    }
}

fn as_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a disk usage figure such as `"512M"`, `"1.5G"`, `"300K"` or a bare number of megabytes.
///
/// `"none"` and `"unlimited"` yield `None`.
pub fn parse_disk_mb(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            let (number, unit) = match s.char_indices().find(|(_, c)| c.is_ascii_alphabetic()) {
                Some((i, _)) => (&s[..i], s[i..].to_ascii_uppercase()),
                None => (s, String::new()),
            };
            let number: f64 = number.trim().parse().ok()?;
            match unit.as_str() {
                "" | "M" | "MB" => Some(number),
                "K" | "KB" => Some(number / 1024.0),
                "G" | "GB" => Some(number * 1024.0),
                "T" | "TB" => Some(number * 1024.0 * 1024.0),
                _ => None,
            }
        }
        _ => None,
    }
}

fn decode_account(value: &Value) -> Option<AccountEntry> {
    let user = as_text(value.get("user"))?;
    let domain = as_text(value.get("domain"))?;
    Some(AccountEntry {
        user,
        domain,
        suspended: as_flag(value.get("suspended")),
        unix_startdate: as_i64(value.get("unix_startdate")),
        disk_used_mb: value.get("diskused").and_then(parse_disk_mb),
        plan: as_text(value.get("plan")),
        email: as_text(value.get("email")),
    })
}

/// Decode the `data.acct` list of a `listaccts` response.
///
/// Entries without a user or domain are skipped with a warning. A body
/// without an `acct` list is malformed.
pub fn decode_accounts(server_id: &str, body: &Value) -> Result<Vec<AccountEntry>> {
    let list = body
        .get("data")
        .and_then(|d| d.get("acct"))
        .or_else(|| body.get("acct"))
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(server_id, "listaccts: missing data.acct list"))?;

    let mut accounts = Vec::with_capacity(list.len());
    for entry in list {
        if let Some(account) = decode_account(entry) {
            accounts.push(account);
        } else {
            log::warn!("[{server_id}] Skipping account entry without user/domain");
        }
    }
    Ok(accounts)
}

fn domain_list(body: &Value) -> Option<&Vec<Value>> {
    [
        body.get("data"),
        body.get("result").and_then(|r| r.get("data")),
        body.get("cpanelresult").and_then(|r| r.get("data")),
    ]
    .into_iter()
    .flatten()
    .find_map(Value::as_array)
}

/// Decode a per-account domain listing.
///
/// The list may sit at `data`, `result.data` or `cpanelresult.data`; entries
/// are either plain strings or objects with a `domain` field. Names are
/// returned as reported, without normalization.
pub fn decode_domain_names(server_id: &str, body: &Value) -> Result<Vec<String>> {
    let Some(list) = domain_list(body) else {
        let empty_payload = [
            body.get("data"),
            body.get("result").and_then(|r| r.get("data")),
            body.get("cpanelresult").and_then(|r| r.get("data")),
        ]
        .into_iter()
        .flatten()
        .all(Value::is_null);
        if empty_payload {
            return Ok(Vec::new());
        }
        return Err(malformed(server_id, "domain listing is not a list"));
    };

    Ok(list
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(_) => as_text(entry.get("domain")),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .collect())
}

/// Read `data.version` from a `version` response, `"unknown"` when absent.
pub fn decode_version(body: &Value) -> String {
    as_text(body.get("data").and_then(|d| d.get("version")))
        .or_else(|| as_text(body.get("version")))
        .unwrap_or_else(|| "unknown".to_string())
}
