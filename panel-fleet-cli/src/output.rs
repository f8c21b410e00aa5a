//! Result rendering
//!
//! Every command prints either a plain-text summary or the serialized result
//! as pretty JSON. Credentials never appear in either: `Server` skips them
//! when serialized.

use std::fmt::{self, Write};

use anyhow::Result;
use serde::Serialize;

use panel_fleet_core::types::{
    Account, AccountSearchResult, Inventory, KeywordSearchResult, MatchResult, ResolutionResponse,
    ScanReport, ServerScanStatus, ServerStatus,
};

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary (default)
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Print `value` in `format`; `text` renders the plain-text form.
pub fn emit<T, F>(format: OutputFormat, value: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&mut String, &T) -> fmt::Result,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => {
            let mut out = String::new();
            text(&mut out, value)?;
            print!("{out}");
        }
    }
    Ok(())
}

fn describe_status(status: &ServerScanStatus) -> String {
    match status {
        ServerScanStatus::Scanned => "scanned".to_string(),
        ServerScanStatus::Partial {
            failed_accounts,
            aborted,
        } => match aborted {
            Some(e) => format!("partial ({failed_accounts} accounts failed, aborted: {e})"),
            None => format!("partial ({failed_accounts} accounts failed)"),
        },
        ServerScanStatus::Unreachable { error } => format!("unreachable: {error}"),
        ServerScanStatus::InventoryUnavailable { error } => {
            format!("inventory unavailable: {error}")
        }
    }
}

/// Only servers that were not cleanly scanned are listed.
fn render_report(out: &mut String, report: &ScanReport) -> fmt::Result {
    let scanned = report.scanned().count();
    writeln!(
        out,
        "Scanned {scanned}/{} servers ({} mode)",
        report.servers.len(),
        report.mode_used
    )?;
    for scan in report
        .servers
        .iter()
        .filter(|s| s.status != ServerScanStatus::Scanned)
    {
        writeln!(out, "  ! {}: {}", scan.server_id, describe_status(&scan.status))?;
    }
    Ok(())
}

pub fn render_match(out: &mut String, m: &MatchResult) -> fmt::Result {
    write!(
        out,
        "{} on server {} ({}) account {} [{}]",
        m.record.name, m.server.id, m.server.address, m.record.account_user, m.match_kind
    )?;
    if !m.reachable {
        write!(out, " (unreachable)")?;
    }
    writeln!(out)
}

pub fn render_resolution(out: &mut String, response: &ResolutionResponse) -> fmt::Result {
    match &response.canonical {
        Some(canonical) => {
            write!(out, "Found: ")?;
            render_match(out, canonical)?;
        }
        None => writeln!(out, "Not found")?,
    }
    if response.ambiguous {
        writeln!(out, "Ambiguous, {} candidates:", response.candidates.len())?;
        for (rank, candidate) in response.candidates.iter().enumerate() {
            write!(out, "  {}. ", rank + 1)?;
            render_match(out, candidate)?;
        }
    }
    render_report(out, &response.report)
}

pub fn render_keyword_search(out: &mut String, result: &KeywordSearchResult) -> fmt::Result {
    writeln!(out, "{} domains match '{}'", result.hits.len(), result.keyword)?;
    for hit in &result.hits {
        writeln!(
            out,
            "  {:<40} {:<10} {:<16} server {}",
            hit.record.name, hit.record.kind, hit.record.account_user, hit.server.id
        )?;
    }
    render_report(out, &result.report)
}

fn render_account_rows(out: &mut String, accounts: &[Account]) -> fmt::Result {
    for account in accounts {
        let created = account
            .created_at
            .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d").to_string());
        let disk = account
            .disk_used_mb
            .map_or_else(|| "-".to_string(), |mb| format!("{mb:.1} MB"));
        writeln!(
            out,
            "  {:<40} {:<16} {:<10} {:<10} {:>12} {:<16} server {}",
            account.main_domain,
            account.user,
            account.status(),
            created,
            disk,
            account.package.as_deref().unwrap_or("-"),
            account.server_id
        )?;
    }
    Ok(())
}

pub fn render_accounts(out: &mut String, accounts: &[Account]) -> fmt::Result {
    writeln!(out, "{} accounts", accounts.len())?;
    render_account_rows(out, accounts)
}

pub fn render_account_search(out: &mut String, result: &AccountSearchResult) -> fmt::Result {
    writeln!(out, "{} accounts match", result.accounts.len())?;
    render_account_rows(out, &result.accounts)?;
    render_report(out, &result.report)
}

pub fn render_status(out: &mut String, rows: &[ServerStatus]) -> fmt::Result {
    for row in rows {
        if row.online {
            writeln!(
                out,
                "  {:<12} {:<32} online  {}",
                row.server_id,
                row.address,
                row.version.as_deref().unwrap_or("unknown")
            )?;
        } else {
            let reason = row
                .error
                .as_ref()
                .map_or_else(String::new, ToString::to_string);
            writeln!(
                out,
                "  {:<12} {:<32} offline {reason}",
                row.server_id, row.address
            )?;
        }
    }
    let online = rows.iter().filter(|r| r.online).count();
    writeln!(out, "{online}/{} servers online", rows.len())
}

pub fn render_inventory(out: &mut String, inventory: &Inventory) -> fmt::Result {
    writeln!(
        out,
        "Server {}: {} accounts, {} domains",
        inventory.server_id,
        inventory.account_count,
        inventory.records.len()
    )?;
    for record in &inventory.records {
        writeln!(
            out,
            "  {:<40} {:<10} {:<16} {}",
            record.name, record.kind, record.account_user, record.source
        )?;
    }
    for failure in &inventory.failures {
        writeln!(
            out,
            "  ! {} via {}: {}",
            failure.account_user, failure.strategy, failure.error
        )?;
    }
    if let Some(error) = &inventory.aborted {
        writeln!(out, "  ! discovery aborted: {error}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_fleet_client::{ApiError, Server, ServerCredentials};
    use panel_fleet_core::types::{DomainKind, DomainRecord, SearchMode};

    fn candidate(server_id: &str, reachable: bool) -> MatchResult {
        let server = Server::new(
            server_id,
            format!("{server_id}.panel.test"),
            ServerCredentials::new("secret-token"),
        );
        let record = DomainRecord {
            name: "shop.example.com".into(),
            kind: DomainKind::Addon,
            account_user: "shop".into(),
            server_id: server_id.into(),
            source: "Addon::listaddondomains".into(),
        };
        let mut m = MatchResult::new(server, record, 0);
        m.reachable = reachable;
        m
    }

    fn render<T: ?Sized>(value: &T, f: impl FnOnce(&mut String, &T) -> fmt::Result) -> String {
        let mut out = String::new();
        f(&mut out, value).unwrap();
        out
    }

    #[test]
    fn resolution_lists_candidates_when_ambiguous() {
        let mut report = ScanReport::new(SearchMode::Full);
        report.record("10", ServerScanStatus::Scanned);
        report.record("2", ServerScanStatus::Scanned);
        report.record(
            "3",
            ServerScanStatus::Unreachable {
                error: ApiError::ConnectionFailed {
                    server: "3".into(),
                    detail: "refused".into(),
                },
            },
        );
        let response = ResolutionResponse {
            canonical: Some(candidate("10", true)),
            candidates: vec![candidate("10", true), candidate("2", false)],
            ambiguous: true,
            report,
        };

        let text = render(&response, render_resolution);
        assert!(text.starts_with("Found: shop.example.com on server 10"));
        assert!(text.contains("  2. shop.example.com on server 2"));
        assert!(text.contains("(unreachable)"));
        assert!(text.contains("Scanned 2/3 servers (full mode)"));
        assert!(text.contains("! 3: unreachable"));
    }

    #[test]
    fn resolution_not_found() {
        let response = ResolutionResponse {
            canonical: None,
            candidates: Vec::new(),
            ambiguous: false,
            report: ScanReport::new(SearchMode::Full),
        };
        assert!(render(&response, render_resolution).starts_with("Not found"));
    }

    #[test]
    fn json_omits_credentials() {
        let json = serde_json::to_string(&candidate("1", true)).unwrap();
        assert!(!json.contains("secret-token"));
        assert!(json.contains("\"matchKind\":\"addon\""));
    }

    #[test]
    fn status_counts_online() {
        let rows = vec![
            ServerStatus {
                server_id: "1".into(),
                address: "a".into(),
                online: true,
                version: Some("11.118".into()),
                error: None,
            },
            ServerStatus {
                server_id: "2".into(),
                address: "b".into(),
                online: false,
                version: None,
                error: Some(ApiError::Timeout {
                    server: "2".into(),
                    detail: "deadline".into(),
                }),
            },
        ];
        let text = render(rows.as_slice(), render_status);
        assert!(text.contains("11.118"));
        assert!(text.contains("offline [2] Request timeout"));
        assert!(text.ends_with("1/2 servers online\n"));
    }
}
