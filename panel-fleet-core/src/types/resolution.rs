//! Resolution request/response types

use serde::{Deserialize, Serialize};

use panel_fleet_client::{ApiError, Server};

use super::domain::{DomainKind, DomainRecord};

/// How deep a resolution looks on each server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Main domains only (one call per server)
    Fast,
    /// Fast first, Full only when Fast finds nothing
    #[default]
    Smart,
    /// Main and subordinate domains
    Full,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Smart => write!(f, "smart"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "smart" => Ok(Self::Smart),
            "full" => Ok(Self::Full),
            other => Err(format!("unknown search mode '{other}' (expected fast, smart or full)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionRequest {
    pub domain: String,
    #[serde(default)]
    pub mode: SearchMode,
}

impl ResolutionRequest {
    pub fn new(domain: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            domain: domain.into(),
            mode,
        }
    }
}

/// One server on which the target domain was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub server: Server,
    pub record: DomainRecord,
    pub match_kind: DomainKind,
    pub reachable: bool,
    /// Position of the server in scan order
    pub scan_index: usize,
}

impl MatchResult {
    pub fn new(server: Server, record: DomainRecord, scan_index: usize) -> Self {
        Self {
            server,
            match_kind: record.kind,
            record,
            reachable: true,
            scan_index,
        }
    }
}

/// Outcome of scanning a single server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ServerScanStatus {
    Scanned,
    /// Scanned, but some accounts' subordinate discovery failed or was aborted
    #[serde(rename_all = "camelCase")]
    Partial {
        failed_accounts: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        aborted: Option<ApiError>,
    },
    /// Failed the connectivity probe
    Unreachable { error: ApiError },
    /// The account listing failed
    InventoryUnavailable { error: ApiError },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerScan {
    pub server_id: String,
    #[serde(flatten)]
    pub status: ServerScanStatus,
}

impl ServerScan {
    pub fn is_skipped(&self) -> bool {
        matches!(
            self.status,
            ServerScanStatus::Unreachable { .. } | ServerScanStatus::InventoryUnavailable { .. }
        )
    }
}

/// What a scan touched, in scan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// `Fast` or `Full`; a smart resolution reports the pass that produced the answer
    pub mode_used: SearchMode,
    pub servers: Vec<ServerScan>,
}

impl ScanReport {
    pub fn new(mode_used: SearchMode) -> Self {
        Self {
            mode_used,
            servers: Vec::new(),
        }
    }

    pub fn record(&mut self, server_id: &str, status: ServerScanStatus) {
        self.servers.push(ServerScan {
            server_id: server_id.to_string(),
            status,
        });
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ServerScan> {
        self.servers.iter().filter(|s| s.is_skipped())
    }

    pub fn scanned(&self) -> impl Iterator<Item = &ServerScan> {
        self.servers.iter().filter(|s| !s.is_skipped())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResponse {
    pub canonical: Option<MatchResult>,
    /// All matches, ranked
    pub candidates: Vec<MatchResult>,
    pub ambiguous: bool,
    pub report: ScanReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parse_and_display() {
        assert_eq!("FULL".parse::<SearchMode>(), Ok(SearchMode::Full));
        assert_eq!(SearchMode::Fast.to_string(), "fast");
        assert!("deep".parse::<SearchMode>().is_err());
        assert_eq!(SearchMode::default(), SearchMode::Smart);
    }

    #[test]
    fn report_splits_skipped() {
        let mut report = ScanReport::new(SearchMode::Fast);
        report.record("1", ServerScanStatus::Scanned);
        report.record(
            "2",
            ServerScanStatus::Unreachable {
                error: ApiError::Timeout {
                    server: "2".into(),
                    detail: "t".into(),
                },
            },
        );
        assert_eq!(report.scanned().count(), 1);
        assert_eq!(report.skipped().next().map(|s| s.server_id.as_str()), Some("2"));
    }

    #[test]
    fn scan_status_serializes_flat() {
        let scan = ServerScan {
            server_id: "4".into(),
            status: ServerScanStatus::Partial {
                failed_accounts: 2,
                aborted: None,
            },
        };
        let json = serde_json::to_value(&scan).unwrap();
        assert_eq!(json["serverId"], "4");
        assert_eq!(json["status"], "partial");
        assert_eq!(json["failedAccounts"], 2);
    }
}
