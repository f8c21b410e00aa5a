//! Per-server domain inventory

use serde::{Deserialize, Serialize};

use panel_fleet_client::ApiError;

use super::domain::{DomainKind, DomainRecord};
use super::resolution::ServerScanStatus;

/// A discovery call that failed for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryFailure {
    pub account_user: String,
    /// Strategy source label, e.g. `Addon::listaddondomains`
    pub strategy: String,
    pub error: ApiError,
}

/// Every domain record known for one server, rebuilt for each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub server_id: String,
    pub account_count: usize,
    pub records: Vec<DomainRecord>,
    /// Transport failures that cut an account's cascade short
    pub failures: Vec<DiscoveryFailure>,
    /// Set when credentials were rejected mid-build; remaining accounts were not queried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<ApiError>,
}

impl Inventory {
    pub fn new(server_id: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            account_count: 0,
            records: Vec::new(),
            failures: Vec::new(),
            aborted: None,
        }
    }

    /// Records whose name equals the normalized `name`.
    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DomainRecord> + 'a {
        self.records.iter().filter(move |r| r.name == name)
    }

    pub fn main_domains(&self) -> impl Iterator<Item = &DomainRecord> {
        self.records.iter().filter(|r| r.kind == DomainKind::Main)
    }

    /// Whether any part of the build was degraded.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() || self.aborted.is_some()
    }

    /// Scan report entry for a server whose inventory was built.
    pub fn scan_status(&self) -> ServerScanStatus {
        if self.is_partial() {
            ServerScanStatus::Partial {
                failed_accounts: self.failures.len(),
                aborted: self.aborted.clone(),
            }
        } else {
            ServerScanStatus::Scanned
        }
    }
}
