//! Fleet search and status types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use panel_fleet_client::{ApiError, Server};

use crate::error::{CoreError, CoreResult};
use crate::utils::pattern::NamePattern;

use super::account::{Account, AccountStatus};
use super::domain::DomainRecord;
use super::resolution::ScanReport;

/// Criteria for an account search. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFilter {
    /// Substring, or `*`/`?` wildcard, matched against main domain and user
    pub pattern: Option<String>,
    /// Inclusive lower bound on creation day (UTC)
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on creation day (UTC)
    pub created_to: Option<NaiveDate>,
    pub min_disk_mb: Option<f64>,
    /// Hosting package, case-insensitive
    pub package: Option<String>,
    pub status: Option<AccountStatus>,
}

impl AccountFilter {
    pub fn validate(&self) -> CoreResult<()> {
        if let (Some(from), Some(to)) = (self.created_from, self.created_to)
            && from > to
        {
            return Err(CoreError::ValidationError(format!(
                "created_from {from} is after created_to {to}"
            )));
        }
        if let Some(min) = self.min_disk_mb
            && (min.is_nan() || min < 0.0)
        {
            return Err(CoreError::ValidationError(
                "min_disk_mb must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Compile once for repeated matching.
    pub fn compile(&self) -> CompiledAccountFilter<'_> {
        CompiledAccountFilter {
            filter: self,
            pattern: self
                .pattern
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .map(NamePattern::new),
        }
    }
}

/// An [`AccountFilter`] with its name pattern compiled.
pub struct CompiledAccountFilter<'a> {
    filter: &'a AccountFilter,
    pattern: Option<NamePattern>,
}

impl CompiledAccountFilter<'_> {
    pub fn matches(&self, account: &Account) -> bool {
        let f = self.filter;

        if let Some(pattern) = &self.pattern
            && !pattern.matches(&account.main_domain)
            && !pattern.matches(&account.user)
        {
            return false;
        }

        if f.created_from.is_some() || f.created_to.is_some() {
            let Some(day) = account.created_at.map(|dt| dt.date_naive()) else {
                return false;
            };
            if f.created_from.is_some_and(|from| day < from)
                || f.created_to.is_some_and(|to| day > to)
            {
                return false;
            }
        }

        if let Some(min) = f.min_disk_mb
            && account.disk_used_mb.unwrap_or(0.0) < min
        {
            return false;
        }

        if let Some(package) = &f.package
            && !account
                .package
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case(package.trim()))
        {
            return false;
        }

        f.status.is_none_or(|status| account.status() == status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSearchResult {
    pub accounts: Vec<Account>,
    pub report: ScanReport,
}

/// A domain record matched by a keyword search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainHit {
    pub server: Server,
    pub record: DomainRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSearchResult {
    pub keyword: String,
    pub hits: Vec<DomainHit>,
    pub report: ScanReport,
}

/// Reachability of one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub server_id: String,
    pub address: String,
    pub online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}
