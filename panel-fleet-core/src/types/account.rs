//! Hosting account type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use panel_fleet_client::AccountEntry;

use crate::utils::datetime;
use crate::utils::domain::normalize_domain;

/// Account state as reported by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            other => Err(format!("unknown account status '{other}'")),
        }
    }
}

/// One hosting tenant on one server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Owning server id
    pub server_id: String,
    /// System user name
    pub user: String,
    /// Primary domain, normalized
    pub main_domain: String,
    pub suspended: bool,
    #[serde(with = "datetime::option", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_used_mb: Option<f64>,
    /// Hosting package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Account {
    /// Build from a decoded listing entry.
    ///
    /// Returns `None` when the entry's domain normalizes to nothing.
    pub fn from_entry(server_id: &str, entry: AccountEntry) -> Option<Self> {
        let main_domain = normalize_domain(&entry.domain)?;
        Some(Self {
            server_id: server_id.to_string(),
            user: entry.user,
            main_domain,
            suspended: entry.suspended,
            created_at: entry.unix_startdate.and_then(datetime::from_unix),
            disk_used_mb: entry.disk_used_mb,
            package: entry.plan,
            email: entry.email,
        })
    }

    pub fn status(&self) -> AccountStatus {
        if self.suspended {
            AccountStatus::Suspended
        } else {
            AccountStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(domain: &str) -> AccountEntry {
        AccountEntry {
            user: "alice".into(),
            domain: domain.into(),
            suspended: true,
            unix_startdate: Some(1_600_000_000),
            disk_used_mb: Some(12.5),
            plan: Some("gold".into()),
            email: None,
        }
    }

    #[test]
    fn from_entry_normalizes_domain() {
        let account = Account::from_entry("3", entry(" Alice.COM. ")).unwrap();
        assert_eq!(account.main_domain, "alice.com");
        assert_eq!(account.server_id, "3");
        assert_eq!(account.status(), AccountStatus::Suspended);
        assert!(account.created_at.is_some());
    }

    #[test]
    fn from_entry_rejects_blank_domain() {
        assert!(Account::from_entry("3", entry("  ")).is_none());
    }

    #[test]
    fn status_parses() {
        assert_eq!("Active".parse::<AccountStatus>(), Ok(AccountStatus::Active));
        assert!("gone".parse::<AccountStatus>().is_err());
    }
}
