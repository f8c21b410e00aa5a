//! Domain record type definitions

use serde::{Deserialize, Serialize};

use super::account::Account;

/// How a domain is attached to its account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainKind {
    Main,
    Subdomain,
    Addon,
    Parked,
}

impl std::fmt::Display for DomainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Main => "main",
            Self::Subdomain => "subdomain",
            Self::Addon => "addon",
            Self::Parked => "parked",
        };
        f.write_str(label)
    }
}

/// A domain known to live on a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    /// Normalized name
    pub name: String,
    pub kind: DomainKind,
    /// Owning account's system user
    pub account_user: String,
    pub server_id: String,
    /// Endpoint that reported the record, e.g. `listaccts` or `SubDomain::listsubdomains`
    pub source: String,
}

impl DomainRecord {
    /// The main-domain record of an account.
    pub fn main(account: &Account) -> Self {
        Self {
            name: account.main_domain.clone(),
            kind: DomainKind::Main,
            account_user: account.user.clone(),
            server_id: account.server_id.clone(),
            source: "listaccts".to_string(),
        }
    }

    /// A subordinate record discovered for `account`. `name` must already be normalized.
    pub fn subordinate(
        account: &Account,
        name: String,
        kind: DomainKind,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name,
            kind,
            account_user: account.user.clone(),
            server_id: account.server_id.clone(),
            source: source.into(),
        }
    }
}
