//! Subordinate-domain discovery strategies.
//!
//! Each strategy is one per-account remote call. The inventory builder runs
//! them as a chain: the first one that yields records wins.

use std::sync::Arc;

use async_trait::async_trait;
use panel_fleet_client::{
    ControlPanelClient, Endpoint, Result as ApiResult, Server, decode_domain_names,
};

use crate::config::StrategyKind;
use crate::types::{Account, DomainKind, DomainRecord};
use crate::utils::domain::{normalize_domain, same_domain};

#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    /// Label stored as the record source, e.g. `SubDomain::listsubdomains`
    fn source(&self) -> String;

    fn kind(&self) -> DomainKind;

    /// Normalized, de-duplicated records for `account`, excluding its main domain.
    async fn discover(
        &self,
        client: &dyn ControlPanelClient,
        server: &Server,
        account: &Account,
    ) -> ApiResult<Vec<DomainRecord>>;
}

/// A strategy backed by a single cPanel module function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointStrategy {
    module: &'static str,
    function: &'static str,
    kind: DomainKind,
}

impl EndpointStrategy {
    pub const fn new(module: &'static str, function: &'static str, kind: DomainKind) -> Self {
        Self {
            module,
            function,
            kind,
        }
    }

    pub const fn for_kind(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Subdomains => {
                Self::new("SubDomain", "listsubdomains", DomainKind::Subdomain)
            }
            StrategyKind::SubdomainsAlt => Self::new("SubDomain", "list", DomainKind::Subdomain),
            StrategyKind::Addon => Self::new("Addon", "listaddondomains", DomainKind::Addon),
            StrategyKind::Parked => Self::new("Park", "listparkeddomains", DomainKind::Parked),
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for EndpointStrategy {
    fn source(&self) -> String {
        format!("{}::{}", self.module, self.function)
    }

    fn kind(&self) -> DomainKind {
        self.kind
    }

    async fn discover(
        &self,
        client: &dyn ControlPanelClient,
        server: &Server,
        account: &Account,
    ) -> ApiResult<Vec<DomainRecord>> {
        let endpoint = Endpoint::cpanel(&account.user, self.module, self.function);
        let body = client.call(server, &endpoint, &[]).await?;
        let names = decode_domain_names(&server.id, &body)?;

        let source = self.source();
        let mut records: Vec<DomainRecord> = Vec::with_capacity(names.len());
        for name in names.iter().filter_map(|n| normalize_domain(n)) {
            if same_domain(&name, &account.main_domain) || records.iter().any(|r| r.name == name) {
                continue;
            }
            records.push(DomainRecord::subordinate(account, name, self.kind, &source));
        }
        Ok(records)
    }
}

/// Strategy chain for the configured kinds, in the given order.
pub fn build_cascade(kinds: &[StrategyKind]) -> Vec<Arc<dyn DiscoveryStrategy>> {
    kinds
        .iter()
        .map(|kind| Arc::new(EndpointStrategy::for_kind(*kind)) as Arc<dyn DiscoveryStrategy>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockControlPanelClient, account, server};

    #[test]
    fn default_cascade_order() {
        let sources: Vec<String> = build_cascade(&StrategyKind::DEFAULT_CASCADE)
            .iter()
            .map(|s| s.source())
            .collect();
        assert_eq!(
            sources,
            vec![
                "SubDomain::listsubdomains",
                "SubDomain::list",
                "Addon::listaddondomains",
                "Park::listparkeddomains",
            ]
        );
    }

    #[tokio::test]
    async fn discover_normalizes_dedups_and_drops_main() {
        let client = MockControlPanelClient::new();
        client
            .set_domains(
                "1",
                "alice",
                "Addon",
                "listaddondomains",
                &["Shop.COM.", "shop.com", "alice.com", "blog.net"],
            )
            .await;

        let strategy = EndpointStrategy::for_kind(StrategyKind::Addon);
        let records = strategy
            .discover(&client, &server("1"), &account("1", "alice", "alice.com"))
            .await
            .unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["shop.com", "blog.net"]);
        assert!(records.iter().all(|r| r.kind == DomainKind::Addon));
        assert!(records.iter().all(|r| r.source == "Addon::listaddondomains"));
        assert!(records.iter().all(|r| r.account_user == "alice"));
    }
}
