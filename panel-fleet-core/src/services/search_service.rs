//! Fleet-wide keyword and account searches

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{CoreError, CoreResult};
use crate::services::inventory_builder::DomainInventoryBuilder;
use crate::services::{ServiceContext, check_cancelled, log_api_error};
use crate::types::{
    Account, AccountFilter, AccountSearchResult, DomainHit, Inventory, KeywordSearchResult,
    ScanReport, SearchMode, ServerScanStatus,
};
use crate::utils::pattern::NamePattern;

/// Read-only queries over every server's accounts and domains.
pub struct FleetSearchService {
    ctx: Arc<ServiceContext>,
    inventory: DomainInventoryBuilder,
}

impl FleetSearchService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            inventory: DomainInventoryBuilder::new(ctx.clone()),
            ctx,
        }
    }

    /// Every domain (main or subordinate) containing `keyword`, or matching it
    /// as a `*`/`?` wildcard, across the fleet.
    pub async fn search_domains(
        &self,
        keyword: &str,
        cancel: &CancellationToken,
    ) -> CoreResult<KeywordSearchResult> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CoreError::ValidationError(
                "search keyword must not be empty".to_string(),
            ));
        }
        let pattern = NamePattern::new(keyword);
        let servers = self.ctx.servers().await?;
        let mut report = ScanReport::new(SearchMode::Full);
        let mut hits = Vec::new();

        for server in &servers {
            check_cancelled(cancel, server)?;
            if !self.ctx.admit(server, &mut report).await {
                continue;
            }
            match self.inventory.build_full_inventory(server).await {
                Ok(inventory) => {
                    hits.extend(
                        inventory
                            .records
                            .iter()
                            .filter(|r| pattern.matches(&r.name))
                            .map(|record| DomainHit {
                                server: server.clone(),
                                record: record.clone(),
                            }),
                    );
                    report.record(&server.id, inventory.scan_status());
                }
                Err(e) => {
                    log_api_error(&e, "inventory unavailable");
                    report.record(&server.id, ServerScanStatus::InventoryUnavailable { error: e });
                }
            }
        }

        log::info!("Keyword '{keyword}' matched {} domains", hits.len());
        Ok(KeywordSearchResult {
            keyword: keyword.to_string(),
            hits,
            report,
        })
    }

    /// Accounts matching `filter` across the fleet, from account listings only.
    pub async fn search_accounts(
        &self,
        filter: &AccountFilter,
        cancel: &CancellationToken,
    ) -> CoreResult<AccountSearchResult> {
        filter.validate()?;
        let compiled = filter.compile();
        let servers = self.ctx.servers().await?;
        let mut report = ScanReport::new(SearchMode::Fast);
        let mut accounts = Vec::new();

        for server in &servers {
            check_cancelled(cancel, server)?;
            if !self.ctx.admit(server, &mut report).await {
                continue;
            }
            match self.inventory.list_main_domains(server).await {
                Ok(listed) => {
                    accounts.extend(listed.into_iter().filter(|a| compiled.matches(a)));
                    report.record(&server.id, ServerScanStatus::Scanned);
                }
                Err(e) => {
                    log_api_error(&e, "account listing failed");
                    report.record(&server.id, ServerScanStatus::InventoryUnavailable { error: e });
                }
            }
        }

        log::info!("Account search matched {} accounts", accounts.len());
        Ok(AccountSearchResult { accounts, report })
    }

    /// Accounts on one server.
    pub async fn list_accounts(&self, server_id: &str) -> CoreResult<Vec<Account>> {
        let server = self.ctx.server(server_id).await?;
        Ok(self.inventory.list_main_domains(&server).await?)
    }

    /// Full inventory of one server.
    pub async fn server_inventory(&self, server_id: &str) -> CoreResult<Inventory> {
        let server = self.ctx.server(server_id).await?;
        Ok(self.inventory.build_full_inventory(&server).await?)
    }
}
