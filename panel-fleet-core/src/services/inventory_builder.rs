//! Per-server domain inventory building

use std::sync::Arc;

use panel_fleet_client::{
    ApiError, Endpoint, Result as ApiResult, Server, decode_accounts,
};

use crate::services::discovery::{DiscoveryStrategy, build_cascade};
use crate::services::{ServiceContext, log_api_error};
use crate::types::{Account, DiscoveryFailure, DomainRecord, Inventory};

/// Result of running the discovery cascade for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubordinateOutcome {
    pub records: Vec<DomainRecord>,
    /// Strategy that produced `records`
    pub source: Option<String>,
    /// Transport or auth failure that ended the cascade early
    pub halted: Option<DiscoveryFailure>,
}

/// Builds the domain inventory of one server.
pub struct DomainInventoryBuilder {
    ctx: Arc<ServiceContext>,
    strategies: Vec<Arc<dyn DiscoveryStrategy>>,
}

impl DomainInventoryBuilder {
    /// Builder using the cascade from the resolver configuration.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let strategies = build_cascade(&ctx.config.strategies);
        Self { ctx, strategies }
    }

    #[must_use]
    pub fn with_strategies(
        ctx: Arc<ServiceContext>,
        strategies: Vec<Arc<dyn DiscoveryStrategy>>,
    ) -> Self {
        Self { ctx, strategies }
    }

    /// Accounts and their main domains, from a single `listaccts` call.
    pub async fn list_main_domains(&self, server: &Server) -> ApiResult<Vec<Account>> {
        let body = self
            .ctx
            .client
            .call(server, &Endpoint::list_accounts(), &[])
            .await?;
        let entries = decode_accounts(&server.id, &body)?;
        let accounts: Vec<Account> = entries
            .into_iter()
            .filter_map(|entry| Account::from_entry(&server.id, entry))
            .collect();
        log::debug!("[{}] {} accounts listed", server.id, accounts.len());
        Ok(accounts)
    }

    /// Run the discovery cascade for one account.
    ///
    /// Stops at the first strategy that returns records. Remote and malformed
    /// responses fall through to the next strategy; a transport or auth
    /// failure ends the cascade and is reported in `halted`.
    pub async fn list_subordinate_domains(
        &self,
        server: &Server,
        account: &Account,
    ) -> SubordinateOutcome {
        for strategy in &self.strategies {
            match strategy
                .discover(self.ctx.client.as_ref(), server, account)
                .await
            {
                Ok(records) if !records.is_empty() => {
                    log::debug!(
                        "[{}] {} subordinate domains for {} via {}",
                        server.id,
                        records.len(),
                        account.user,
                        strategy.source()
                    );
                    return SubordinateOutcome {
                        records,
                        source: Some(strategy.source()),
                        halted: None,
                    };
                }
                Ok(_) => {}
                Err(e) if e.is_transport() || matches!(e, ApiError::AuthError { .. }) => {
                    log_api_error(
                        &e,
                        &format!("{} for {}, stopping cascade", strategy.source(), account.user),
                    );
                    return SubordinateOutcome {
                        halted: Some(DiscoveryFailure {
                            account_user: account.user.clone(),
                            strategy: strategy.source(),
                            error: e,
                        }),
                        ..SubordinateOutcome::default()
                    };
                }
                Err(e) => {
                    log::debug!(
                        "{e} ({} for {}, trying next strategy)",
                        strategy.source(),
                        account.user
                    );
                }
            }
        }

        log::info!(
            "[{}] No subordinate domains found for {}",
            server.id,
            account.user
        );
        SubordinateOutcome::default()
    }

    /// Main domains plus every account's subordinate domains.
    ///
    /// Fails only when the account listing fails. Per-account failures are
    /// collected in the inventory; an auth failure stops discovery for the
    /// remaining accounts but keeps every main-domain record.
    pub async fn build_full_inventory(&self, server: &Server) -> ApiResult<Inventory> {
        let accounts = self.list_main_domains(server).await?;

        let mut inventory = Inventory::new(&server.id);
        inventory.account_count = accounts.len();
        inventory
            .records
            .extend(accounts.iter().map(DomainRecord::main));

        for account in &accounts {
            let outcome = self.list_subordinate_domains(server, account).await;
            inventory.records.extend(outcome.records);

            if let Some(failure) = outcome.halted {
                let auth = matches!(failure.error, ApiError::AuthError { .. });
                if auth {
                    inventory.aborted = Some(failure.error.clone());
                }
                inventory.failures.push(failure);
                if auth {
                    log::error!(
                        "[{}] Credentials rejected, skipping discovery for remaining accounts",
                        server.id
                    );
                    break;
                }
            }
        }

        log::info!(
            "[{}] Inventory built: {} records from {} accounts ({} failures)",
            server.id,
            inventory.records.len(),
            inventory.account_count,
            inventory.failures.len()
        );
        Ok(inventory)
    }
}
