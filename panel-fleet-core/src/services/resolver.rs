//! Domain resolution across the server pool

use std::collections::HashMap;
use std::sync::Arc;

use panel_fleet_client::Server;
use tokio_util::sync::CancellationToken;

use crate::error::{CoreError, CoreResult};
use crate::services::disambiguator::MatchDisambiguator;
use crate::services::inventory_builder::DomainInventoryBuilder;
use crate::services::{ServiceContext, check_cancelled, log_api_error};
use crate::types::{
    DomainRecord, MatchResult, ResolutionRequest, ResolutionResponse, ScanReport, SearchMode,
    ServerScanStatus,
};
use crate::utils::domain::normalize_domain;

/// Resolves a domain name to the server and account hosting it.
pub struct DomainResolver {
    ctx: Arc<ServiceContext>,
    inventory: DomainInventoryBuilder,
    disambiguator: MatchDisambiguator,
}

impl DomainResolver {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let disambiguator = MatchDisambiguator::new(ctx.config.ranking);
        Self {
            inventory: DomainInventoryBuilder::new(ctx.clone()),
            ctx,
            disambiguator,
        }
    }

    pub async fn resolve(&self, request: &ResolutionRequest) -> CoreResult<ResolutionResponse> {
        self.resolve_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Resolve, checking `cancel` before each server.
    pub async fn resolve_with_cancel(
        &self,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<ResolutionResponse> {
        let target = normalize_domain(&request.domain)
            .ok_or_else(|| CoreError::InvalidDomain(request.domain.clone()))?;
        let servers = self.ctx.servers().await?;

        log::info!(
            "Resolving {target} ({} mode) across {} servers",
            request.mode,
            servers.len()
        );

        let (matches, report) = match request.mode {
            SearchMode::Fast => self.scan(&target, false, &servers, cancel).await?,
            SearchMode::Full => self.scan(&target, true, &servers, cancel).await?,
            SearchMode::Smart => {
                let fast = self.scan(&target, false, &servers, cancel).await?;
                if fast.0.is_empty() {
                    log::info!("{target} is not a main domain anywhere, running full scan");
                    self.scan(&target, true, &servers, cancel).await?
                } else {
                    fast
                }
            }
        };

        let matches = self.recheck_reachability(matches).await;
        let ranked = self.disambiguator.disambiguate(matches);

        match &ranked.canonical {
            Some(m) => log::info!(
                "{target} resolved to server {} (account {})",
                m.server.id,
                m.record.account_user
            ),
            None => log::info!("{target} not found on any scanned server"),
        }

        Ok(ResolutionResponse {
            canonical: ranked.canonical,
            candidates: ranked.candidates,
            ambiguous: ranked.ambiguous,
            report,
        })
    }

    /// Like [`resolve`](Self::resolve), but no canonical match is `NotFound`.
    pub async fn locate(&self, request: &ResolutionRequest) -> CoreResult<MatchResult> {
        self.locate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Locate, checking `cancel` before each server.
    pub async fn locate_with_cancel(
        &self,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<MatchResult> {
        self.resolve_with_cancel(request, cancel)
            .await?
            .canonical
            .ok_or_else(|| CoreError::NotFound(request.domain.trim().to_string()))
    }

    /// One sequential pass over `servers`, main domains only or full inventory.
    async fn scan(
        &self,
        target: &str,
        full: bool,
        servers: &[Server],
        cancel: &CancellationToken,
    ) -> CoreResult<(Vec<MatchResult>, ScanReport)> {
        let mode = if full {
            SearchMode::Full
        } else {
            SearchMode::Fast
        };
        let mut report = ScanReport::new(mode);
        let mut matches = Vec::new();

        for (index, server) in servers.iter().enumerate() {
            check_cancelled(cancel, server)?;

            if !self.ctx.admit(server, &mut report).await {
                continue;
            }

            if full {
                match self.inventory.build_full_inventory(server).await {
                    Ok(inventory) => {
                        matches.extend(
                            inventory
                                .find(target)
                                .cloned()
                                .map(|record| MatchResult::new(server.clone(), record, index)),
                        );
                        report.record(&server.id, inventory.scan_status());
                    }
                    Err(e) => {
                        log_api_error(&e, "inventory unavailable");
                        report.record(
                            &server.id,
                            ServerScanStatus::InventoryUnavailable { error: e },
                        );
                    }
                }
            } else {
                match self.inventory.list_main_domains(server).await {
                    Ok(accounts) => {
                        matches.extend(
                            accounts
                                .iter()
                                .filter(|a| a.main_domain == target)
                                .map(|a| {
                                    MatchResult::new(server.clone(), DomainRecord::main(a), index)
                                }),
                        );
                        report.record(&server.id, ServerScanStatus::Scanned);
                    }
                    Err(e) => {
                        log_api_error(&e, "account listing failed");
                        report.record(
                            &server.id,
                            ServerScanStatus::InventoryUnavailable { error: e },
                        );
                    }
                }
            }
        }

        Ok((matches, report))
    }

    /// When a domain is on several servers, re-probe them so ranking sees current reachability.
    async fn recheck_reachability(&self, mut matches: Vec<MatchResult>) -> Vec<MatchResult> {
        if matches.len() < 2 || !self.ctx.config.recheck_on_ambiguity {
            return matches;
        }

        let mut probed: HashMap<String, bool> = HashMap::new();
        for m in &mut matches {
            let reachable = match probed.get(&m.server.id) {
                Some(r) => *r,
                None => {
                    let r = match self.ctx.pool.probe(&m.server).await {
                        Ok(_) => true,
                        Err(e) => {
                            log_api_error(&e, "matched server no longer reachable");
                            false
                        }
                    };
                    probed.insert(m.server.id.clone(), r);
                    r
                }
            };
            m.reachable = reachable;
        }
        matches
    }
}
