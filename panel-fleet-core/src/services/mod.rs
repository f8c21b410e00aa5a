//! Business logic services

mod disambiguator;
mod discovery;
mod inventory_builder;
mod resolver;
mod search_service;
mod status_service;

pub use disambiguator::{Disambiguation, MatchDisambiguator};
pub use discovery::{DiscoveryStrategy, EndpointStrategy, build_cascade};
pub use inventory_builder::{DomainInventoryBuilder, SubordinateOutcome};
pub use resolver::DomainResolver;
pub use search_service::FleetSearchService;
pub use status_service::FleetStatusService;

use std::sync::Arc;

use panel_fleet_client::{ApiError, ControlPanelClient, Server};
use tokio_util::sync::CancellationToken;

use crate::config::ResolverConfig;
use crate::error::{CoreError, CoreResult};
use crate::traits::ServerPool;
use crate::types::{ScanReport, ServerScanStatus};

/// Service context - holds every dependency
///
/// The front end builds this once from configuration and shares it across services.
pub struct ServiceContext {
    /// Servers to scan
    pub pool: Arc<dyn ServerPool>,
    /// Remote API client
    pub client: Arc<dyn ControlPanelClient>,
    pub config: ResolverConfig,
}

impl ServiceContext {
    #[must_use]
    pub fn new(
        pool: Arc<dyn ServerPool>,
        client: Arc<dyn ControlPanelClient>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            pool,
            client,
            config,
        }
    }

    /// Pool snapshot for one operation; an empty pool is an error.
    pub(crate) async fn servers(&self) -> CoreResult<Vec<Server>> {
        let servers = self.pool.snapshot().await;
        if servers.is_empty() {
            log::error!("Server pool is empty, nothing to scan");
            return Err(CoreError::PoolEmpty);
        }
        Ok(servers)
    }

    /// Look up one pool member.
    pub async fn server(&self, server_id: &str) -> CoreResult<Server> {
        self.pool
            .get(server_id)
            .await
            .ok_or_else(|| CoreError::ServerNotFound(server_id.to_string()))
    }

    /// Probe `server` when configured to; an unreachable server is recorded in `report`.
    pub(crate) async fn admit(&self, server: &Server, report: &mut ScanReport) -> bool {
        if !self.config.probe_before_scan {
            return true;
        }
        match self.pool.probe(server).await {
            Ok(version) => {
                log::debug!("[{}] Reachable (version {version})", server.id);
                true
            }
            Err(e) => {
                log_api_error(&e, "connectivity probe failed, skipping server");
                report.record(&server.id, ServerScanStatus::Unreachable { error: e });
                false
            }
        }
    }
}

/// Fail with `Cancelled` once the token fires.
pub(crate) fn check_cancelled(cancel: &CancellationToken, server: &Server) -> CoreResult<()> {
    if cancel.is_cancelled() {
        log::info!("Cancelled before scanning server {}", server.id);
        return Err(CoreError::Cancelled);
    }
    Ok(())
}

/// Log at `warn` for routine failures and `error` otherwise.
pub(crate) fn log_api_error(error: &ApiError, context: &str) {
    if error.is_expected() {
        log::warn!("{error} ({context})");
    } else {
        log::error!("{error} ({context})");
    }
}
