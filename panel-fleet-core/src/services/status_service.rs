//! Fleet reachability report

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::{ServiceContext, log_api_error};
use crate::types::ServerStatus;

pub struct FleetStatusService {
    ctx: Arc<ServiceContext>,
}

impl FleetStatusService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Probe every server in pool order.
    pub async fn fleet_status(&self) -> CoreResult<Vec<ServerStatus>> {
        let servers = self.ctx.servers().await?;
        let mut statuses = Vec::with_capacity(servers.len());

        for server in servers {
            let status = match self.ctx.pool.probe(&server).await {
                Ok(version) => ServerStatus {
                    server_id: server.id,
                    address: server.address,
                    online: true,
                    version: Some(version),
                    error: None,
                },
                Err(e) => {
                    log_api_error(&e, "server offline");
                    ServerStatus {
                        server_id: server.id,
                        address: server.address,
                        online: false,
                        version: None,
                        error: Some(e),
                    }
                }
            };
            statuses.push(status);
        }

        let online = statuses.iter().filter(|s| s.online).count();
        log::info!("{online}/{} servers online", statuses.len());
        Ok(statuses)
    }
}
