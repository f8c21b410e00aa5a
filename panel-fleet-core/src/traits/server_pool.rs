//! Server pool abstract Trait

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use panel_fleet_client::{ControlPanelClient, Result as ApiResult, Server};

/// Server Pool Trait
///
/// The set of servers a resolution scans, in scan order, plus a
/// connectivity probe. A resolution takes one [`snapshot`](Self::snapshot)
/// at its start; the pool may change between resolutions.
#[async_trait]
pub trait ServerPool: Send + Sync {
    /// Current members, in scan order
    async fn snapshot(&self) -> Vec<Server>;

    /// Look up a member by id
    async fn get(&self, server_id: &str) -> Option<Server> {
        self.snapshot()
            .await
            .into_iter()
            .find(|s| s.id == server_id)
    }

    /// Authenticated round-trip; returns the panel version
    async fn probe(&self, server: &Server) -> ApiResult<String>;
}

/// Fixed server list backed by a [`ControlPanelClient`].
#[derive(Clone)]
pub struct StaticServerPool {
    servers: Arc<RwLock<Vec<Server>>>,
    client: Arc<dyn ControlPanelClient>,
}

impl StaticServerPool {
    #[must_use]
    pub fn new(servers: Vec<Server>, client: Arc<dyn ControlPanelClient>) -> Self {
        Self {
            servers: Arc::new(RwLock::new(servers)),
            client,
        }
    }

    /// Swap the member list. Resolutions already running keep their snapshot.
    pub async fn replace(&self, servers: Vec<Server>) {
        *self.servers.write().await = servers;
    }
}

#[async_trait]
impl ServerPool for StaticServerPool {
    async fn snapshot(&self) -> Vec<Server> {
        self.servers.read().await.clone()
    }

    async fn probe(&self, server: &Server) -> ApiResult<String> {
        self.client.probe(server).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockControlPanelClient, server};

    #[tokio::test]
    async fn snapshot_keeps_order_and_get_finds_member() {
        let pool = StaticServerPool::new(
            vec![server("2"), server("10")],
            Arc::new(MockControlPanelClient::new()),
        );

        let ids: Vec<String> = pool.snapshot().await.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["2", "10"]);
        assert_eq!(pool.get("10").await.map(|s| s.address), Some("10.panel.test".to_string()));
        assert!(pool.get("3").await.is_none());
    }

    #[tokio::test]
    async fn replace_leaves_taken_snapshots_untouched() {
        let pool =
            StaticServerPool::new(vec![server("1")], Arc::new(MockControlPanelClient::new()));
        let before = pool.snapshot().await;

        pool.replace(vec![server("7"), server("8")]).await;

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].id, "1");
        assert_eq!(pool.snapshot().await.len(), 2);
        assert!(pool.get("1").await.is_none());
    }

    #[tokio::test]
    async fn probe_goes_through_client() {
        let client = Arc::new(MockControlPanelClient::new());
        client.set_offline("2").await;
        let pool = StaticServerPool::new(vec![server("1"), server("2")], client);

        assert_eq!(pool.probe(&server("1")).await.unwrap(), "11.118");
        assert!(pool.probe(&server("2")).await.unwrap_err().is_transport());
    }
}
