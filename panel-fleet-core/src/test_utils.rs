//! Test helpers
//!
//! A scriptable in-memory panel client and fixture builders.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use panel_fleet_client::{
    ApiError, ControlPanelClient, Endpoint, Result as ApiResult, Server, ServerCredentials,
    envelope,
};
use serde_json::{Value, json};
use tokio::sync::RwLock;

use crate::config::ResolverConfig;
use crate::services::ServiceContext;
use crate::traits::StaticServerPool;
use crate::types::Account;

fn key(server_id: &str, endpoint: &Endpoint) -> String {
    format!("{server_id}|{endpoint}")
}

// ===== MockControlPanelClient =====

/// Serves scripted envelopes per `(server, endpoint)`.
///
/// Unscripted calls succeed with an empty payload: no accounts for
/// `listaccts`, no domains for discovery calls, version `11.118` for probes.
/// Scripted bodies go through the real envelope normalization.
pub struct MockControlPanelClient {
    responses: RwLock<HashMap<String, ApiResult<Value>>>,
    offline: RwLock<HashSet<String>>,
    calls: RwLock<Vec<String>>,
}

impl MockControlPanelClient {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            offline: RwLock::new(HashSet::new()),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Script `listaccts` with `(user, domain)` pairs.
    pub async fn set_accounts(&self, server_id: &str, accounts: &[(&str, &str)]) {
        let acct: Vec<Value> = accounts
            .iter()
            .map(|(user, domain)| json!({"user": user, "domain": domain, "suspended": 0}))
            .collect();
        self.set_raw(
            server_id,
            &Endpoint::list_accounts(),
            json!({"metadata": {"result": 1}, "data": {"acct": acct}}),
        )
        .await;
    }

    /// Script a discovery call with an API 2 style domain list.
    pub async fn set_domains(
        &self,
        server_id: &str,
        user: &str,
        module: &str,
        function: &str,
        domains: &[&str],
    ) {
        let data: Vec<Value> = domains.iter().map(|d| json!({"domain": d})).collect();
        self.set_raw(
            server_id,
            &Endpoint::cpanel(user, module, function),
            json!({"cpanelresult": {"data": data}}),
        )
        .await;
    }

    pub async fn set_raw(&self, server_id: &str, endpoint: &Endpoint, body: Value) {
        self.responses
            .write()
            .await
            .insert(key(server_id, endpoint), Ok(body));
    }

    pub async fn set_error(&self, server_id: &str, endpoint: &Endpoint, error: ApiError) {
        self.responses
            .write()
            .await
            .insert(key(server_id, endpoint), Err(error));
    }

    /// Every call to the server fails with `ConnectionFailed`.
    pub async fn set_offline(&self, server_id: &str) {
        self.offline.write().await.insert(server_id.to_string());
    }

    pub async fn set_online(&self, server_id: &str) {
        self.offline.write().await.remove(server_id);
    }

    pub async fn call_count(&self, server_id: &str, endpoint: &Endpoint) -> usize {
        let wanted = key(server_id, endpoint);
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| **c == wanted)
            .count()
    }

    pub async fn total_calls(&self) -> usize {
        self.calls.read().await.len()
    }
}

fn default_body(endpoint: &Endpoint) -> Value {
    match endpoint {
        Endpoint::Whm { function } if function == "version" => {
            json!({"metadata": {"result": 1}, "data": {"version": "11.118"}})
        }
        Endpoint::Whm { .. } => json!({"metadata": {"result": 1}, "data": {"acct": []}}),
        Endpoint::Cpanel { .. } => json!({"cpanelresult": {"data": []}}),
    }
}

#[async_trait]
impl ControlPanelClient for MockControlPanelClient {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn call(
        &self,
        server: &Server,
        endpoint: &Endpoint,
        _params: &[(&str, &str)],
    ) -> ApiResult<Value> {
        let k = key(&server.id, endpoint);
        self.calls.write().await.push(k.clone());

        if self.offline.read().await.contains(&server.id) {
            return Err(connection_error(&server.id));
        }

        let scripted = self.responses.read().await.get(&k).cloned();
        match scripted {
            Some(Ok(body)) => envelope::normalize(&server.id, endpoint, body),
            Some(Err(e)) => Err(e),
            None => envelope::normalize(&server.id, endpoint, default_body(endpoint)),
        }
    }
}

// ===== Fixtures =====

pub fn server(id: &str) -> Server {
    Server::new(id, format!("{id}.panel.test"), ServerCredentials::new("test-token"))
}

pub fn account(server_id: &str, user: &str, main_domain: &str) -> Account {
    Account {
        server_id: server_id.to_string(),
        user: user.to_string(),
        main_domain: main_domain.to_string(),
        suspended: false,
        created_at: None,
        disk_used_mb: None,
        package: None,
        email: None,
    }
}

pub fn timeout_error(server_id: &str) -> ApiError {
    ApiError::Timeout {
        server: server_id.to_string(),
        detail: "deadline elapsed".to_string(),
    }
}

pub fn connection_error(server_id: &str) -> ApiError {
    ApiError::ConnectionFailed {
        server: server_id.to_string(),
        detail: "connection refused".to_string(),
    }
}

pub fn auth_error(server_id: &str) -> ApiError {
    ApiError::AuthError {
        server: server_id.to_string(),
        raw_message: Some("Access denied".to_string()),
    }
}

pub fn remote_error(server_id: &str, message: &str) -> ApiError {
    ApiError::RemoteError {
        server: server_id.to_string(),
        raw_code: None,
        message: message.to_string(),
    }
}

/// Context over a static pool of `server_ids`, in that order.
pub fn create_test_context(
    server_ids: &[&str],
    client: Arc<MockControlPanelClient>,
) -> Arc<ServiceContext> {
    create_test_context_with(server_ids, client, ResolverConfig::default())
}

pub fn create_test_context_with(
    server_ids: &[&str],
    client: Arc<MockControlPanelClient>,
    config: ResolverConfig,
) -> Arc<ServiceContext> {
    let servers = server_ids.iter().map(|id| server(id)).collect();
    let pool = Arc::new(StaticServerPool::new(servers, client.clone()));
    Arc::new(ServiceContext::new(pool, client, config))
}
