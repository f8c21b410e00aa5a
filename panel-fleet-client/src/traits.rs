use async_trait::async_trait;
use serde_json::Value;

use crate::decode::decode_version;
use crate::error::Result;
use crate::types::{Endpoint, Server};

/// Remote API of a control-panel server.
///
/// `call` returns the normalized envelope: every failure shape the panel can
/// produce has already been turned into an [`ApiError`](crate::ApiError).
#[async_trait]
pub trait ControlPanelClient: Send + Sync {
    /// Client identifier used in logs.
    fn id(&self) -> &'static str;

    /// Invoke `endpoint` on `server` with extra query `params`.
    async fn call(
        &self,
        server: &Server,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
    ) -> Result<Value>;

    /// Cheap authenticated round-trip; returns the panel version on success.
    async fn probe(&self, server: &Server) -> Result<String> {
        let body = self.call(server, &Endpoint::version(), &[]).await?;
        Ok(decode_version(&body))
    }
}
