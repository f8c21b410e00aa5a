use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Transport scheme used to reach the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Settings shared by every request a [`WhmClient`](super::WhmClient) sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub scheme: Scheme,
    /// Port used when a server address does not carry one.
    pub port: u16,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Extra attempts for transport failures (0 = single attempt).
    pub max_retries: u32,
    /// Panels commonly run with self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    pub const DEFAULT_PORT: u16 = 2087;
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Https,
            port: Self::DEFAULT_PORT,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_retries: 0,
            accept_invalid_certs: true,
        }
    }
}
