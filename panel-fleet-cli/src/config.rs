//! Fleet configuration file
//!
//! A TOML document with three sections:
//!
//! ```toml
//! [client]
//! connect_timeout_secs = 10
//! request_timeout_secs = 30
//!
//! [resolver]
//! ranking = "numeric-desc"
//!
//! [[servers]]
//! id = "1"
//! address = "203.0.113.10"
//! token = "..."
//! ```
//!
//! A server's token can also come from `PANEL_FLEET_<ID>_TOKEN`, which wins
//! over the file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use panel_fleet_client::{ClientConfig, Scheme, Server, ServerCredentials};
use panel_fleet_core::ResolverConfig;

const APP_DIR: &str = "panel-fleet";
const CONFIG_FILE: &str = "servers.toml";

/// Transport settings, mapped onto [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientSection {
    pub scheme: Scheme,
    pub port: u16,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub accept_invalid_certs: bool,
}

impl Default for ClientSection {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            scheme: defaults.scheme,
            port: defaults.port,
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            max_retries: defaults.max_retries,
            accept_invalid_certs: defaults.accept_invalid_certs,
        }
    }
}

impl From<&ClientSection> for ClientConfig {
    fn from(section: &ClientSection) -> Self {
        Self {
            scheme: section.scheme,
            port: section.port,
            connect_timeout: Duration::from_secs(section.connect_timeout_secs),
            request_timeout: Duration::from_secs(section.request_timeout_secs),
            max_retries: section.max_retries,
            accept_invalid_certs: section.accept_invalid_certs,
        }
    }
}

/// One `[[servers]]` entry.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerEntry {
    pub id: String,
    pub address: String,
    #[serde(default)]
    pub token: String,
    pub username: Option<String>,
}

impl std::fmt::Debug for ServerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerEntry")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

impl ServerEntry {
    fn to_server(&self) -> Server {
        let mut credentials = ServerCredentials::new(self.token.clone());
        if let Some(username) = &self.username {
            credentials = credentials.with_username(username.clone());
        }
        Server::new(self.id.clone(), self.address.clone(), credentials)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetConfig {
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub servers: Vec<ServerEntry>,
}

impl FleetConfig {
    /// Read, apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.apply_token_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        log::debug!(
            "Loaded {} servers from {}",
            config.servers.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Replace tokens with `PANEL_FLEET_<ID>_TOKEN` values found by `lookup`.
    pub fn apply_token_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for entry in &mut self.servers {
            if let Some(token) = lookup(&token_env_var(&entry.id)).filter(|t| !t.is_empty()) {
                log::debug!("Using token from environment for server {}", entry.id);
                entry.token = token;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.servers {
            if entry.id.trim().is_empty() {
                bail!("server entry with empty id");
            }
            if !seen.insert(entry.id.as_str()) {
                bail!("duplicate server id '{}'", entry.id);
            }
            if entry.address.trim().is_empty() {
                bail!("server '{}' has an empty address", entry.id);
            }
            if entry.token.is_empty() {
                bail!(
                    "server '{}' has no token (set it in the file or via {})",
                    entry.id,
                    token_env_var(&entry.id)
                );
            }
        }
        self.resolver.validate()?;
        Ok(())
    }

    pub fn servers(&self) -> Vec<Server> {
        self.servers.iter().map(ServerEntry::to_server).collect()
    }

    /// Configured tokens, for scrubbing user-facing output.
    pub fn secrets(&self) -> impl Iterator<Item = &str> {
        self.servers.iter().map(|s| s.token.as_str())
    }
}

/// `PANEL_FLEET_<ID>_TOKEN`, with the id upper-cased and other characters as `_`.
pub fn token_env_var(server_id: &str) -> String {
    let id: String = server_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("PANEL_FLEET_{id}_TOKEN")
}

/// `<config dir>/panel-fleet/servers.toml`
pub fn default_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .context("failed to determine the configuration directory; pass --config")
}
