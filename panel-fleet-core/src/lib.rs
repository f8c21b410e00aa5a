//! Panel Fleet Core Library
//!
//! Resolves a domain name to the WHM/cPanel server and account hosting it,
//! across a fleet of independent servers with no central index:
//! - Inventory building (`DomainInventoryBuilder`): account listing plus a
//!   cascade of subordinate-domain discovery strategies per account
//! - Resolution (`DomainResolver`): fast, full and smart scans over the pool
//! - Disambiguation (`MatchDisambiguator`): deterministic ranking when a
//!   domain lives on several servers
//! - Fleet queries (`FleetSearchService`, `FleetStatusService`)
//!
//! Remote access goes through `panel_fleet_client::ControlPanelClient`, and
//! the server list through the `ServerPool` trait, both injected via
//! `ServiceContext`.

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{RankingStrategy, ResolverConfig, StrategyKind};
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{ServerPool, StaticServerPool};
pub use tokio_util::sync::CancellationToken;
