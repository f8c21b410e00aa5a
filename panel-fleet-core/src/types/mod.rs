//! Data model shared by the services.

mod account;
mod domain;
mod inventory;
mod resolution;
mod search;

pub use account::{Account, AccountStatus};
pub use domain::{DomainKind, DomainRecord};
pub use inventory::{DiscoveryFailure, Inventory};
pub use resolution::{
    MatchResult, ResolutionRequest, ResolutionResponse, ScanReport, SearchMode, ServerScan,
    ServerScanStatus,
};
pub use search::{
    AccountFilter, AccountSearchResult, CompiledAccountFilter, DomainHit, KeywordSearchResult,
    ServerStatus,
};
