//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use panel_fleet_client::ApiError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No server hosts the requested domain
    #[error("Domain not found on any server: {0}")]
    NotFound(String),

    /// The server pool has no members
    #[error("Server pool is empty")]
    PoolEmpty,

    /// No pool member carries the given identifier
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// The requested domain normalizes to nothing
    #[error("Invalid domain name: {0:?}")]
    InvalidDomain(String),

    /// The caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid resolver configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid search parameters
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Remote call failure (converted from the client library)
    #[error("{0}")]
    Client(#[from] ApiError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, unknown domain, etc.), used for log levels.
    ///
    /// `warn` when `true`, `error` when `false`.
    /// Update this method when adding variants.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NotFound(_)
            | Self::ServerNotFound(_)
            | Self::InvalidDomain(_)
            | Self::ValidationError(_)
            | Self::Cancelled => true,
            Self::Client(e) => e.is_expected(),
            Self::PoolEmpty | Self::Config(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
