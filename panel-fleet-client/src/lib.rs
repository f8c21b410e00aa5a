//! # panel-fleet-client
//!
//! Remote API client for WHM/cPanel hosting control panels.
//!
//! The crate owns everything that touches the wire:
//!
//! - [`ControlPanelClient`] - the trait the resolution engine talks to.
//! - [`WhmClient`] - the HTTP implementation (`/json-api/...`, port 2087 by default).
//! - [`envelope::normalize`] - turns the panel's several response shapes into
//!   either a payload or an [`ApiError`].
//! - [`decode`] - typed, lenient decoding of account and domain listings.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use panel_fleet_client::{
//!     decode_accounts, ClientConfig, ControlPanelClient, Endpoint, Server, ServerCredentials,
//!     WhmClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WhmClient::new(ClientConfig::default())?;
//!     let server = Server::new("10", "203.0.113.10", ServerCredentials::new("API-TOKEN"));
//!
//!     let version = client.probe(&server).await?;
//!     println!("panel version {version}");
//!
//!     let body = client.call(&server, &Endpoint::list_accounts(), &[]).await?;
//!     for account in decode_accounts(&server.id, &body)? {
//!         println!("{} -> {}", account.user, account.domain);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//!
//! Every failure is an [`ApiError`] carrying the server identifier. Only
//! transport errors ([`ApiError::is_transport`]) are retried, and only when
//! [`ClientConfig::max_retries`] is non-zero.

pub mod decode;
pub mod envelope;
mod error;
mod http_client;
mod traits;
mod types;
mod utils;
mod whm;

pub use decode::{AccountEntry, decode_accounts, decode_domain_names, decode_version};
pub use error::{ApiError, Result};
pub use traits::ControlPanelClient;
pub use types::{Endpoint, Server, ServerCredentials};
pub use utils::log_sanitizer::redact;
pub use whm::{ClientConfig, Scheme, WhmClient};
