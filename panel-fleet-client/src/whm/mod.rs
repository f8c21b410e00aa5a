//! WHM remote API client (`/json-api/...` on port 2087).

mod client;
mod config;

pub use client::WhmClient;
pub use config::{ClientConfig, Scheme};
