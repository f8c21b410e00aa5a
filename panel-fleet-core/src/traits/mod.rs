//! Abstractions injected into the services.

mod server_pool;

pub use server_pool::{ServerPool, StaticServerPool};
