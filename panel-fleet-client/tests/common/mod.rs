//! Shared helpers for live panel tests.

#![allow(dead_code)]

use std::env;

use panel_fleet_client::{ClientConfig, Server, ServerCredentials, WhmClient};

/// Return early when any of the named environment variables is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: environment variable {} not set", $var);
                return;
            }
        )+
    };
}

/// Assert `Result` is `Ok` and unwrap it, failing the test otherwise.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(res.is_ok(), "{}: {res:?}", format_args!($($msg)+));
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// A real server and client built from `WHM_TEST_*` variables.
pub struct TestContext {
    pub client: WhmClient,
    pub server: Server,
}

impl TestContext {
    pub fn from_env() -> Option<Self> {
        let address = env::var("WHM_TEST_ADDRESS").ok()?;
        let token = env::var("WHM_TEST_TOKEN").ok()?;
        let username = env::var("WHM_TEST_USER").unwrap_or_else(|_| "root".to_string());

        let client = WhmClient::new(ClientConfig {
            max_retries: 1,
            ..ClientConfig::default()
        })
        .ok()?;
        let server = Server::new(
            "live",
            address,
            ServerCredentials::new(token).with_username(username),
        );
        Some(Self { client, server })
    }
}
