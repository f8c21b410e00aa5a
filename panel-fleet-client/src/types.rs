use std::fmt;

use serde::{Deserialize, Serialize};

fn default_username() -> String {
    "root".to_string()
}

/// Credentials used to authenticate against a panel's remote API.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCredentials {
    /// Administrative user the token belongs to (`root` unless a reseller token is used).
    #[serde(default = "default_username")]
    pub username: String,
    /// API token issued by the panel.
    pub api_token: String,
}

impl ServerCredentials {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            username: default_username(),
            api_token: api_token.into(),
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }
}

impl fmt::Debug for ServerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerCredentials")
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// A managed control-panel host.
///
/// Credentials are never serialized; a `Server` embedded in a JSON report only
/// exposes its identifier and address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /// Unique, stable identifier within a pool (often a decimal string such as `"10"`).
    pub id: String,
    /// Host name or IP address, optionally with an explicit port or scheme.
    pub address: String,
    #[serde(skip_serializing)]
    pub credentials: ServerCredentials,
}

impl Server {
    pub fn new(
        id: impl Into<String>,
        address: impl Into<String>,
        credentials: ServerCredentials,
    ) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            credentials,
        }
    }
}

/// A remote operation exposed by the panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Server-level administrative function (`/json-api/<function>`).
    Whm { function: String },
    /// Per-account function executed in the context of `user`.
    Cpanel {
        user: String,
        module: String,
        function: String,
        api_version: u8,
    },
}

impl Endpoint {
    /// API version used for the legacy per-account listing functions.
    pub const CPANEL_API2: u8 = 2;

    pub fn whm(function: impl Into<String>) -> Self {
        Self::Whm {
            function: function.into(),
        }
    }

    pub fn cpanel(
        user: impl Into<String>,
        module: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self::Cpanel {
            user: user.into(),
            module: module.into(),
            function: function.into(),
            api_version: Self::CPANEL_API2,
        }
    }

    /// The account listing (`listaccts`).
    pub fn list_accounts() -> Self {
        Self::whm("listaccts")
    }

    /// The version query used as a reachability probe.
    pub fn version() -> Self {
        Self::whm("version")
    }

    /// Operation name without the account context, e.g. `listaccts` or
    /// `SubDomain::listsubdomains`.
    pub fn label(&self) -> String {
        match self {
            Self::Whm { function } => function.clone(),
            Self::Cpanel {
                module, function, ..
            } => format!("{module}::{function}"),
        }
    }

    /// Whether this is a server-level call (as opposed to a per-account one).
    pub fn is_whm(&self) -> bool {
        matches!(self, Self::Whm { .. })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whm { function } => write!(f, "{function}"),
            Self::Cpanel {
                user,
                module,
                function,
                ..
            } => write!(f, "{module}::{function}@{user}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_token() {
        let creds = ServerCredentials::new("SECRET-TOKEN");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("SECRET-TOKEN"));
        assert!(rendered.contains("root"));
    }

    #[test]
    fn server_json_omits_credentials() {
        let server = Server::new("10", "10.0.0.10", ServerCredentials::new("tok"));
        let json = serde_json::to_string(&server).unwrap();
        assert!(!json.contains("tok"));
        assert!(json.contains("10.0.0.10"));
    }

    #[test]
    fn username_defaults_to_root() {
        let creds: ServerCredentials = serde_json::from_str(r#"{"apiToken":"x"}"#).unwrap();
        assert_eq!(creds.username, "root");
    }

    #[test]
    fn endpoint_labels() {
        assert_eq!(Endpoint::list_accounts().label(), "listaccts");
        let ep = Endpoint::cpanel("bob", "Park", "listparkeddomains");
        assert_eq!(ep.label(), "Park::listparkeddomains");
        assert_eq!(ep.to_string(), "Park::listparkeddomains@bob");
        assert!(!ep.is_whm());
    }
}
