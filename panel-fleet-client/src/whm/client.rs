use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::envelope;
use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::ControlPanelClient;
use crate::types::{Endpoint, Server};

use super::config::ClientConfig;

/// HTTP client for the WHM `json-api`.
///
/// Authenticates with `Authorization: whm <user>:<token>` and normalizes every
/// response through [`envelope::normalize`].
#[derive(Debug, Clone)]
pub struct WhmClient {
    client: Client,
    config: ClientConfig,
}

impl WhmClient {
    pub fn new(config: ClientConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL for `server`, honoring an explicit scheme or port in its address.
    pub fn base_url(&self, server: &Server) -> String {
        let address = server.address.trim().trim_end_matches('/');
        if address.contains("://") {
            return address.to_string();
        }
        let scheme = self.config.scheme.as_str();
        if has_explicit_port(address) {
            format!("{scheme}://{address}")
        } else if address.contains(':') && !address.starts_with('[') {
            format!("{scheme}://[{address}]:{}", self.config.port)
        } else {
            format!("{scheme}://{address}:{}", self.config.port)
        }
    }

    fn build_request(
        &self,
        server: &Server,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
    ) -> reqwest::RequestBuilder {
        let base = self.base_url(server);
        let auth = format!(
            "whm {}:{}",
            server.credentials.username, server.credentials.api_token
        );

        let request = match endpoint {
            Endpoint::Whm { function } => self
                .client
                .get(format!("{base}/json-api/{function}"))
                .query(&[("api.version", "1")]),
            Endpoint::Cpanel {
                user,
                module,
                function,
                api_version,
            } => {
                let version = api_version.to_string();
                self.client.get(format!("{base}/json-api/cpanel")).query(&[
                    ("cpanel_jsonapi_user", user.as_str()),
                    ("cpanel_jsonapi_apiversion", version.as_str()),
                    ("cpanel_jsonapi_module", module.as_str()),
                    ("cpanel_jsonapi_func", function.as_str()),
                ])
            }
        };

        request.query(params).header("Authorization", auth)
    }
}

fn has_explicit_port(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((host, port)) => {
            !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && (!host.contains(':') || (host.starts_with('[') && host.ends_with(']')))
        }
        None => false,
    }
}

#[async_trait]
impl ControlPanelClient for WhmClient {
    fn id(&self) -> &'static str {
        "whm"
    }

    async fn call(
        &self,
        server: &Server,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
    ) -> Result<Value> {
        let request = self.build_request(server, endpoint, params);
        let operation = endpoint.to_string();
        let (_status, body) = HttpUtils::execute_request_with_retry(
            request,
            &server.id,
            &operation,
            self.config.max_retries,
        )
        .await?;
        let value: Value = HttpUtils::parse_json(&body, &server.id)?;
        envelope::normalize(&server.id, endpoint, value)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::decode::decode_accounts;
    use crate::error::ApiError;
    use crate::types::ServerCredentials;
    use crate::whm::Scheme;

    fn server_at(address: &str) -> Server {
        Server::new("10", address, ServerCredentials::new("tok"))
    }

    fn client() -> WhmClient {
        WhmClient::new(ClientConfig {
            request_timeout: Duration::from_millis(300),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn base_url_variants() {
        let c = client();
        assert_eq!(c.base_url(&server_at("10.0.0.1")), "https://10.0.0.1:2087");
        assert_eq!(c.base_url(&server_at("host.example:2083")), "https://host.example:2083");
        assert_eq!(c.base_url(&server_at("http://127.0.0.1:9/")), "http://127.0.0.1:9");
        assert_eq!(c.base_url(&server_at("::1")), "https://[::1]:2087");
        assert_eq!(c.base_url(&server_at("[::1]:2087")), "https://[::1]:2087");

        let plain = WhmClient::new(ClientConfig {
            scheme: Scheme::Http,
            port: 8080,
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(plain.base_url(&server_at("panel")), "http://panel:8080");
    }

    #[tokio::test]
    async fn list_accounts_sends_auth_and_decodes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json-api/listaccts"))
            .and(query_param("api.version", "1"))
            .and(header("Authorization", "whm root:tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "metadata": {"result": 1},
                "data": {"acct": [{"user": "alice", "domain": "alice.com", "suspended": 0}]}
            })))
            .mount(&mock_server)
            .await;

        let server = server_at(&mock_server.uri());
        let body = client()
            .call(&server, &Endpoint::list_accounts(), &[])
            .await
            .unwrap();
        let accounts = decode_accounts(&server.id, &body).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].user, "alice");
    }

    #[tokio::test]
    async fn cpanel_call_uses_jsonapi_params() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json-api/cpanel"))
            .and(query_param("cpanel_jsonapi_user", "alice"))
            .and(query_param("cpanel_jsonapi_apiversion", "2"))
            .and(query_param("cpanel_jsonapi_module", "Park"))
            .and(query_param("cpanel_jsonapi_func", "listparkeddomains"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cpanelresult": {"data": [{"domain": "alias.com"}]}
            })))
            .mount(&mock_server)
            .await;

        let endpoint = Endpoint::cpanel("alice", "Park", "listparkeddomains");
        let body = client()
            .call(&server_at(&mock_server.uri()), &endpoint, &[])
            .await
            .unwrap();
        assert_eq!(body["cpanelresult"]["data"][0]["domain"], "alias.com");
    }

    #[tokio::test]
    async fn http_401_is_auth_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Access denied"))
            .mount(&mock_server)
            .await;

        let err = client()
            .call(&server_at(&mock_server.uri()), &Endpoint::list_accounts(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthError { ref server, .. } if server == "10"));
    }

    #[tokio::test]
    async fn metadata_failure_is_remote_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "metadata": {"result": 0, "reason": "Unknown function"}
            })))
            .mount(&mock_server)
            .await;

        let err = client()
            .call(&server_at(&mock_server.uri()), &Endpoint::whm("nosuch"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::RemoteError { .. }));
    }

    #[tokio::test]
    async fn html_body_is_malformed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&mock_server)
            .await;

        let err = client()
            .call(&server_at(&mock_server.uri()), &Endpoint::list_accounts(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"version": "11"}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let err = client()
            .probe(&server_at(&mock_server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout { .. }), "unexpected: {err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_connection_failed() {
        let err = client()
            .probe(&server_at("http://127.0.0.1:1"))
            .await
            .unwrap_err();
        assert!(err.is_transport(), "unexpected: {err:?}");
    }

    #[tokio::test]
    async fn probe_returns_version() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json-api/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "metadata": {"result": 1},
                "data": {"version": "11.118.0.5"}
            })))
            .mount(&mock_server)
            .await;

        let version = client()
            .probe(&server_at(&mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(version, "11.118.0.5");
    }

    #[tokio::test]
    async fn gateway_error_is_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"version": "11"}
            })))
            .mount(&mock_server)
            .await;

        let retrying = WhmClient::new(ClientConfig {
            max_retries: 2,
            ..ClientConfig::default()
        })
        .unwrap();
        let version = retrying
            .probe(&server_at(&mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(version, "11");
    }
}
