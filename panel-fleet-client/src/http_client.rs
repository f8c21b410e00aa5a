//! HTTP request execution shared by panel clients.
//!
//! Callers build the `RequestBuilder` themselves (URL, auth header, query);
//! this module sends it, maps transport failures and HTTP status codes to
//! [`ApiError`], and applies the retry policy.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ApiError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP helper functions.
pub struct HttpUtils;

impl HttpUtils {
    /// Send a request and return the status code with the raw body.
    ///
    /// * `Err(ApiError::Timeout)` when the deadline elapsed
    /// * `Err(ApiError::ConnectionFailed)` for any other send failure or a 502-504 gateway reply
    /// * `Err(ApiError::AuthError)` for 401/403
    /// * `Err(ApiError::RemoteError)` for any other non-success status
    pub async fn execute_request(
        request_builder: RequestBuilder,
        server_id: &str,
        operation: &str,
    ) -> Result<(u16, String), ApiError> {
        log::debug!("[{server_id}] GET {operation}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    server: server_id.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ApiError::ConnectionFailed {
                    server: server_id.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        log::debug!("[{server_id}] Response Status: {}", status.as_u16());

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{server_id}] Credentials rejected (HTTP {})", status.as_u16());
            return Err(ApiError::AuthError {
                server: server_id.to_string(),
                raw_message: (!body.trim().is_empty()).then(|| truncate_for_log(body.trim())),
            });
        }

        if matches!(status.as_u16(), 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{server_id}] Gateway error (HTTP {})", status.as_u16());
            return Err(ApiError::ConnectionFailed {
                server: server_id.to_string(),
                detail: format!("HTTP {}: {}", status.as_u16(), truncate_for_log(&body)),
            });
        }

        let response_text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    server: server_id.to_string(),
                    detail: format!("Timed out reading response body: {e}"),
                }
            } else {
                ApiError::ConnectionFailed {
                    server: server_id.to_string(),
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;

        log::debug!(
            "[{server_id}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        if !status.is_success() {
            return Err(ApiError::RemoteError {
                server: server_id.to_string(),
                raw_code: Some(format!("HTTP {}", status.as_u16())),
                message: truncate_for_log(&response_text),
            });
        }

        Ok((status.as_u16(), response_text))
    }

    /// Parse a JSON body, mapping failures to `MalformedResponse`.
    pub fn parse_json<T>(response_text: &str, server_id: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{server_id}] JSON parse failed: {e}");
            log::error!(
                "[{server_id}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ApiError::MalformedResponse {
                server: server_id.to_string(),
                detail: format!("response is not JSON: {e}"),
            }
        })
    }

    /// Like [`execute_request`](Self::execute_request), retrying transport failures.
    ///
    /// `max_retries == 0` sends exactly once. Only `Timeout` and
    /// `ConnectionFailed` are retried, with exponential backoff starting at
    /// 100ms and capped at 10s.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        server_id: &str,
        operation: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ApiError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, server_id, operation).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{server_id}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, server_id, operation).await;
            };

            match Self::execute_request(req, server_id, operation).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && is_retryable(&e) => {
                    let delay = backoff_delay(attempt);
                    log::warn!(
                        "[{}] {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        server_id,
                        operation,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::ConnectionFailed {
            server: server_id.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

fn is_retryable(error: &ApiError) -> bool {
    error.is_transport()
}

/// 100ms, 200ms, 400ms, ... capped at 10s.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}
