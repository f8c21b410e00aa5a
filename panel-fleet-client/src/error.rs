use serde::{Deserialize, Serialize};

/// Unified error type for every remote call made against a control-panel server.
///
/// Each variant carries the `server` identifier the call was addressed to, so a
/// caller aggregating results across a fleet can always tell which host failed.
///
/// # Transport errors
///
/// [`Timeout`](Self::Timeout) and [`ConnectionFailed`](Self::ConnectionFailed)
/// describe the network path rather than the panel itself. They are the only
/// variants the HTTP layer retries, and the only ones that end an account's
/// discovery cascade early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// The request did not complete within the configured deadline.
    Timeout {
        /// Server the call was addressed to.
        server: String,
        /// Error details.
        detail: String,
    },

    /// The server could not be reached (refused, reset, TLS failure, 502-504 gateway errors).
    ConnectionFailed {
        /// Server the call was addressed to.
        server: String,
        /// Error details.
        detail: String,
    },

    /// The credentials were rejected.
    AuthError {
        /// Server the call was addressed to.
        server: String,
        /// Original message returned by the panel, if any.
        raw_message: Option<String>,
    },

    /// The panel answered but reported the operation as failed.
    RemoteError {
        /// Server the call was addressed to.
        server: String,
        /// Error code reported by the panel or HTTP layer, if any.
        raw_code: Option<String>,
        /// Message reported by the panel.
        message: String,
    },

    /// The response body did not match any recognized envelope shape.
    MalformedResponse {
        /// Server the call was addressed to.
        server: String,
        /// Details about what was missing or unparsable.
        detail: String,
    },
}

impl ApiError {
    /// Identifier of the server this error belongs to.
    pub fn server(&self) -> &str {
        match self {
            Self::Timeout { server, .. }
            | Self::ConnectionFailed { server, .. }
            | Self::AuthError { server, .. }
            | Self::RemoteError { server, .. }
            | Self::MalformedResponse { server, .. } => server,
        }
    }

    /// Network-level failure (timeout or unreachable host).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::ConnectionFailed { .. })
    }

    /// Whether this failure is routine for a fleet scan, used for log levels.
    ///
    /// Returns `true` when `warn` is appropriate and `false` for `error`.
    /// Keep this in sync when adding variants.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::RemoteError { .. } | Self::Timeout { .. } | Self::ConnectionFailed { .. }
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { server, detail } => {
                write!(f, "[{server}] Request timeout: {detail}")
            }
            Self::ConnectionFailed { server, detail } => {
                write!(f, "[{server}] Connection failed: {detail}")
            }
            Self::AuthError {
                server,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{server}] Authentication rejected: {msg}")
                } else {
                    write!(f, "[{server}] Authentication rejected")
                }
            }
            Self::RemoteError {
                server,
                raw_code,
                message,
            } => {
                if let Some(code) = raw_code {
                    write!(f, "[{server}] Remote error ({code}): {message}")
                } else {
                    write!(f, "[{server}] Remote error: {message}")
                }
            }
            Self::MalformedResponse { server, detail } => {
                write!(f, "[{server}] Malformed response: {detail}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
