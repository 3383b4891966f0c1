//! HTTP client, network, and status errors.

use thiserror::Error;

use super::ErrorKind;

/// Errors from the HTTP client layer.
///
/// These errors represent network-level failures and non-success HTTP
/// statuses that occur during request execution.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed due to network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("Request timeout after {duration_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        duration_ms: u64,
    },

    /// Failed to establish connection to the server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Server returned 404.
    #[error("Resource not found")]
    NotFound,

    /// Server returned 400 or another client error status.
    #[error("Bad request (HTTP {status}): {message}")]
    BadRequest {
        /// The HTTP status code returned.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// Server returned a 5xx status.
    #[error("Server error (HTTP {status}): {message}")]
    Server {
        /// The HTTP status code returned.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// Server returned a status the endpoint does not accept.
    #[error("Invalid response code: HTTP {status}")]
    UnexpectedStatus {
        /// The HTTP status code returned.
        status: u16,
    },
}

impl ClientError {
    /// Returns the HTTP status code if this error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound => Some(404),
            Self::BadRequest { status, .. }
            | Self::Server { status, .. }
            | Self::UnexpectedStatus { status } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Timeout { .. } | Self::Connection(_) => None,
        }
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            Self::Request(_) | Self::Timeout { .. } | Self::Connection(_) => ErrorKind::Transport,
            Self::NotFound => ErrorKind::NotFound,
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::UnexpectedStatus { .. } => ErrorKind::InvalidResponseCode,
        }
    }
}
