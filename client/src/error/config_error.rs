//! Client configuration and request building errors.

use thiserror::Error;

use super::ErrorKind;

/// Errors in client configuration or request construction.
///
/// These errors occur during client setup or while composing a request,
/// before anything is sent over the network.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The client was built without a base URL.
    #[error("Base URL not set")]
    UrlNotSet,

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A path part contained a character that cannot appear in a URL.
    #[error("Invalid URL path part: {part:?}")]
    InvalidPathPart {
        /// The offending part.
        part: String,
    },

    /// The number of path arguments did not match the endpoint template.
    #[error("Endpoint {endpoint} expects {expected} path arguments, got {actual}")]
    PathArguments {
        /// The endpoint identifier.
        endpoint: String,
        /// Number of template parameters.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// A header name or value could not be constructed.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header problem.
        message: String,
    },

    /// An environment-supplied setting could not be parsed.
    #[error("Invalid setting {name}: {value:?}")]
    InvalidSetting {
        /// The environment variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to construct HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ConfigError {
    /// Creates an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            Self::UrlNotSet => ErrorKind::UrlNotSet,
            _ => ErrorKind::Build,
        }
    }
}
