//! Top-level API error type.

use super::{AuthError, ClientError, ConfigError, ErrorKind, InputError, ValidationError};
use thiserror::Error;

/// Top-level error type for all client operations.
///
/// This enum aggregates all error categories, enabling unified error handling
/// while preserving the ability to match on specific error types when needed.
///
/// ## Examples
///
/// ```rust,ignore
/// use mealplan_client::error::{ApiError, ErrorKind};
///
/// match client.get_household("abc").await {
///     Ok(household) => println!("{}", household.name),
///     Err(e) if e.kind() == ErrorKind::NotFound => println!("no such household"),
///     Err(e) => return Err(e),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller validation errors, raised before any I/O.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Client configuration and request building errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client errors (network, timeout, unexpected status).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Authentication and credential errors.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Encoding and decoding errors.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Returns the flat classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(e) => e.kind(),
            Self::Config(e) => e.kind(),
            Self::Client(e) => e.kind(),
            Self::Auth(e) => e.kind(),
            Self::Validation(_) => ErrorKind::Decode,
        }
    }

    /// Returns the HTTP status code attached to this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Client(e) => e.status_code(),
            Self::Auth(AuthError::Unauthorized { .. }) => Some(401),
            Self::Auth(AuthError::InvalidTotpToken) => Some(400),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Client(ClientError::from(err))
    }
}
