//! Authentication and credential errors.

use thiserror::Error;

use super::ErrorKind;

/// Errors related to authentication.
///
/// These errors occur when the server rejects credentials or when a
/// credential flow (login, PKCE bootstrap, token refresh) cannot complete.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Server rejected the credentials (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message from the server.
        message: String,
    },

    /// The TOTP verification endpoint rejected the token.
    #[error("Invalid TOTP token")]
    InvalidTotpToken,

    /// The login response carried no `Set-Cookie` header.
    #[error("No cookies returned from login")]
    NoCookiesReturned,

    /// The authorization endpoint redirect carried no `code` parameter.
    #[error("Authorization response did not include a code")]
    MissingAuthorizationCode,

    /// The token endpoint rejected the code exchange.
    #[error("Token exchange failed: {message}")]
    TokenExchange {
        /// Error message from the token endpoint.
        message: String,
    },

    /// The token endpoint rejected a refresh.
    #[error("Token refresh failed: {message}")]
    TokenRefresh {
        /// Error message from the token endpoint.
        message: String,
    },
}

impl AuthError {
    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Returns `true` if this error could potentially be resolved by
    /// logging in again.
    pub fn is_refreshable(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::TokenRefresh { .. })
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTotpToken => ErrorKind::InvalidTotpToken,
            Self::NoCookiesReturned => ErrorKind::NoCookiesReturned,
            Self::Unauthorized { .. }
            | Self::MissingAuthorizationCode
            | Self::TokenExchange { .. }
            | Self::TokenRefresh { .. } => ErrorKind::Unauthorized,
        }
    }
}
