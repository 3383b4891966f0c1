//! Caller validation errors.

use thiserror::Error;

use super::ErrorKind;

/// Errors caused by invalid arguments, detected before a request is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// A path identifier was empty.
    #[error("Invalid ID: `{param}` must not be empty")]
    InvalidId {
        /// Name of the path parameter.
        param: String,
    },

    /// A required payload was missing.
    #[error("Required input was not provided")]
    NilInput,

    /// A search query was empty.
    #[error("Search query must not be empty")]
    EmptyQuery,

    /// An email address was empty.
    #[error("Email address must not be empty")]
    EmptyEmail,

    /// A session cookie is required for this operation.
    #[error("A session cookie is required")]
    CookieRequired,

    /// The payload's validator rejected it.
    #[error("Invalid input: {message}")]
    Invalid {
        /// The validator's explanation.
        message: String,
    },
}

impl InputError {
    /// Creates an invalid ID error for the named path parameter.
    pub fn invalid_id(param: impl Into<String>) -> Self {
        Self::InvalidId {
            param: param.into(),
        }
    }

    /// Creates a payload validation error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidId { .. } => ErrorKind::InvalidId,
            Self::NilInput => ErrorKind::NilInput,
            Self::EmptyQuery => ErrorKind::EmptyQuery,
            Self::EmptyEmail => ErrorKind::EmptyEmail,
            Self::CookieRequired => ErrorKind::CookieRequired,
            Self::Invalid { .. } => ErrorKind::InvalidInput,
        }
    }
}
