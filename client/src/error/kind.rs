//! Flat error classification.

use strum::{Display, EnumIter};

/// Category of a client failure.
///
/// Each [`ApiError`](super::ApiError) resolves to exactly one kind. Kinds are
/// plain values, so they can be compared directly:
///
/// ```
/// use mealplan_client::error::{ApiError, ErrorKind, InputError};
///
/// let err: ApiError = InputError::invalid_id("household_id").into();
/// assert_eq!(err.kind(), ErrorKind::InvalidId);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ErrorKind {
    /// A required path identifier was empty.
    InvalidId,
    /// A required payload was not supplied.
    NilInput,
    /// A search query was empty.
    EmptyQuery,
    /// An email address was empty.
    EmptyEmail,
    /// The operation needs a session cookie and none was given.
    CookieRequired,
    /// The login endpoint answered without setting a cookie.
    NoCookiesReturned,
    /// The TOTP verification endpoint rejected the token.
    #[strum(serialize = "InvalidTOTPToken")]
    InvalidTotpToken,
    /// The client was constructed without a base URL.
    #[strum(serialize = "URLNotSet")]
    UrlNotSet,
    /// The payload's own validator rejected it.
    InvalidInput,
    /// The request could not be built (bad URL part, header, client setup).
    Build,
    /// The server answered 401 or credentials could not be obtained.
    Unauthorized,
    /// The server answered 404.
    NotFound,
    /// The server answered 400 or another 4xx.
    BadRequest,
    /// The server answered with a status outside the expected set.
    InvalidResponseCode,
    /// Network failure, timeout, or cancellation.
    Transport,
    /// The body could not be encoded or decoded, or the envelope carried an error.
    Decode,
    /// The server answered 5xx.
    ServerError,
}

impl ErrorKind {
    /// Returns `true` for kinds raised before any request is sent.
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            Self::InvalidId
                | Self::NilInput
                | Self::EmptyQuery
                | Self::EmptyEmail
                | Self::CookieRequired
                | Self::UrlNotSet
                | Self::InvalidInput
                | Self::Build
        )
    }
}
