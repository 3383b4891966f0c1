//! Authentication transports.
//!
//! Every request dispatched on the authenticated executor passes through an
//! [`AuthTransport`], which attaches credentials before the request is sent
//! and may observe the response afterwards. Three transports exist, one per
//! [`AuthMode`]:
//!
//! - [`DefaultTransport`] sets the user agent and nothing else
//! - [`CookieTransport`] attaches a session cookie and adopts refreshed ones
//! - [`OAuth2Transport`] attaches a bearer token from a refreshing
//!   [`TokenSource`]
//!
//! The OAuth2 transport is installed after a one-time authorization-code
//! exchange with PKCE, see [`pkce`].

mod cookie;
mod default;
mod oauth2;
pub mod pkce;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use reqwest::header::HeaderMap;
use strum::{Display, EnumString};

pub use cookie::{Cookie, CookieTransport};
pub use default::DefaultTransport;
pub use oauth2::{OAuth2Config, OAuth2Token, OAuth2Transport, TokenSource};
pub use pkce::PkceChallenge;

use crate::error::ApiError;

/// A boxed future that is `Send`, used to keep [`AuthTransport`] object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Which credential scheme a client uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AuthMode {
    /// No credentials.
    #[default]
    None,
    /// A session cookie.
    Cookie,
    /// An OAuth2 bearer token.
    #[strum(serialize = "oauth2")]
    OAuth2,
}

/// Attaches credentials to outgoing requests.
///
/// Implementations must be shareable across concurrent requests.
pub trait AuthTransport: Send + Sync + fmt::Debug {
    /// The scheme this transport implements.
    fn mode(&self) -> AuthMode;

    /// Adds credentials to `request`.
    fn authorize<'a>(
        &'a self,
        request: &'a mut reqwest::Request,
    ) -> BoxFuture<'a, Result<(), ApiError>>;

    /// Inspects a response before it is handed back to the caller.
    fn observe(&self, _response: &reqwest::Response) {}

    /// Returns the headers [`authorize`](Self::authorize) would attach, for
    /// channels that do not go through the executor.
    fn credential_headers(&self) -> BoxFuture<'_, Result<HeaderMap, ApiError>>;
}
