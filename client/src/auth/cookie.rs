use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use tracing::debug;

use super::{AuthMode, AuthTransport, BoxFuture};
use crate::error::{ApiError, ConfigError};

/// A session cookie issued by the server.
///
/// The value is a credential, so `Debug` output redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age: Option<Duration>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    /// Creates a cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            max_age: None,
            secure: false,
            http_only: false,
        }
    }

    /// Returns `true` if the cookie has no name or no value.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() || self.value.is_empty()
    }

    /// Returns the first cookie set by `response`, if any.
    pub fn from_response(response: &reqwest::Response) -> Option<Self> {
        response.cookies().next().map(|c| Self {
            name: c.name().to_string(),
            value: c.value().to_string(),
            path: c.path().map(str::to_string),
            domain: c.domain().map(str::to_string),
            max_age: c.max_age(),
            secure: c.secure(),
            http_only: c.http_only(),
        })
    }

    /// Renders the `Cookie` request header value.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if the name or value contains
    /// characters that cannot appear in a header.
    pub fn header_value(&self) -> Result<HeaderValue, ConfigError> {
        let mut value = HeaderValue::from_str(&format!("{}={}", self.name, self.value))
            .map_err(|e| ConfigError::invalid_header(format!("cookie {}: {e}", self.name)))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("path", &self.path)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

/// Attaches a session cookie and adopts the first `Set-Cookie` of each
/// response.
///
/// Replacement is last-write-wins; readers always see a complete cookie.
#[derive(Debug)]
pub struct CookieTransport {
    cookie: RwLock<Cookie>,
}

impl CookieTransport {
    /// Creates a transport for `cookie`.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if the cookie cannot be sent
    /// as a header.
    pub fn new(cookie: Cookie) -> Result<Self, ConfigError> {
        cookie.header_value()?;
        Ok(Self {
            cookie: RwLock::new(cookie),
        })
    }

    /// Returns a copy of the current cookie.
    pub fn current(&self) -> Cookie {
        self.cookie
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn header(&self) -> Result<HeaderValue, ApiError> {
        Ok(self
            .cookie
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .header_value()?)
    }
}

impl AuthTransport for CookieTransport {
    fn mode(&self) -> AuthMode {
        AuthMode::Cookie
    }

    fn authorize<'a>(
        &'a self,
        request: &'a mut reqwest::Request,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let value = self.header()?;
            request.headers_mut().insert(COOKIE, value);
            Ok(())
        })
    }

    fn observe(&self, response: &reqwest::Response) {
        let Some(fresh) = Cookie::from_response(response) else {
            return;
        };
        if fresh.header_value().is_err() {
            debug!(name = %fresh.name, "ignoring unusable Set-Cookie");
            return;
        }
        debug!(name = %fresh.name, "session cookie refreshed");
        *self.cookie.write().unwrap_or_else(PoisonError::into_inner) = fresh;
    }

    fn credential_headers(&self) -> BoxFuture<'_, Result<HeaderMap, ApiError>> {
        Box::pin(async move {
            let mut headers = HeaderMap::new();
            headers.insert(COOKIE, self.header()?);
            Ok(headers)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_header_value() {
        let cookie = Cookie::new("session", "xyz");
        assert_eq!(cookie.header_value().unwrap(), "session=xyz");
    }

    #[test]
    fn test_debug_redacts_value() {
        let rendered = format!("{:?}", Cookie::new("session", "topsecret"));
        assert!(rendered.contains("session"));
        assert!(!rendered.contains("topsecret"));
    }

    #[test]
    fn test_rejects_unsendable_cookie() {
        let err = CookieTransport::new(Cookie::new("session", "a\nb")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeader { .. }));
    }

    #[tokio::test]
    async fn test_authorize_attaches_cookie() {
        let transport = CookieTransport::new(Cookie::new("session", "xyz")).unwrap();
        let mut request = reqwest::Client::new()
            .get("https://example.test/api/v1/households")
            .build()
            .unwrap();

        transport.authorize(&mut request).await.unwrap();
        assert_eq!(request.headers().get(COOKIE).unwrap(), "session=xyz");
        assert_eq!(transport.mode(), AuthMode::Cookie);

        let headers = transport.credential_headers().await.unwrap();
        assert_eq!(headers.get(COOKIE).unwrap(), "session=xyz");
    }

    async fn response_with(template: ResponseTemplate) -> reqwest::Response {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(template)
            .mount(&server)
            .await;
        reqwest::get(server.uri()).await.unwrap()
    }

    #[tokio::test]
    async fn test_observe_adopts_first_set_cookie() {
        let transport = CookieTransport::new(Cookie::new("session", "old")).unwrap();
        let response = response_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "session=new; Path=/; HttpOnly")
                .append_header("set-cookie", "other=ignored"),
        )
        .await;

        transport.observe(&response);

        let current = transport.current();
        assert_eq!(current.name, "session");
        assert_eq!(current.value, "new");
        assert_eq!(current.path.as_deref(), Some("/"));
        assert!(current.http_only);
    }

    #[tokio::test]
    async fn test_observe_without_set_cookie_keeps_cookie() {
        let transport = CookieTransport::new(Cookie::new("session", "old")).unwrap();
        let response = response_with(ResponseTemplate::new(200)).await;

        transport.observe(&response);
        assert_eq!(transport.current().value, "old");
    }
}
