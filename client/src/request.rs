//! Request construction.
//!
//! [`RequestBuilder`] turns an [`Endpoint`], its path arguments, query
//! parameters, and an optional payload into an [`ApiRequest`]. It performs
//! no I/O and never consults the executors, so equal inputs always produce
//! equal requests.

use bytes::Bytes;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, USER_AGENT,
};
use serde::Serialize;
use url::Url;

use crate::encoding::Encoding;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, ClientError, ConfigError, InputError};
use crate::method::RestMethod;
use crate::query::QueryParams;
use crate::url_builder::UrlComposer;

/// A fully populated HTTP request, before credentials are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: RestMethod,
    /// Absolute URL including the query string.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Encoded body, if any.
    pub body: Option<Bytes>,
}

impl ApiRequest {
    /// Returns the URL path.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Returns the raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Returns a header value as a string.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Converts into a `reqwest::Request` bound to `http`.
    ///
    /// ## Errors
    ///
    /// Returns a [`ClientError::Request`] if reqwest rejects the request.
    pub fn to_reqwest(&self, http: &reqwest::Client) -> Result<reqwest::Request, ApiError> {
        let mut builder = http
            .request(self.method.to_reqwest(), self.url.clone())
            .headers(self.headers.clone());
        if let Some(body) = &self.body {
            builder = builder.body(body.clone());
        }
        Ok(builder.build().map_err(ClientError::Request)?)
    }

    /// Renders the request as a `curl` command line for debug logging.
    ///
    /// `Cookie` and `Authorization` values are redacted.
    pub fn to_curl(&self) -> String {
        let mut parts = vec![format!("curl -X {}", self.method)];

        for (name, value) in &self.headers {
            let value = if name == COOKIE || name == AUTHORIZATION {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            parts.push(format!("-H {}", shell_quote(&format!("{name}: {value}"))));
        }

        if let Some(body) = &self.body {
            parts.push(format!(
                "--data-binary {}",
                shell_quote(&String::from_utf8_lossy(body))
            ));
        }

        parts.push(shell_quote(self.url.as_str()));
        parts.join(" ")
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Builds [`ApiRequest`]s for a base URL and encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBuilder {
    composer: UrlComposer,
    encoding: Encoding,
    user_agent: HeaderValue,
}

impl RequestBuilder {
    /// Creates a builder.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if `user_agent` is not a valid
    /// header value.
    pub fn new(base: Url, encoding: Encoding, user_agent: &str) -> Result<Self, ConfigError> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|e| ConfigError::invalid_header(format!("user agent: {e}")))?;
        Ok(Self {
            composer: UrlComposer::new(base),
            encoding,
            user_agent,
        })
    }

    /// Returns the URL composer.
    pub fn composer(&self) -> &UrlComposer {
        &self.composer
    }

    /// Returns the body encoding.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Builds a request that carries no body.
    ///
    /// ## Errors
    ///
    /// Returns [`InputError::InvalidId`] for an empty path argument and a
    /// configuration error if the URL cannot be composed.
    pub fn build<I, O, S: AsRef<str>>(
        &self,
        endpoint: &Endpoint<I, O>,
        args: &[S],
        query: &QueryParams,
    ) -> Result<ApiRequest, ApiError> {
        let url = self.url_for(endpoint, args, query)?;
        Ok(ApiRequest {
            method: endpoint.method(),
            url,
            headers: self.headers(None),
            body: None,
        })
    }

    /// Builds a request whose body is `payload`, encoded with the builder's
    /// encoding.
    ///
    /// ## Errors
    ///
    /// Returns [`InputError::NilInput`] if `payload` is `None`,
    /// [`InputError::InvalidId`] for an empty path argument, and an encode
    /// error if the payload cannot be serialized.
    pub fn build_with_body<I: Serialize, O, S: AsRef<str>>(
        &self,
        endpoint: &Endpoint<I, O>,
        args: &[S],
        query: &QueryParams,
        payload: Option<&I>,
    ) -> Result<ApiRequest, ApiError> {
        let payload = payload.ok_or(InputError::NilInput)?;
        let url = self.url_for(endpoint, args, query)?;
        let body = self.encoding.encode(payload)?;
        Ok(ApiRequest {
            method: endpoint.method(),
            url,
            headers: self.headers(Some(self.encoding.content_type())),
            body: Some(body),
        })
    }

    /// Builds a body-less request with extra headers layered on top.
    pub(crate) fn build_with_headers<I, O, S: AsRef<str>>(
        &self,
        endpoint: &Endpoint<I, O>,
        args: &[S],
        extra: HeaderMap,
    ) -> Result<ApiRequest, ApiError> {
        let mut request = self.build(endpoint, args, &QueryParams::new())?;
        request.headers.extend(extra);
        Ok(request)
    }

    fn url_for<I, O, S: AsRef<str>>(
        &self,
        endpoint: &Endpoint<I, O>,
        args: &[S],
        query: &QueryParams,
    ) -> Result<Url, ApiError> {
        let parts = endpoint.segments(args)?;
        let url = if endpoint.is_versioned() {
            self.composer.versioned(query, &parts)?
        } else {
            self.composer.versionless(query, &parts)?
        };
        Ok(url)
    }

    fn headers(&self, content_type: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(self.encoding.content_type()),
        );
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        headers
    }
}
