//! Shared fixtures for the integration tests.
//!
//! [`RequestSpec`] describes the request a test expects the client to send
//! and doubles as a wiremock matcher, so a mock only answers when every
//! part of the request is exactly as described.

#![allow(dead_code)]

use mealplan_client::{Client, ClientOption};
use serde_json::Value;
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// The request a test expects.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: &'static str,
    path: String,
    query: Option<String>,
    body_empty: Option<bool>,
    authed: Option<bool>,
}

impl RequestSpec {
    /// Expects `method` on `path_format`, with each `{}` replaced in order
    /// by the next entry of `args`.
    pub fn new(method: &'static str, path_format: &str, args: &[&str]) -> Self {
        let mut path = String::new();
        let mut args = args.iter();
        let mut rest = path_format;
        while let Some(at) = rest.find("{}") {
            path.push_str(&rest[..at]);
            path.push_str(args.next().expect("more placeholders than args"));
            rest = &rest[at + 2..];
        }
        path.push_str(rest);

        Self {
            method,
            path,
            query: None,
            body_empty: None,
            authed: None,
        }
    }

    /// Expects exactly this raw query string.
    pub fn query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    /// Expects no body.
    pub fn no_body(mut self) -> Self {
        self.body_empty = Some(true);
        self
    }

    /// Expects a non-empty body.
    pub fn with_body(mut self) -> Self {
        self.body_empty = Some(false);
        self
    }

    /// Expects credentials (a cookie or bearer token) to be attached.
    pub fn authed(mut self) -> Self {
        self.authed = Some(true);
        self
    }

    /// Expects no credentials.
    pub fn anonymous(mut self) -> Self {
        self.authed = Some(false);
        self
    }
}

impl Match for RequestSpec {
    fn matches(&self, request: &Request) -> bool {
        if request.method.as_str() != self.method || request.url.path() != self.path {
            return false;
        }

        let query = request.url.query().unwrap_or("");
        if query != self.query.as_deref().unwrap_or("") {
            return false;
        }

        if let Some(empty) = self.body_empty {
            if request.body.is_empty() != empty {
                return false;
            }
        }

        if let Some(authed) = self.authed {
            let has_credentials = request.headers.contains_key("cookie")
                || request.headers.contains_key("authorization");
            if has_credentials != authed {
                return false;
            }
        }

        true
    }
}

/// Mounts `response` for requests matching `spec`, expecting exactly one.
pub async fn mount_once(server: &MockServer, spec: RequestSpec, response: ResponseTemplate) {
    Mock::given(spec)
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// A 200 response carrying `data` in the envelope.
pub fn item(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data }))
}

/// A 200 response carrying a page of `data`.
pub fn page(data: Value, page: u16, limit: u8) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "data": data,
        "pagination": { "page": page, "limit": limit },
    }))
}

/// Builds a client against the mock server.
pub async fn client(server: &MockServer, options: Vec<ClientOption>) -> Client {
    Client::new(server.uri(), options)
        .await
        .expect("client builds")
}

/// Number of requests the server has seen.
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
