use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use super::{AuthMode, AuthTransport, BoxFuture};
use crate::error::{ApiError, AuthError, ClientError, ConfigError};

/// Tokens are refreshed this long before they expire.
const EXPIRY_SKEW: Duration = Duration::from_secs(10);

/// OAuth2 client registration and endpoint locations.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
    /// Authorization endpoint, relative to the base URL.
    pub authorize_path: String,
    /// Token endpoint, relative to the base URL.
    pub token_path: String,
    /// Redirect URI registered for the client; the base URL when unset.
    pub redirect_uri: Option<Url>,
}

impl OAuth2Config {
    /// Creates a configuration using the server's default endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: Vec::new(),
            authorize_path: "oauth2/authorize".to_string(),
            token_path: "oauth2/token".to_string(),
            redirect_uri: None,
        }
    }

    /// Sets the requested scopes.
    pub fn with_scopes<S: Into<String>>(mut self, scopes: impl IntoIterator<Item = S>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("authorize_path", &self.authorize_path)
            .field("token_path", &self.token_path)
            .finish()
    }
}

/// An access token and the metadata needed to refresh it.
#[derive(Clone)]
pub struct OAuth2Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_at: Option<Instant>,
}

impl OAuth2Token {
    /// Returns `true` if the token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|at| Instant::now() + EXPIRY_SKEW >= at)
    }
}

impl fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl From<TokenResponse> for OAuth2Token {
    fn from(r: TokenResponse) -> Self {
        Self {
            access_token: r.access_token,
            refresh_token: r.refresh_token,
            token_type: r.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_at: r.expires_in.map(|s| Instant::now() + Duration::from_secs(s)),
        }
    }
}

/// A reusable source of access tokens that refreshes on expiry.
pub struct TokenSource {
    http: reqwest::Client,
    token_url: Url,
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
    token: Mutex<OAuth2Token>,
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSource")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl TokenSource {
    /// Creates a source seeded with `token`.
    pub fn new(
        http: reqwest::Client,
        token_url: Url,
        config: &OAuth2Config,
        token: OAuth2Token,
    ) -> Self {
        Self {
            http,
            token_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scopes: config.scopes.clone(),
            token: Mutex::new(token),
        }
    }

    /// Returns a current access token, refreshing it first if it expired.
    ///
    /// ## Errors
    ///
    /// Returns [`AuthError::TokenRefresh`] if the token expired and could not
    /// be refreshed.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut token = self.token.lock().await;
        if !token.is_expired() {
            return Ok(token.access_token.clone());
        }

        let Some(refresh_token) = token.refresh_token.clone() else {
            return Err(AuthError::TokenRefresh {
                message: "access token expired and no refresh token was issued".to_string(),
            });
        };

        debug!(token_url = %self.token_url, "refreshing access token");
        let scope = self.scopes.join(" ");
        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        if !scope.is_empty() {
            form.push(("scope", scope.as_str()));
        }

        let mut fresh = request_token(&self.http, &self.token_url, &form)
            .await
            .map_err(|e| {
                warn!(error = %e, "token refresh failed");
                AuthError::TokenRefresh {
                    message: e.to_string(),
                }
            })?;
        if fresh.refresh_token.is_none() {
            fresh.refresh_token = Some(refresh_token);
        }
        let access = fresh.access_token.clone();
        *token = fresh;
        Ok(access)
    }
}

/// POSTs a form to the token endpoint and decodes the token response.
pub(crate) async fn request_token(
    http: &reqwest::Client,
    token_url: &Url,
    form: &[(&str, &str)],
) -> Result<OAuth2Token, ApiError> {
    let body = {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in form {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    };

    let response = http
        .post(token_url.clone())
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .map_err(ClientError::from)?;

    let status = response.status();
    let text = response.text().await.map_err(ClientError::from)?;
    if !status.is_success() {
        return Err(AuthError::TokenExchange {
            message: format!("HTTP {}: {}", status.as_u16(), text.trim()),
        }
        .into());
    }

    let parsed: TokenResponse =
        serde_json::from_str(&text).map_err(|e| AuthError::TokenExchange {
            message: format!("malformed token response: {e}"),
        })?;
    Ok(parsed.into())
}

/// Attaches `Authorization: Bearer <token>` from a [`TokenSource`].
#[derive(Debug, Clone)]
pub struct OAuth2Transport {
    source: Arc<TokenSource>,
}

impl OAuth2Transport {
    /// Creates a transport backed by `source`.
    pub fn new(source: Arc<TokenSource>) -> Self {
        Self { source }
    }

    async fn bearer(&self) -> Result<HeaderValue, ApiError> {
        let token = self.source.access_token().await?;
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ConfigError::invalid_header(format!("bearer token: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl AuthTransport for OAuth2Transport {
    fn mode(&self) -> AuthMode {
        AuthMode::OAuth2
    }

    fn authorize<'a>(
        &'a self,
        request: &'a mut reqwest::Request,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let value = self.bearer().await?;
            request.headers_mut().insert(AUTHORIZATION, value);
            Ok(())
        })
    }

    fn credential_headers(&self) -> BoxFuture<'_, Result<HeaderMap, ApiError>> {
        Box::pin(async move {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, self.bearer().await?);
            Ok(headers)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token(access: &str, refresh: Option<&str>, expires_at: Option<Instant>) -> OAuth2Token {
        OAuth2Token {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            token_type: "Bearer".to_string(),
            expires_at,
        }
    }

    fn source(server: &MockServer, seed: OAuth2Token) -> TokenSource {
        let token_url = Url::parse(&format!("{}/oauth2/token", server.uri())).unwrap();
        TokenSource::new(
            reqwest::Client::new(),
            token_url,
            &OAuth2Config::new("client", "secret"),
            seed,
        )
    }

    #[test]
    fn test_expiry() {
        assert!(!token("a", None, None).is_expired());
        assert!(token("a", None, Some(Instant::now())).is_expired());
        assert!(!token("a", None, Some(Instant::now() + Duration::from_secs(3600))).is_expired());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!(
            "{:?} {:?}",
            OAuth2Config::new("client", "hunter2"),
            token("access-abc", Some("refresh-xyz"), None)
        );
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("access-abc"));
        assert!(!rendered.contains("refresh-xyz"));
    }

    #[tokio::test]
    async fn test_fresh_token_is_not_refreshed() {
        let server = MockServer::start().await;
        let source = source(&server, token("live", Some("r1"), None));
        assert_eq!(source.access_token().await.unwrap(), "live");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "renewed",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = source(&server, token("stale", Some("r1"), Some(Instant::now())));
        assert_eq!(source.access_token().await.unwrap(), "renewed");
        // Reused until it expires.
        assert_eq!(source.access_token().await.unwrap(), "renewed");
    }

    #[tokio::test]
    async fn test_refresh_failure_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let source = source(&server, token("stale", Some("r1"), Some(Instant::now())));
        let err = source.access_token().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenRefresh { .. }));
        assert_eq!(ApiError::from(err).kind(), ErrorKind::Unauthorized);
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_token_futures_are_send() {
        let http = reqwest::Client::new();
        let token_url = Url::parse("https://example.test/oauth2/token").unwrap();
        let seed = OAuth2Token {
            access_token: "live".to_string(),
            refresh_token: None,
            token_type: "Bearer".to_string(),
            expires_at: None,
        };
        let source = TokenSource::new(
            http.clone(),
            token_url.clone(),
            &OAuth2Config::new("client", "secret"),
            seed,
        );

        assert_send(&request_token(&http, &token_url, &[("grant_type", "refresh_token")]));
        assert_send(&source.access_token());
        let transport = OAuth2Transport::new(Arc::new(source));
        assert_send(&transport.bearer());
        assert_send(&transport.credential_headers());
    }

    #[tokio::test]
    async fn test_transport_attaches_bearer() {
        let server = MockServer::start().await;
        let transport = OAuth2Transport::new(Arc::new(source(&server, token("live", None, None))));
        let mut request = reqwest::Client::new()
            .get("https://example.test/api/v1/households")
            .build()
            .unwrap();

        transport.authorize(&mut request).await.unwrap();
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer live");
        assert_eq!(transport.mode(), AuthMode::OAuth2);
    }
}
