//! OAuth2 authorization-code flow with PKCE (RFC 7636).
//!
//! The client is assumed to already hold a session cookie accepted by the
//! authorization endpoint. [`bootstrap`] runs the one-time exchange:
//!
//! 1. Generate a code verifier and its S256 challenge.
//! 2. GET the authorize URL with the session cookie, without following
//!    redirects.
//! 3. Read `code` from the redirect's `Location` query.
//! 4. Exchange `code` and the verifier for tokens at the token endpoint.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use reqwest::header::{COOKIE, LOCATION};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};
use url::Url;

use super::oauth2::{request_token, OAuth2Config, TokenSource};
use super::Cookie;
use crate::error::{ApiError, AuthError, ClientError, ConfigError};
use crate::query::QueryParams;
use crate::url_builder::UrlComposer;

/// The only challenge method this client sends.
pub const CHALLENGE_METHOD: &str = "S256";

/// A PKCE code verifier and its derived challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge {
    pub verifier: String,
    pub challenge: String,
}

impl PkceChallenge {
    /// Generates a verifier from 32 random bytes.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_verifier(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Derives the challenge `BASE64URL(SHA256(verifier))` for `verifier`.
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }
}

/// Generates a random `state` parameter.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Runs the authorization-code exchange and returns a token source.
///
/// ## Errors
///
/// - [`AuthError::MissingAuthorizationCode`] if the authorize endpoint does
///   not redirect with a `code`
/// - [`AuthError::TokenExchange`] if the token endpoint rejects the code
/// - a transport error if either request fails on the network
#[instrument(
    name = "oauth2_pkce_bootstrap",
    skip(base, config, cookie),
    fields(client_id = %config.client_id)
)]
pub async fn bootstrap(
    base: &Url,
    config: &OAuth2Config,
    cookie: &Cookie,
    timeout: Duration,
    user_agent: &str,
) -> Result<TokenSource, ApiError> {
    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(ConfigError::HttpClient)?;

    let composer = UrlComposer::new(base.clone());
    let redirect_uri = config.redirect_uri.clone().unwrap_or_else(|| base.clone());
    let pkce = PkceChallenge::generate();
    let state = generate_state();

    let mut query = QueryParams::new()
        .with("client_id", config.client_id.as_str())
        .with("code_challenge", pkce.challenge.as_str())
        .with("code_challenge_method", CHALLENGE_METHOD)
        .with("redirect_uri", redirect_uri.as_str())
        .with("response_type", "code")
        .with("state", state.as_str());
    if !config.scopes.is_empty() {
        query.set("scope", config.scopes.join(" "));
    }
    let authorize_url = composer.versionless(&query, &[config.authorize_path.as_str()])?;

    let response = http
        .get(authorize_url.clone())
        .header(COOKIE, cookie.header_value()?)
        .send()
        .await
        .map_err(ClientError::from)?;

    let status = response.status().as_u16();
    if status == 401 {
        return Err(AuthError::unauthorized("authorization endpoint rejected the session").into());
    }

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|loc| authorize_url.join(loc).ok());
    let Some(location) = location else {
        warn!(status, "authorization endpoint did not redirect");
        return Err(AuthError::MissingAuthorizationCode.into());
    };

    let param = |name: &str| {
        location
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };
    if let Some(returned) = param("state") {
        if returned != state {
            return Err(AuthError::unauthorized("authorization state mismatch").into());
        }
    }
    let code = param("code")
        .filter(|c| !c.is_empty())
        .ok_or(AuthError::MissingAuthorizationCode)?;
    debug!("received authorization code");

    let token_url = composer.versionless(&QueryParams::new(), &[config.token_path.as_str()])?;
    let token = request_token(
        &http,
        &token_url,
        &[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code_verifier", pkce.verifier.as_str()),
        ],
    )
    .await?;

    Ok(TokenSource::new(http, token_url, config, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_rfc7636_appendix_b_vector() {
        let pkce = PkceChallenge::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(pkce.challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_generated_verifier_shape() {
        let pkce = PkceChallenge::generate();
        assert_eq!(pkce.verifier.len(), 43);
        assert!(!pkce.challenge.contains('='));
        assert_ne!(PkceChallenge::generate().verifier, pkce.verifier);
        assert_ne!(generate_state(), generate_state());
    }

    async fn run(server: &MockServer) -> Result<TokenSource, ApiError> {
        let config = OAuth2Config::new("client-1", "secret-1").with_scopes(["household_member"]);
        run_with(server, &config).await
    }

    async fn run_with(server: &MockServer, config: &OAuth2Config) -> Result<TokenSource, ApiError> {
        bootstrap(
            &Url::parse(&server.uri()).unwrap(),
            config,
            &Cookie::new("session", "xyz"),
            Duration::from_secs(5),
            "mealplan-client/test",
        )
        .await
    }

    #[tokio::test]
    async fn test_bootstrap_exchanges_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/authorize"))
            .and(header("cookie", "session=xyz"))
            .and(query_param("code_challenge_method", "S256"))
            .and(query_param("client_id", "client-1"))
            .and(query_param("scope", "household_member"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", "/callback?code=auth-code-1"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth-code-1"))
            .and(body_string_contains("code_verifier="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = run(&server).await.unwrap();
        assert_eq!(source.access_token().await.unwrap(), "access-1");
    }

    #[tokio::test]
    async fn test_authorize_url_omits_empty_scope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/authorize"))
            .and(|req: &wiremock::Request| !req.url.query_pairs().any(|(k, _)| k == "scope"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/cb?code=c2"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("code=c2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-2",
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;

        let source = run_with(&server, &OAuth2Config::new("client-1", "secret-1"))
            .await
            .unwrap();
        assert_eq!(source.access_token().await.unwrap(), "access-2");
    }

    #[tokio::test]
    async fn test_missing_code_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/authorize"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", "/callback?error=denied"),
            )
            .mount(&server)
            .await;

        let err = run(&server).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_token_endpoint_error_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/authorize"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/cb?code=c1"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let err = run(&server).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::TokenExchange { .. })));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }
}
