//! Session, credential, health, and streaming operations.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::{debug, info, instrument};
use url::Url;

use super::api_client::Client;
use super::dispatch::round_trip;
use super::executor::Executor;
use super::NO_ARGS;
use crate::auth::{AuthMode, Cookie};
use crate::endpoints;
use crate::error::{ApiError, AuthError, InputError};
use crate::query::QueryParams;
use crate::request::{ApiRequest, RequestBuilder};
use crate::response::Empty;
use crate::types::{
    ChangeActiveHouseholdInput, PasswordResetTokenCreationRequestInput,
    PasswordResetTokenRedemptionRequestInput, PasswordUpdateInput, TotpSecretRefreshInput,
    TotpSecretRefreshResponse, TotpSecretVerificationInput, UserLoginInput,
};
use crate::validate::Validatable;

/// Media type of the server-sent event stream.
pub const EVENT_STREAM: &str = "text/event-stream";

/// Posts `credentials` to the login endpoint and returns the first cookie
/// the server sets.
#[instrument(
    name = "begin_session",
    skip_all,
    fields(username = %credentials.username)
)]
pub(crate) async fn login(
    requests: &RequestBuilder,
    executor: &Executor,
    credentials: &UserLoginInput,
) -> Result<Cookie, ApiError> {
    credentials.validate()?;
    let endpoint = endpoints::login::<UserLoginInput>();
    let request =
        requests.build_with_body(&endpoint, NO_ARGS, &QueryParams::new(), Some(credentials))?;

    let response = round_trip::<Empty>(executor, &request, endpoint.bad_request_kind()).await?;
    let cookie = Cookie::from_response(&response).ok_or(AuthError::NoCookiesReturned)?;
    info!(cookie = %cookie.name, "session started");
    Ok(cookie)
}

impl Client {
    /// Logs in and returns the session cookie.
    ///
    /// The client's own credentials are left unchanged; pass the cookie to
    /// [`ClientOption::Cookie`](super::ClientOption::Cookie) to use it.
    ///
    /// ## Errors
    ///
    /// Returns [`AuthError::NoCookiesReturned`] if the server accepted the
    /// login without setting a cookie.
    pub async fn begin_session(&self, credentials: &UserLoginInput) -> Result<Cookie, ApiError> {
        self.logged(login(self.requests(), self.unauthed(), credentials))
            .await
    }

    /// Logs out. Succeeds only on HTTP 202.
    pub async fn end_session(&self) -> Result<(), ApiError> {
        self.fetch(&endpoints::logout(), NO_ARGS, &QueryParams::new())
            .await
    }

    /// Changes the current user's password. Succeeds only on HTTP 202.
    pub async fn change_password(&self, input: &PasswordUpdateInput) -> Result<(), ApiError> {
        self.send(&endpoints::change_password(), NO_ARGS, Some(input))
            .await
    }

    /// Issues a new TOTP secret for the current user.
    pub async fn cycle_two_factor_secret(
        &self,
        input: &TotpSecretRefreshInput,
    ) -> Result<TotpSecretRefreshResponse, ApiError> {
        let endpoint = endpoints::cycle_two_factor_secret::<_, TotpSecretRefreshResponse>();
        self.send(&endpoint, NO_ARGS, Some(input)).await
    }

    /// Confirms a freshly issued TOTP secret.
    ///
    /// ## Errors
    ///
    /// Returns [`InputError::InvalidId`] for an empty `user_id` and
    /// [`AuthError::InvalidTotpToken`] if the server rejects the token.
    pub async fn verify_totp_secret(&self, user_id: &str, token: &str) -> Result<(), ApiError> {
        if user_id.is_empty() {
            return Err(InputError::invalid_id("user_id").into());
        }
        let input = TotpSecretVerificationInput {
            totp_token: token.to_string(),
            user_id: user_id.to_string(),
        };
        self.send(&endpoints::verify_totp_secret(), NO_ARGS, Some(&input))
            .await
    }

    /// Asks the server to email a password reset token.
    ///
    /// ## Errors
    ///
    /// Returns [`InputError::EmptyEmail`] for an empty address.
    pub async fn request_password_reset_token(&self, email_address: &str) -> Result<(), ApiError> {
        if email_address.trim().is_empty() {
            return Err(InputError::EmptyEmail.into());
        }
        let input = PasswordResetTokenCreationRequestInput {
            email_address: email_address.to_string(),
        };
        self.send(&endpoints::request_password_reset_token(), NO_ARGS, Some(&input))
            .await
    }

    /// Sets a new password using a reset token.
    pub async fn redeem_password_reset_token(
        &self,
        input: &PasswordResetTokenRedemptionRequestInput,
    ) -> Result<(), ApiError> {
        self.send(&endpoints::redeem_password_reset_token(), NO_ARGS, Some(input))
            .await
    }

    /// Selects the household subsequent requests act on.
    ///
    /// The server is only told in cookie mode, where the session carries
    /// the selection. The id is recorded on the client in every mode.
    ///
    /// ## Errors
    ///
    /// Returns [`InputError::InvalidId`] for an empty id.
    pub async fn switch_active_household(&self, household_id: &str) -> Result<(), ApiError> {
        if household_id.is_empty() {
            return Err(InputError::invalid_id("household_id").into());
        }
        if self.settings().auth_mode == AuthMode::Cookie {
            let input = ChangeActiveHouseholdInput {
                household_id: household_id.to_string(),
            };
            self.send(&endpoints::switch_active_household(), NO_ARGS, Some(&input))
                .await?;
        }
        self.set_active_household_id(household_id.to_string());
        Ok(())
    }

    /// Builds the readiness probe request.
    ///
    /// ## Errors
    ///
    /// Returns a build error if the URL cannot be composed.
    pub fn build_health_check_request(&self) -> Result<ApiRequest, ApiError> {
        self.requests()
            .build(&endpoints::readiness(), NO_ARGS, &QueryParams::new())
    }

    /// Returns `true` only if the readiness probe answers 200. Errors of any
    /// kind count as down.
    pub async fn is_up(&self) -> bool {
        let probe = async {
            let request = self.build_health_check_request()?;
            let response = self.unauthed().execute(&request).await?;
            Ok::<_, ApiError>(response.status().as_u16())
        };
        match self.logged(probe).await {
            Ok(status) => {
                debug!(status, "readiness probe answered");
                status == 200
            }
            Err(e) => {
                debug!(error = %e, "readiness probe failed");
                false
            }
        }
    }

    /// Composes a websocket URL for a versioned path.
    ///
    /// ## Errors
    ///
    /// Returns a build error if a part is invalid.
    pub fn build_websocket_url(&self, parts: &[&str]) -> Result<Url, ApiError> {
        Ok(self.requests().composer().websocket(parts)?)
    }

    /// Returns the credential headers the authenticated executor attaches,
    /// for channels that dial the server themselves.
    pub async fn build_request_headers(&self) -> Result<HeaderMap, ApiError> {
        self.logged(self.authed().transport().credential_headers())
            .await
    }

    /// Builds the request that opens the server-sent event stream.
    ///
    /// Consuming the stream is left to an SSE client; this only prepares
    /// the request with credentials attached.
    pub async fn event_stream_request(&self) -> Result<ApiRequest, ApiError> {
        let mut headers = self.build_request_headers().await?;
        headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM));
        self.requests()
            .build_with_headers(&endpoints::event_stream(), NO_ARGS, headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientOption;
    use crate::error::ErrorKind;
    use reqwest::header::COOKIE;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer, options: Vec<ClientOption>) -> Client {
        Client::new(server.uri(), options).await.unwrap()
    }

    #[tokio::test]
    async fn test_login_without_cookie_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/login"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let err = client(&server, vec![])
            .await
            .begin_session(&UserLoginInput::new("cook", "hunter22"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoCookiesReturned);
    }

    #[tokio::test]
    async fn test_empty_email_is_rejected_locally() {
        let server = MockServer::start().await;
        let err = client(&server, vec![])
            .await
            .request_password_reset_token("  ")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyEmail);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_requires_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/logout"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = client(&server, vec![]).await.end_session().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponseCode);
    }

    #[tokio::test]
    async fn test_switch_household_without_cookie_skips_server() {
        let server = MockServer::start().await;
        let client = client(&server, vec![]).await;

        client.switch_active_household("h1").await.unwrap();
        assert_eq!(client.active_household_id().as_deref(), Some("h1"));
        assert!(server.received_requests().await.unwrap().is_empty());

        let err = client.switch_active_household("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidId);
    }

    #[tokio::test]
    async fn test_switch_household_with_cookie_informs_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/household/select"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(
            &server,
            vec![ClientOption::Cookie(Cookie::new("session", "xyz"))],
        )
        .await;
        client.switch_active_household("h2").await.unwrap();
        assert_eq!(client.active_household_id().as_deref(), Some("h2"));
    }

    #[tokio::test]
    async fn test_websocket_url() {
        let client = Client::new("https://example.test", []).await.unwrap();
        let url = client.build_websocket_url(&["data_changes"]).unwrap();
        assert_eq!(url.as_str(), "wss://example.test/api/v1/data_changes");
    }

    #[tokio::test]
    async fn test_event_stream_request_carries_credentials() {
        let client = Client::new(
            "https://example.test",
            [ClientOption::Cookie(Cookie::new("session", "xyz"))],
        )
        .await
        .unwrap();

        let request = client.event_stream_request().await.unwrap();
        assert_eq!(request.path(), "/events");
        assert_eq!(request.header(ACCEPT), Some(EVENT_STREAM));
        assert_eq!(request.header(COOKIE), Some("session=xyz"));
    }

    #[tokio::test]
    async fn test_health_check_request_is_versionless() {
        let client = Client::new("https://example.test", []).await.unwrap();
        let request = client.build_health_check_request().unwrap();
        assert_eq!(request.url.as_str(), "https://example.test/_meta_/ready");
    }
}
