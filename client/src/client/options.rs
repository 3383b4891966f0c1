//! Client options and the builder that applies them.
//!
//! Options are applied in the order they were given. Each may fail, which
//! aborts construction. [`ClientOption::Login`] and [`ClientOption::OAuth2`]
//! perform I/O against the base URL configured by earlier options.

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::instrument::WithSubscriber;
use tracing::{debug, Dispatch};
use url::Url;

use super::api_client::Client;
use super::executor::{http_client, Executor, DEFAULT_TIMEOUT};
use super::session;
use crate::auth::{
    pkce, AuthMode, Cookie, CookieTransport, DefaultTransport, OAuth2Config, TokenSource,
};
use crate::encoding::Encoding;
use crate::error::{ApiError, ConfigError, InputError};
use crate::request::RequestBuilder;
use crate::retry::RetryPolicy;
use crate::types::UserLoginInput;

/// Environment variable holding the base URL.
pub const ENV_URL: &str = "MEALPLAN_API_URL";
/// Environment variable holding the request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "MEALPLAN_API_TIMEOUT_SECS";
/// Environment variable enabling curl-style request logging.
pub const ENV_DEBUG: &str = "MEALPLAN_API_DEBUG";
/// Environment variable selecting `json` or `xml`.
pub const ENV_FORMAT: &str = "MEALPLAN_API_FORMAT";

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("mealplan-client/", env!("CARGO_PKG_VERSION"));

/// One configuration step for a [`Client`].
#[derive(Clone)]
pub enum ClientOption {
    /// Parse and set the base URL.
    Url(String),
    /// Run every client operation under this subscriber.
    Logger(Dispatch),
    /// Encode bodies as JSON.
    Json,
    /// Encode bodies as XML.
    Xml,
    /// Log each request as a curl command line.
    Debug(bool),
    /// Request timeout for both executors; zero selects the default.
    Timeout(Duration),
    /// Authenticate with a session cookie.
    Cookie(Cookie),
    /// Log in now and authenticate with the returned cookie.
    Login(UserLoginInput),
    /// Run the authorization-code flow with PKCE now and authenticate with
    /// the issued bearer token. `cookie` must be a session accepted by the
    /// authorization endpoint.
    OAuth2 { config: OAuth2Config, cookie: Cookie },
    /// Replace the retry policy.
    Retry(RetryPolicy),
    /// Replace the user agent.
    UserAgent(String),
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Self::Logger(_) => f.write_str("Logger"),
            Self::Json => f.write_str("Json"),
            Self::Xml => f.write_str("Xml"),
            Self::Debug(on) => f.debug_tuple("Debug").field(on).finish(),
            Self::Timeout(d) => f.debug_tuple("Timeout").field(d).finish(),
            Self::Cookie(c) => f.debug_tuple("Cookie").field(c).finish(),
            Self::Login(creds) => f
                .debug_struct("Login")
                .field("username", &creds.username)
                .finish_non_exhaustive(),
            Self::OAuth2 { config, cookie } => f
                .debug_struct("OAuth2")
                .field("config", config)
                .field("cookie", cookie)
                .finish(),
            Self::Retry(policy) => f.debug_tuple("Retry").field(policy).finish(),
            Self::UserAgent(ua) => f.debug_tuple("UserAgent").field(ua).finish(),
        }
    }
}

/// A comparable snapshot of a client's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub base_url: Url,
    pub encoding: Encoding,
    pub timeout: Duration,
    pub debug: bool,
    pub auth_mode: AuthMode,
    pub user_agent: String,
    /// Compared by its limits only.
    pub retry: RetryPolicy,
}

/// Credential state carried across reconfiguration.
#[derive(Debug, Clone, Default)]
pub(crate) enum AuthState {
    #[default]
    None,
    Cookie(Arc<CookieTransport>),
    OAuth2(Arc<TokenSource>),
}

impl AuthState {
    pub(crate) fn mode(&self) -> AuthMode {
        match self {
            Self::None => AuthMode::None,
            Self::Cookie(_) => AuthMode::Cookie,
            Self::OAuth2(_) => AuthMode::OAuth2,
        }
    }
}

/// Configuration being assembled by options.
#[derive(Debug, Clone)]
pub(crate) struct Draft {
    pub base_url: Option<Url>,
    pub encoding: Encoding,
    pub timeout: Duration,
    pub debug: bool,
    pub user_agent: String,
    pub retry: RetryPolicy,
    pub logger: Option<Dispatch>,
    pub auth: AuthState,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            base_url: None,
            encoding: Encoding::default(),
            timeout: DEFAULT_TIMEOUT,
            debug: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
            logger: None,
            auth: AuthState::None,
        }
    }
}

impl Draft {
    /// Applies `options` in order, each under the logger configured so far.
    pub(crate) async fn apply_all(
        &mut self,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Result<(), ApiError> {
        for option in options {
            match self.logger.clone() {
                Some(dispatch) => self.apply(option).with_subscriber(dispatch).await?,
                None => self.apply(option).await?,
            }
        }
        Ok(())
    }

    async fn apply(&mut self, option: ClientOption) -> Result<(), ApiError> {
        debug!(option = ?option, "applying client option");
        match option {
            ClientOption::Url(raw) => {
                self.base_url = Some(Url::parse(raw.trim()).map_err(ConfigError::InvalidUrl)?);
            }
            ClientOption::Logger(dispatch) => self.logger = Some(dispatch),
            ClientOption::Json => self.encoding = Encoding::Json,
            ClientOption::Xml => self.encoding = Encoding::Xml,
            ClientOption::Debug(on) => self.debug = on,
            ClientOption::Timeout(timeout) => {
                self.timeout = if timeout.is_zero() {
                    DEFAULT_TIMEOUT
                } else {
                    timeout
                };
            }
            ClientOption::Cookie(cookie) => {
                require_cookie(&cookie)?;
                self.auth = AuthState::Cookie(Arc::new(CookieTransport::new(cookie)?));
            }
            ClientOption::Login(credentials) => {
                let cookie = self.login(&credentials).await?;
                self.auth = AuthState::Cookie(Arc::new(CookieTransport::new(cookie)?));
            }
            ClientOption::OAuth2 { config, cookie } => {
                require_cookie(&cookie)?;
                let base = self.base_url()?;
                let source =
                    pkce::bootstrap(&base, &config, &cookie, self.timeout, &self.user_agent)
                        .await?;
                self.auth = AuthState::OAuth2(Arc::new(source));
            }
            ClientOption::Retry(policy) => self.retry = policy,
            ClientOption::UserAgent(user_agent) => self.user_agent = user_agent,
        }
        Ok(())
    }

    pub(crate) fn base_url(&self) -> Result<Url, ConfigError> {
        self.base_url.clone().ok_or(ConfigError::UrlNotSet)
    }

    pub(crate) fn settings(&self) -> Result<ClientSettings, ConfigError> {
        Ok(ClientSettings {
            base_url: self.base_url()?,
            encoding: self.encoding,
            timeout: self.timeout,
            debug: self.debug,
            auth_mode: self.auth.mode(),
            user_agent: self.user_agent.clone(),
            retry: self.retry.clone(),
        })
    }

    async fn login(&self, credentials: &UserLoginInput) -> Result<Cookie, ApiError> {
        let builder = RequestBuilder::new(self.base_url()?, self.encoding, &self.user_agent)?;
        let executor = Executor::new(
            http_client(self.timeout)?,
            Arc::new(DefaultTransport::new(&self.user_agent)?),
            self.retry.clone(),
            self.timeout,
        );
        session::login(&builder, &executor, credentials).await
    }
}

fn require_cookie(cookie: &Cookie) -> Result<(), InputError> {
    if cookie.is_empty() {
        return Err(InputError::CookieRequired);
    }
    Ok(())
}

/// Builder for a [`Client`].
///
/// ## Examples
///
/// ```rust,ignore
/// use std::time::Duration;
/// use mealplan_client::{Client, UserLoginInput};
///
/// let client = Client::builder()
///     .url("https://api.example.test")
///     .timeout(Duration::from_secs(10))
///     .login(UserLoginInput::new("cook", "hunter22"))
///     .build()
///     .await?;
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    options: Vec<ClientOption>,
}

impl ClientBuilder {
    /// Creates a builder with no options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a builder from `MEALPLAN_API_URL`, `MEALPLAN_API_TIMEOUT_SECS`,
    /// `MEALPLAN_API_DEBUG` and `MEALPLAN_API_FORMAT`. Unset variables are
    /// skipped.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for a value that cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Self::new();

        if let Some(url) = lookup(ENV_URL) {
            builder = builder.url(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidSetting {
                name: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(ENV_DEBUG) {
            let on = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidSetting {
                        name: ENV_DEBUG,
                        value: raw,
                    })
                }
            };
            builder = builder.debug(on);
        }
        if let Some(raw) = lookup(ENV_FORMAT) {
            let encoding =
                raw.trim()
                    .parse::<Encoding>()
                    .map_err(|_| ConfigError::InvalidSetting {
                        name: ENV_FORMAT,
                        value: raw.clone(),
                    })?;
            builder = builder.option(match encoding {
                Encoding::Json => ClientOption::Json,
                Encoding::Xml => ClientOption::Xml,
            });
        }

        Ok(builder)
    }

    /// Appends an option.
    pub fn option(mut self, option: ClientOption) -> Self {
        self.options.push(option);
        self
    }

    /// Appends several options.
    pub fn options(mut self, options: impl IntoIterator<Item = ClientOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn url(self, url: impl Into<String>) -> Self {
        self.option(ClientOption::Url(url.into()))
    }

    pub fn logger(self, dispatch: impl Into<Dispatch>) -> Self {
        self.option(ClientOption::Logger(dispatch.into()))
    }

    pub fn json(self) -> Self {
        self.option(ClientOption::Json)
    }

    pub fn xml(self) -> Self {
        self.option(ClientOption::Xml)
    }

    pub fn debug(self, on: bool) -> Self {
        self.option(ClientOption::Debug(on))
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        self.option(ClientOption::Timeout(timeout))
    }

    pub fn cookie(self, cookie: Cookie) -> Self {
        self.option(ClientOption::Cookie(cookie))
    }

    pub fn login(self, credentials: UserLoginInput) -> Self {
        self.option(ClientOption::Login(credentials))
    }

    pub fn oauth2(self, config: OAuth2Config, cookie: Cookie) -> Self {
        self.option(ClientOption::OAuth2 { config, cookie })
    }

    pub fn retry(self, policy: RetryPolicy) -> Self {
        self.option(ClientOption::Retry(policy))
    }

    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        self.option(ClientOption::UserAgent(user_agent.into()))
    }

    /// Applies the options in order and builds the client.
    ///
    /// ## Errors
    ///
    /// Returns the first option's error, or [`ConfigError::UrlNotSet`] if
    /// no option set a base URL.
    pub async fn build(self) -> Result<Client, ApiError> {
        let mut draft = Draft::default();
        draft.apply_all(self.options).await?;
        Client::from_draft(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[tokio::test]
    async fn test_build_without_url_fails() {
        let err = ClientBuilder::new().json().build().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UrlNotSet);
    }

    #[tokio::test]
    async fn test_invalid_url_is_build_error() {
        let err = ClientBuilder::new().url("not a url").build().await.unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_empty_cookie_is_rejected() {
        let err = ClientBuilder::new()
            .url("https://example.test")
            .cookie(Cookie::new("session", ""))
            .build()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CookieRequired);

        let err = ClientBuilder::new()
            .url("https://example.test")
            .oauth2(OAuth2Config::new("id", "secret"), Cookie::new("", "xyz"))
            .build()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CookieRequired);
    }

    #[tokio::test]
    async fn test_zero_timeout_selects_default() {
        let mut draft = Draft::default();
        draft
            .apply_all([ClientOption::Timeout(Duration::from_secs(5))])
            .await
            .unwrap();
        assert_eq!(draft.timeout, Duration::from_secs(5));
        draft
            .apply_all([ClientOption::Timeout(Duration::ZERO)])
            .await
            .unwrap();
        assert_eq!(draft.timeout, DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_login_needs_url_first() {
        let err = ClientBuilder::new()
            .login(UserLoginInput::new("cook", "hunter22"))
            .url("https://example.test")
            .build()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UrlNotSet);
    }

    #[test]
    fn test_from_env_reads_all_settings() {
        let builder = ClientBuilder::from_lookup(lookup(&[
            (ENV_URL, "https://example.test"),
            (ENV_TIMEOUT_SECS, "12"),
            (ENV_DEBUG, "true"),
            (ENV_FORMAT, "XML"),
        ]))
        .unwrap();
        let rendered = format!("{:?}", builder.options);
        assert!(rendered.contains("https://example.test"));
        assert!(rendered.contains("12s"));
        assert!(rendered.contains("Debug(true)"));
        assert!(rendered.contains("Xml"));
    }

    #[test]
    fn test_from_env_rejects_bad_values() {
        let err = ClientBuilder::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                name: ENV_TIMEOUT_SECS,
                ..
            }
        ));

        let err = ClientBuilder::from_lookup(lookup(&[(ENV_FORMAT, "yaml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { name: ENV_FORMAT, .. }));
    }

    #[test]
    fn test_from_env_with_nothing_set() {
        let builder = ClientBuilder::from_lookup(|_| None).unwrap();
        assert!(builder.options.is_empty());
    }

    #[test]
    fn test_login_debug_hides_password() {
        let rendered = format!(
            "{:?}",
            ClientOption::Login(UserLoginInput::new("cook", "hunter22"))
        );
        assert!(rendered.contains("cook"));
        assert!(!rendered.contains("hunter22"));
    }
}
