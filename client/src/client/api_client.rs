//! The configured client and its generic entry points.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;

use super::dispatch::{execute_and_unmarshal, DispatchContext};
use super::executor::{http_client, Executor};
use super::options::{AuthState, ClientBuilder, ClientOption, ClientSettings, Draft};
use crate::auth::{AuthTransport, DefaultTransport, OAuth2Transport};
use crate::endpoint::Endpoint;
use crate::error::{ApiError, InputError};
use crate::query::QueryParams;
use crate::request::{ApiRequest, RequestBuilder};
use crate::response::ResponseShape;
use crate::validate::Validatable;

/// A configured API client.
///
/// A client owns two executors over one connection pool: the authenticated
/// one attaches the configured credentials, the plain one never does. Once
/// built, a client is shared by reference across concurrent tasks;
/// [`reconfigure`](Self::reconfigure) needs exclusive access and therefore
/// cannot overlap with in-flight requests.
///
/// ## Examples
///
/// ```rust,ignore
/// use mealplan_client::{Client, Cookie};
///
/// let client = Client::builder()
///     .url("https://api.example.test")
///     .cookie(Cookie::new("session", token))
///     .build()
///     .await?;
///
/// let household = client.get_current_household().await?;
/// ```
#[derive(Debug)]
pub struct Client {
    settings: ClientSettings,
    draft: Draft,
    requests: RequestBuilder,
    authed: Executor,
    unauthed: Executor,
    household_id: RwLock<Option<String>>,
}

impl Client {
    /// Creates a builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Builds a client for `base_url` with `options` applied after it.
    ///
    /// ## Errors
    ///
    /// Returns the first failing option's error.
    pub async fn new(
        base_url: impl Into<String>,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Result<Self, ApiError> {
        ClientBuilder::new()
            .url(base_url)
            .options(options)
            .build()
            .await
    }

    pub(crate) fn from_draft(draft: Draft) -> Result<Self, ApiError> {
        let settings = draft.settings()?;
        let http = http_client(settings.timeout)?;
        let requests = RequestBuilder::new(
            settings.base_url.clone(),
            settings.encoding,
            &settings.user_agent,
        )?;

        let plain: Arc<dyn AuthTransport> = Arc::new(DefaultTransport::new(&settings.user_agent)?);
        let credentialed: Arc<dyn AuthTransport> = match &draft.auth {
            AuthState::None => plain.clone(),
            AuthState::Cookie(transport) => transport.clone(),
            AuthState::OAuth2(source) => Arc::new(OAuth2Transport::new(source.clone())),
        };

        let authed = Executor::new(
            http.clone(),
            credentialed,
            settings.retry.clone(),
            settings.timeout,
        );
        let unauthed = Executor::new(http, plain, settings.retry.clone(), settings.timeout);

        Ok(Self {
            settings,
            draft,
            requests,
            authed,
            unauthed,
            household_id: RwLock::new(None),
        })
    }

    /// Applies more options to this client.
    ///
    /// Either every option applies or the client is left unchanged.
    ///
    /// ## Errors
    ///
    /// Returns the first failing option's error.
    pub async fn reconfigure(
        &mut self,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Result<(), ApiError> {
        let mut draft = self.draft.clone();
        draft.apply_all(options).await?;
        let household_id = self.active_household_id();

        *self = Self::from_draft(draft)?;
        *self
            .household_id
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = household_id;
        Ok(())
    }

    /// The current configuration.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// The request builder bound to this client's base URL and encoding.
    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    /// The HTTP client behind the authenticated executor.
    pub fn authenticated_client(&self) -> &reqwest::Client {
        self.authed.http()
    }

    /// The HTTP client behind the unauthenticated executor.
    pub fn plain_client(&self) -> &reqwest::Client {
        self.unauthed.http()
    }

    /// The household most recently selected with
    /// [`switch_active_household`](Self::switch_active_household).
    pub fn active_household_id(&self) -> Option<String> {
        self.household_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_active_household_id(&self, household_id: String) {
        *self
            .household_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(household_id);
    }

    pub(crate) fn authed(&self) -> &Executor {
        &self.authed
    }

    pub(crate) fn unauthed(&self) -> &Executor {
        &self.unauthed
    }

    /// Runs `future` under the configured logger, if any.
    pub(crate) async fn logged<F: Future>(&self, future: F) -> F::Output {
        match &self.draft.logger {
            Some(dispatch) => future.with_subscriber(Dispatch::clone(dispatch)).await,
            None => future.await,
        }
    }

    fn executor_for<I, O>(&self, endpoint: &Endpoint<I, O>) -> &Executor {
        if endpoint.requires_auth() {
            &self.authed
        } else {
            &self.unauthed
        }
    }

    /// Sends a prepared request on `executor` and decodes it as `O`.
    pub(crate) async fn dispatch<I, O: ResponseShape>(
        &self,
        endpoint: &Endpoint<I, O>,
        executor: &Executor,
        request: ApiRequest,
    ) -> Result<O::Output, ApiError> {
        let ctx = DispatchContext {
            encoding: self.settings.encoding,
            debug: self.settings.debug,
            bad_request: endpoint.bad_request_kind(),
        };
        self.logged(execute_and_unmarshal::<O>(executor, &request, ctx))
            .await
    }

    /// Calls a body-less endpoint.
    ///
    /// Endpoints that require authentication go through the authenticated
    /// executor, the rest through the plain one.
    ///
    /// ## Errors
    ///
    /// Returns [`InputError::InvalidId`] for an empty path argument, without
    /// sending anything, and otherwise any dispatch error.
    pub async fn fetch<I, O: ResponseShape>(
        &self,
        endpoint: &Endpoint<I, O>,
        args: &[&str],
        query: &QueryParams,
    ) -> Result<O::Output, ApiError> {
        let request = self.requests.build(endpoint, args, query)?;
        self.dispatch(endpoint, self.executor_for(endpoint), request)
            .await
    }

    /// Calls a body-less endpoint on the unauthenticated executor, whatever
    /// the endpoint declares.
    ///
    /// ## Errors
    ///
    /// As [`fetch`](Self::fetch).
    pub async fn fetch_without_auth<I, O: ResponseShape>(
        &self,
        endpoint: &Endpoint<I, O>,
        args: &[&str],
        query: &QueryParams,
    ) -> Result<O::Output, ApiError> {
        let request = self.requests.build(endpoint, args, query)?;
        self.dispatch(endpoint, &self.unauthed, request).await
    }

    /// Calls an endpoint with a payload.
    ///
    /// Path arguments are checked first, then the payload's presence and its
    /// own validation, all before the request is built.
    ///
    /// ## Errors
    ///
    /// Returns [`InputError::InvalidId`] for an empty path argument,
    /// [`InputError::NilInput`] if `payload` is `None`, the validator's error
    /// if it rejects the payload, and otherwise as [`fetch`](Self::fetch).
    /// Nothing is sent in the first three cases.
    pub async fn send<I, O>(
        &self,
        endpoint: &Endpoint<I, O>,
        args: &[&str],
        payload: Option<&I>,
    ) -> Result<O::Output, ApiError>
    where
        I: Serialize + Validatable + Sync,
        O: ResponseShape,
    {
        endpoint.segments(args)?;
        let payload = payload.ok_or(InputError::NilInput)?;
        payload.validate()?;
        let request =
            self.requests
                .build_with_body(endpoint, args, &QueryParams::new(), Some(payload))?;
        self.dispatch(endpoint, self.executor_for(endpoint), request)
            .await
    }
}
