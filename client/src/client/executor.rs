//! Request execution with credentials and retries.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::auth::AuthTransport;
use crate::error::{ApiError, ClientError, ConfigError};
use crate::request::ApiRequest;
use crate::retry::RetryPolicy;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the connection pool shared by both executors of a client.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(ConfigError::HttpClient)
}

/// Sends [`ApiRequest`]s through an auth transport under a retry policy.
///
/// An executor never classifies statuses; it hands back whatever response
/// the final attempt produced.
#[derive(Clone)]
pub struct Executor {
    http: reqwest::Client,
    transport: Arc<dyn AuthTransport>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("transport", &self.transport)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Executor {
    pub(crate) fn new(
        http: reqwest::Client,
        transport: Arc<dyn AuthTransport>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            transport,
            retry,
            timeout,
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The transport that attaches credentials.
    pub fn transport(&self) -> &Arc<dyn AuthTransport> {
        &self.transport
    }

    /// Sends `request`, retrying as the policy allows.
    ///
    /// ## Errors
    ///
    /// Returns a transport error if no attempt produced a response, or an
    /// error from the transport if credentials could not be attached.
    pub async fn execute(&self, request: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        let mut attempt = 0;
        loop {
            let mut outgoing = request.to_reqwest(&self.http)?;
            self.transport.authorize(&mut outgoing).await?;
            self.retry.before_send(&outgoing, attempt);

            let outcome = self.http.execute(outgoing).await;
            if let Ok(response) = &outcome {
                self.transport.observe(response);
                self.retry.after_receive(response);
            }

            let wanted = self.retry.wants_retry(outcome.as_ref());
            if !wanted || attempt >= self.retry.max_retries() {
                let outcome = outcome.map_err(|e| self.transport_error(e));
                return if wanted {
                    self.retry.give_up(outcome, attempt + 1)
                } else {
                    outcome
                };
            }

            let wait = self.retry.wait(attempt, outcome.as_ref().ok());
            match &outcome {
                Ok(response) => warn!(
                    status = response.status().as_u16(),
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "retrying request"
                ),
                Err(e) => warn!(
                    error = %e,
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "retrying request"
                ),
            }
            drop(outcome);
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        let err = if err.is_timeout() {
            ClientError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else {
            ClientError::Request(err)
        };
        err.into()
    }
}
