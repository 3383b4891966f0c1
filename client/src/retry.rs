//! Retry policy for the request executors.
//!
//! A [`RetryPolicy`] is a value: limits plus a set of pluggable hooks. The
//! executor consults it after every attempt. Retries are off by default
//! (`max_retries == 0`), but the hooks are always installed so that turning
//! retries on is a configuration change only.
//!
//! ## Examples
//!
//! ```
//! use std::time::Duration;
//! use mealplan_client::retry::RetryPolicy;
//!
//! let policy = RetryPolicy::default()
//!     .with_max_retries(3)
//!     .with_wait_bounds(Duration::from_millis(50), Duration::from_millis(500));
//! assert_eq!(policy.max_retries(), 3);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::ApiError;

/// Default lower bound between attempts.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_millis(100);

/// Default upper bound between attempts.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(1);

/// Decides whether an attempt's outcome warrants another attempt.
pub type RetryPredicate =
    Arc<dyn Fn(Result<&reqwest::Response, &reqwest::Error>) -> bool + Send + Sync>;

/// Computes the wait before attempt `attempt + 1` from
/// `(min_wait, max_wait, attempt, response)`.
pub type Backoff =
    Arc<dyn Fn(Duration, Duration, u32, Option<&reqwest::Response>) -> Duration + Send + Sync>;

/// Observes a request just before it is sent, with the attempt number.
pub type RequestHook = Arc<dyn Fn(&reqwest::Request, u32) + Send + Sync>;

/// Observes a response as soon as it arrives.
pub type ResponseHook = Arc<dyn Fn(&reqwest::Response) + Send + Sync>;

/// Transforms the final outcome once the loop gives up, with the number of
/// attempts made.
pub type ErrorHandler = Arc<
    dyn Fn(Result<reqwest::Response, ApiError>, u32) -> Result<reqwest::Response, ApiError>
        + Send
        + Sync,
>;

/// Retry limits and hooks.
#[derive(Clone)]
pub struct RetryPolicy {
    min_wait: Duration,
    max_wait: Duration,
    max_retries: u32,
    predicate: RetryPredicate,
    backoff: Backoff,
    on_request: RequestHook,
    on_response: ResponseHook,
    error_handler: ErrorHandler,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_wait: DEFAULT_MIN_WAIT,
            max_wait: DEFAULT_MAX_WAIT,
            max_retries: 0,
            predicate: Arc::new(default_retry_predicate),
            backoff: Arc::new(exponential_backoff),
            on_request: Arc::new(log_request),
            on_response: Arc::new(log_response),
            error_handler: Arc::new(pass_through),
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("min_wait", &self.min_wait)
            .field("max_wait", &self.max_wait)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

/// Policies compare by their limits; hooks are opaque.
impl PartialEq for RetryPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.min_wait == other.min_wait
            && self.max_wait == other.max_wait
            && self.max_retries == other.max_retries
    }
}

impl RetryPolicy {
    /// Sets how many retries follow the first attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the wait bounds. `max` is raised to `min` if smaller.
    pub fn with_wait_bounds(mut self, min: Duration, max: Duration) -> Self {
        self.min_wait = min;
        self.max_wait = max.max(min);
        self
    }

    /// Replaces the retry predicate.
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(Result<&reqwest::Response, &reqwest::Error>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Replaces the backoff function.
    pub fn with_backoff(
        mut self,
        backoff: impl Fn(Duration, Duration, u32, Option<&reqwest::Response>) -> Duration
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    /// Replaces the request log hook.
    pub fn with_request_hook(
        mut self,
        hook: impl Fn(&reqwest::Request, u32) + Send + Sync + 'static,
    ) -> Self {
        self.on_request = Arc::new(hook);
        self
    }

    /// Replaces the response log hook.
    pub fn with_response_hook(
        mut self,
        hook: impl Fn(&reqwest::Response) + Send + Sync + 'static,
    ) -> Self {
        self.on_response = Arc::new(hook);
        self
    }

    /// Replaces the error handler applied when retries are exhausted.
    pub fn with_error_handler(
        mut self,
        handler: impl Fn(Result<reqwest::Response, ApiError>, u32) -> Result<reqwest::Response, ApiError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    pub fn min_wait(&self) -> Duration {
        self.min_wait
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns `true` if the predicate asks for another attempt.
    pub(crate) fn wants_retry(&self, outcome: Result<&reqwest::Response, &reqwest::Error>) -> bool {
        (self.predicate)(outcome)
    }

    pub(crate) fn wait(&self, attempt: u32, response: Option<&reqwest::Response>) -> Duration {
        (self.backoff)(self.min_wait, self.max_wait, attempt, response)
    }

    pub(crate) fn before_send(&self, request: &reqwest::Request, attempt: u32) {
        (self.on_request)(request, attempt);
    }

    pub(crate) fn after_receive(&self, response: &reqwest::Response) {
        (self.on_response)(response);
    }

    pub(crate) fn give_up(
        &self,
        outcome: Result<reqwest::Response, ApiError>,
        attempts: u32,
    ) -> Result<reqwest::Response, ApiError> {
        (self.error_handler)(outcome, attempts)
    }
}

/// Retries transient transport failures and 5xx responses other than 501.
/// Client errors are never retried.
pub fn default_retry_predicate(outcome: Result<&reqwest::Response, &reqwest::Error>) -> bool {
    match outcome {
        Ok(response) => {
            let status = response.status();
            status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED
        }
        Err(e) => e.is_timeout() || e.is_connect(),
    }
}

/// Exponential backoff with jitter, clamped to `[min, max]`.
///
/// A `Retry-After` header in seconds on a 429 or 503 response takes
/// precedence, still clamped to `max`.
pub fn exponential_backoff(
    min: Duration,
    max: Duration,
    attempt: u32,
    response: Option<&reqwest::Response>,
) -> Duration {
    if let Some(after) = response.and_then(retry_after) {
        return after.max(min).min(max);
    }

    let base = min.saturating_mul(2u32.saturating_pow(attempt)).min(max);
    let jitter_ceiling = base.as_millis() as u64 / 2;
    let jitter = if jitter_ceiling == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..=jitter_ceiling)
    };
    (base + Duration::from_millis(jitter)).max(min).min(max)
}

fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    let status = response.status();
    if status != StatusCode::TOO_MANY_REQUESTS && status != StatusCode::SERVICE_UNAVAILABLE {
        return None;
    }
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn pass_through(
    outcome: Result<reqwest::Response, ApiError>,
    _attempts: u32,
) -> Result<reqwest::Response, ApiError> {
    outcome
}

fn log_request(request: &reqwest::Request, attempt: u32) {
    debug!(
        method = %request.method(),
        url = %request.url(),
        attempt,
        "sending request"
    );
}

fn log_response(response: &reqwest::Response) {
    debug!(
        status = response.status().as_u16(),
        url = %response.url(),
        "received response"
    );
}
