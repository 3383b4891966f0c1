//! The configured API client.
//!
//! A [`Client`] is assembled from an ordered list of [`ClientOption`]s,
//! either directly through [`Client::new`] or with a [`ClientBuilder`].
//! Options apply in order, so options that talk to the server (login and
//! the OAuth2 bootstrap) must come after the URL.
//!
//! ## Examples
//!
//! ```rust,ignore
//! use mealplan_client::{Client, ClientOption, UserLoginInput};
//!
//! let client = Client::new(
//!     "https://api.example.test",
//!     [
//!         ClientOption::Login(UserLoginInput::new("cook", "hunter22")),
//!         ClientOption::Debug(true),
//!     ],
//! )
//! .await?;
//!
//! client.switch_active_household("h1").await?;
//! let households = client.get_households(None).await?;
//! ```

mod api_client;
mod dispatch;
mod executor;
mod options;
mod resources;
mod session;

pub use api_client::Client;
pub use executor::{Executor, DEFAULT_TIMEOUT};
pub use options::{
    ClientBuilder, ClientOption, ClientSettings, DEFAULT_USER_AGENT, ENV_DEBUG, ENV_FORMAT,
    ENV_TIMEOUT_SECS, ENV_URL,
};
pub use session::EVENT_STREAM;

/// Path arguments for routes that take none.
pub(crate) const NO_ARGS: &[&str] = &[];
