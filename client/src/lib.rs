//! Typed HTTP client for the meal planning REST API.
//!
//! The crate is organised in layers:
//!
//! - **Endpoints** ([`endpoint`], [`endpoints`]): typed route descriptors
//!   pairing an HTTP method and path template with the input they take and
//!   the [`response`] shape they return
//! - **Requests** ([`request`], [`url_builder`], [`query`]): URL composition
//!   under the versioned API prefix, query parameters, and body encoding
//! - **Transport** ([`auth`], [`retry`], [`client`]): credential attachment,
//!   retry with backoff, and the [`Client`] that ties it together
//! - **Errors** ([`error`]): a layered error type with a flat [`ErrorKind`]
//!   for matching
//!
//! ## Example
//!
//! ```rust,ignore
//! use mealplan_client::{Client, ClientOption, Cookie, QueryFilter, SortOrder};
//!
//! let client = Client::new(
//!     "https://api.example.test",
//!     [ClientOption::Cookie(Cookie::new("session", token))],
//! )
//! .await?;
//!
//! let filter = QueryFilter::new().sort_by(SortOrder::Desc);
//! let households = client.get_households(Some(&filter)).await?;
//! for household in households.data {
//!     println!("{}", household.name);
//! }
//! ```

pub mod auth;
pub mod client;
pub mod encoding;
pub mod endpoint;
pub mod endpoints;
pub mod error;
pub mod method;
pub mod query;
pub mod request;
pub mod response;
pub mod retry;
pub mod types;
pub mod url_builder;
pub mod validate;

// Re-exports for convenience
pub use auth::{AuthMode, AuthTransport, Cookie, OAuth2Config, OAuth2Token};
pub use client::{Client, ClientBuilder, ClientOption, ClientSettings};
pub use encoding::Encoding;
pub use endpoint::{BadRequestKind, Endpoint, EndpointBuilder};
pub use error::{
    ApiError, AuthError, ClientError, ConfigError, ErrorKind, InputError, ValidationError,
};
pub use method::RestMethod;
pub use query::{QueryFilter, QueryParams, SortOrder};
pub use request::{ApiRequest, RequestBuilder};
pub use response::{ApiResponse, Pagination, QueryFilteredResult};
pub use retry::RetryPolicy;
pub use types::UserLoginInput;
pub use url_builder::UrlComposer;
pub use validate::Validatable;
