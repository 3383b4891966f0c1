//! Layered error types for the client crate.
//!
//! The error hierarchy is structured for actionable diagnostics:
//! - [`ApiError`] - Top-level error type for all client operations
//! - [`InputError`] - Caller mistakes caught before any I/O
//! - [`ConfigError`] - Client construction and request building errors
//! - [`ClientError`] - Transport failures and non-success HTTP statuses
//! - [`AuthError`] - Authentication and credential errors
//! - [`ValidationError`] - Body encoding and envelope decoding errors
//!
//! Every error maps onto a flat [`ErrorKind`] via [`ApiError::kind`], which is
//! what callers compare against when they only care about the category.

mod api_error;
mod auth_error;
mod client_error;
mod config_error;
mod input_error;
mod kind;
mod validation_error;

pub use api_error::ApiError;
pub use auth_error::AuthError;
pub use client_error::ClientError;
pub use config_error::ConfigError;
pub use input_error::InputError;
pub use kind::ErrorKind;
pub use validation_error::ValidationError;
