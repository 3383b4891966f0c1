//! Response handling module.
//!
//! This module provides the [`ApiResponse`] envelope the server wraps every
//! data response in, the [`QueryFilteredResult`] page type, and the
//! [`ResponseShape`] trait that tells the dispatcher how to turn a response
//! into an endpoint's typed output.

mod envelope;
mod shape;

pub use envelope::{ApiResponse, Pagination, QueryFilteredResult, ResponseError};
pub use shape::{Accepted, Empty, Exists, Item, Page, ResponseShape};
