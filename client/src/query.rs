//! Query string parameters and list filters.
//!
//! [`QueryParams`] is an ordered multi-map, so equal inputs always encode to
//! byte-identical query strings. [`QueryFilter`] is the caller-facing
//! pagination and sorting request that list endpoints accept.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default page size for most list endpoints.
pub const DEFAULT_LIMIT: u8 = 50;

/// Page size for audit log and notification listings.
pub const SMALL_DEFAULT_LIMIT: u8 = 20;

/// Largest page size the server accepts.
pub const MAX_LIMIT: u8 = 250;

/// Query string parameters, sorted by key.
///
/// Values are multi-valued and keep their insertion order within a key.
///
/// ## Examples
///
/// ```
/// use mealplan_client::QueryParams;
///
/// let params = QueryParams::new()
///     .with("yek", "eulav")
///     .with("key", "value1")
///     .with("key", "value2");
/// assert_eq!(params.encode(), "key=value1&key=value2&yek=eulav");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value and returns `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// Appends a value to `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces every value of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// Returns `true` if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(key, value)` pairs in encoding order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Encodes the parameters as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Merges `other` into `self`, appending values key by key.
    pub fn extend(&mut self, other: QueryParams) {
        for (key, values) in other.0 {
            self.0.entry(key).or_default().extend(values);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}

/// Sort direction for list endpoints.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

/// Pagination, sorting, and time-bound filter for list endpoints.
///
/// Construct with [`QueryFilter::new`] or [`QueryFilter::with_limit`] and
/// refine with the builder methods. Out-of-range values are normalized
/// when the filter is encoded.
///
/// ## Examples
///
/// ```
/// use mealplan_client::{QueryFilter, SortOrder};
///
/// let filter = QueryFilter::new().page(3).sort_by(SortOrder::Desc);
/// assert_eq!(filter.to_params().encode(), "limit=50&page=3&sortBy=desc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    /// 1-indexed page number.
    pub page: u16,
    /// Page size, between 1 and [`MAX_LIMIT`].
    pub limit: u8,
    /// Sort direction.
    pub sort_by: SortOrder,
    /// Only include records created after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Only include records created before this instant.
    pub created_before: Option<DateTime<Utc>>,
    /// Only include records updated after this instant.
    pub updated_after: Option<DateTime<Utc>>,
    /// Only include records updated before this instant.
    pub updated_before: Option<DateTime<Utc>>,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

impl QueryFilter {
    /// Creates the default filter: page 1, 50 per page, ascending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a first-page ascending filter with the given page size.
    pub fn with_limit(limit: u8) -> Self {
        Self {
            page: 1,
            limit,
            sort_by: SortOrder::Asc,
            created_after: None,
            created_before: None,
            updated_after: None,
            updated_before: None,
        }
    }

    /// Returns `filter` or, if absent, the default filter for `default_limit`.
    pub fn or_default(filter: Option<&QueryFilter>, default_limit: u8) -> QueryFilter {
        filter
            .cloned()
            .unwrap_or_else(|| Self::with_limit(default_limit))
    }

    /// Sets the page number.
    pub fn page(mut self, page: u16) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: u8) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the sort direction.
    pub fn sort_by(mut self, order: SortOrder) -> Self {
        self.sort_by = order;
        self
    }

    /// Restricts results to records created within the bounds.
    pub fn created_between(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_after = after;
        self.created_before = before;
        self
    }

    /// Restricts results to records updated within the bounds.
    pub fn updated_between(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.updated_after = after;
        self.updated_before = before;
        self
    }

    /// Encodes the filter as query parameters.
    ///
    /// A page of 0 is sent as 1 and the limit is clamped to `1..=MAX_LIMIT`.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("page", self.page.max(1).to_string())
            .with("limit", self.limit.clamp(1, MAX_LIMIT).to_string())
            .with("sortBy", self.sort_by.to_string());

        let bounds = [
            ("createdAfter", self.created_after),
            ("createdBefore", self.created_before),
            ("updatedAfter", self.updated_after),
            ("updatedBefore", self.updated_before),
        ];
        for (key, bound) in bounds {
            if let Some(instant) = bound {
                params.set(key, instant.to_rfc3339_opts(SecondsFormat::Secs, true));
            }
        }

        params
    }
}
