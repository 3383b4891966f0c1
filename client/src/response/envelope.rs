//! The server's uniform response envelope.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every data response from the server has the shape
/// `{ "data": T, "pagination": {...}?, "error": {...}? }`.
///
/// [`into_item`](Self::into_item) and [`into_page`](Self::into_page) unwrap
/// the envelope into a typed value or a typed failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// The payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Present on list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Present when the server reports a structured failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

/// Structured failure carried in an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Server-defined error code.
    #[serde(default)]
    pub code: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-indexed page number.
    #[serde(default)]
    pub page: u16,
    /// Page size.
    #[serde(default)]
    pub limit: u8,
    /// Number of records matching the filter.
    #[serde(default)]
    pub filtered_count: u64,
    /// Number of records regardless of filter.
    #[serde(default)]
    pub total_count: u64,
}

/// A page of results from a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFilteredResult<T> {
    /// The records on this page, in server order.
    pub data: Vec<T>,
    /// Where this page sits in the full result set.
    pub pagination: Pagination,
}

impl<T> QueryFilteredResult<T> {
    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> IntoIterator for QueryFilteredResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<T> ApiResponse<T> {
    /// Wraps a single value in an envelope.
    pub fn item(data: T) -> Self {
        Self {
            data: Some(data),
            pagination: None,
            error: None,
        }
    }

    /// Builds an envelope that reports a failure.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            data: None,
            pagination: None,
            error: Some(ResponseError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    fn check_error(&mut self) -> Result<(), ValidationError> {
        match self.error.take() {
            Some(ResponseError { code, message }) => {
                Err(ValidationError::Envelope { code, message })
            }
            None => Ok(()),
        }
    }

    /// Unwraps a single-item response.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::Envelope`] if the envelope carries an error
    /// and [`ValidationError::MissingData`] if it carries no data.
    pub fn into_item(mut self) -> Result<T, ValidationError> {
        self.check_error()?;
        self.data.ok_or(ValidationError::MissingData)
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Wraps a page of values in an envelope.
    pub fn page(data: Vec<T>, pagination: Pagination) -> Self {
        Self {
            data: Some(data),
            pagination: Some(pagination),
            error: None,
        }
    }

    /// Unwraps a list response.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::Envelope`] if the envelope carries an error,
    /// [`ValidationError::MissingData`] without data, and
    /// [`ValidationError::MissingPagination`] without pagination.
    pub fn into_page(mut self) -> Result<QueryFilteredResult<T>, ValidationError> {
        self.check_error()?;
        let data = self.data.ok_or(ValidationError::MissingData)?;
        let pagination = self.pagination.ok_or(ValidationError::MissingPagination)?;
        Ok(QueryFilteredResult { data, pagination })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Entry {
        id: String,
    }

    #[test]
    fn test_item_unwrap() {
        let envelope: ApiResponse<Entry> =
            serde_json::from_str(r#"{"data":{"id":"abc123"}}"#).unwrap();
        assert_eq!(envelope.into_item().unwrap().id, "abc123");
    }

    #[test]
    fn test_page_unwrap() {
        let envelope: ApiResponse<Vec<Entry>> = serde_json::from_str(
            r#"{"data":[{"id":"e1"},{"id":"e2"}],"pagination":{"page":1,"limit":20}}"#,
        )
        .unwrap();
        let page = envelope.into_page().unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, 20);
        assert_eq!(page.pagination.total_count, 0);
    }

    #[test]
    fn test_page_without_pagination() {
        let envelope: ApiResponse<Vec<Entry>> =
            serde_json::from_str(r#"{"data":[{"id":"e1"}]}"#).unwrap();
        assert!(matches!(
            envelope.into_page(),
            Err(ValidationError::MissingPagination)
        ));
    }

    #[test]
    fn test_error_is_surfaced_verbatim() {
        let envelope: ApiResponse<Entry> = serde_json::from_str(
            r#"{"error":{"code":"E42","message":"household is archived"}}"#,
        )
        .unwrap();
        match envelope.into_item() {
            Err(ValidationError::Envelope { code, message }) => {
                assert_eq!(code, "E42");
                assert_eq!(message, "household is archived");
            }
            other => panic!("expected envelope error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_data() {
        let envelope: ApiResponse<Entry> = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            envelope.into_item(),
            Err(ValidationError::MissingData)
        ));
    }

    #[test]
    fn test_pagination_wire_names() {
        let json = serde_json::to_value(Pagination {
            page: 2,
            limit: 50,
            filtered_count: 7,
            total_count: 9,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"page": 2, "limit": 50, "filteredCount": 7, "totalCount": 9})
        );
    }
}
