//! Response shapes: how a status and body turn into an endpoint's output.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::envelope::{ApiResponse, QueryFilteredResult};
use crate::encoding::Encoding;
use crate::error::ValidationError;

/// Strategy for interpreting a successful response.
///
/// Each endpoint is parameterized by a shape, which fixes its output type at
/// compile time.
///
/// ## Examples
///
/// ```rust,ignore
/// use mealplan_client::response::{Item, Page};
///
/// // GET /api/v1/households/{id} yields one household
/// type GetHousehold = Endpoint<(), Item<Household>>;
/// // GET /api/v1/households yields a page of households
/// type ListHouseholds = Endpoint<(), Page<Household>>;
/// ```
pub trait ResponseShape: Send + Sync {
    /// The decoded output.
    type Output: Send;

    /// Whether the response body is read and decoded.
    const READS_BODY: bool = true;

    /// Whether any status this shape does not accept is an
    /// `InvalidResponseCode`, instead of being classified by status family.
    const STRICT_STATUS: bool = false;

    /// Returns `true` if `status` counts as success for this shape.
    fn accepts(status: u16) -> bool {
        (200..300).contains(&status)
    }

    /// Decodes the response body.
    fn decode(body: &[u8], encoding: Encoding) -> Result<Self::Output, ValidationError>;

    /// Output for a 404, if this shape treats absence as an answer.
    fn not_found() -> Option<Self::Output> {
        None
    }
}

/// A single enveloped value.
#[derive(Debug, Clone, Copy)]
pub struct Item<T>(PhantomData<fn() -> T>);

impl<T: DeserializeOwned + Send> ResponseShape for Item<T> {
    type Output = T;

    fn decode(body: &[u8], encoding: Encoding) -> Result<T, ValidationError> {
        encoding.decode::<ApiResponse<T>>(body)?.into_item()
    }
}

/// An enveloped list with pagination.
#[derive(Debug, Clone, Copy)]
pub struct Page<T>(PhantomData<fn() -> T>);

impl<T: DeserializeOwned + Send> ResponseShape for Page<T> {
    type Output = QueryFilteredResult<T>;

    fn decode(body: &[u8], encoding: Encoding) -> Result<Self::Output, ValidationError> {
        encoding.decode::<ApiResponse<Vec<T>>>(body)?.into_page()
    }
}

/// A fire-and-forget endpoint: success is HTTP 202 and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accepted;

impl ResponseShape for Accepted {
    type Output = ();

    const READS_BODY: bool = false;
    const STRICT_STATUS: bool = true;

    fn accepts(status: u16) -> bool {
        status == 202
    }

    fn decode(_body: &[u8], _encoding: Encoding) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// An endpoint whose body is ignored on any 2xx.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl ResponseShape for Empty {
    type Output = ();

    const READS_BODY: bool = false;

    fn decode(_body: &[u8], _encoding: Encoding) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// An existence check: `true` on any 2xx, `false` on 404.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exists;

impl ResponseShape for Exists {
    type Output = bool;

    const READS_BODY: bool = false;

    fn decode(_body: &[u8], _encoding: Encoding) -> Result<bool, ValidationError> {
        Ok(true)
    }

    fn not_found() -> Option<bool> {
        Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Vessel {
        id: String,
    }

    #[test]
    fn test_item_decode_json() {
        let out = Item::<Vessel>::decode(br#"{"data":{"id":"v1"}}"#, Encoding::Json).unwrap();
        assert_eq!(out.id, "v1");
    }

    #[test]
    fn test_item_decode_xml() {
        let body = b"<ApiResponse><data><id>v1</id></data></ApiResponse>";
        let out = Item::<Vessel>::decode(body, Encoding::Xml).unwrap();
        assert_eq!(out.id, "v1");
    }

    #[test]
    fn test_page_decode_requires_pagination() {
        let result = Page::<Vessel>::decode(br#"{"data":[]}"#, Encoding::Json);
        assert!(matches!(result, Err(ValidationError::MissingPagination)));
    }

    #[test]
    fn test_item_decode_empty_body() {
        let result = Item::<Vessel>::decode(b"", Encoding::Json);
        assert!(matches!(result, Err(ValidationError::EmptyBody)));
    }

    #[test]
    fn test_status_acceptance() {
        assert!(Item::<Vessel>::accepts(200));
        assert!(Item::<Vessel>::accepts(201));
        assert!(!Item::<Vessel>::accepts(302));
        assert!(Accepted::accepts(202));
        assert!(!Accepted::accepts(200));
        assert!(Empty::accepts(204));
    }

    #[test]
    fn test_shape_flags() {
        assert!(Item::<Vessel>::READS_BODY);
        assert!(!Accepted::READS_BODY);
        assert!(Accepted::STRICT_STATUS);
        assert!(!Empty::STRICT_STATUS);
    }

    #[test]
    fn test_only_exists_answers_not_found() {
        assert_eq!(Exists::not_found(), Some(false));
        assert!(Exists::decode(&[], Encoding::Json).unwrap());
        assert!(!Exists::READS_BODY);
        assert_eq!(Empty::not_found(), None);
        assert!(Item::<Vessel>::not_found().is_none());
    }
}
