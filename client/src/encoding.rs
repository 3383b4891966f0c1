//! Wire encoding for request and response bodies.
//!
//! The client speaks either JSON (the default) or XML. The selected
//! [`Encoding`] decides the body serializer, the `Content-Type` of outgoing
//! bodies, and the `Accept` header of every request.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use strum::{Display, EnumString};

use crate::error::ValidationError;

/// Body encoding used by a client.
///
/// ## Examples
///
/// ```
/// use mealplan_client::Encoding;
///
/// #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
/// struct Note { text: String }
///
/// let note = Note { text: "salt to taste".into() };
/// let body = Encoding::Json.encode(&note).unwrap();
/// assert_eq!(Encoding::Json.decode::<Note>(&body).unwrap(), note);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Encoding {
    /// `application/json`.
    #[default]
    Json,
    /// `application/xml`.
    Xml,
}

impl Encoding {
    /// Returns the MIME type for this encoding.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }

    /// Serializes `value` into a request body.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::Encode`] if the value cannot be represented
    /// in this encoding.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, ValidationError> {
        match self {
            Self::Json => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(|e| ValidationError::Encode(e.to_string())),
            Self::Xml => quick_xml::se::to_string(value)
                .map(Bytes::from)
                .map_err(|e| ValidationError::Encode(e.to_string())),
        }
    }

    /// Deserializes a response body.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::EmptyBody`] for an empty body and a parse
    /// error if the body is malformed.
    pub fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidationError::EmptyBody);
        }
        match self {
            Self::Json => serde_json::from_slice(body).map_err(ValidationError::JsonParse),
            Self::Xml => quick_xml::de::from_reader(body).map_err(ValidationError::XmlParse),
        }
    }
}
