//! Body encoding and envelope decoding errors.

use thiserror::Error;

/// Errors while encoding a request body or decoding a response.
///
/// All variants classify as [`ErrorKind::Decode`](super::ErrorKind::Decode).
/// [`Encode`](Self::Encode) is the pre-flight variant: it aborts the request
/// before transmission.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// XML parsing failed.
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::DeError),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// Empty response body when content was expected.
    #[error("Empty response body")]
    EmptyBody,

    /// The envelope had neither `data` nor `error`.
    #[error("Response envelope has no data")]
    MissingData,

    /// A list response carried no pagination block.
    #[error("List response is missing pagination")]
    MissingPagination,

    /// The envelope carried a server-side error.
    #[error("Server returned error {code}: {message}")]
    Envelope {
        /// Server-supplied error code.
        code: String,
        /// Server-supplied error message.
        message: String,
    },
}

impl ValidationError {
    /// Returns `true` if this is a parsing error.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::JsonParse(_) | Self::XmlParse(_))
    }

    /// Returns the server-supplied `(code, message)` for envelope errors.
    pub fn envelope_error(&self) -> Option<(&str, &str)> {
        match self {
            Self::Envelope { code, message } => Some((code, message)),
            _ => None,
        }
    }
}
