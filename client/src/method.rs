//! HTTP method types for the API's endpoints.

use strum::{Display, EnumIter, EnumString};

/// HTTP methods used by the API.
///
/// ## Examples
///
/// ```rust
/// use mealplan_client::RestMethod;
///
/// let method = RestMethod::Patch;
/// assert!(method.has_body());
///
/// let parsed: RestMethod = "DELETE".parse().unwrap();
/// assert_eq!(parsed, RestMethod::Delete);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    /// Read a resource or collection.
    Get,
    /// Create a resource or trigger an action.
    Post,
    /// Replace a resource.
    Put,
    /// Partially update a resource.
    Patch,
    /// Archive a resource.
    Delete,
    /// Check that a resource exists without fetching it.
    Head,
}

impl RestMethod {
    /// Returns `true` if requests with this method may carry a body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns `true` if repeating the request has no additional effect.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Self::Post | Self::Patch)
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        method.to_reqwest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_and_parse_agree() {
        for method in RestMethod::iter() {
            let parsed: RestMethod = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn test_has_body() {
        assert!(!RestMethod::Get.has_body());
        assert!(RestMethod::Post.has_body());
        assert!(RestMethod::Patch.has_body());
        assert!(!RestMethod::Delete.has_body());
        assert!(!RestMethod::Head.has_body());
        assert!(RestMethod::Head.is_idempotent());
    }

    #[test]
    fn test_to_reqwest() {
        assert_eq!(RestMethod::Patch.to_reqwest(), reqwest::Method::PATCH);
        assert_eq!(RestMethod::Head.to_reqwest(), reqwest::Method::HEAD);
        assert_eq!(reqwest::Method::from(RestMethod::Get), reqwest::Method::GET);
    }
}
