//! Request URL composition.
//!
//! [`UrlComposer`] joins the client's base URL, the optional `/api/v1`
//! prefix, path parts, and sorted query parameters into absolute URLs.

use tracing::error;
use url::Url;

use crate::error::ConfigError;
use crate::query::QueryParams;

/// Path segments prepended to every versioned resource path.
pub const API_VERSION_PREFIX: [&str; 2] = ["api", "v1"];

/// Builds absolute request URLs relative to a base URL.
///
/// Trailing and leading slashes on parts are not significant, and empty
/// parts are skipped. Parts are inserted verbatim, so an identifier that
/// contains `/` spans several segments.
///
/// ## Examples
///
/// ```
/// use mealplan_client::{QueryParams, UrlComposer};
/// use url::Url;
///
/// let composer = UrlComposer::new(Url::parse("https://example.test").unwrap());
/// let url = composer
///     .versioned(&QueryParams::new().with("key", "value"), &["stuff"])
///     .unwrap();
/// assert_eq!(url.as_str(), "https://example.test/api/v1/stuff?key=value");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlComposer {
    base: Url,
}

impl UrlComposer {
    /// Creates a composer for `base`.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Returns the base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Composes `base/api/v1/<parts>?<query>`.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidPathPart`] if a part contains an ASCII
    /// control character.
    pub fn versioned<S: AsRef<str>>(
        &self,
        query: &QueryParams,
        parts: &[S],
    ) -> Result<Url, ConfigError> {
        let parts = API_VERSION_PREFIX
            .iter()
            .copied()
            .chain(parts.iter().map(AsRef::<str>::as_ref));
        self.compose(query, parts)
    }

    /// Composes `base/<parts>?<query>` without the version prefix.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidPathPart`] if a part contains an ASCII
    /// control character.
    pub fn versionless<S: AsRef<str>>(
        &self,
        query: &QueryParams,
        parts: &[S],
    ) -> Result<Url, ConfigError> {
        self.compose(query, parts.iter().map(AsRef::<str>::as_ref))
    }

    /// Composes a versioned URL with the scheme switched to `ws` or `wss`.
    ///
    /// ## Errors
    ///
    /// Returns an error if a part is invalid or the base URL cannot carry a
    /// websocket scheme.
    pub fn websocket<S: AsRef<str>>(&self, parts: &[S]) -> Result<Url, ConfigError> {
        let mut url = self.versioned(&QueryParams::new(), parts)?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|()| ConfigError::InvalidPathPart {
                part: format!("{scheme}://"),
            })?;
        Ok(url)
    }

    fn compose<'a>(
        &self,
        query: &QueryParams,
        parts: impl Iterator<Item = &'a str>,
    ) -> Result<Url, ConfigError> {
        let mut path = self.base.path().trim_end_matches('/').to_string();

        for part in parts {
            if part.chars().any(|c| c.is_ascii_control()) {
                error!(part = ?part, base = %self.base, "refusing to build URL from invalid part");
                return Err(ConfigError::InvalidPathPart {
                    part: part.to_string(),
                });
            }
            let trimmed = part.trim_matches('/');
            if trimmed.is_empty() {
                continue;
            }
            path.push('/');
            path.push_str(trimmed);
        }

        let mut url = self.base.clone();
        url.set_path(&path);
        url.set_fragment(None);
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&query.encode()));
        }
        Ok(url)
    }
}
