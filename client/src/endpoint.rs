//! Endpoint definition with type-state builder pattern.
//!
//! An [`Endpoint`] is the value-level description of one REST route: its
//! method, path template, whether it lives under `/api/v1`, whether it needs
//! credentials, and (through its type parameters) what it accepts and
//! returns. The dispatcher is a single generic function over endpoints, so
//! every resource method reduces to picking an endpoint and supplying
//! arguments.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{ApiError, ConfigError, InputError};
use crate::method::RestMethod;
use crate::url_builder::API_VERSION_PREFIX;

/// Type-state markers for [`EndpointBuilder`].
pub mod builder_state {
    /// Marker for a required field that has not been set.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Missing;
}

use builder_state::Missing;

/// How an HTTP 400 from this endpoint is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadRequestKind {
    /// 400 is a generic `BadRequest`.
    #[default]
    Generic,
    /// 400 means the submitted TOTP token was rejected.
    InvalidTotpToken,
}

/// A REST API endpoint definition.
///
/// ## Type Parameters
///
/// - `I`: the request body type, `()` for endpoints without a body.
/// - `O`: the [`ResponseShape`](crate::response::ResponseShape) that decides
///   how the response is interpreted.
///
/// ## Path templates
///
/// Templates are relative to the version root and use whole-segment
/// placeholders: `households/{household_id}/members/{user_id}`. Arguments
/// are substituted verbatim, so an argument containing `/` spans several
/// segments.
///
/// ## Examples
///
/// ```
/// use mealplan_client::response::Item;
/// use mealplan_client::{Endpoint, RestMethod};
///
/// #[derive(serde::Deserialize)]
/// struct Household { id: String }
///
/// let endpoint: Endpoint<(), Item<Household>> = Endpoint::builder()
///     .id("get_household")
///     .method(RestMethod::Get)
///     .path("households/{household_id}")
///     .build();
///
/// assert_eq!(endpoint.full_path(), "/api/v1/households/{household_id}");
/// assert_eq!(endpoint.path_params(), vec!["household_id"]);
/// ```
pub struct Endpoint<I, O> {
    id: String,
    method: RestMethod,
    path: String,
    description: Option<String>,
    versioned: bool,
    requires_auth: bool,
    bad_request: BadRequestKind,
    _marker: PhantomData<fn(&I) -> O>,
}

// Manual impls so I and O need not be Clone or Debug.
impl<I, O> Clone for Endpoint<I, O> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            method: self.method,
            path: self.path.clone(),
            description: self.description.clone(),
            versioned: self.versioned,
            requires_auth: self.requires_auth,
            bad_request: self.bad_request,
            _marker: PhantomData,
        }
    }
}

impl<I, O> fmt::Debug for Endpoint<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("path", &self.full_path())
            .field("requires_auth", &self.requires_auth)
            .finish()
    }
}

impl<I, O> Endpoint<I, O> {
    /// Creates a new endpoint builder.
    pub fn builder() -> EndpointBuilder<Missing, Missing, Missing, I, O> {
        EndpointBuilder::new()
    }

    /// Returns the endpoint's unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> RestMethod {
        self.method
    }

    /// Returns the path template, relative to the version root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns `true` if the path lives under `/api/v1`.
    pub fn is_versioned(&self) -> bool {
        self.versioned
    }

    /// Returns `true` if the endpoint is dispatched on the authenticated
    /// executor.
    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    /// Returns how an HTTP 400 is reported.
    pub fn bad_request_kind(&self) -> BadRequestKind {
        self.bad_request
    }

    /// Returns the absolute path template, including the version prefix.
    pub fn full_path(&self) -> String {
        let mut full = String::new();
        if self.versioned {
            for part in API_VERSION_PREFIX {
                full.push('/');
                full.push_str(part);
            }
        }
        for segment in self.template_segments() {
            full.push('/');
            full.push_str(segment);
        }
        full
    }

    /// Extracts path parameter names in the order they appear.
    pub fn path_params(&self) -> Vec<&str> {
        self.template_segments()
            .filter_map(placeholder_name)
            .collect()
    }

    /// Fills the template with `args`, producing the path parts to compose.
    ///
    /// ## Errors
    ///
    /// Returns [`InputError::InvalidId`] if any argument is empty and
    /// [`ConfigError::PathArguments`] if the argument count does not match
    /// the template.
    pub fn segments<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<String>, ApiError> {
        let expected = self.path_params().len();
        if expected != args.len() {
            return Err(ConfigError::PathArguments {
                endpoint: self.id.clone(),
                expected,
                actual: args.len(),
            }
            .into());
        }

        let mut args = args.iter().map(AsRef::<str>::as_ref);
        let mut parts = Vec::new();
        for segment in self.template_segments() {
            match placeholder_name(segment) {
                Some(name) => {
                    let value = args.next().unwrap_or_default();
                    if value.is_empty() {
                        return Err(InputError::invalid_id(name).into());
                    }
                    parts.push(value.to_string());
                }
                None => parts.push(segment.to_string()),
            }
        }
        Ok(parts)
    }

    fn template_segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

fn placeholder_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

/// Type-state builder for [`Endpoint`].
///
/// The `Id`, `Method` and `Path` parameters are [`Missing`] until the
/// corresponding setter is called, and then hold the value itself. `build`
/// only exists once all three are set.
pub struct EndpointBuilder<Id, Method, Path, I, O> {
    id: Id,
    method: Method,
    path: Path,
    description: Option<String>,
    versioned: bool,
    requires_auth: bool,
    bad_request: BadRequestKind,
    _marker: PhantomData<fn(&I) -> O>,
}

impl<I, O> EndpointBuilder<Missing, Missing, Missing, I, O> {
    /// Creates a builder for a versioned, authenticated endpoint.
    pub fn new() -> Self {
        Self {
            id: Missing,
            method: Missing,
            path: Missing,
            description: None,
            versioned: true,
            requires_auth: true,
            bad_request: BadRequestKind::Generic,
            _marker: PhantomData,
        }
    }
}

impl<I, O> Default for EndpointBuilder<Missing, Missing, Missing, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, P, I, O> EndpointBuilder<Missing, M, P, I, O> {
    /// Sets the endpoint ID.
    pub fn id(self, id: impl Into<String>) -> EndpointBuilder<String, M, P, I, O> {
        EndpointBuilder {
            id: id.into(),
            method: self.method,
            path: self.path,
            description: self.description,
            versioned: self.versioned,
            requires_auth: self.requires_auth,
            bad_request: self.bad_request,
            _marker: PhantomData,
        }
    }
}

impl<Id, P, I, O> EndpointBuilder<Id, Missing, P, I, O> {
    /// Sets the HTTP method.
    pub fn method(self, method: RestMethod) -> EndpointBuilder<Id, RestMethod, P, I, O> {
        EndpointBuilder {
            id: self.id,
            method,
            path: self.path,
            description: self.description,
            versioned: self.versioned,
            requires_auth: self.requires_auth,
            bad_request: self.bad_request,
            _marker: PhantomData,
        }
    }
}

impl<Id, M, I, O> EndpointBuilder<Id, M, Missing, I, O> {
    /// Sets the path template.
    pub fn path(self, path: impl Into<String>) -> EndpointBuilder<Id, M, String, I, O> {
        EndpointBuilder {
            id: self.id,
            method: self.method,
            path: path.into(),
            description: self.description,
            versioned: self.versioned,
            requires_auth: self.requires_auth,
            bad_request: self.bad_request,
            _marker: PhantomData,
        }
    }
}

impl<Id, M, P, I, O> EndpointBuilder<Id, M, P, I, O> {
    /// Sets a description.
    pub fn description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    /// Places the path outside `/api/v1`.
    pub fn versionless(self) -> Self {
        Self {
            versioned: false,
            ..self
        }
    }

    /// Dispatches on the unauthenticated executor.
    pub fn without_auth(self) -> Self {
        Self {
            requires_auth: false,
            ..self
        }
    }

    /// Changes how an HTTP 400 is reported.
    pub fn on_bad_request(self, kind: BadRequestKind) -> Self {
        Self {
            bad_request: kind,
            ..self
        }
    }
}

impl<I, O> EndpointBuilder<String, RestMethod, String, I, O> {
    /// Builds the endpoint.
    pub fn build(self) -> Endpoint<I, O> {
        Endpoint {
            id: self.id,
            method: self.method,
            path: self.path,
            description: self.description,
            versioned: self.versioned,
            requires_auth: self.requires_auth,
            bad_request: self.bad_request,
            _marker: PhantomData,
        }
    }
}
