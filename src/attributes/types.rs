use http::Method;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::AttributeError;

/// Path parameter constraints: parameter name → regex pattern.
///
/// Ordered so that constraint sets are applied to the router in a stable
/// order across runs.
pub type ConstraintSet = BTreeMap<String, String>;

/// Verbs a route may be registered for. `ANY` expands to all of them.
pub const ROUTER_VERBS: [Method; 7] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// A declaration argument that may be written as a single value or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    /// Flatten into a list, preserving declaration order.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Route declaration on a handler method.
///
/// Every field is optional: a method without any route declaration behaves
/// exactly like one carrying `Route::default()`, and the convention engine
/// fills in whatever is left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Explicit verbs. Empty means "infer from the method name".
    pub methods: Vec<Method>,
    /// Explicit URI, replacing the computed one (group prefix still applies).
    pub uri: Option<String>,
    /// Full URI, replacing the computed one and bypassing the group prefix.
    pub full_uri: Option<String>,
    /// Route name.
    pub name: Option<String>,
    /// Middleware appended after global and handler middleware.
    pub middleware: Vec<String>,
}

impl Route {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_verbs(methods: Vec<Method>, uri: impl Into<String>) -> Self {
        Route {
            methods,
            ..Route::default()
        }
        .uri(uri)
    }

    #[must_use]
    pub fn get(uri: impl Into<String>) -> Self {
        Self::with_verbs(vec![Method::GET], uri)
    }

    #[must_use]
    pub fn post(uri: impl Into<String>) -> Self {
        Self::with_verbs(vec![Method::POST], uri)
    }

    #[must_use]
    pub fn put(uri: impl Into<String>) -> Self {
        Self::with_verbs(vec![Method::PUT], uri)
    }

    #[must_use]
    pub fn patch(uri: impl Into<String>) -> Self {
        Self::with_verbs(vec![Method::PATCH], uri)
    }

    #[must_use]
    pub fn delete(uri: impl Into<String>) -> Self {
        Self::with_verbs(vec![Method::DELETE], uri)
    }

    #[must_use]
    pub fn options(uri: impl Into<String>) -> Self {
        Self::with_verbs(vec![Method::OPTIONS], uri)
    }

    /// Route answering every verb in [`ROUTER_VERBS`].
    #[must_use]
    pub fn any(uri: impl Into<String>) -> Self {
        Self::with_verbs(ROUTER_VERBS.to_vec(), uri)
    }

    /// Set the explicit URI. An empty string leaves the URI to the conventions.
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = non_empty(uri.into());
        self
    }

    #[must_use]
    pub fn full_uri(mut self, full_uri: impl Into<String>) -> Self {
        self.full_uri = non_empty(full_uri.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name.into());
        self
    }

    #[must_use]
    pub fn methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.methods = methods.into_iter().collect();
        self
    }

    #[must_use]
    pub fn middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware = middleware.into_iter().map(Into::into).collect();
        self
    }
}

/// Constraint on one path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Where {
    pub param: String,
    pub constraint: String,
}

impl Where {
    pub const ALPHA: &'static str = "[a-zA-Z]+";
    pub const ALPHA_NUMERIC: &'static str = "[a-zA-Z0-9]+";
    pub const NUMBER: &'static str = "[0-9]+";
    pub const UUID: &'static str =
        "[\\da-fA-F]{8}-[\\da-fA-F]{4}-[\\da-fA-F]{4}-[\\da-fA-F]{4}-[\\da-fA-F]{12}";
    pub const ULID: &'static str = "[0-7][0-9a-hjkmnp-tv-zA-HJKMNP-TV-Z]{25}";

    #[must_use]
    pub fn new(param: impl Into<String>, constraint: impl Into<String>) -> Self {
        Where {
            param: param.into(),
            constraint: constraint.into(),
        }
    }

    #[must_use]
    pub fn alpha(param: impl Into<String>) -> Self {
        Self::new(param, Self::ALPHA)
    }

    #[must_use]
    pub fn alpha_numeric(param: impl Into<String>) -> Self {
        Self::new(param, Self::ALPHA_NUMERIC)
    }

    #[must_use]
    pub fn number(param: impl Into<String>) -> Self {
        Self::new(param, Self::NUMBER)
    }

    #[must_use]
    pub fn uuid(param: impl Into<String>) -> Self {
        Self::new(param, Self::UUID)
    }

    #[must_use]
    pub fn ulid(param: impl Into<String>) -> Self {
        Self::new(param, Self::ULID)
    }

    /// Constrain the parameter to one of the given literals.
    #[must_use]
    pub fn one_of<I, S>(param: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = values
            .into_iter()
            .map(|v| regex::escape(v.as_ref()))
            .collect();
        Self::new(param, alternatives.join("|"))
    }
}

/// Handler-level group: one registration scope for the whole action set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub domain: Option<String>,
    pub prefix: Option<String>,
    pub wheres: ConstraintSet,
    /// Name prefix (`as`) prepended to every route name in the group.
    pub name_prefix: Option<String>,
}

impl Group {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn constraint(mut self, param: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.wheres.insert(param.into(), pattern.into());
        self
    }

    #[must_use]
    pub fn name_prefix(mut self, name_prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(name_prefix.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub domain: String,
}

/// Domain looked up in configuration under `key` at discovery time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFromConfig {
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Middleware {
    pub middleware: Vec<String>,
}

/// Route names for a resource: a per-action map or one shared name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceNames {
    Prefix(String),
    Map(BTreeMap<String, String>),
}

/// Resource declaration: registers the conventional CRUD actions at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    /// API resources omit the `create` and `edit` form actions.
    pub api: bool,
    pub only: Option<Vec<String>>,
    pub except: Option<Vec<String>>,
    pub names: Option<ResourceNames>,
}

impl Resource {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Resource {
            name: name.into(),
            api: false,
            only: None,
            except: None,
            names: None,
        }
    }

    #[must_use]
    pub fn api(name: impl Into<String>) -> Self {
        Resource {
            api: true,
            ..Resource::new(name)
        }
    }

    #[must_use]
    pub fn only<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn except<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn names(mut self, names: ResourceNames) -> Self {
        self.names = Some(names);
        self
    }
}

/// An instantiated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Route(Route),
    Where(Where),
    Group(Group),
    Prefix(Prefix),
    Domain(Domain),
    DomainFromConfig(DomainFromConfig),
    Middleware(Middleware),
    Resource(Resource),
    DoNotDiscover,
}

/// Declaration kinds a caller can ask for. Shorthand kinds (`Post`,
/// `WhereNumber`, `ApiResource`, ...) belong to the family of the attribute
/// they construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeFamily {
    Route,
    Where,
    Group,
    Prefix,
    Domain,
    DomainFromConfig,
    Middleware,
    Resource,
    DoNotDiscover,
}

impl Attribute {
    #[must_use]
    pub fn family(&self) -> AttributeFamily {
        match self {
            Attribute::Route(_) => AttributeFamily::Route,
            Attribute::Where(_) => AttributeFamily::Where,
            Attribute::Group(_) => AttributeFamily::Group,
            Attribute::Prefix(_) => AttributeFamily::Prefix,
            Attribute::Domain(_) => AttributeFamily::Domain,
            Attribute::DomainFromConfig(_) => AttributeFamily::DomainFromConfig,
            Attribute::Middleware(_) => AttributeFamily::Middleware,
            Attribute::Resource(_) => AttributeFamily::Resource,
            Attribute::DoNotDiscover => AttributeFamily::DoNotDiscover,
        }
    }

    /// Check the semantic rules serde cannot express.
    pub fn validate(&self) -> Result<(), AttributeError> {
        match self {
            Attribute::Route(route) => {
                if let (Some(uri), Some(full_uri)) = (&route.uri, &route.full_uri) {
                    return Err(AttributeError::Invalid(format!(
                        "route declares both uri '{uri}' and full_uri '{full_uri}'"
                    )));
                }
                Ok(())
            }
            Attribute::Where(w) => validate_constraint(&w.param, &w.constraint),
            Attribute::Group(group) => group
                .wheres
                .iter()
                .try_for_each(|(param, pattern)| validate_constraint(param, pattern)),
            Attribute::Resource(resource) if resource.name.trim().is_empty() => Err(
                AttributeError::Invalid("resource name must not be empty".to_string()),
            ),
            Attribute::DomainFromConfig(d) if d.key.trim().is_empty() => Err(
                AttributeError::Invalid("config key must not be empty".to_string()),
            ),
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn into_route(self) -> Option<Route> {
        match self {
            Attribute::Route(route) => Some(route),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_where(self) -> Option<Where> {
        match self {
            Attribute::Where(w) => Some(w),
            _ => None,
        }
    }
}

fn validate_constraint(param: &str, pattern: &str) -> Result<(), AttributeError> {
    if param.trim().is_empty() {
        return Err(AttributeError::Invalid(
            "constraint parameter name must not be empty".to_string(),
        ));
    }
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| AttributeError::InvalidConstraint {
        param: param.to_string(),
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

macro_rules! impl_into_attribute {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Attribute {
                fn from(value: $ty) -> Self {
                    Attribute::$ty(value)
                }
            }
        )*
    };
}

impl_into_attribute!(Route, Where, Group, Prefix, Domain, DomainFromConfig, Middleware, Resource);
