//! Router-facing contract: what discovery needs from whatever stores routes.

use http::Method;
use std::fmt;

use crate::attributes::{ConstraintSet, ResourceNames};
use crate::handler::INVOKE_METHOD;

/// Registration scope applied to every route added inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSpec {
    pub domain: Option<String>,
    pub prefix: Option<String>,
    pub wheres: ConstraintSet,
    /// Prepended to the names of routes registered in the scope.
    pub name_prefix: Option<String>,
}

impl GroupSpec {
    /// Scope carrying only a domain and a prefix.
    #[must_use]
    pub fn scope(domain: Option<String>, prefix: Option<String>) -> Self {
        GroupSpec {
            domain,
            prefix,
            ..GroupSpec::default()
        }
    }

    /// Same scope with the URI prefix removed; used for full-URI actions.
    #[must_use]
    pub fn without_prefix(&self) -> Self {
        GroupSpec {
            prefix: None,
            ..self.clone()
        }
    }
}

/// What a route dispatches to: a handler method, or the handler itself when
/// it is invocable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteTarget {
    pub handler: String,
    pub method: Option<String>,
}

impl RouteTarget {
    /// Target for `method` on `handler`; the invoke method targets the
    /// handler alone.
    #[must_use]
    pub fn new(handler: impl Into<String>, method: &str) -> Self {
        RouteTarget {
            handler: handler.into(),
            method: (method != INVOKE_METHOD).then(|| method.to_string()),
        }
    }

    #[must_use]
    pub fn invocable(handler: impl Into<String>) -> Self {
        RouteTarget {
            handler: handler.into(),
            method: None,
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(method) => write!(f, "{}@{}", self.handler, method),
            None => write!(f, "{}", self.handler),
        }
    }
}

/// Handle to a freshly added route.
pub trait RouteHandle {
    fn name(&mut self, name: &str);
    /// Append middleware, keeping order and duplicates.
    fn middleware(&mut self, middleware: &[String]);
    /// Set constraints, overriding any existing constraint on the same key.
    fn set_wheres(&mut self, wheres: &ConstraintSet);
}

/// Handle to a freshly added resource registration.
pub trait ResourceHandle {
    fn only(&mut self, actions: &[String]);
    fn except(&mut self, actions: &[String]);
    fn names(&mut self, names: &ResourceNames);
    fn middleware(&mut self, middleware: &[String]);
}

/// The router discovery writes into.
///
/// Routes are only ever appended, in the order discovery emits them; that
/// order is the router's match priority.
pub trait RouteSink {
    /// Run `routes` with `group` merged into the current scope.
    fn group(&mut self, group: &GroupSpec, routes: &mut dyn FnMut(&mut dyn RouteSink));

    fn add_route(&mut self, methods: &[Method], uri: &str, target: RouteTarget)
        -> &mut dyn RouteHandle;

    fn resource(&mut self, name: &str, handler: &str) -> &mut dyn ResourceHandle;

    fn api_resource(&mut self, name: &str, handler: &str) -> &mut dyn ResourceHandle;
}
