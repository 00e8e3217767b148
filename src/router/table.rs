//! In-memory route table.
//!
//! [`RouteTable`] is the reference [`RouteSink`]: it keeps a stack of group
//! scopes, merges them the way nested route groups merge (prefixes
//! concatenate, inner domains win, constraints and name prefixes
//! accumulate), and records every route in registration order. Resource
//! registrations stay pending until [`RouteTable::routes`] expands them, so
//! `only`/`except`/`names` applied after the call still take effect.

use http::Method;
use std::fmt;
use tracing::debug;

use super::core::{GroupSpec, ResourceHandle, RouteHandle, RouteSink, RouteTarget};
use crate::attributes::{ConstraintSet, ResourceNames};
use crate::convention::join_uri;

/// Conventional resource actions in registration order.
pub const RESOURCE_ACTIONS: [&str; 7] = [
    "index", "create", "store", "show", "edit", "update", "destroy",
];

/// Form actions API resources leave out.
const FORM_ACTIONS: [&str; 2] = ["create", "edit"];

/// A registered route as the router sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub methods: Vec<Method>,
    /// URI with every group prefix applied, without leading slash (`/` for root).
    pub uri: String,
    pub domain: Option<String>,
    pub name: Option<String>,
    pub middleware: Vec<String>,
    pub wheres: ConstraintSet,
    pub target: RouteTarget,
}

impl RouteRecord {
    /// Whether the route answers `method`.
    #[must_use]
    pub fn handles(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }
}

#[derive(Debug, Clone, Default)]
struct Scope {
    domain: Option<String>,
    prefix: String,
    wheres: ConstraintSet,
    name_prefix: String,
}

impl Scope {
    fn merge(&self, group: &GroupSpec) -> Scope {
        let mut wheres = self.wheres.clone();
        wheres.extend(group.wheres.clone());
        Scope {
            domain: group.domain.clone().or_else(|| self.domain.clone()),
            prefix: join_uri(&self.prefix, group.prefix.as_deref().unwrap_or_default()),
            wheres,
            name_prefix: format!(
                "{}{}",
                self.name_prefix,
                group.name_prefix.as_deref().unwrap_or_default()
            ),
        }
    }

    fn uri(&self, uri: &str) -> String {
        let full = join_uri(&self.prefix, uri);
        if full.is_empty() {
            "/".to_string()
        } else {
            full
        }
    }
}

#[derive(Debug, Clone)]
struct PendingRoute {
    record: RouteRecord,
    name_prefix: String,
}

impl RouteHandle for PendingRoute {
    fn name(&mut self, name: &str) {
        self.record.name = Some(format!("{}{}", self.name_prefix, name));
    }

    fn middleware(&mut self, middleware: &[String]) {
        self.record.middleware.extend(middleware.iter().cloned());
    }

    fn set_wheres(&mut self, wheres: &ConstraintSet) {
        self.record.wheres.extend(wheres.clone());
    }
}

#[derive(Debug, Clone)]
struct PendingResource {
    name: String,
    handler: String,
    api: bool,
    scope: Scope,
    only: Option<Vec<String>>,
    except: Option<Vec<String>>,
    names: Option<ResourceNames>,
    middleware: Vec<String>,
}

impl ResourceHandle for PendingResource {
    fn only(&mut self, actions: &[String]) {
        self.only = Some(actions.to_vec());
    }

    fn except(&mut self, actions: &[String]) {
        self.except = Some(actions.to_vec());
    }

    fn names(&mut self, names: &ResourceNames) {
        self.names = Some(names.clone());
    }

    fn middleware(&mut self, middleware: &[String]) {
        self.middleware.extend(middleware.iter().cloned());
    }
}

impl PendingResource {
    fn actions(&self) -> Vec<&'static str> {
        RESOURCE_ACTIONS
            .iter()
            .copied()
            .filter(|action| !(self.api && FORM_ACTIONS.contains(action)))
            .filter(|action| match &self.only {
                Some(only) => only.iter().any(|o| o == action),
                None => true,
            })
            .filter(|action| match &self.except {
                Some(except) => !except.iter().any(|e| e == action),
                None => true,
            })
            .collect()
    }

    fn route_name(&self, base_name: &str, action: &str) -> String {
        let name = match &self.names {
            Some(ResourceNames::Map(map)) if map.contains_key(action) => map[action].clone(),
            Some(ResourceNames::Prefix(prefix)) => format!("{prefix}.{action}"),
            _ => format!("{base_name}.{action}"),
        };
        format!("{}{}", self.scope.name_prefix, name)
    }

    fn expand(&self) -> Vec<RouteRecord> {
        let (uri_prefix, base_name) = match self.name.rsplit_once('/') {
            Some((prefix, name)) => (prefix, name),
            None => ("", self.name.as_str()),
        };
        let (base_uri, param) = nested_resource_uri(base_name);
        let base_uri = join_uri(uri_prefix, &base_uri);
        let member_uri = format!("{base_uri}/{{{param}}}");

        self.actions()
            .into_iter()
            .map(|action| {
                let (methods, uri) = match action {
                    "index" => (vec![Method::GET], base_uri.clone()),
                    "create" => (vec![Method::GET], format!("{base_uri}/create")),
                    "store" => (vec![Method::POST], base_uri.clone()),
                    "show" => (vec![Method::GET], member_uri.clone()),
                    "edit" => (vec![Method::GET], format!("{member_uri}/edit")),
                    "update" => (vec![Method::PUT, Method::PATCH], member_uri.clone()),
                    _ => (vec![Method::DELETE], member_uri.clone()),
                };
                RouteRecord {
                    methods,
                    uri: self.scope.uri(&uri),
                    domain: self.scope.domain.clone(),
                    name: Some(self.route_name(base_name, action)),
                    middleware: self.middleware.clone(),
                    wheres: self.scope.wheres.clone(),
                    target: RouteTarget {
                        handler: self.handler.clone(),
                        method: Some(action.to_string()),
                    },
                }
            })
            .collect()
    }
}

/// `photos.comments` → (`photos/{photo}/comments`, `comment`).
fn nested_resource_uri(name: &str) -> (String, String) {
    let segments: Vec<&str> = name.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        return (String::new(), String::new());
    };
    let mut uri = String::new();
    for parent in parents {
        uri = join_uri(&uri, &format!("{parent}/{{{}}}", resource_wildcard(parent)));
    }
    (join_uri(&uri, last), resource_wildcard(last))
}

/// Route parameter name for a resource segment: singular, snake-cased.
fn resource_wildcard(segment: &str) -> String {
    let singular = if let Some(stem) = segment.strip_suffix("ies") {
        format!("{stem}y")
    } else if segment.ends_with("ss") {
        segment.to_string()
    } else if let Some(stem) = segment.strip_suffix('s') {
        stem.to_string()
    } else {
        segment.to_string()
    };
    singular.replace('-', "_")
}

#[derive(Debug, Clone, Copy)]
enum EntryRef {
    Route(usize),
    Resource(usize),
}

/// Route table built up by discovery.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    scopes: Vec<Scope>,
    routes: Vec<PendingRoute>,
    resources: Vec<PendingResource>,
    order: Vec<EntryRef>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn current_scope(&self) -> Scope {
        self.scopes.last().cloned().unwrap_or_default()
    }

    fn push_resource(&mut self, name: &str, handler: &str, api: bool) -> &mut dyn ResourceHandle {
        let index = self.resources.len();
        self.resources.push(PendingResource {
            name: name.to_string(),
            handler: handler.to_string(),
            api,
            scope: self.current_scope(),
            only: None,
            except: None,
            names: None,
            middleware: Vec::new(),
        });
        self.order.push(EntryRef::Resource(index));
        &mut self.resources[index]
    }

    /// Every route in registration order, resources expanded in place.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteRecord> {
        let mut routes = Vec::with_capacity(self.order.len());
        for entry in &self.order {
            match *entry {
                EntryRef::Route(index) => routes.push(self.routes[index].record.clone()),
                EntryRef::Resource(index) => routes.extend(self.resources[index].expand()),
            }
        }
        routes
    }

    /// Routes dispatching to `handler`.
    #[must_use]
    pub fn routes_for(&self, handler: &str) -> Vec<RouteRecord> {
        self.routes()
            .into_iter()
            .filter(|route| route.target.handler == handler)
            .collect()
    }

    /// First route registered for `method` and `uri` (priority order).
    #[must_use]
    pub fn find(&self, method: &Method, uri: &str) -> Option<RouteRecord> {
        let uri = match uri.trim_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        self.routes()
            .into_iter()
            .find(|route| route.uri == uri && route.handles(method))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl RouteSink for RouteTable {
    fn group(&mut self, group: &GroupSpec, routes: &mut dyn FnMut(&mut dyn RouteSink)) {
        let scope = self.current_scope().merge(group);
        self.scopes.push(scope);
        routes(self);
        self.scopes.pop();
    }

    fn add_route(
        &mut self,
        methods: &[Method],
        uri: &str,
        target: RouteTarget,
    ) -> &mut dyn RouteHandle {
        let scope = self.current_scope();
        let record = RouteRecord {
            methods: methods.to_vec(),
            uri: scope.uri(uri),
            domain: scope.domain.clone(),
            name: None,
            middleware: Vec::new(),
            wheres: scope.wheres.clone(),
            target,
        };
        debug!(uri = %record.uri, target = %record.target, "route added");
        let index = self.routes.len();
        self.routes.push(PendingRoute {
            record,
            name_prefix: scope.name_prefix,
        });
        self.order.push(EntryRef::Route(index));
        &mut self.routes[index]
    }

    fn resource(&mut self, name: &str, handler: &str) -> &mut dyn ResourceHandle {
        self.push_resource(name, handler, false)
    }

    fn api_resource(&mut self, name: &str, handler: &str) -> &mut dyn ResourceHandle {
        self.push_resource(name, handler, true)
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for route in self.routes() {
            let methods: Vec<&str> = route.methods.iter().map(Method::as_str).collect();
            let location = match &route.domain {
                Some(domain) => format!("{domain}/{}", route.uri.trim_start_matches('/')),
                None => format!("/{}", route.uri.trim_start_matches('/')),
            };
            write!(
                f,
                "{:<14} {:<40} {:<24} {}",
                methods.join("|"),
                location,
                route.name.as_deref().unwrap_or("-"),
                route.target
            )?;
            if !route.middleware.is_empty() {
                write!(f, " [{}]", route.middleware.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
