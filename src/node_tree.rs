//! # Node Tree
//!
//! The intermediate form discovery builds before anything reaches the
//! router. One [`Node`] per handler, in discovery order; each node holds
//! either the handler's actions or its resource declaration. Transformers
//! rewrite actions in place, and the registrar emits whatever is left.

use http::Method;

use crate::attributes::{ConstraintSet, Resource, Route};
use crate::convention::{infer_http_methods, infer_relative_uri};
use crate::handler::MethodDefinition;
use crate::router::{GroupSpec, RouteTarget};

/// One route-producing declaration on one handler method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub method_name: String,
    pub target: RouteTarget,
    /// Conventional URI relative to the handler (may be empty).
    pub relative_uri: String,
    /// URI as it will be registered (before group prefixes).
    pub uri: String,
    pub methods: Vec<Method>,
    pub middleware: Vec<String>,
    pub wheres: ConstraintSet,
    pub name: Option<String>,
    /// The declaration this action was built from (`Route::default()` when
    /// the method declared none).
    pub route: Route,
    /// The URI is absolute: group prefixes do not apply to it.
    pub full_uri: bool,
    /// Name of the method's first model-bound parameter.
    pub model_parameter: Option<String>,
}

impl Action {
    /// Action with conventional URI and verbs for `method` under `route`.
    ///
    /// `wheres` is the handler-level constraint set; method-level
    /// constraints have already been merged in by the caller.
    #[must_use]
    pub fn new(
        handler: &str,
        method: &MethodDefinition,
        route: Route,
        wheres: ConstraintSet,
    ) -> Self {
        let relative_uri = infer_relative_uri(&method.name, &method.parameters);
        Action {
            method_name: method.name.clone(),
            target: RouteTarget::new(handler, &method.name),
            uri: relative_uri.clone(),
            relative_uri,
            methods: infer_http_methods(&method.name),
            middleware: Vec::new(),
            wheres,
            name: None,
            route,
            full_uri: false,
            model_parameter: method.model_parameter().map(|p| p.name.clone()),
        }
    }

    /// An explicit URI was declared, so an empty one still registers.
    #[must_use]
    pub fn has_declared_uri(&self) -> bool {
        self.route.uri.is_some() || self.route.full_uri.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Actions(Vec<Action>),
    Resource(Resource),
}

/// One discovered handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Handler identifier.
    pub handler: String,
    /// URI segment derived from the handler's location below the scan root.
    pub uri: String,
    /// Registration scopes; actions are emitted once per scope.
    pub groups: Vec<GroupSpec>,
    /// Global middleware followed by handler-level middleware. Resource
    /// nodes carry none when the handler declares no middleware itself.
    pub middleware: Vec<String>,
    pub kind: NodeKind,
}

impl Node {
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        match &self.kind {
            NodeKind::Actions(actions) => actions,
            NodeKind::Resource(_) => &[],
        }
    }

    /// Mutable actions; empty for resource nodes.
    pub fn actions_mut(&mut self) -> &mut [Action] {
        match &mut self.kind {
            NodeKind::Actions(actions) => actions,
            NodeKind::Resource(_) => &mut [],
        }
    }

    #[must_use]
    pub fn is_resource(&self) -> bool {
        matches!(self.kind, NodeKind::Resource(_))
    }

    /// The `show` action's model parameter, used to nest sibling handlers.
    #[must_use]
    pub fn show_parameter(&self) -> Option<&str> {
        self.actions()
            .iter()
            .find(|action| action.method_name == "show")
            .and_then(|action| action.model_parameter.as_deref())
    }
}
