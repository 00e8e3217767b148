//! # Route Registrar
//!
//! Orchestrates one discovery pass: resolve handlers, build the node tree,
//! run the transformer pipeline, then write routes to the router.
//!
//! ## Pass Flow
//!
//! ```text
//! register_directories([dir, ..])
//!   └─ discover_files(dir)              lexical order
//!        └─ IdentifierMapper::identifier(file)
//!             └─ HandlerRegistry::lookup(id)   unresolvable → skipped
//!                  └─ build Node               resource or actions
//! Pipeline::run(&mut nodes)
//! emit(nodes)                           group fan-out, full-URI chunks
//! ```
//!
//! ## Failure Semantics
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | file maps to no handler | skipped, `debug!` |
//! | malformed declaration | that declaration skipped, `warn!` |
//! | action with empty, undeclared URI | no route, `debug!` |
//! | missing or invalid base path | [`DiscoveryError`] |
//! | scan directory is not a directory | [`DiscoveryError`] |

use http::Method;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::attributes::{AttributeFamily, Route};
use crate::convention::handler_uri;
use crate::discovery::{discover_files, IdentifierMapper};
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::handler::HandlerDefinition;
use crate::node_tree::{Action, Node, NodeKind};
use crate::registry::HandlerRegistry;
use crate::resolver::{ClassAttributes, ConfigLookup, NoConfig};
use crate::router::{GroupSpec, RouteSink};
use crate::transformers::Pipeline;

/// What one pass registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Handlers that made it into the node tree.
    pub handlers: usize,
    /// Individual routes added (once per group).
    pub routes: usize,
    /// Resource registrations.
    pub resources: usize,
    /// Files or identifiers that resolved to no handler.
    pub skipped: usize,
}

/// Writes discovered routes into a router.
pub struct RouteRegistrar<'a> {
    router: &'a mut dyn RouteSink,
    registry: &'a HandlerRegistry,
    config: &'a dyn ConfigLookup,
    base_path: Option<PathBuf>,
    root_namespace: String,
    app_root: String,
    app_namespace: String,
    extension: String,
    middleware: Vec<String>,
    pipeline: Pipeline,
}

impl<'a> RouteRegistrar<'a> {
    #[must_use]
    pub fn new(router: &'a mut dyn RouteSink, registry: &'a HandlerRegistry) -> Self {
        RouteRegistrar {
            router,
            registry,
            config: &NoConfig,
            base_path: None,
            root_namespace: String::new(),
            app_root: String::new(),
            app_namespace: String::new(),
            extension: "rs".to_string(),
            middleware: Vec::new(),
            pipeline: Pipeline::default(),
        }
    }

    /// Root that file paths are made relative to when deriving identifiers.
    #[must_use]
    pub fn use_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    #[must_use]
    pub fn use_root_namespace(mut self, root_namespace: impl Into<String>) -> Self {
        self.root_namespace = root_namespace.into();
        self
    }

    #[must_use]
    pub fn use_app_namespace(
        mut self,
        app_root: impl Into<String>,
        app_namespace: impl Into<String>,
    ) -> Self {
        self.app_root = app_root.into();
        self.app_namespace = app_namespace.into();
        self
    }

    #[must_use]
    pub fn use_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Global middleware, placed before handler and route middleware.
    #[must_use]
    pub fn use_middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware = middleware.into_iter().map(Into::into).collect();
        self
    }

    /// Lookup used to resolve `DomainFromConfig` keys.
    #[must_use]
    pub fn use_config(mut self, config: &'a dyn ConfigLookup) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn use_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    #[must_use]
    pub fn middleware(&self) -> &[String] {
        &self.middleware
    }

    /// Register every handler an identifier resolves to, without any
    /// path-derived URI segment.
    pub fn register_class(&mut self, identifier: &str) -> PassReport {
        let mut report = PassReport::default();
        let definitions = self.registry.lookup(identifier);
        if definitions.is_empty() {
            debug!(identifier, "no handler registered under identifier");
            report.skipped += 1;
        }
        let nodes = definitions
            .iter()
            .filter_map(|definition| self.build_node(definition, None))
            .collect();
        self.run_pass(nodes, report)
    }

    /// Register the handlers of one source file.
    ///
    /// # Errors
    ///
    /// Fails when no valid base path is configured.
    pub fn register_file(&mut self, path: impl AsRef<Path>) -> DiscoveryResult<PassReport> {
        let mapper = self.mapper()?;
        let mut report = PassReport::default();
        let nodes = self.nodes_for_file(&mapper, path.as_ref(), None, &mut report);
        Ok(self.run_pass(nodes, report))
    }

    /// Register every handler found below `directory`.
    ///
    /// # Errors
    ///
    /// Fails when no valid base path is configured or the directory cannot
    /// be walked.
    pub fn register_directory(
        &mut self,
        directory: impl AsRef<Path>,
    ) -> DiscoveryResult<PassReport> {
        self.register_directories([directory])
    }

    /// Register every handler found below each directory, as one pass.
    ///
    /// # Errors
    ///
    /// Fails when no valid base path is configured or any directory cannot
    /// be walked. Nothing is registered in that case.
    pub fn register_directories<I, P>(&mut self, directories: I) -> DiscoveryResult<PassReport>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mapper = self.mapper()?;
        let mut report = PassReport::default();
        let mut nodes = Vec::new();
        for directory in directories {
            let directory = directory.as_ref();
            for file in discover_files(directory, &self.extension)? {
                nodes.extend(self.nodes_for_file(&mapper, &file, Some(directory), &mut report));
            }
        }
        Ok(self.run_pass(nodes, report))
    }

    fn mapper(&self) -> DiscoveryResult<IdentifierMapper> {
        let base_path = self
            .base_path
            .as_ref()
            .ok_or(DiscoveryError::MissingBasePath)?;
        if !base_path.is_dir() {
            return Err(DiscoveryError::InvalidBasePath {
                path: base_path.clone(),
            });
        }
        Ok(IdentifierMapper::new(base_path)
            .root_namespace(self.root_namespace.as_str())
            .app_namespace(self.app_root.as_str(), self.app_namespace.as_str())
            .extension(self.extension.as_str()))
    }

    fn nodes_for_file(
        &self,
        mapper: &IdentifierMapper,
        file: &Path,
        scan_root: Option<&Path>,
        report: &mut PassReport,
    ) -> Vec<Node> {
        let Some(identifier) = mapper.identifier(file) else {
            report.skipped += 1;
            return Vec::new();
        };
        let definitions = self.registry.lookup(&identifier);
        if definitions.is_empty() {
            debug!(
                file = %file.display(),
                identifier = %identifier,
                "file resolves to no registered handler"
            );
            report.skipped += 1;
            return Vec::new();
        }
        let source = scan_root.map(|root| (file, root));
        definitions
            .iter()
            .filter_map(|definition| self.build_node(definition, source))
            .collect()
    }

    fn build_node(
        &self,
        definition: &HandlerDefinition,
        source: Option<(&Path, &Path)>,
    ) -> Option<Node> {
        let id = definition.id();
        let attributes = ClassAttributes::new(definition, self.config);
        if attributes.do_not_discover() {
            debug!(handler = %id, "handler opted out of discovery");
            return None;
        }

        let uri = source
            .map(|(file, root)| handler_uri(file, root))
            .unwrap_or_default();
        let handler_middleware = attributes.middleware();

        if let Some(resource) = attributes.resource_descriptor() {
            // global middleware only rides along with the handler's own
            let middleware = if handler_middleware.is_empty() {
                Vec::new()
            } else {
                [self.middleware.as_slice(), handler_middleware.as_slice()].concat()
            };
            return Some(Node {
                handler: id,
                uri,
                groups: vec![GroupSpec::scope(attributes.domain(), attributes.prefix())],
                middleware,
                kind: NodeKind::Resource(resource),
            });
        }

        let mut middleware = self.middleware.clone();
        middleware.extend(handler_middleware);

        let handler_wheres = attributes.wheres();
        let mut actions = Vec::new();
        for method in definition.methods.iter().filter(|m| m.is_public()) {
            if method
                .declarations(AttributeFamily::DoNotDiscover)
                .next()
                .is_some()
            {
                debug!(handler = %id, method = %method.name, "method opted out of discovery");
                continue;
            }

            let mut wheres = handler_wheres.clone();
            for declared in method.declarations(AttributeFamily::Where) {
                match declared {
                    Ok(attribute) => {
                        if let Some(constraint) = attribute.into_where() {
                            wheres.insert(constraint.param, constraint.constraint);
                        }
                    }
                    Err(error) => warn!(
                        handler = %id,
                        method = %method.name,
                        error = %error,
                        "skipping malformed constraint declaration"
                    ),
                }
            }

            let mut routes = Vec::new();
            let mut declared_any = false;
            for declared in method.declarations(AttributeFamily::Route) {
                declared_any = true;
                match declared {
                    Ok(attribute) => routes.extend(attribute.into_route()),
                    Err(error) => warn!(
                        handler = %id,
                        method = %method.name,
                        error = %error,
                        "skipping malformed route declaration"
                    ),
                }
            }
            if !declared_any {
                routes.push(Route::default());
            }

            for route in routes {
                let mut action = Action::new(&id, method, route, wheres.clone());
                action.middleware =
                    [middleware.as_slice(), action.route.middleware.as_slice()].concat();
                actions.push(action);
            }
        }

        Some(Node {
            handler: id,
            uri,
            groups: attributes.groups(),
            middleware,
            kind: NodeKind::Actions(actions),
        })
    }

    fn run_pass(&mut self, mut nodes: Vec<Node>, mut report: PassReport) -> PassReport {
        report.handlers = nodes.len();
        self.pipeline.run(&mut nodes);
        for node in &nodes {
            match &node.kind {
                NodeKind::Resource(_) => {
                    self.emit_resource(node);
                    report.resources += 1;
                }
                NodeKind::Actions(actions) => {
                    report.routes += self.emit_actions(node, actions);
                }
            }
        }
        info!(
            handlers_count = report.handlers,
            routes_count = report.routes,
            resources_count = report.resources,
            skipped_count = report.skipped,
            "route discovery pass complete"
        );
        report
    }

    fn emit_actions(&mut self, node: &Node, actions: &[Action]) -> usize {
        let actions: Vec<&Action> = actions
            .iter()
            .filter(|action| {
                let keep = !action.uri.is_empty() || action.has_declared_uri();
                if !keep {
                    debug!(
                        target_action = %action.target,
                        "action has no uri, not registering"
                    );
                }
                keep
            })
            .collect();

        let mut count = 0;
        // (chunk index, scope) of full-URI chunks already written
        let mut emitted_full: Vec<(usize, GroupSpec)> = Vec::new();
        for group in &node.groups {
            for (index, chunk) in actions
                .chunk_by(|a, b| a.full_uri == b.full_uri)
                .enumerate()
            {
                let scope = if chunk.first().is_some_and(|action| action.full_uri) {
                    let scope = group.without_prefix();
                    if emitted_full.contains(&(index, scope.clone())) {
                        debug!(
                            handler = %node.handler,
                            "full-uri actions already registered for this scope"
                        );
                        continue;
                    }
                    emitted_full.push((index, scope.clone()));
                    scope
                } else {
                    group.clone()
                };
                self.router.group(&scope, &mut |router| {
                    for action in chunk {
                        add_action(router, action);
                    }
                });
                count += chunk.len();
            }
        }
        count
    }

    fn emit_resource(&mut self, node: &Node) {
        let NodeKind::Resource(resource) = &node.kind else {
            return;
        };
        let scope = node.groups.first().cloned().unwrap_or_default();
        self.router.group(&scope, &mut |router| {
            let handle = if resource.api {
                router.api_resource(&resource.name, &node.handler)
            } else {
                router.resource(&resource.name, &node.handler)
            };
            if let Some(only) = resource.only.as_deref().filter(|o| !o.is_empty()) {
                handle.only(only);
            }
            if let Some(except) = resource.except.as_deref().filter(|e| !e.is_empty()) {
                handle.except(except);
            }
            if let Some(names) = &resource.names {
                handle.names(names);
            }
            if !node.middleware.is_empty() {
                handle.middleware(&node.middleware);
            }
        });
        debug!(handler = %node.handler, resource = %resource.name, "resource registered");
    }
}

fn add_action(router: &mut dyn RouteSink, action: &Action) {
    let methods: &[Method] = &action.methods;
    let route = router.add_route(methods, &action.uri, action.target.clone());
    if let Some(name) = &action.name {
        route.name(name);
    }
    if !action.wheres.is_empty() {
        route.set_wheres(&action.wheres);
    }
    route.middleware(&action.middleware);
}
