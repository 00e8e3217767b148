//! # Handler Registry
//!
//! Maps handler identifiers to factories producing their [`HandlerDefinition`].
//! The registry is populated at link time (one `register::<H>()` call per
//! handler type, usually from a generated or hand-written `register_all`),
//! and plays the role a dynamic class loader would: discovery derives an
//! identifier from a file path and asks the registry whether anything
//! loadable lives there.
//!
//! ```rust,ignore
//! let mut registry = HandlerRegistry::new();
//! registry.register::<PostController>();
//! registry.register::<CommentController>();
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::handler::{HandlerDefinition, RouteHandler};

/// Produces the definition of one handler.
pub type HandlerFactory = Arc<dyn Fn() -> HandlerDefinition + Send + Sync>;

#[derive(Clone)]
struct Entry {
    module: String,
    factory: HandlerFactory,
}

/// Identifier → handler factory.
///
/// Keys are fully-qualified identifiers (`module::Name`); iteration and
/// module lookups follow key order so resolution is deterministic.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    entries: BTreeMap<String, Entry>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler type generated by `#[route_handler]`.
    pub fn register<H: RouteHandler + 'static>(&mut self) {
        self.register_factory(H::MODULE, H::NAME, H::definition);
    }

    /// Register a handler under `module::name` with an explicit factory.
    pub fn register_factory<F>(&mut self, module: &str, name: &str, factory: F)
    where
        F: Fn() -> HandlerDefinition + Send + Sync + 'static,
    {
        let id = HandlerDefinition::new(module, name).id();
        debug!(handler = %id, "registering handler");
        self.entries.insert(
            id,
            Entry {
                module: module.to_string(),
                factory: Arc::new(factory),
            },
        );
    }

    /// Register a prebuilt definition. Each resolution hands out a clone.
    pub fn register_definition(&mut self, definition: HandlerDefinition) {
        let module = definition.module.clone();
        let name = definition.name.clone();
        self.register_factory(&module, &name, move || definition.clone());
    }

    /// Resolve one fully-qualified handler identifier.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<HandlerDefinition> {
        self.entries.get(id).map(|entry| (entry.factory)())
    }

    /// Every handler declared in `module`, in identifier order.
    #[must_use]
    pub fn resolve_module(&self, module: &str) -> Vec<HandlerDefinition> {
        self.entries
            .values()
            .filter(|entry| entry.module == module)
            .map(|entry| (entry.factory)())
            .collect()
    }

    /// Resolve an identifier derived from a file: an exact handler match
    /// first, otherwise every handler living in the module of that name.
    #[must_use]
    pub fn lookup(&self, identifier: &str) -> Vec<HandlerDefinition> {
        match self.resolve(identifier) {
            Some(definition) => vec![definition],
            None => self.resolve_module(identifier),
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered identifiers in resolution order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
