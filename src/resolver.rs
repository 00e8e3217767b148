//! Handler-level metadata questions.
//!
//! [`ClassAttributes`] wraps one [`HandlerDefinition`] and answers the
//! questions the registrar asks about the handler as a whole. Singular
//! accessors read the first declaration of their family; a malformed first
//! declaration reads as absent and is logged, never returned as an error.

use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::attributes::{Attribute, AttributeFamily, ConstraintSet, Resource, ResourceNames};
use crate::handler::HandlerDefinition;
use crate::router::GroupSpec;

/// Read-only key → value lookup used by `DomainFromConfig`.
pub trait ConfigLookup {
    fn get(&self, key: &str) -> Option<String>;
}

/// Lookup that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfig;

impl ConfigLookup for NoConfig {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

impl ConfigLookup for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl ConfigLookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Handler-scoped view over a definition's declarations.
pub struct ClassAttributes<'a> {
    handler: &'a HandlerDefinition,
    config: &'a dyn ConfigLookup,
}

impl<'a> ClassAttributes<'a> {
    #[must_use]
    pub fn new(handler: &'a HandlerDefinition, config: &'a dyn ConfigLookup) -> Self {
        ClassAttributes { handler, config }
    }

    #[must_use]
    pub fn handler(&self) -> &'a HandlerDefinition {
        self.handler
    }

    fn first(&self, family: AttributeFamily) -> Option<Attribute> {
        match self.handler.declarations(family).next()? {
            Ok(attribute) => Some(attribute),
            Err(error) => {
                warn!(
                    handler = %self.handler.id(),
                    family = ?family,
                    error = %error,
                    "ignoring malformed handler declaration"
                );
                None
            }
        }
    }

    #[must_use]
    pub fn prefix(&self) -> Option<String> {
        match self.first(AttributeFamily::Prefix)? {
            Attribute::Prefix(prefix) => Some(prefix.prefix),
            _ => None,
        }
    }

    #[must_use]
    pub fn domain(&self) -> Option<String> {
        match self.first(AttributeFamily::Domain)? {
            Attribute::Domain(domain) => Some(domain.domain),
            _ => None,
        }
    }

    /// Domain read from configuration under the declared key.
    #[must_use]
    pub fn domain_from_config(&self) -> Option<String> {
        match self.first(AttributeFamily::DomainFromConfig)? {
            Attribute::DomainFromConfig(declared) => self.config.get(&declared.key),
            _ => None,
        }
    }

    /// One scope per valid `Group` declaration, or a single scope built from
    /// the configured domain (falling back to `Domain`) and `Prefix`.
    #[must_use]
    pub fn groups(&self) -> Vec<GroupSpec> {
        let groups: Vec<GroupSpec> = self
            .handler
            .declarations(AttributeFamily::Group)
            .filter_map(|declared| match declared {
                Ok(Attribute::Group(group)) => Some(GroupSpec {
                    domain: group.domain,
                    prefix: group.prefix,
                    wheres: group.wheres,
                    name_prefix: group.name_prefix,
                }),
                Ok(_) => None,
                Err(error) => {
                    warn!(
                        handler = %self.handler.id(),
                        error = %error,
                        "skipping malformed group declaration"
                    );
                    None
                }
            })
            .collect();

        if groups.is_empty() {
            vec![GroupSpec::scope(
                self.domain_from_config().or_else(|| self.domain()),
                self.prefix(),
            )]
        } else {
            groups
        }
    }

    /// The first resource declaration, if any.
    #[must_use]
    pub fn resource_descriptor(&self) -> Option<Resource> {
        match self.first(AttributeFamily::Resource)? {
            Attribute::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// Resource name, whatever the resource flavour.
    #[must_use]
    pub fn resource(&self) -> Option<String> {
        self.resource_descriptor().map(|resource| resource.name)
    }

    /// Whether the declared resource is an API resource.
    #[must_use]
    pub fn api_resource(&self) -> bool {
        self.resource_descriptor().is_some_and(|resource| resource.api)
    }

    #[must_use]
    pub fn only(&self) -> Option<Vec<String>> {
        self.resource_descriptor().and_then(|resource| resource.only)
    }

    #[must_use]
    pub fn except(&self) -> Option<Vec<String>> {
        self.resource_descriptor().and_then(|resource| resource.except)
    }

    #[must_use]
    pub fn names(&self) -> Option<ResourceNames> {
        self.resource_descriptor().and_then(|resource| resource.names)
    }

    #[must_use]
    pub fn middleware(&self) -> Vec<String> {
        match self.first(AttributeFamily::Middleware) {
            Some(Attribute::Middleware(middleware)) => middleware.middleware,
            _ => Vec::new(),
        }
    }

    /// Every handler-level constraint; later declarations win per parameter.
    #[must_use]
    pub fn wheres(&self) -> ConstraintSet {
        let mut wheres = ConstraintSet::new();
        for declared in self.handler.declarations(AttributeFamily::Where) {
            match declared {
                Ok(attribute) => {
                    if let Some(constraint) = attribute.into_where() {
                        wheres.insert(constraint.param, constraint.constraint);
                    }
                }
                Err(error) => warn!(
                    handler = %self.handler.id(),
                    error = %error,
                    "skipping malformed constraint declaration"
                ),
            }
        }
        wheres
    }

    #[must_use]
    pub fn do_not_discover(&self) -> bool {
        self.handler
            .declarations(AttributeFamily::DoNotDiscover)
            .next()
            .is_some()
    }
}
