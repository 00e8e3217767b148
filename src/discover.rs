//! Bootstrap entry point: a configuration plus a registry, registered into
//! a router in one call.
//!
//! ```rust,ignore
//! let config = DiscoveryConfig::from_file(Path::new("config/discovery.yaml"))?;
//! let discovery = RouteDiscovery::new(config, handlers::registry());
//! let mut routes = RouteTable::new();
//! discovery.register_routes(&mut routes)?;
//! ```

use std::path::Path;

use crate::config::DiscoveryConfig;
use crate::error::DiscoveryResult;
use crate::registrar::{PassReport, RouteRegistrar};
use crate::registry::HandlerRegistry;
use crate::router::RouteSink;

#[derive(Debug)]
pub struct RouteDiscovery {
    config: DiscoveryConfig,
    registry: HandlerRegistry,
}

impl RouteDiscovery {
    #[must_use]
    pub fn new(config: DiscoveryConfig, registry: HandlerRegistry) -> Self {
        RouteDiscovery { config, registry }
    }

    /// Load, override from the environment and validate a config file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be loaded or is invalid.
    pub fn from_config_file(path: &Path, registry: HandlerRegistry) -> anyhow::Result<Self> {
        Ok(Self::new(DiscoveryConfig::from_file(path)?, registry))
    }

    #[must_use]
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// A registrar configured from this discovery's settings, for callers
    /// that want to register individual classes or files.
    #[must_use]
    pub fn registrar<'a>(&'a self, router: &'a mut dyn RouteSink) -> RouteRegistrar<'a> {
        RouteRegistrar::new(router, &self.registry)
            .use_base_path(&self.config.base_path)
            .use_root_namespace(self.config.root_namespace.as_str())
            .use_app_namespace(
                self.config.app_root.as_str(),
                self.config.app_namespace.as_str(),
            )
            .use_extension(self.config.file_extension.as_str())
            .use_middleware(self.config.middleware.iter().cloned())
            .use_config(&self.config)
            .use_pipeline(self.config.pipeline())
    }

    /// Register every configured directory as a single pass.
    ///
    /// # Errors
    ///
    /// Fails when the base path or any directory is invalid.
    pub fn register_routes(&self, router: &mut dyn RouteSink) -> DiscoveryResult<PassReport> {
        let directories = self.config.directories();
        self.registrar(router).register_directories(&directories)
    }
}
