//! # Discovery Configuration
//!
//! Everything a discovery run needs besides the handler registry: where to
//! look, how to turn paths into identifiers, which transformers to run, and
//! the values `DomainFromConfig` declarations read.
//!
//! ## File Formats
//!
//! [`DiscoveryConfig::load`] picks the parser from the file extension:
//! `.yaml`/`.yml` (serde_yaml), `.toml` (toml) or `.json` (serde_json).
//!
//! ```yaml
//! base_path: src
//! root_namespace: my_app
//! discover_controllers_in_directory:
//!   - src/http/controllers
//! middleware: [web]
//! values:
//!   domains.admin: admin.example.test
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `ROUTE_DISCOVERY_BASE_PATH` | `base_path` |
//! | `ROUTE_DISCOVERY_ROOT_NAMESPACE` | `root_namespace` |

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::attributes::OneOrMany;
use crate::resolver::ConfigLookup;
use crate::transformers::{Pipeline, TransformerKind};

/// Environment variable overriding [`DiscoveryConfig::base_path`].
pub const BASE_PATH_ENV: &str = "ROUTE_DISCOVERY_BASE_PATH";
/// Environment variable overriding [`DiscoveryConfig::root_namespace`].
pub const ROOT_NAMESPACE_ENV: &str = "ROUTE_DISCOVERY_ROOT_NAMESPACE";

/// Discovery settings, usually loaded from a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directories scanned for handlers. Relative entries are resolved
    /// against `base_path`.
    pub discover_controllers_in_directory: Vec<PathBuf>,
    /// Accepted for compatibility; view-based discovery is not performed.
    pub discover_views_in_directory: BTreeMap<String, OneOrMany<PathBuf>>,
    /// Transformer passes, in order.
    pub node_tree_transformers: Vec<TransformerKind>,
    /// Root that identifiers are derived relative to.
    pub base_path: PathBuf,
    /// Prepended to every derived identifier.
    pub root_namespace: String,
    /// Leading path segment replaced by `app_namespace`.
    pub app_root: String,
    pub app_namespace: String,
    /// Extension of handler source files.
    pub file_extension: String,
    /// Global middleware applied to every discovered route.
    pub middleware: Vec<String>,
    /// Lookup table for `DomainFromConfig` keys.
    pub values: BTreeMap<String, String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            discover_controllers_in_directory: Vec::new(),
            discover_views_in_directory: BTreeMap::new(),
            node_tree_transformers: TransformerKind::default_order(),
            base_path: PathBuf::new(),
            root_namespace: String::new(),
            app_root: String::new(),
            app_namespace: String::new(),
            file_extension: "rs".to_string(),
            middleware: Vec::new(),
            values: BTreeMap::new(),
        }
    }
}

impl DiscoveryConfig {
    /// Load a configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - YAML, TOML or JSON file, chosen by extension
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, has an unknown extension or does
    /// not parse.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read discovery config: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let config: DiscoveryConfig = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse discovery config: {}", path.display())
            })?,
            "toml" => toml::from_str(&contents).with_context(|| {
                format!("Failed to parse discovery config: {}", path.display())
            })?,
            "json" => serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse discovery config: {}", path.display())
            })?,
            other => anyhow::bail!(
                "Unsupported discovery config format '{}': {}",
                other,
                path.display()
            ),
        };

        if !config.discover_views_in_directory.is_empty() {
            debug!(
                views_count = config.discover_views_in_directory.len(),
                "view discovery directories are ignored"
            );
        }
        Ok(config)
    }

    /// Load a file, then apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// See [`DiscoveryConfig::load`] and [`DiscoveryConfig::validate`].
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `ROUTE_DISCOVERY_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_path) = env::var(BASE_PATH_ENV) {
            if !base_path.is_empty() {
                debug!(base_path = %base_path, "base path overridden from environment");
                self.base_path = PathBuf::from(base_path);
            }
        }
        if let Ok(root_namespace) = env::var(ROOT_NAMESPACE_ENV) {
            debug!(root_namespace = %root_namespace, "root namespace overridden from environment");
            self.root_namespace = root_namespace;
        }
    }

    /// Reject configurations discovery cannot run with.
    ///
    /// # Errors
    ///
    /// Fails on an empty base path, or an empty file extension.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_path.as_os_str().is_empty() {
            anyhow::bail!("discovery config has no base_path");
        }
        if self.file_extension.trim_start_matches('.').is_empty() {
            anyhow::bail!("discovery config has an empty file_extension");
        }
        Ok(())
    }

    /// Transformer pipeline described by `node_tree_transformers`.
    #[must_use]
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_kinds(&self.node_tree_transformers)
    }

    /// Scan directories with relative entries resolved against the base path.
    #[must_use]
    pub fn directories(&self) -> Vec<PathBuf> {
        self.discover_controllers_in_directory
            .iter()
            .map(|dir| {
                if dir.is_relative() {
                    self.base_path.join(dir)
                } else {
                    dir.clone()
                }
            })
            .collect()
    }
}

impl ConfigLookup for DiscoveryConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_use_rust_sources_and_every_transformer() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.file_extension, "rs");
        assert_eq!(config.pipeline().len(), 7);
    }

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discovery.yaml");
        fs::write(
            &path,
            r#"
base_path: /srv/app/src
root_namespace: app
discover_controllers_in_directory: [http]
discover_views_in_directory:
  docs: views/docs
node_tree_transformers: [add_handler_uri_to_actions, handle_custom_uri]
middleware: [web]
values:
  domains.admin: admin.test
"#,
        )
        .unwrap();

        let config = DiscoveryConfig::load(&path).unwrap();
        assert_eq!(config.root_namespace, "app");
        assert_eq!(config.directories(), vec![PathBuf::from("/srv/app/src/http")]);
        assert_eq!(config.pipeline().names(), vec!["add_handler_uri_to_actions", "handle_custom_uri"]);
        assert_eq!(config.get("domains.admin").as_deref(), Some("admin.test"));
        assert_eq!(config.middleware, vec!["web"]);
        assert_eq!(config.file_extension, "rs");
    }

    #[test]
    fn loads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discovery.toml");
        fs::write(
            &path,
            r#"
base_path = "/srv/app"
file_extension = "handler"
discover_controllers_in_directory = ["/abs/handlers"]
"#,
        )
        .unwrap();

        let config = DiscoveryConfig::load(&path).unwrap();
        assert_eq!(config.file_extension, "handler");
        assert_eq!(config.directories(), vec![PathBuf::from("/abs/handlers")]);
        assert_eq!(config.node_tree_transformers, TransformerKind::default_order());
    }

    #[test]
    fn unknown_transformer_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discovery.json");
        fs::write(&path, r#"{"node_tree_transformers": ["make_coffee"]}"#).unwrap();
        let err = DiscoveryConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse discovery config"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discovery.ini");
        fs::write(&path, "").unwrap();
        assert!(DiscoveryConfig::load(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DiscoveryConfig::load(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn validate_requires_a_base_path() {
        assert!(DiscoveryConfig::default().validate().is_err());
        let config = DiscoveryConfig {
            base_path: PathBuf::from("/srv/app"),
            ..DiscoveryConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
