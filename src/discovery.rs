//! # Discovery Walker
//!
//! Turns directories into handler candidates: lists source files in lexical
//! order and maps each file path to the module identifier the handler
//! registry is keyed by.
//!
//! ## Identifier Derivation
//!
//! | Step | `src/http/admin/posts.rs` (base `src`) |
//! |------|----------------------------------------|
//! | strip base path | `http/admin/posts.rs` |
//! | strip extension | `http/admin/posts` |
//! | `mod` stands for its directory | (no change) |
//! | separators → `::` | `http::admin::posts` |
//! | app root → app namespace | (`http` → `web` if configured) |
//! | prefix root namespace | `app::http::admin::posts` |

use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DiscoveryError, DiscoveryResult};

const MODULE_SEPARATOR: &str = "::";

/// Maps source files to module identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierMapper {
    base_path: PathBuf,
    root_namespace: String,
    app_root: String,
    app_namespace: String,
    extension: String,
}

impl IdentifierMapper {
    /// Mapper for files below `base_path`, with the `rs` extension and no
    /// namespace rewriting.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        IdentifierMapper {
            base_path: canonical(&base_path),
            root_namespace: String::new(),
            app_root: String::new(),
            app_namespace: String::new(),
            extension: "rs".to_string(),
        }
    }

    #[must_use]
    pub fn root_namespace(mut self, root_namespace: impl Into<String>) -> Self {
        self.root_namespace = root_namespace.into();
        self
    }

    /// Replace a leading `app_root` segment with `app_namespace`.
    #[must_use]
    pub fn app_namespace(
        mut self,
        app_root: impl Into<String>,
        app_namespace: impl Into<String>,
    ) -> Self {
        self.app_root = app_root.into();
        self.app_namespace = app_namespace.into();
        self
    }

    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Module identifier for `file`, or `None` when the file is not below
    /// the base path or names nothing.
    #[must_use]
    pub fn identifier(&self, file: &Path) -> Option<String> {
        let file = canonical(file);
        let Ok(relative) = file.strip_prefix(&self.base_path) else {
            debug!(
                file = %file.display(),
                base_path = %self.base_path.display(),
                "file is outside the base path"
            );
            return None;
        };

        let mut segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => part.to_str().map(str::to_string),
                _ => None,
            })
            .collect();

        let last = segments.pop()?;
        let stem = match Path::new(&last).extension().and_then(|e| e.to_str()) {
            Some(extension) if extension == self.extension => Path::new(&last)
                .file_stem()
                .and_then(|s| s.to_str())
                .map_or_else(|| last.clone(), str::to_string),
            _ => last,
        };
        if stem != "mod" {
            segments.push(stem);
        }

        if !self.app_root.is_empty() && segments.first() == Some(&self.app_root) {
            segments.remove(0);
            if !self.app_namespace.is_empty() {
                segments.insert(0, self.app_namespace.trim_matches(':').to_string());
            }
        }

        let root = self.root_namespace.trim_matches(':');
        if !root.is_empty() {
            segments.insert(0, root.to_string());
        }

        let identifier = segments.join(MODULE_SEPARATOR);
        (!identifier.is_empty()).then_some(identifier)
    }
}

/// Every file below `directory` carrying `extension`, in lexical order.
///
/// # Errors
///
/// [`DiscoveryError::InvalidDirectory`] when `directory` is not a directory,
/// [`DiscoveryError::Walk`] when the walk fails part way.
pub fn discover_files(directory: &Path, extension: &str) -> DiscoveryResult<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(DiscoveryError::InvalidDirectory {
            path: directory.to_path_buf(),
        });
    }

    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(entry.into_path());
        }
    }

    debug!(
        directory = %directory.display(),
        files_count = files.len(),
        "listed discovery candidates"
    );
    Ok(files)
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
