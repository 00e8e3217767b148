//! Structural errors for a discovery pass.
//!
//! Only configuration-level failures surface here. Per-item failures (a file
//! that maps to no handler, a malformed declaration, an action without a URI)
//! are logged and skipped by the registrar so one bad handler never aborts
//! the batch.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a discovery pass.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// File-based discovery was requested without a base path.
    #[error("no base path configured; file and directory discovery need one")]
    MissingBasePath,

    /// The configured base path does not exist or is not a directory.
    #[error("base path '{}' is not a readable directory", path.display())]
    InvalidBasePath {
        /// The offending path
        path: PathBuf,
    },

    /// A directory listed for discovery does not exist or is not a directory.
    #[error("discovery directory '{}' is not a readable directory", path.display())]
    InvalidDirectory {
        /// The offending path
        path: PathBuf,
    },

    /// The filesystem walk failed part way through a directory.
    #[error("failed to walk discovery directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for discovery passes.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
