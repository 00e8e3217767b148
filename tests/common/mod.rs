#![allow(dead_code)]

use route_discovery::router::{RouteRecord, RouteTable};
use std::path::{Path, PathBuf};

/// `(verbs, uri)` for every route, verbs joined with `|`.
pub fn summary(table: &RouteTable) -> Vec<(String, String)> {
    table
        .routes()
        .into_iter()
        .map(|route| {
            let verbs: Vec<&str> = route.methods.iter().map(|m| m.as_str()).collect();
            (verbs.join("|"), route.uri)
        })
        .collect()
}

/// The single route dispatching to `method` on any handler.
pub fn route_for(table: &RouteTable, method: &str) -> RouteRecord {
    let matches: Vec<RouteRecord> = table
        .routes()
        .into_iter()
        .filter(|route| route.target.method.as_deref() == Some(method))
        .collect();
    assert_eq!(matches.len(), 1, "expected one route for {method}: {table}");
    matches.into_iter().next().unwrap()
}

pub mod scratch {
    use super::*;
    use tempfile::TempDir;

    /// Scratch source tree: empty files whose paths mirror handler modules.
    pub struct Scratch {
        dir: TempDir,
    }

    impl Scratch {
        pub fn new() -> Self {
            Scratch {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        pub fn join(&self, relative: &str) -> PathBuf {
            self.dir.path().join(relative)
        }

        pub fn touch(&self, relative: &str) -> PathBuf {
            let path = self.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, "").unwrap();
            path
        }

        pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
            let path = self.touch(relative);
            std::fs::write(&path, contents).unwrap();
            path
        }
    }
}
