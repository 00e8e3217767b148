//! Passes applying what a route declaration states explicitly.

use super::NodeTransformer;
use crate::node_tree::Node;

pub struct HandleCustomRouteName;

impl NodeTransformer for HandleCustomRouteName {
    fn name(&self) -> &str {
        "handle_custom_route_name"
    }

    fn transform(&self, nodes: &mut [Node]) {
        for node in nodes.iter_mut() {
            for action in node.actions_mut() {
                if let Some(name) = &action.route.name {
                    action.name = Some(name.clone());
                }
            }
        }
    }
}

/// Node middleware followed by the declaration's own, duplicates kept.
pub struct HandleCustomMiddleware;

impl NodeTransformer for HandleCustomMiddleware {
    fn name(&self) -> &str {
        "handle_custom_middleware"
    }

    fn transform(&self, nodes: &mut [Node]) {
        for node in nodes.iter_mut() {
            let inherited = node.middleware.clone();
            for action in node.actions_mut() {
                let mut middleware = inherited.clone();
                middleware.extend(action.route.middleware.iter().cloned());
                action.middleware = middleware;
            }
        }
    }
}

pub struct HandleCustomHttpMethods;

impl NodeTransformer for HandleCustomHttpMethods {
    fn name(&self) -> &str {
        "handle_custom_http_methods"
    }

    fn transform(&self, nodes: &mut [Node]) {
        for node in nodes.iter_mut() {
            for action in node.actions_mut() {
                if !action.route.methods.is_empty() {
                    action.methods = action.route.methods.clone();
                }
            }
        }
    }
}

/// Declared URI replaces the computed one; group prefixes still apply.
pub struct HandleCustomUri;

impl NodeTransformer for HandleCustomUri {
    fn name(&self) -> &str {
        "handle_custom_uri"
    }

    fn transform(&self, nodes: &mut [Node]) {
        for node in nodes.iter_mut() {
            for action in node.actions_mut() {
                if let Some(uri) = &action.route.uri {
                    action.uri = uri.trim_matches('/').to_string();
                }
            }
        }
    }
}

/// Declared full URI replaces the computed one and leaves the group prefix
/// out; domain and constraints are kept.
pub struct HandleCustomFullUri;

impl NodeTransformer for HandleCustomFullUri {
    fn name(&self) -> &str {
        "handle_custom_full_uri"
    }

    fn transform(&self, nodes: &mut [Node]) {
        for node in nodes.iter_mut() {
            for action in node.actions_mut() {
                if let Some(full_uri) = &action.route.full_uri {
                    action.uri = full_uri.trim_matches('/').to_string();
                    action.full_uri = true;
                }
            }
        }
    }
}
