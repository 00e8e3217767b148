//! # Transformers Module
//!
//! Post-processing passes over the node tree. Each pass is a
//! [`NodeTransformer`]; a [`Pipeline`] runs them in order, and later passes
//! see what earlier ones changed. Every built-in pass is idempotent.
//!
//! ## Default Order
//!
//! | # | Pass | Effect |
//! |---|------|--------|
//! | 1 | `add_handler_uri_to_actions` | prefix action URIs with the handler's path segment |
//! | 2 | `handle_custom_route_name` | apply declared names |
//! | 3 | `handle_custom_middleware` | node middleware followed by declared middleware |
//! | 4 | `handle_custom_http_methods` | declared verbs replace inferred ones |
//! | 5 | `fix_uris_of_nested_handlers` | `news/news` → `news`, `news/comments` → `news/{news}/comments` |
//! | 6 | `handle_custom_uri` | declared URI replaces the computed one |
//! | 7 | `handle_custom_full_uri` | declared full URI, outside any group prefix |
//!
//! The order is configurable through `node_tree_transformers`; custom passes
//! can be appended with [`Pipeline::push`].

mod core;
mod custom;
mod handler_uri;
mod nested;
#[cfg(test)]
mod tests;

pub use core::{NodeTransformer, Pipeline, TransformerKind};
pub use custom::{
    HandleCustomFullUri, HandleCustomHttpMethods, HandleCustomMiddleware, HandleCustomRouteName,
    HandleCustomUri,
};
pub use handler_uri::AddHandlerUriToActions;
pub use nested::FixUrisOfNestedHandlers;
