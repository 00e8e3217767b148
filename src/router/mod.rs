//! # Router Module
//!
//! The router module is the boundary between discovery and whatever stores
//! routes. Discovery never matches requests; it only writes route entries,
//! in order, through the [`RouteSink`] trait.
//!
//! ## Overview
//!
//! - [`RouteSink`]: what discovery writes into (`group`, `add_route`,
//!   `resource`, `api_resource`)
//! - [`RouteHandle`] / [`ResourceHandle`]: returned handles used to attach a
//!   name, middleware, constraints or resource options to a fresh entry
//! - [`RouteTable`]: an in-memory sink with nested group scopes and lazy
//!   resource expansion, used by tests and for route listings
//!
//! ## Group Merging
//!
//! | Field | Nested group behaviour |
//! |-------|------------------------|
//! | `prefix` | appended to the outer prefix |
//! | `domain` | inner domain replaces the outer one |
//! | `where` | merged, inner wins per parameter |
//! | `as` | appended to the outer name prefix |
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use route_discovery::router::{GroupSpec, RouteSink, RouteTable, RouteTarget};
//!
//! let mut table = RouteTable::new();
//! table.group(&GroupSpec::scope(None, Some("admin".into())), &mut |router| {
//!     router
//!         .add_route(&[Method::GET], "posts", RouteTarget::new("app::PostController", "index"))
//!         .name("posts.index");
//! });
//! assert_eq!(table.routes()[0].uri, "admin/posts");
//! ```

mod core;
mod table;
#[cfg(test)]
mod tests;

pub use core::{GroupSpec, ResourceHandle, RouteHandle, RouteSink, RouteTarget};
pub use table::{RouteRecord, RouteTable, RESOURCE_ACTIONS};
