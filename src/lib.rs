//! # route-discovery
//!
//! **route-discovery** turns declarations attached to handler types into a
//! concrete route table, so routes never have to be registered by hand.
//! Handlers say what they need (URI, verbs, constraints, middleware,
//! groups, resources) through `#[route_handler]`, or say nothing and get
//! conventional routes derived from their method names and source location.
//!
//! ## Architecture
//!
//! - **[`attributes`]** - declarable route facts and their fallible instantiation
//! - **[`handler`]** - introspected handler shape (methods, parameters, declarations)
//! - **[`registry`]** - identifier → handler definition, populated at link time
//! - **[`convention`]** - default URIs and verbs when nothing is declared
//! - **[`resolver`]** - handler-level questions (prefix, domain, groups, resource, ...)
//! - **[`discovery`]** - directory listing and path → identifier mapping
//! - **[`node_tree`]** / **[`transformers`]** - intermediate tree and rewrite passes
//! - **[`registrar`]** - one discovery pass: build, transform, emit
//! - **[`router`]** - the sink routes are written to, plus an in-memory table
//! - **[`config`]** / **[`logging`]** - file and environment configuration
//!
//! ### Discovery Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Disc as RouteDiscovery
//!     participant Reg as RouteRegistrar
//!     participant Walk as discovery
//!     participant Registry as HandlerRegistry
//!     participant Pipe as Pipeline
//!     participant Router as RouteSink
//!
//!     App->>Disc: register_routes(&mut router)
//!     Disc->>Reg: register_directories(dirs)
//!     Reg->>Walk: discover_files(dir)
//!     Walk-->>Reg: files (lexical order)
//!     Reg->>Registry: lookup(identifier)
//!     Registry-->>Reg: HandlerDefinition(s)
//!     Reg->>Reg: build Node per handler
//!     Reg->>Pipe: run(&mut nodes)
//!     Reg->>Router: group(..) / add_route(..) / resource(..)
//! ```
//!
//! ## Declaring Handlers
//!
//! ```rust,ignore
//! use route_discovery::route_handler;
//!
//! pub struct PostController;
//!
//! #[route_handler(prefix = "blog", middleware = ["web"], constraint(param = "post", pattern = "[0-9]+"))]
//! impl PostController {
//!     pub fn index() {}
//!
//!     pub fn show(#[model] post: Post) {}
//!
//!     #[route(method = "post", uri = "posts/{post}/publish", name = "posts.publish")]
//!     pub fn publish(#[model] post: Post) {}
//!
//!     #[do_not_discover]
//!     pub fn helper() {}
//! }
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register::<PostController>();
//! ```
//!
//! ## Registering Routes
//!
//! ```rust,ignore
//! let config = DiscoveryConfig::from_file(Path::new("config/discovery.yaml"))?;
//! let mut routes = RouteTable::new();
//! RouteDiscovery::new(config, registry).register_routes(&mut routes)?;
//! println!("{routes}");
//! ```

extern crate self as route_discovery;

pub mod attributes;
pub mod config;
pub mod convention;
mod discover;
pub mod discovery;
pub mod error;
pub mod handler;
pub mod logging;
pub mod node_tree;
pub mod registrar;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod transformers;

pub use attributes::{Attribute, AttributeError, Declaration};
pub use config::DiscoveryConfig;
pub use discover::RouteDiscovery;
pub use error::{DiscoveryError, DiscoveryResult};
pub use handler::{HandlerDefinition, MethodDefinition, Parameter, RouteHandler, Visibility};
pub use registrar::{PassReport, RouteRegistrar};
pub use registry::HandlerRegistry;
pub use resolver::{ClassAttributes, ConfigLookup};
pub use route_discovery_macros::route_handler;
pub use router::{RouteSink, RouteTable};
pub use transformers::{NodeTransformer, Pipeline, TransformerKind};
