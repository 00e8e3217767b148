//! # Attributes Module
//!
//! Typed representations of everything a handler can declare about its
//! routes: verbs and URIs, names, middleware, path constraints, grouping by
//! domain and prefix, and resource registration.
//!
//! ## Declarations vs. attributes
//!
//! A [`Declaration`] is what sits on a handler or method: either an
//! already-typed [`Attribute`] or a raw `(kind, json-args)` pair recorded by
//! the `#[route_handler]` macro. Turning a declaration into an attribute is
//! fallible ([`Declaration::instantiate`]); discovery skips a declaration
//! that fails instead of giving up on its handler.
//!
//! | Kind | Family | Arguments |
//! |------|--------|-----------|
//! | `Route`, `Get`, `Post`, `Put`, `Patch`, `Delete`, `Options`, `Any` | Route | `method(s)`, `uri`, `full_uri`, `name`, `middleware` |
//! | `Where`, `WhereAlpha`, `WhereAlphaNumeric`, `WhereNumber`, `WhereUuid`, `WhereUlid`, `WhereIn` | Where | `param`, `constraint` / `values` |
//! | `Group` | Group | `domain`, `prefix`, `where`, `as` |
//! | `Prefix` / `Domain` / `DomainFromConfig` | singular | `prefix` / `domain` / `key` |
//! | `Middleware` | Middleware | `middleware` |
//! | `Resource`, `ApiResource` | Resource | `name`, `api`, `only`, `except`, `names` |
//! | `DoNotDiscover` | DoNotDiscover | none |

mod declaration;
mod types;

pub use declaration::Declaration;
pub use types::*;

use thiserror::Error;

/// Why a declaration could not be instantiated.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// The arguments were not valid JSON or did not fit the kind's shape.
    #[error("malformed {kind} declaration: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// The kind name is not one discovery knows about.
    #[error("unknown declaration kind '{0}'")]
    UnknownKind(String),

    /// A verb outside the router's verb set.
    #[error("unsupported HTTP method '{0}'")]
    InvalidMethod(String),

    /// A constraint pattern that does not compile.
    #[error("invalid constraint for '{param}': '{pattern}' ({source})")]
    InvalidConstraint {
        param: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Arguments that parse but make no sense together.
    #[error("invalid declaration: {0}")]
    Invalid(String),
}
