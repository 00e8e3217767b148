//! # Convention Module
//!
//! Defaults used when a handler method declares nothing (or only part of
//! what a route needs):
//!
//! - **Verbs** come from a fixed CRUD lookup on the method name.
//! - **Relative URIs** come from the method name (unless it is one of the
//!   common CRUD names) followed by a `{param}` segment for the first
//!   model-bound parameter.
//! - **Handler URIs** come from the handler's source path below the scan
//!   root, minus its `Controller` suffix.
//!
//! Everything here is pure and independent of any registry or router.
//!
//! | Method name | Verbs |
//! |-------------|-------|
//! | `index`, `create`, `show`, `edit` | `GET` |
//! | `store` | `POST` |
//! | `update` | `PUT`, `PATCH` |
//! | `destroy`, `delete` | `DELETE` |
//! | anything else | `GET` |

use http::Method;
use std::path::{Component, Path};

use crate::handler::{Parameter, INVOKE_METHOD};

/// Method names that never contribute a URI segment of their own.
pub const COMMON_METHOD_NAMES: [&str; 10] = [
    "index",
    INVOKE_METHOD,
    "get",
    "show",
    "create",
    "store",
    "edit",
    "update",
    "destroy",
    "delete",
];

/// File stem suffix stripped from handler sources (`PostController`,
/// `post_controller`), compared case-insensitively.
const HANDLER_SUFFIX: &str = "controller";

#[must_use]
pub fn is_common_method_name(name: &str) -> bool {
    COMMON_METHOD_NAMES.contains(&name)
}

/// Default verbs for a method name.
#[must_use]
pub fn infer_http_methods(method_name: &str) -> Vec<Method> {
    match method_name {
        "index" | "create" | "show" | "edit" => vec![Method::GET],
        "store" => vec![Method::POST],
        "update" => vec![Method::PUT, Method::PATCH],
        "destroy" | "delete" => vec![Method::DELETE],
        _ => vec![Method::GET],
    }
}

/// Default URI of a method relative to its handler.
///
/// An empty result means "the handler's root action".
#[must_use]
pub fn infer_relative_uri(method_name: &str, parameters: &[Parameter]) -> String {
    let mut uri = String::new();

    if !is_common_method_name(method_name) {
        uri.push_str(&kebab_case(method_name));
    }

    if let Some(model) = parameters.iter().find(|p| p.is_model) {
        if !uri.is_empty() {
            uri.push('/');
        }
        uri.push('{');
        uri.push_str(&model.name);
        uri.push('}');
    }

    uri
}

/// URI segment derived from a handler's source path relative to the scan root.
///
/// `<root>/Admin/PostController.rs` and `<root>/admin/post_controller.rs`
/// both give `admin/post`; a `mod.rs` file stands for its directory.
#[must_use]
pub fn handler_uri(source: &Path, scan_root: &Path) -> String {
    let relative = source.strip_prefix(scan_root).unwrap_or(source);

    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str().map(str::to_string),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&last)
            .to_string();
        let stem = strip_handler_suffix(&stem);
        if stem != "mod" {
            segments.push(stem.to_string());
        }
    }

    let segments: Vec<String> = segments
        .iter()
        .map(|segment| kebab_case(segment))
        .filter(|segment| !segment.is_empty())
        .collect();
    segments.join("/")
}

fn strip_handler_suffix(stem: &str) -> &str {
    let cut = stem.len().saturating_sub(HANDLER_SUFFIX.len());
    let stripped = match stem.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(HANDLER_SUFFIX) => &stem[..cut],
        _ => stem,
    };
    stripped.trim_end_matches('_')
}

/// Kebab-case an identifier: `myPostMethod`, `my_post_method` and
/// `my post method` all become `my-post-method`.
#[must_use]
pub fn kebab_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut pending_separator = false;

    for ch in value.chars() {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_separator = !out.is_empty();
            continue;
        }
        if ch.is_uppercase() && !out.is_empty() {
            pending_separator = true;
        }
        if pending_separator {
            out.push('-');
            pending_separator = false;
        }
        out.extend(ch.to_lowercase());
    }

    out
}

/// Join URI fragments with single slashes, dropping empty ones.
#[must_use]
pub fn join_uri(base: &str, tail: &str) -> String {
    let base = base.trim_matches('/');
    let tail = tail.trim_matches('/');
    match (base.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{tail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn read_only_crud_names_infer_get() {
        for name in ["index", "create", "show", "edit"] {
            assert_eq!(infer_http_methods(name), vec![Method::GET], "{name}");
        }
    }

    #[test]
    fn write_crud_names_infer_their_verbs() {
        assert_eq!(infer_http_methods("store"), vec![Method::POST]);
        assert_eq!(
            infer_http_methods("update"),
            vec![Method::PUT, Method::PATCH]
        );
        assert_eq!(infer_http_methods("destroy"), vec![Method::DELETE]);
        assert_eq!(infer_http_methods("delete"), vec![Method::DELETE]);
    }

    #[test]
    fn unknown_names_fall_back_to_get() {
        for name in ["myPostMethod", "publish", "get", "__invoke"] {
            assert_eq!(infer_http_methods(name), vec![Method::GET], "{name}");
        }
    }

    #[test]
    fn uncommon_names_become_a_kebab_segment() {
        assert_eq!(infer_relative_uri("myPostMethod", &[]), "my-post-method");
        assert_eq!(infer_relative_uri("my_post_method", &[]), "my-post-method");
    }

    #[test]
    fn common_names_without_model_give_the_root_action() {
        for name in COMMON_METHOD_NAMES {
            assert_eq!(infer_relative_uri(name, &[]), "", "{name}");
        }
    }

    #[test]
    fn model_parameter_appends_its_own_name() {
        let params = [
            Parameter::new("request", "Request"),
            Parameter::model("post", "Post"),
        ];
        assert_eq!(infer_relative_uri("show", &params), "{post}");
        assert_eq!(infer_relative_uri("publish", &params), "publish/{post}");
    }

    #[test]
    fn only_the_first_model_parameter_counts() {
        let params = [
            Parameter::model("author", "User"),
            Parameter::model("post", "Post"),
        ];
        assert_eq!(infer_relative_uri("edit", &params), "{author}");
    }

    #[test]
    fn plain_parameters_do_not_bind() {
        let params = [Parameter::new("id", "u64")];
        assert_eq!(infer_relative_uri("show", &params), "");
    }

    #[test]
    fn kebab_case_matches_camel_snake_and_words() {
        assert_eq!(kebab_case("HTTPTest"), "h-t-t-p-test");
        assert_eq!(kebab_case("v2Api"), "v2-api");
        assert_eq!(kebab_case("foo bar"), "foo-bar");
        assert_eq!(kebab_case("__invoke"), "invoke");
        assert_eq!(kebab_case("posts_"), "posts");
    }

    #[test]
    fn handler_uri_strips_root_extension_and_suffix() {
        let root = PathBuf::from("/srv/app/src/http");
        assert_eq!(
            handler_uri(&root.join("PostController.rs"), &root),
            "post"
        );
        assert_eq!(
            handler_uri(&root.join("admin/blog_post_controller.rs"), &root),
            "admin/blog-post"
        );
        assert_eq!(handler_uri(&root.join("News/mod.rs"), &root), "news");
        assert_eq!(handler_uri(&root.join("Controller.rs"), &root), "");
    }

    #[test]
    fn join_uri_skips_empty_parts() {
        assert_eq!(join_uri("", "x"), "x");
        assert_eq!(join_uri("post/", ""), "post");
        assert_eq!(join_uri("/post", "/{post}"), "post/{post}");
    }
}
