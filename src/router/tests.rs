use super::{GroupSpec, RouteSink, RouteTable, RouteTarget};
use crate::attributes::{ConstraintSet, ResourceNames};
use http::Method;
use std::collections::BTreeMap;

fn target(method: &str) -> RouteTarget {
    RouteTarget::new("app::PostController", method)
}

fn wheres(pairs: &[(&str, &str)]) -> ConstraintSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_root_uri_is_a_single_slash() {
    let mut table = RouteTable::new();
    table.add_route(&[Method::GET], "", target("index"));
    assert_eq!(table.routes()[0].uri, "/");
}

#[test]
fn test_invoke_target_has_no_method() {
    let target = RouteTarget::new("app::HomeController", "__invoke");
    assert_eq!(target.method, None);
    assert_eq!(target.to_string(), "app::HomeController");
    assert_eq!(
        RouteTarget::new("app::HomeController", "show").to_string(),
        "app::HomeController@show"
    );
}

#[test]
fn test_nested_groups_merge_scopes() {
    let mut table = RouteTable::new();
    let outer = GroupSpec {
        domain: Some("outer.test".into()),
        prefix: Some("/api/".into()),
        wheres: wheres(&[("id", "[0-9]+"), ("slug", "[a-z]+")]),
        name_prefix: Some("api.".into()),
    };
    let inner = GroupSpec {
        domain: Some("inner.test".into()),
        prefix: Some("v1".into()),
        wheres: wheres(&[("id", "[a-f0-9]+")]),
        name_prefix: Some("v1.".into()),
    };
    table.group(&outer, &mut |router| {
        router.group(&inner, &mut |router| {
            router
                .add_route(&[Method::GET], "posts/{id}", target("show"))
                .name("posts.show");
        });
    });

    let route = &table.routes()[0];
    assert_eq!(route.uri, "api/v1/posts/{id}");
    assert_eq!(route.domain.as_deref(), Some("inner.test"));
    assert_eq!(route.name.as_deref(), Some("api.v1.posts.show"));
    assert_eq!(route.wheres, wheres(&[("id", "[a-f0-9]+"), ("slug", "[a-z]+")]));
}

#[test]
fn test_scope_is_popped_after_group() {
    let mut table = RouteTable::new();
    table.group(&GroupSpec::scope(None, Some("admin".into())), &mut |router| {
        router.add_route(&[Method::GET], "a", target("a"));
    });
    table.add_route(&[Method::GET], "b", target("b"));

    let uris: Vec<String> = table.routes().into_iter().map(|r| r.uri).collect();
    assert_eq!(uris, vec!["admin/a", "b"]);
}

#[test]
fn test_handle_appends_middleware_and_overrides_wheres() {
    let mut table = RouteTable::new();
    table.group(
        &GroupSpec {
            wheres: wheres(&[("id", "[0-9]+"), ("slug", "[a-z]+")]),
            ..GroupSpec::default()
        },
        &mut |router| {
            let route = router.add_route(&[Method::GET], "{slug}/{id}", target("show"));
            route.middleware(&["a".to_string()]);
            route.middleware(&["a".to_string(), "b".to_string()]);
            route.set_wheres(&wheres(&[("id", "[a-z]+")]));
        },
    );

    let route = &table.routes()[0];
    assert_eq!(route.middleware, vec!["a", "a", "b"]);
    assert_eq!(route.wheres["id"], "[a-z]+");
    assert_eq!(route.wheres["slug"], "[a-z]+");
}

#[test]
fn test_full_uri_scope_keeps_domain_and_wheres() {
    let group = GroupSpec {
        domain: Some("example.test".into()),
        prefix: Some("admin".into()),
        wheres: wheres(&[("id", "[0-9]+")]),
        name_prefix: None,
    };
    let mut table = RouteTable::new();
    table.group(&group.without_prefix(), &mut |router| {
        router.add_route(&[Method::GET], "elsewhere", target("show"));
    });

    let route = &table.routes()[0];
    assert_eq!(route.uri, "elsewhere");
    assert_eq!(route.domain.as_deref(), Some("example.test"));
    assert_eq!(route.wheres["id"], "[0-9]+");
}

#[test]
fn test_resource_expands_to_seven_actions() {
    let mut table = RouteTable::new();
    table.resource("posts", "app::PostController");

    let routes = table.routes();
    let summary: Vec<(Vec<Method>, String, Option<String>)> = routes
        .iter()
        .map(|r| (r.methods.clone(), r.uri.clone(), r.name.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (vec![Method::GET], "posts".into(), Some("posts.index".into())),
            (vec![Method::GET], "posts/create".into(), Some("posts.create".into())),
            (vec![Method::POST], "posts".into(), Some("posts.store".into())),
            (vec![Method::GET], "posts/{post}".into(), Some("posts.show".into())),
            (vec![Method::GET], "posts/{post}/edit".into(), Some("posts.edit".into())),
            (
                vec![Method::PUT, Method::PATCH],
                "posts/{post}".into(),
                Some("posts.update".into())
            ),
            (vec![Method::DELETE], "posts/{post}".into(), Some("posts.destroy".into())),
        ]
    );
    assert_eq!(routes[3].target.method.as_deref(), Some("show"));
}

#[test]
fn test_api_resource_drops_form_actions() {
    let mut table = RouteTable::new();
    table.api_resource("posts", "app::PostController");
    let names: Vec<String> = table
        .routes()
        .into_iter()
        .filter_map(|r| r.target.method)
        .collect();
    assert_eq!(names, vec!["index", "store", "show", "update", "destroy"]);
}

#[test]
fn test_resource_options_apply_after_registration() {
    let mut table = RouteTable::new();
    table.group(&GroupSpec::scope(None, Some("admin".into())), &mut |router| {
        let resource = router.resource("posts", "app::PostController");
        resource.only(&["index".into(), "store".into(), "show".into(), "edit".into()]);
        resource.except(&["edit".into()]);
        let mut names = BTreeMap::new();
        names.insert("index".to_string(), "posts.list".to_string());
        resource.names(&ResourceNames::Map(names));
        resource.middleware(&["auth".into()]);
    });

    let routes = table.routes();
    assert_eq!(routes.len(), 3);
    assert_eq!(routes[0].uri, "admin/posts");
    assert_eq!(routes[0].name.as_deref(), Some("posts.list"));
    assert_eq!(routes[1].name.as_deref(), Some("posts.store"));
    assert!(routes.iter().all(|r| r.middleware == vec!["auth"]));
}

#[test]
fn test_resource_name_prefix_option() {
    let mut table = RouteTable::new();
    table
        .api_resource("photos", "app::PhotoController")
        .names(&ResourceNames::Prefix("pictures".into()));
    assert_eq!(table.routes()[0].name.as_deref(), Some("pictures.index"));
}

#[test]
fn test_nested_resource_uri() {
    let mut table = RouteTable::new();
    table
        .resource("photos.comments", "app::CommentController")
        .only(&["show".into()]);
    let route = &table.routes()[0];
    assert_eq!(route.uri, "photos/{photo}/comments/{comment}");
    assert_eq!(route.name.as_deref(), Some("photos.comments.show"));
}

#[test]
fn test_resource_wildcards_are_singular_snake_case() {
    let mut table = RouteTable::new();
    table.resource("categories", "app::C").only(&["show".into()]);
    table.resource("blog-posts", "app::B").only(&["show".into()]);
    let uris: Vec<String> = table.routes().into_iter().map(|r| r.uri).collect();
    assert_eq!(uris, vec!["categories/{category}", "blog-posts/{blog_post}"]);
}

#[test]
fn test_find_respects_registration_order() {
    let mut table = RouteTable::new();
    table.add_route(&[Method::GET], "posts/{post}", target("show"));
    table.add_route(&[Method::GET], "posts/{post}", target("other"));
    let found = table.find(&Method::GET, "/posts/{post}").unwrap();
    assert_eq!(found.target.method.as_deref(), Some("show"));
    assert!(table.find(&Method::POST, "posts/{post}").is_none());
}

#[test]
fn test_listing_shows_every_route() {
    let mut table = RouteTable::new();
    table
        .add_route(&[Method::GET, Method::HEAD], "posts", target("index"))
        .middleware(&["web".into()]);
    let listing = table.to_string();
    assert!(listing.contains("GET|HEAD"));
    assert!(listing.contains("/posts"));
    assert!(listing.contains("app::PostController@index"));
    assert!(listing.contains("[web]"));
    assert_eq!(listing.lines().count(), 1);
}
