use super::*;
use crate::attributes::{ConstraintSet, Resource, Route};
use crate::handler::{MethodDefinition, Parameter};
use crate::node_tree::{Action, Node, NodeKind};
use crate::router::GroupSpec;
use http::Method;

fn action(handler: &str, method: MethodDefinition, route: Route) -> Action {
    Action::new(handler, &method, route, ConstraintSet::new())
}

fn node(handler: &str, uri: &str, actions: Vec<Action>) -> Node {
    Node {
        handler: handler.to_string(),
        uri: uri.to_string(),
        groups: vec![GroupSpec::default()],
        middleware: Vec::new(),
        kind: NodeKind::Actions(actions),
    }
}

fn uris(nodes: &[Node]) -> Vec<Vec<String>> {
    nodes
        .iter()
        .map(|n| n.actions().iter().map(|a| a.uri.clone()).collect())
        .collect()
}

fn run_twice(pipeline: &Pipeline, nodes: &mut [Node]) {
    pipeline.run(nodes);
    let once = nodes.to_vec();
    pipeline.run(nodes);
    assert_eq!(once, nodes.to_vec(), "pipeline is not idempotent");
}

#[test]
fn test_default_order_matches_configuration_names() {
    let pipeline = Pipeline::default();
    assert_eq!(
        pipeline.names(),
        vec![
            "add_handler_uri_to_actions",
            "handle_custom_route_name",
            "handle_custom_middleware",
            "handle_custom_http_methods",
            "fix_uris_of_nested_handlers",
            "handle_custom_uri",
            "handle_custom_full_uri",
        ]
    );
}

#[test]
fn test_kinds_deserialize_from_snake_case() {
    let kinds: Vec<TransformerKind> =
        serde_json::from_str(r#"["handle_custom_uri", "add_handler_uri_to_actions"]"#).unwrap();
    assert_eq!(
        Pipeline::from_kinds(&kinds).names(),
        vec!["handle_custom_uri", "add_handler_uri_to_actions"]
    );
}

#[test]
fn test_handler_uri_prefixes_actions() {
    let mut nodes = vec![node(
        "app::PostController",
        "post",
        vec![
            action("app::PostController", MethodDefinition::new("index"), Route::new()),
            action(
                "app::PostController",
                MethodDefinition::new("show").param(Parameter::model("post", "Post")),
                Route::new(),
            ),
        ],
    )];
    run_twice(&Pipeline::default(), &mut nodes);
    assert_eq!(uris(&nodes), vec![vec!["post", "post/{post}"]]);
}

#[test]
fn test_declared_values_override_conventions() {
    let route = Route::post("custom/path")
        .name("custom.name")
        .middleware(["b"]);
    let mut nodes = vec![node(
        "app::PostController",
        "post",
        vec![action(
            "app::PostController",
            MethodDefinition::new("my_post_method"),
            route,
        )],
    )];
    nodes[0].middleware = vec!["a".into()];

    run_twice(&Pipeline::default(), &mut nodes);
    let action = &nodes[0].actions()[0];
    assert_eq!(action.uri, "custom/path");
    assert_eq!(action.methods, vec![Method::POST]);
    assert_eq!(action.name.as_deref(), Some("custom.name"));
    assert_eq!(action.middleware, vec!["a", "b"]);
    assert!(!action.full_uri);
}

#[test]
fn test_declared_verbs_without_uri_keep_conventional_uri() {
    let mut nodes = vec![node(
        "app::PostController",
        "post",
        vec![action(
            "app::PostController",
            MethodDefinition::new("my_post_method"),
            Route::new().methods([Method::POST]),
        )],
    )];
    Pipeline::default().run(&mut nodes);
    let action = &nodes[0].actions()[0];
    assert_eq!(action.uri, "post/my-post-method");
    assert_eq!(action.methods, vec![Method::POST]);
}

#[test]
fn test_full_uri_wins_and_is_flagged() {
    let mut nodes = vec![node(
        "app::PostController",
        "post",
        vec![action(
            "app::PostController",
            MethodDefinition::new("index"),
            Route::get("ignored").full_uri("/absolute"),
        )],
    )];
    run_twice(&Pipeline::default(), &mut nodes);
    let action = &nodes[0].actions()[0];
    assert_eq!(action.uri, "absolute");
    assert!(action.full_uri);
}

#[test]
fn test_self_named_handler_collapses_into_its_directory() {
    let mut nodes = vec![node(
        "app::news::NewsController",
        "news/news",
        vec![
            action("app::news::NewsController", MethodDefinition::new("index"), Route::new()),
            action(
                "app::news::NewsController",
                MethodDefinition::new("show").param(Parameter::model("news", "News")),
                Route::new(),
            ),
        ],
    )];
    run_twice(&Pipeline::default(), &mut nodes);
    assert_eq!(nodes[0].uri, "news");
    assert_eq!(uris(&nodes), vec![vec!["news", "news/{news}"]]);
}

#[test]
fn test_siblings_nest_under_parent_show_parameter() {
    let mut nodes = vec![
        node(
            "app::news::CommentController",
            "news/comment",
            vec![
                action("app::news::CommentController", MethodDefinition::new("index"), Route::new()),
                action(
                    "app::news::CommentController",
                    MethodDefinition::new("show").param(Parameter::model("comment", "Comment")),
                    Route::new(),
                ),
            ],
        ),
        node(
            "app::news::NewsController",
            "news/news",
            vec![action(
                "app::news::NewsController",
                MethodDefinition::new("show").param(Parameter::model("news", "News")),
                Route::new(),
            )],
        ),
    ];
    run_twice(&Pipeline::default(), &mut nodes);
    assert_eq!(
        uris(&nodes),
        vec![
            vec!["news/{news}/comment", "news/{news}/comment/{comment}"],
            vec!["news/{news}"],
        ]
    );
}

#[test]
fn test_parent_without_model_show_does_not_nest() {
    let mut nodes = vec![
        node(
            "app::news::NewsController",
            "news",
            vec![action("app::news::NewsController", MethodDefinition::new("show"), Route::new())],
        ),
        node(
            "app::news::CommentController",
            "news/comment",
            vec![action("app::news::CommentController", MethodDefinition::new("index"), Route::new())],
        ),
    ];
    Pipeline::default().run(&mut nodes);
    assert_eq!(uris(&nodes), vec![vec!["news"], vec!["news/comment"]]);
}

#[test]
fn test_resource_nodes_are_left_alone() {
    let resource = Node {
        handler: "app::PhotoController".into(),
        uri: "photo".into(),
        groups: vec![GroupSpec::default()],
        middleware: Vec::new(),
        kind: NodeKind::Resource(Resource::new("photos")),
    };
    let mut nodes = vec![resource.clone()];
    Pipeline::default().run(&mut nodes);
    assert_eq!(nodes, vec![resource]);
}

struct Uppercase;

impl NodeTransformer for Uppercase {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn transform(&self, nodes: &mut [Node]) {
        for node in nodes.iter_mut() {
            for action in node.actions_mut() {
                action.uri = action.uri.to_uppercase();
            }
        }
    }
}

#[test]
fn test_custom_transformers_run_after_built_ins() {
    let mut pipeline = Pipeline::default();
    pipeline.push(Uppercase);
    assert_eq!(pipeline.len(), 8);

    let mut nodes = vec![node(
        "app::PostController",
        "post",
        vec![action("app::PostController", MethodDefinition::new("archive"), Route::new())],
    )];
    pipeline.run(&mut nodes);
    assert_eq!(nodes[0].actions()[0].uri, "POST/ARCHIVE");
}

#[test]
fn test_empty_pipeline_leaves_relative_uris() {
    let mut nodes = vec![node(
        "app::PostController",
        "post",
        vec![action("app::PostController", MethodDefinition::new("archive"), Route::new())],
    )];
    Pipeline::empty().run(&mut nodes);
    assert_eq!(nodes[0].actions()[0].uri, "archive");
}
