#![allow(clippy::unwrap_used, clippy::expect_used, dead_code, unused_variables)]

use ::http::Method;
use route_discovery::attributes::{Attribute, AttributeFamily, ResourceNames, Where};
use route_discovery::{route_handler, MethodDefinition, RouteHandler, Visibility};

pub struct Photo;

pub struct PhotoController;

#[route_handler(
    group(prefix = "v1", domain = "api.test", r#where(photo = "[0-9]+"), r#as = "v1."),
    group(prefix = "v2"),
    middleware = ["auth", "throttle"],
    where_uuid(param = "album")
)]
impl PhotoController {
    #[get("photos/{photo}")]
    pub fn show(#[model] photo: Photo) {}

    #[route(method = ["put", "patch"], name = "photos.replace", middleware = ["audit"])]
    #[where_in("format", values = ["jpg", "png"])]
    pub fn replace(#[model] photo: Photo, format: String) {}

    #[any(full_uri = "/ping")]
    pub fn ping() {}

    #[do_not_discover]
    pub fn hidden() {}

    fn helper() {}
}

pub struct ArchiveController;

#[route_handler(api_resource(name = "archives", except = ["destroy"], names = "old"), prefix = "admin")]
impl ArchiveController {}

pub struct LegacyController;

#[route_handler(do_not_discover, domain_from_config = "domains.legacy")]
impl LegacyController {
    pub fn index() {}
}

fn method<'a>(methods: &'a [MethodDefinition], name: &str) -> &'a MethodDefinition {
    methods.iter().find(|m| m.name == name).unwrap()
}

fn attributes(method: &MethodDefinition, family: AttributeFamily) -> Vec<Attribute> {
    method
        .declarations(family)
        .map(Result::unwrap)
        .collect()
}

#[test]
fn test_identity_comes_from_the_declaration_site() {
    assert_eq!(PhotoController::MODULE, "macro_tests");
    assert_eq!(PhotoController::NAME, "PhotoController");
    assert_eq!(
        PhotoController::definition().id(),
        "macro_tests::PhotoController"
    );
}

#[test]
fn test_methods_keep_visibility_and_parameters() {
    let definition = PhotoController::definition();
    let names: Vec<&str> = definition.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["show", "replace", "ping", "hidden", "helper"]);

    let helper = method(&definition.methods, "helper");
    assert_eq!(helper.visibility, Visibility::Private);

    let replace = method(&definition.methods, "replace");
    assert_eq!(replace.parameters.len(), 2);
    assert!(replace.parameters[0].is_model);
    assert_eq!(replace.parameters[0].type_name, "Photo");
    assert!(!replace.parameters[1].is_model);
    assert_eq!(replace.model_parameter().unwrap().name, "photo");
}

#[test]
fn test_handler_groups_and_constraints() {
    let definition = PhotoController::definition();
    let groups: Vec<Attribute> = definition
        .declarations(AttributeFamily::Group)
        .map(Result::unwrap)
        .collect();
    assert_eq!(groups.len(), 2);
    let Attribute::Group(first) = &groups[0] else {
        panic!("expected a group, got {:?}", groups[0]);
    };
    assert_eq!(first.prefix.as_deref(), Some("v1"));
    assert_eq!(first.domain.as_deref(), Some("api.test"));
    assert_eq!(first.wheres["photo"], "[0-9]+");
    assert_eq!(first.name_prefix.as_deref(), Some("v1."));

    let wheres: Vec<Attribute> = definition
        .declarations(AttributeFamily::Where)
        .map(Result::unwrap)
        .collect();
    assert_eq!(wheres, vec![Attribute::Where(Where::uuid("album"))]);
}

#[test]
fn test_method_route_declarations() {
    let definition = PhotoController::definition();

    let show = attributes(method(&definition.methods, "show"), AttributeFamily::Route);
    let route = show[0].clone().into_route().unwrap();
    assert_eq!(route.methods, vec![Method::GET]);
    assert_eq!(route.uri.as_deref(), Some("photos/{photo}"));

    let replace = method(&definition.methods, "replace");
    let route = attributes(replace, AttributeFamily::Route)[0]
        .clone()
        .into_route()
        .unwrap();
    assert_eq!(route.methods, vec![Method::PUT, Method::PATCH]);
    assert_eq!(route.name.as_deref(), Some("photos.replace"));
    assert_eq!(route.middleware, vec!["audit"]);
    let format = attributes(replace, AttributeFamily::Where)[0]
        .clone()
        .into_where()
        .unwrap();
    assert_eq!(format.param, "format");
    assert_eq!(format.constraint, "jpg|png");

    let ping = attributes(method(&definition.methods, "ping"), AttributeFamily::Route);
    let route = ping[0].clone().into_route().unwrap();
    assert_eq!(route.methods.len(), 7);
    assert_eq!(route.full_uri.as_deref(), Some("/ping"));

    let hidden = method(&definition.methods, "hidden");
    assert_eq!(
        hidden.declarations(AttributeFamily::DoNotDiscover).count(),
        1
    );
}

#[test]
fn test_resource_arguments() {
    let definition = ArchiveController::definition();
    let resources: Vec<Attribute> = definition
        .declarations(AttributeFamily::Resource)
        .map(Result::unwrap)
        .collect();
    let Attribute::Resource(resource) = &resources[0] else {
        panic!("expected a resource, got {:?}", resources[0]);
    };
    assert_eq!(resource.name, "archives");
    assert!(resource.api);
    assert_eq!(resource.except, Some(vec!["destroy".to_string()]));
    assert_eq!(
        resource.names,
        Some(ResourceNames::Prefix("old".to_string()))
    );
    assert!(definition.methods.is_empty());
    assert_eq!(definition.declarations(AttributeFamily::Prefix).count(), 1);
}

#[test]
fn test_handler_flags() {
    let definition = LegacyController::definition();
    assert_eq!(
        definition.declarations(AttributeFamily::DoNotDiscover).count(),
        1
    );
    let domain = definition
        .declarations(AttributeFamily::DomainFromConfig)
        .next()
        .unwrap()
        .unwrap();
    assert!(matches!(domain, Attribute::DomainFromConfig(d) if d.key == "domains.legacy"));
}
