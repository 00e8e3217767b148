use http::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;

use super::types::{
    Attribute, AttributeFamily, ConstraintSet, Domain, DomainFromConfig, Group, Middleware,
    OneOrMany, Prefix, Resource, ResourceNames, Route, Where, ROUTER_VERBS,
};
use super::AttributeError;

/// One declaration as written on a handler or method.
///
/// Raw declarations carry their kind and JSON arguments exactly as the
/// `#[route_handler]` macro recorded them; they are only turned into an
/// [`Attribute`] when discovery asks for them, and that step may fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Typed(Attribute),
    Raw {
        kind: Cow<'static, str>,
        args: Cow<'static, str>,
    },
}

impl Declaration {
    /// Declaration from an already-built attribute.
    #[must_use]
    pub fn of(attribute: impl Into<Attribute>) -> Self {
        Declaration::Typed(attribute.into())
    }

    /// Declaration from a kind name and a JSON argument object.
    #[must_use]
    pub fn raw(kind: impl Into<Cow<'static, str>>, args: impl Into<Cow<'static, str>>) -> Self {
        Declaration::Raw {
            kind: kind.into(),
            args: args.into(),
        }
    }

    #[must_use]
    pub fn do_not_discover() -> Self {
        Declaration::Typed(Attribute::DoNotDiscover)
    }

    /// Family of the declaration, known without instantiating it.
    /// Unknown raw kinds belong to no family and are never returned by a
    /// family query.
    #[must_use]
    pub fn family(&self) -> Option<AttributeFamily> {
        match self {
            Declaration::Typed(attribute) => Some(attribute.family()),
            Declaration::Raw { kind, .. } => family_of_kind(kind),
        }
    }

    /// Materialise the declaration into a validated attribute.
    pub fn instantiate(&self) -> Result<Attribute, AttributeError> {
        let attribute = match self {
            Declaration::Typed(attribute) => attribute.clone(),
            Declaration::Raw { kind, args } => instantiate_raw(kind, args)?,
        };
        attribute.validate()?;
        Ok(attribute)
    }
}

impl From<Attribute> for Declaration {
    fn from(attribute: Attribute) -> Self {
        Declaration::Typed(attribute)
    }
}

macro_rules! impl_into_declaration {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Declaration {
                fn from(value: $ty) -> Self {
                    Declaration::Typed(Attribute::$ty(value))
                }
            }
        )*
    };
}

impl_into_declaration!(Route, Where, Group, Prefix, Domain, DomainFromConfig, Middleware, Resource);

fn family_of_kind(kind: &str) -> Option<AttributeFamily> {
    let family = match kind {
        "Route" | "Get" | "Post" | "Put" | "Patch" | "Delete" | "Options" | "Any" => {
            AttributeFamily::Route
        }
        "Where" | "WhereAlpha" | "WhereAlphaNumeric" | "WhereNumber" | "WhereUuid"
        | "WhereUlid" | "WhereIn" => AttributeFamily::Where,
        "Group" => AttributeFamily::Group,
        "Prefix" => AttributeFamily::Prefix,
        "Domain" => AttributeFamily::Domain,
        "DomainFromConfig" => AttributeFamily::DomainFromConfig,
        "Middleware" => AttributeFamily::Middleware,
        "Resource" | "ApiResource" => AttributeFamily::Resource,
        "DoNotDiscover" => AttributeFamily::DoNotDiscover,
        _ => return None,
    };
    Some(family)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteArgs {
    #[serde(default, alias = "method")]
    methods: OneOrMany<String>,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    full_uri: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    middleware: OneOrMany<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WhereArgs {
    param: String,
    #[serde(alias = "pattern")]
    constraint: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamArgs {
    param: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WhereInArgs {
    param: String,
    values: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupArgs {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default, rename = "where")]
    wheres: ConstraintSet,
    #[serde(default, rename = "as")]
    name_prefix: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PrefixArgs {
    prefix: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DomainArgs {
    domain: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DomainFromConfigArgs {
    #[serde(alias = "domain")]
    key: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MiddlewareArgs {
    #[serde(default)]
    middleware: OneOrMany<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ResourceArgs {
    #[serde(alias = "resource")]
    name: String,
    #[serde(default, alias = "api_resource")]
    api: bool,
    #[serde(default)]
    only: Option<OneOrMany<String>>,
    #[serde(default)]
    except: Option<OneOrMany<String>>,
    #[serde(default)]
    names: Option<ResourceNames>,
}

fn instantiate_raw(kind: &str, args: &str) -> Result<Attribute, AttributeError> {
    let value: Value = if args.trim().is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(args).map_err(|source| AttributeError::Malformed {
            kind: kind.to_string(),
            source,
        })?
    };

    let attribute = match kind {
        "Route" => route_from(parse::<RouteArgs>(kind, value)?, None)?,
        "Get" => route_from(parse(kind, value)?, Some(vec![Method::GET]))?,
        "Post" => route_from(parse(kind, value)?, Some(vec![Method::POST]))?,
        "Put" => route_from(parse(kind, value)?, Some(vec![Method::PUT]))?,
        "Patch" => route_from(parse(kind, value)?, Some(vec![Method::PATCH]))?,
        "Delete" => route_from(parse(kind, value)?, Some(vec![Method::DELETE]))?,
        "Options" => route_from(parse(kind, value)?, Some(vec![Method::OPTIONS]))?,
        "Any" => route_from(parse(kind, value)?, Some(ROUTER_VERBS.to_vec()))?,
        "Where" => {
            let args: WhereArgs = parse(kind, value)?;
            Attribute::Where(Where::new(args.param, args.constraint))
        }
        "WhereAlpha" => Attribute::Where(Where::alpha(parse::<ParamArgs>(kind, value)?.param)),
        "WhereAlphaNumeric" => {
            Attribute::Where(Where::alpha_numeric(parse::<ParamArgs>(kind, value)?.param))
        }
        "WhereNumber" => Attribute::Where(Where::number(parse::<ParamArgs>(kind, value)?.param)),
        "WhereUuid" => Attribute::Where(Where::uuid(parse::<ParamArgs>(kind, value)?.param)),
        "WhereUlid" => Attribute::Where(Where::ulid(parse::<ParamArgs>(kind, value)?.param)),
        "WhereIn" => {
            let args: WhereInArgs = parse(kind, value)?;
            if args.values.is_empty() {
                return Err(AttributeError::Invalid(format!(
                    "WhereIn on '{}' needs at least one value",
                    args.param
                )));
            }
            Attribute::Where(Where::one_of(args.param, args.values))
        }
        "Group" => {
            let args: GroupArgs = parse(kind, value)?;
            Attribute::Group(Group {
                domain: args.domain,
                prefix: args.prefix,
                wheres: args.wheres,
                name_prefix: args.name_prefix,
            })
        }
        "Prefix" => Attribute::Prefix(Prefix {
            prefix: parse::<PrefixArgs>(kind, value)?.prefix,
        }),
        "Domain" => Attribute::Domain(Domain {
            domain: parse::<DomainArgs>(kind, value)?.domain,
        }),
        "DomainFromConfig" => Attribute::DomainFromConfig(DomainFromConfig {
            key: parse::<DomainFromConfigArgs>(kind, value)?.key,
        }),
        "Middleware" => Attribute::Middleware(Middleware {
            middleware: parse::<MiddlewareArgs>(kind, value)?.middleware.into_vec(),
        }),
        "Resource" | "ApiResource" => {
            let args: ResourceArgs = parse(kind, value)?;
            Attribute::Resource(Resource {
                name: args.name,
                api: args.api || kind == "ApiResource",
                only: args.only.map(OneOrMany::into_vec),
                except: args.except.map(OneOrMany::into_vec),
                names: args.names,
            })
        }
        "DoNotDiscover" => Attribute::DoNotDiscover,
        other => return Err(AttributeError::UnknownKind(other.to_string())),
    };
    Ok(attribute)
}

fn parse<T: DeserializeOwned>(kind: &str, value: Value) -> Result<T, AttributeError> {
    serde_json::from_value(value).map_err(|source| AttributeError::Malformed {
        kind: kind.to_string(),
        source,
    })
}

fn route_from(args: RouteArgs, verbs: Option<Vec<Method>>) -> Result<Attribute, AttributeError> {
    let methods = match verbs {
        Some(verbs) => verbs,
        None => parse_methods(args.methods.into_vec())?,
    };
    let mut route = Route::new().methods(methods);
    route.middleware = args.middleware.into_vec();
    if let Some(uri) = args.uri {
        route = route.uri(uri);
    }
    if let Some(full_uri) = args.full_uri {
        route = route.full_uri(full_uri);
    }
    if let Some(name) = args.name {
        route = route.name(name);
    }
    Ok(Attribute::Route(route))
}

/// Parse declared verb names. `any` expands to every router verb.
fn parse_methods(names: Vec<String>) -> Result<Vec<Method>, AttributeError> {
    let mut methods = Vec::with_capacity(names.len());
    for name in names {
        let upper = name.trim().to_ascii_uppercase();
        if upper == "ANY" {
            methods.extend(ROUTER_VERBS.iter().cloned());
            continue;
        }
        match ROUTER_VERBS.iter().find(|verb| verb.as_str() == upper) {
            Some(verb) => methods.push(verb.clone()),
            None => return Err(AttributeError::InvalidMethod(name)),
        }
    }
    Ok(methods)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_route_accepts_single_method_string() {
        let decl = Declaration::raw("Route", r#"{"method": "post", "uri": "my-post-method"}"#);
        let route = decl.instantiate().unwrap().into_route().unwrap();
        assert_eq!(route.methods, vec![Method::POST]);
        assert_eq!(route.uri.as_deref(), Some("my-post-method"));
    }

    #[test]
    fn verb_shorthand_sets_methods() {
        let decl = Declaration::raw("Put", r#"{"uri": "my-put-method"}"#);
        let route = decl.instantiate().unwrap().into_route().unwrap();
        assert_eq!(route.methods, vec![Method::PUT]);
    }

    #[test]
    fn empty_uri_counts_as_undeclared() {
        let decl = Declaration::raw("Route", r#"{"uri": ""}"#);
        let route = decl.instantiate().unwrap().into_route().unwrap();
        assert!(route.uri.is_none());
    }

    #[test]
    fn unknown_verb_is_rejected() {
        let decl = Declaration::raw("Route", r#"{"method": "fetch"}"#);
        assert!(matches!(
            decl.instantiate(),
            Err(AttributeError::InvalidMethod(m)) if m == "fetch"
        ));
    }

    #[test]
    fn unknown_argument_is_malformed() {
        let decl = Declaration::raw("Route", r#"{"verb": "get"}"#);
        assert!(matches!(
            decl.instantiate(),
            Err(AttributeError::Malformed { .. })
        ));
    }

    #[test]
    fn broken_regex_is_rejected() {
        let decl = Declaration::raw("Where", r#"{"param": "id", "constraint": "[0-9"}"#);
        assert!(matches!(
            decl.instantiate(),
            Err(AttributeError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn where_in_escapes_values() {
        let decl = Declaration::raw("WhereIn", r#"{"param": "ext", "values": ["a.b", "c"]}"#);
        let w = decl.instantiate().unwrap().into_where().unwrap();
        assert_eq!(w.constraint, "a\\.b|c");
    }

    #[test]
    fn shorthand_kinds_share_a_family() {
        assert_eq!(
            Declaration::raw("WhereUuid", "{}").family(),
            Some(AttributeFamily::Where)
        );
        assert_eq!(
            Declaration::raw("ApiResource", "{}").family(),
            Some(AttributeFamily::Resource)
        );
        assert_eq!(Declaration::raw("Nope", "{}").family(), None);
    }

    #[test]
    fn api_resource_kind_forces_api_mode() {
        let decl = Declaration::raw("ApiResource", r#"{"name": "photos", "only": "index"}"#);
        match decl.instantiate().unwrap() {
            Attribute::Resource(resource) => {
                assert!(resource.api);
                assert_eq!(resource.only, Some(vec!["index".to_string()]));
            }
            other => panic!("unexpected attribute {other:?}"),
        }
    }

    #[test]
    fn typed_declarations_are_validated_too() {
        let decl = Declaration::of(Route::get("a").full_uri("/b"));
        assert!(matches!(decl.instantiate(), Err(AttributeError::Invalid(_))));
    }
}
