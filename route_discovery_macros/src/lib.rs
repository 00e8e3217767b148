//! `#[route_handler]`: records route declarations on an inherent `impl`
//! block and implements `route_discovery::RouteHandler` for the type.
//!
//! Declarations are recorded verbatim as a kind plus JSON arguments. The
//! macro only checks the syntax and the names of arguments it dispatches
//! on; argument values are checked when discovery instantiates them, where a
//! bad one skips that declaration instead of failing the build.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use serde_json::{Map, Value};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    bracketed, parenthesized, parse_macro_input, Attribute, FnArg, Ident, ImplItem, ItemImpl,
    LitBool, LitStr, Meta, Pat, Result as SynResult, Token, Type, Visibility,
};

enum ArgValue {
    Str(String),
    Bool(bool),
    List(Vec<String>),
    Nested(Vec<Arg>),
    Flag,
}

struct Arg {
    key: Ident,
    value: ArgValue,
}

impl Parse for Arg {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let key = Ident::parse_any(input)?;
        let value = if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            if input.peek(LitStr) {
                ArgValue::Str(input.parse::<LitStr>()?.value())
            } else if input.peek(LitBool) {
                ArgValue::Bool(input.parse::<LitBool>()?.value)
            } else if input.peek(syn::token::Bracket) {
                let content;
                bracketed!(content in input);
                let items = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                ArgValue::List(items.into_iter().map(|lit| lit.value()).collect())
            } else {
                return Err(input.error("expected a string, a bool or a list of strings"));
            }
        } else if input.peek(syn::token::Paren) {
            let content;
            parenthesized!(content in input);
            let nested = Punctuated::<Arg, Token![,]>::parse_terminated(&content)?;
            ArgValue::Nested(nested.into_iter().collect())
        } else {
            ArgValue::Flag
        };
        Ok(Arg { key, value })
    }
}

/// `"positional", key = value, key(nested), flag`
struct ArgList {
    positional: Option<LitStr>,
    args: Vec<Arg>,
}

impl Parse for ArgList {
    fn parse(input: ParseStream) -> SynResult<Self> {
        let mut positional = None;
        if input.peek(LitStr) {
            positional = Some(input.parse::<LitStr>()?);
            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }
        let args = Punctuated::<Arg, Token![,]>::parse_terminated(input)?;
        Ok(ArgList {
            positional,
            args: args.into_iter().collect(),
        })
    }
}

fn to_json(value: &ArgValue) -> Value {
    match value {
        ArgValue::Str(s) => Value::String(s.clone()),
        ArgValue::Bool(b) => Value::Bool(*b),
        ArgValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        ArgValue::Nested(args) => Value::Object(object(args)),
        ArgValue::Flag => Value::Bool(true),
    }
}

fn object(args: &[Arg]) -> Map<String, Value> {
    args.iter()
        .map(|arg| (arg.key.unraw().to_string(), to_json(&arg.value)))
        .collect()
}

/// `key = value` stored under `field`, or a nested list taken as the whole
/// argument object.
fn wrap(field: &str, value: &ArgValue) -> Value {
    match value {
        ArgValue::Nested(args) => Value::Object(object(args)),
        other => {
            let mut map = Map::new();
            map.insert(field.to_string(), to_json(other));
            Value::Object(map)
        }
    }
}

/// One recorded declaration: kind and JSON arguments.
struct Decl {
    kind: &'static str,
    args: Value,
}

impl Decl {
    fn tokens(&self) -> TokenStream2 {
        let kind = self.kind;
        let args = self.args.to_string();
        quote! { ::route_discovery::Declaration::raw(#kind, #args) }
    }
}

fn where_kind(name: &str) -> Option<&'static str> {
    Some(match name {
        "constraint" => "Where",
        "where_alpha" => "WhereAlpha",
        "where_alpha_numeric" => "WhereAlphaNumeric",
        "where_number" => "WhereNumber",
        "where_uuid" => "WhereUuid",
        "where_ulid" => "WhereUlid",
        "where_in" => "WhereIn",
        _ => return None,
    })
}

fn route_kind(name: &str) -> Option<&'static str> {
    Some(match name {
        "route" => "Route",
        "get" => "Get",
        "post" => "Post",
        "put" => "Put",
        "patch" => "Patch",
        "delete" => "Delete",
        "options" => "Options",
        "any" => "Any",
        _ => return None,
    })
}

fn handler_declaration(arg: &Arg) -> SynResult<Decl> {
    let name = arg.key.unraw().to_string();
    let (kind, args) = match name.as_str() {
        "prefix" => ("Prefix", wrap("prefix", &arg.value)),
        "domain" => ("Domain", wrap("domain", &arg.value)),
        "domain_from_config" => ("DomainFromConfig", wrap("key", &arg.value)),
        "middleware" => ("Middleware", wrap("middleware", &arg.value)),
        "group" => ("Group", wrap("prefix", &arg.value)),
        "resource" => ("Resource", wrap("name", &arg.value)),
        "api_resource" => ("ApiResource", wrap("name", &arg.value)),
        "do_not_discover" => ("DoNotDiscover", Value::Object(Map::new())),
        other => match where_kind(other) {
            Some(kind) => (kind, wrap("param", &arg.value)),
            None => {
                return Err(syn::Error::new(
                    arg.key.span(),
                    format!("unknown route_handler argument `{other}`"),
                ))
            }
        },
    };
    Ok(Decl { kind, args })
}

/// Declaration carried by a method attribute, if it is one of ours.
fn method_declaration(attr: &Attribute) -> SynResult<Option<Decl>> {
    let Some(ident) = attr.path().get_ident() else {
        return Ok(None);
    };
    let name = ident.to_string();
    let (kind, positional_field) = if name == "do_not_discover" {
        ("DoNotDiscover", "")
    } else if let Some(kind) = route_kind(&name) {
        (kind, "uri")
    } else if let Some(kind) = where_kind(&name) {
        (kind, "param")
    } else {
        return Ok(None);
    };

    let list = match &attr.meta {
        Meta::Path(_) => ArgList {
            positional: None,
            args: Vec::new(),
        },
        Meta::List(list) => syn::parse2::<ArgList>(list.tokens.clone())?,
        Meta::NameValue(nv) => {
            return Err(syn::Error::new_spanned(
                nv,
                format!("`#[{name} = ..]` is not supported, use `#[{name}(..)]`"),
            ))
        }
    };

    let mut args = object(&list.args);
    if let Some(positional) = list.positional {
        if positional_field.is_empty() {
            return Err(syn::Error::new(
                positional.span(),
                format!("`#[{name}]` takes no positional argument"),
            ));
        }
        args.insert(positional_field.to_string(), Value::String(positional.value()));
    }
    Ok(Some(Decl {
        kind,
        args: Value::Object(args),
    }))
}

fn is_marker(attr: &Attribute, name: &str) -> bool {
    attr.path().is_ident(name)
}

fn type_name(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}

fn self_name(ty: &Type) -> SynResult<String> {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .ok_or_else(|| syn::Error::new_spanned(ty, "expected a named type")),
        other => Err(syn::Error::new_spanned(
            other,
            "#[route_handler] needs an impl block for a named type",
        )),
    }
}

fn expand(args: ArgList, mut item: ItemImpl) -> SynResult<TokenStream2> {
    if let Some(positional) = &args.positional {
        return Err(syn::Error::new(
            positional.span(),
            "#[route_handler] takes named arguments only",
        ));
    }
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[route_handler] goes on an inherent impl block",
        ));
    }

    let handler_decls = args
        .args
        .iter()
        .map(handler_declaration)
        .collect::<SynResult<Vec<_>>>()?;

    let mut methods = Vec::new();
    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };

        let mut decls = Vec::new();
        let mut kept = Vec::with_capacity(method.attrs.len());
        for attr in method.attrs.drain(..) {
            match method_declaration(&attr)? {
                Some(decl) => decls.push(decl),
                None => kept.push(attr),
            }
        }
        method.attrs = kept;

        let mut params = Vec::new();
        for input in &mut method.sig.inputs {
            let FnArg::Typed(pat_type) = input else {
                continue;
            };
            let is_model = pat_type.attrs.iter().any(|a| is_marker(a, "model"));
            pat_type.attrs.retain(|a| !is_marker(a, "model"));
            let param_name = match pat_type.pat.as_ref() {
                Pat::Ident(pat) => pat.ident.unraw().to_string(),
                other => other.to_token_stream().to_string(),
            };
            let param_type = type_name(&pat_type.ty);
            params.push(if is_model {
                quote! { ::route_discovery::Parameter::model(#param_name, #param_type) }
            } else {
                quote! { ::route_discovery::Parameter::new(#param_name, #param_type) }
            });
        }

        let method_name = method.sig.ident.unraw().to_string();
        let private = if matches!(method.vis, Visibility::Public(_)) {
            quote! {}
        } else {
            quote! { .private() }
        };
        let decl_tokens = decls.iter().map(Decl::tokens);
        methods.push(quote! {
            ::route_discovery::MethodDefinition::new(#method_name)
                #private
                #( .param(#params) )*
                #( .declare(#decl_tokens) )*
        });
    }

    let self_ty = &item.self_ty;
    let name = self_name(self_ty)?;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();
    let handler_decl_tokens = handler_decls.iter().map(Decl::tokens);

    Ok(quote! {
        #item

        impl #impl_generics ::route_discovery::RouteHandler for #self_ty #where_clause {
            const MODULE: &'static str = ::core::module_path!();
            const NAME: &'static str = #name;

            fn definition() -> ::route_discovery::HandlerDefinition {
                ::route_discovery::HandlerDefinition::new(
                    <Self as ::route_discovery::RouteHandler>::MODULE,
                    <Self as ::route_discovery::RouteHandler>::NAME,
                )
                #( .declare(#handler_decl_tokens) )*
                #( .method(#methods) )*
            }
        }
    })
}

/// Declare a route handler.
///
/// Handler-level arguments: `prefix = ".."`, `domain = ".."`,
/// `domain_from_config = ".."`, `middleware = [..]`, `group(..)`,
/// `resource(..)` / `api_resource(..)`, `constraint(param = .., pattern = ..)`
/// and the `where_*` shorthands, `do_not_discover`.
///
/// Method attributes: `#[route(..)]` and the verb shorthands (`#[get(..)]`,
/// `#[post(..)]`, ...), `#[constraint(..)]` and `#[where_*(..)]`,
/// `#[do_not_discover]`. Parameters marked `#[model]` bind a `{name}` URI
/// segment. Only `pub` methods produce routes.
#[proc_macro_attribute]
pub fn route_handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ArgList);
    let item = parse_macro_input!(item as ItemImpl);
    expand(args, item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
