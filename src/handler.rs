//! Introspected shape of a handler: its identity, its methods and their
//! parameters, and the declarations attached to each.
//!
//! Definitions are normally produced by the `#[route_handler]` macro, but
//! they are plain data and can be assembled by hand with the builder methods.

use crate::attributes::{Attribute, AttributeError, AttributeFamily, Declaration};

/// Method name that makes a handler invocable as a whole.
pub const INVOKE_METHOD: &str = "__invoke";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// One method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    /// The parameter is bound to a persistence model; conventions turn it
    /// into a `{name}` path segment.
    pub is_model: bool,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            type_name: type_name.into(),
            is_model: false,
        }
    }

    #[must_use]
    pub fn model(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Parameter {
            is_model: true,
            ..Parameter::new(name, type_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    pub name: String,
    pub visibility: Visibility,
    pub parameters: Vec<Parameter>,
    pub declarations: Vec<Declaration>,
}

impl MethodDefinition {
    /// A public method with no parameters and no declarations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        MethodDefinition {
            name: name.into(),
            visibility: Visibility::Public,
            parameters: Vec::new(),
            declarations: Vec::new(),
        }
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn declare(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Declarations of `family`, instantiated in declaration order.
    pub fn declarations(
        &self,
        family: AttributeFamily,
    ) -> impl Iterator<Item = Result<Attribute, AttributeError>> + '_ {
        of_family(&self.declarations, family)
    }

    /// First parameter bound to a persistence model.
    #[must_use]
    pub fn model_parameter(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.is_model)
    }
}

/// A handler type: a module path, a type name, handler-level declarations
/// and the methods discovery may turn into routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDefinition {
    pub module: String,
    pub name: String,
    pub declarations: Vec<Declaration>,
    pub methods: Vec<MethodDefinition>,
}

impl HandlerDefinition {
    #[must_use]
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        HandlerDefinition {
            module: module.into(),
            name: name.into(),
            declarations: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Fully-qualified identifier, `module::Name`.
    #[must_use]
    pub fn id(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.module, self.name)
        }
    }

    #[must_use]
    pub fn declare(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    pub fn declarations(
        &self,
        family: AttributeFamily,
    ) -> impl Iterator<Item = Result<Attribute, AttributeError>> + '_ {
        of_family(&self.declarations, family)
    }
}

fn of_family(
    declarations: &[Declaration],
    family: AttributeFamily,
) -> impl Iterator<Item = Result<Attribute, AttributeError>> + '_ {
    declarations
        .iter()
        .filter(move |d| d.family() == Some(family))
        .map(Declaration::instantiate)
}

/// Implemented by `#[route_handler]` for every annotated handler type.
pub trait RouteHandler {
    /// Module the handler lives in (`module_path!()` at the declaration site).
    const MODULE: &'static str;
    /// Type name of the handler.
    const NAME: &'static str;

    fn definition() -> HandlerDefinition;
}
