//! Generator for components whose surface is fully described by their
//! field, method and parameter tables.

use bml_ast::{CallExpr, ComponentDecl, Ident};
use bml_core::{ComponentKind, SynthesisError};
use bml_target::{Expr, TypeRef};

use super::{Generator, field_getter, method_args};
use crate::context::Result;
use crate::expr::ExprLowerer;

#[derive(Debug, Clone, Copy)]
pub struct ComponentGenerator {
    kind: ComponentKind,
}

impl ComponentGenerator {
    pub const fn new(kind: ComponentKind) -> Self {
        Self { kind }
    }
}

impl Generator for ComponentGenerator {
    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn generate_component_instantiation(
        &self,
        decl: &ComponentDecl<'_>,
        lowerer: &mut ExprLowerer<'_, '_>,
    ) -> Result<Expr> {
        instantiate(self.kind, decl, lowerer)
    }

    fn generate_field_access(&self, receiver: Expr, field: &Ident<'_>) -> Result<Expr> {
        field_getter(self.kind, receiver, field)
    }

    fn generate_function_call(
        &self,
        receiver: Expr,
        call: &CallExpr<'_>,
        lowerer: &mut ExprLowerer<'_, '_>,
    ) -> Result<Expr> {
        let args = method_args(self.kind, call, lowerer)?;
        Ok(Expr::call(receiver, call.name.name, args))
    }
}

/// `new BotClass(args)` with arguments in parameter-table order; absent
/// optional parameters are passed as `null`.
pub(super) fn instantiate(
    kind: ComponentKind,
    decl: &ComponentDecl<'_>,
    lowerer: &mut ExprLowerer<'_, '_>,
) -> Result<Expr> {
    let component = kind.name();
    if !kind.is_declarable() {
        return Err(SynthesisError::unsupported(
            format!("'{}' components cannot be declared", component),
            decl.span,
        ));
    }

    let parameter_error = |parameter: &str, message: &str, span| SynthesisError::ComponentParameter {
        component: component.to_string(),
        parameter: parameter.to_string(),
        message: message.to_string(),
        span,
    };

    for given in decl.params {
        if !kind.parameters().iter().any(|p| p.name == given.name.name) {
            return Err(parameter_error(given.name.name, "unknown parameter", given.span));
        }
    }

    let mut args = Vec::with_capacity(kind.parameters().len());
    for parameter in kind.parameters() {
        match decl.param(parameter.name) {
            Some(given) => {
                if given.value.ty != parameter.expected {
                    let expected = lowerer.ctx().registry().type_name(parameter.expected);
                    let found = lowerer.ctx().registry().type_name(given.value.ty);
                    return Err(parameter_error(
                        parameter.name,
                        &format!("expected {}, found {}", expected, found),
                        given.span,
                    ));
                }
                args.push(lowerer.lower(given.value)?);
            }
            None if parameter.required => {
                return Err(parameter_error(parameter.name, "missing required parameter", decl.span));
            }
            None => args.push(Expr::Null),
        }
    }

    let class = kind.bot_class();
    lowerer.ctx().require(class);
    Ok(Expr::new_object(TypeRef::class(class), args))
}
