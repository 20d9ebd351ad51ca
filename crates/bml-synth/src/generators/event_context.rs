//! Generator for the event context handed to handlers and actions.

use bml_ast::{CallExpr, ComponentDecl, Ident};
use bml_core::ComponentKind;
use bml_target::Expr;

use super::component::instantiate;
use super::{Generator, field_getter, method_args};
use crate::context::Result;
use crate::expr::ExprLowerer;

/// Replies go through the runtime's `MessageHelper` rather than the context
/// object itself.
#[derive(Debug, Clone, Copy)]
pub struct EventContextGenerator;

impl Generator for EventContextGenerator {
    fn kind(&self) -> ComponentKind {
        ComponentKind::EventContext
    }

    fn generate_component_instantiation(
        &self,
        decl: &ComponentDecl<'_>,
        lowerer: &mut ExprLowerer<'_, '_>,
    ) -> Result<Expr> {
        instantiate(self.kind(), decl, lowerer)
    }

    fn generate_field_access(&self, receiver: Expr, field: &Ident<'_>) -> Result<Expr> {
        field_getter(self.kind(), receiver, field)
    }

    fn generate_function_call(
        &self,
        receiver: Expr,
        call: &CallExpr<'_>,
        lowerer: &mut ExprLowerer<'_, '_>,
    ) -> Result<Expr> {
        let mut args = method_args(self.kind(), call, lowerer)?;
        if call.name.name == "reply" {
            lowerer.ctx().require("MessageHelper");
            args.insert(0, receiver);
            return Ok(Expr::static_call("MessageHelper", "sendReply", args));
        }
        Ok(Expr::call(receiver, call.name.name, args))
    }
}
