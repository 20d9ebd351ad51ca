//! Expression lowering.
//!
//! The [`ExprLowerer`] turns annotated BML expressions into Java expressions.
//! The resolved [`TypeHash`](bml_core::TypeHash) on each node decides what is
//! emitted: component-typed receivers are handed to their
//! [`Generator`](crate::generators::Generator), identifiers are classified by
//! [`SynthesisContext::binding`] and everything else maps structurally.
//!
//! # Example
//!
//! ```ignore
//! let mut lowerer = ExprLowerer::new(&mut ctx);
//! let java = lowerer.lower(expr)?;
//! ```

mod calls;
mod collections;
mod identifiers;
mod literals;
pub(crate) mod operators;

use bml_ast::{Argument, Expr, ExprKind};
use bml_target as java;

use crate::context::{Result, SynthesisContext};

/// Lowers expressions against a borrowed [`SynthesisContext`].
pub struct ExprLowerer<'c, 'a> {
    ctx: &'c mut SynthesisContext<'a>,
}

impl<'c, 'a> ExprLowerer<'c, 'a> {
    pub fn new(ctx: &'c mut SynthesisContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn ctx(&mut self) -> &mut SynthesisContext<'a> {
        self.ctx
    }

    /// Lower one expression.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn lower(&mut self, expr: &Expr<'_>) -> Result<java::Expr> {
        match expr.kind {
            ExprKind::Literal(literal) => Ok(literals::lower_literal(literal)),
            ExprKind::Ident(ident) => identifiers::lower_ident(self, &ident),
            ExprKind::Paren(inner) => Ok(java::Expr::enclosed(self.lower(inner)?)),
            ExprKind::Member(member) => calls::lower_member(self, member),
            ExprKind::MethodCall(call) => calls::lower_method_call(self, call),
            ExprKind::Call(call) => calls::lower_call(self, call, expr),
            ExprKind::Index(index) => calls::lower_index(self, index),
            ExprKind::Unary(unary) => operators::lower_unary(self, unary),
            ExprKind::Binary(binary) => operators::lower_binary(self, binary),
            ExprKind::Ternary(ternary) => operators::lower_ternary(self, ternary),
            ExprKind::ListInit(elements) => collections::lower_list(self, elements),
            ExprKind::MapInit(pairs) => collections::lower_map(self, pairs),
        }
    }

    /// Lower call arguments in source order. Argument names are dropped.
    pub fn lower_args(&mut self, args: &[Argument<'_>]) -> Result<Vec<java::Expr>> {
        args.iter().map(|arg| self.lower(arg.value)).collect()
    }
}

/// Shorthand for lowering a single expression.
pub fn lower_expr(ctx: &mut SynthesisContext<'_>, expr: &Expr<'_>) -> Result<java::Expr> {
    ExprLowerer::new(ctx).lower(expr)
}
