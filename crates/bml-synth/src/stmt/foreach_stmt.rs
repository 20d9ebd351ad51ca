//! For-each lowering.
//!
//! Lists iterate their elements directly. Maps iterate `entrySet()` through a
//! synthetic entry binding and unpack it at the top of the body:
//!
//! ```text
//! for (var entry : map.entrySet()) {
//!     var key = entry.getKey();
//!     var value = entry.getValue();
//!     ...
//! }
//! ```
//!
//! The entry name is `entry` unless that would shadow a name visible in the
//! body, in which case `entry1`, `entry2`, ... is used.

use bml_ast::ForEachStmt;
use bml_core::{BmlType, Span, SynthesisError};
use bml_target::{self as java, TypeRef};

use super::{Result, StmtLowerer};

impl<'c, 'a> StmtLowerer<'c, 'a> {
    pub(super) fn lower_for_each(&mut self, for_each: &ForEachStmt<'_>, span: Span) -> Result<java::Stmt> {
        let iterable_ty = for_each.iterable.ty;
        let is_map = match self.ctx().bml_type(iterable_ty, for_each.iterable.span)? {
            BmlType::List(_) => false,
            BmlType::Map { .. } => true,
            _ => {
                let type_name = self.ctx().registry().type_name(iterable_ty);
                return Err(SynthesisError::InvalidOperand {
                    message: format!("cannot iterate over a value of type '{}'", type_name),
                    span: for_each.iterable.span,
                });
            }
        };

        let iterable = self.lower_expr(for_each.iterable)?;

        match (is_map, for_each.value) {
            (false, None) => {
                let body = self.lower_block(&for_each.body)?;
                Ok(java::Stmt::ForEach {
                    ty: TypeRef::Var,
                    name: for_each.key.name.to_string(),
                    iterable,
                    body,
                })
            }
            (true, Some(value)) => {
                let entry = self
                    .ctx()
                    .with_scope(for_each.body.scope, |ctx| Ok(ctx.fresh_name("entry")))?;

                self.ctx().push_synthetic(entry.clone());
                let body = self.lower_block(&for_each.body);
                self.ctx().pop_synthetic();
                let mut body = body?;

                let entry_ref = java::Expr::name(entry.as_str());
                body.prepend(vec![
                    java::Stmt::var(for_each.key.name, java::Expr::call(entry_ref.clone(), "getKey", Vec::new())),
                    java::Stmt::var(value.name, java::Expr::call(entry_ref, "getValue", Vec::new())),
                ]);

                Ok(java::Stmt::ForEach {
                    ty: TypeRef::Var,
                    name: entry,
                    iterable: java::Expr::call(iterable, "entrySet", Vec::new()),
                    body,
                })
            }
            (false, Some(_)) => Err(SynthesisError::InvalidOperand {
                message: "a list is iterated with a single binding".to_string(),
                span,
            }),
            (true, None) => Err(SynthesisError::InvalidOperand {
                message: "a map is iterated with a key and a value binding".to_string(),
                span,
            }),
        }
    }
}
