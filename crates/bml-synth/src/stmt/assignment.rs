//! Assignment lowering.
//!
//! How an assignment is written depends on where the target lives:
//!
//! | target | `=` | `op=` |
//! |---|---|---|
//! | new binding | `T name = value;` | rejected |
//! | thread-shared global | `name.setRelease(value)` | `name.accumulateAndGet(value, (a, b) -> a op b)` |
//! | dialogue field | `recv.setName(value)` | `recv.setName(recv.getName() op (value))` |
//! | other global or local | `name = value` | `name op= value` |
//!
//! Only number globals support the atomic compound form; `op=` on a boolean
//! global is rejected.

use bml_ast::{AssignOp, Assignment};
use bml_core::{BmlType, SynthesisError};
use bml_target::{self as java, AssignOperator};

use super::{Result, StmtLowerer};
use crate::context::{Binding, capitalize};
use crate::expr::operators::binary_operator;
use crate::generators::getter_name;

pub(crate) fn setter_name(field: &str) -> String {
    format!("set{}", capitalize(field))
}

fn assign_operator(op: AssignOp) -> AssignOperator {
    match op {
        AssignOp::Assign => AssignOperator::Assign,
        AssignOp::AddAssign => AssignOperator::Plus,
        AssignOp::SubAssign => AssignOperator::Minus,
        AssignOp::MulAssign => AssignOperator::Multiply,
        AssignOp::DivAssign => AssignOperator::Divide,
        AssignOp::ModAssign => AssignOperator::Remainder,
    }
}

impl<'c, 'a> StmtLowerer<'c, 'a> {
    pub(super) fn lower_assignment(&mut self, assignment: &Assignment<'_>) -> Result<java::Stmt> {
        let name = assignment.target.name;
        let span = assignment.span;

        if assignment.declares {
            if assignment.op.is_compound() {
                return Err(SynthesisError::unsupported(
                    format!("'{}' declared with compound assignment '{}'", name, assignment.op),
                    span,
                ));
            }
            let ty = self.ctx().target_type(assignment.value.ty, assignment.value.span)?;
            let value = self.lower_expr(assignment.value)?;
            return Ok(java::Stmt::local(ty, name, value));
        }

        let value = self.lower_expr(assignment.value)?;
        let ctx = self.ctx();
        let expr = match ctx.binding(name, assignment.target.span)? {
            Binding::SharedGlobal(symbol) => {
                let storage = ctx.global_ref(symbol);
                match assignment.op.binary_op() {
                    None => java::Expr::call(storage, "setRelease", vec![value]),
                    Some(_) if matches!(ctx.registry().get(symbol.ty), Some(BmlType::Boolean)) => {
                        return Err(SynthesisError::unsupported(
                            format!("compound assignment '{}' to boolean global '{}'", assignment.op, name),
                            span,
                        ));
                    }
                    Some(op) => {
                        let left = ctx.fresh_name("a");
                        ctx.push_synthetic(left.clone());
                        let right = ctx.fresh_name("b");
                        ctx.pop_synthetic();
                        let combine = java::Expr::binary(
                            java::Expr::name(left.as_str()),
                            binary_operator(op),
                            java::Expr::name(right.as_str()),
                        );
                        let update = java::Expr::lambda(&[left.as_str(), right.as_str()], combine);
                        java::Expr::call(storage, "accumulateAndGet", vec![value, update])
                    }
                }
            }
            Binding::DialogueField(_) => {
                let receiver = ctx.automaton_receiver(name, assignment.target.span)?;
                let value = match assignment.op.binary_op() {
                    None => value,
                    Some(op) => java::Expr::binary(
                        java::Expr::call(receiver.clone(), getter_name(name), Vec::new()),
                        binary_operator(op),
                        java::Expr::enclosed(value),
                    ),
                };
                java::Expr::call(receiver, setter_name(name), vec![value])
            }
            Binding::Global(symbol) => {
                java::Expr::assign(ctx.global_ref(symbol), assign_operator(assignment.op), value)
            }
            Binding::Local(_) => {
                java::Expr::assign(java::Expr::name(name), assign_operator(assignment.op), value)
            }
        };
        Ok(java::Stmt::Expr(expr))
    }
}
