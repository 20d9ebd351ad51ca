//! Member access, calls and indexing.
//!
//! Receivers of component type are delegated to their generator; other
//! receivers are lowered structurally.

use bml_ast::{CallExpr, Expr, IndexExpr, MemberExpr, MethodCallExpr};
use bml_core::{BmlType, SynthesisError};
use bml_target as java;

use super::ExprLowerer;
use crate::context::Result;

pub fn lower_member(lowerer: &mut ExprLowerer<'_, '_>, member: &MemberExpr<'_>) -> Result<java::Expr> {
    let receiver_ty = member.receiver.ty;
    let receiver = lowerer.lower(member.receiver)?;

    let ctx = lowerer.ctx();
    if ctx.generators().has_generator(ctx.registry(), receiver_ty) {
        let generator = ctx
            .generators()
            .generator_for(ctx.registry(), receiver_ty, member.receiver.span)?;
        return generator.generate_field_access(receiver, &member.field);
    }
    Ok(java::Expr::field(receiver, member.field.name))
}

pub fn lower_method_call(
    lowerer: &mut ExprLowerer<'_, '_>,
    method: &MethodCallExpr<'_>,
) -> Result<java::Expr> {
    let receiver_ty = method.receiver.ty;
    let receiver = lowerer.lower(method.receiver)?;

    let ctx = lowerer.ctx();
    if ctx.generators().has_generator(ctx.registry(), receiver_ty) {
        let generator = ctx
            .generators()
            .generator_for(ctx.registry(), receiver_ty, method.receiver.span)?;
        return generator.generate_function_call(receiver, &method.call, lowerer);
    }
    let args = lowerer.lower_args(method.call.args)?;
    Ok(java::Expr::call(receiver, method.call.name.name, args))
}

/// A free call. State-producing calls are only lowered by the dialogue
/// synthesizer, never as plain values.
pub fn lower_call(
    lowerer: &mut ExprLowerer<'_, '_>,
    call: &CallExpr<'_>,
    expr: &Expr<'_>,
) -> Result<java::Expr> {
    if let BmlType::State(_) = lowerer.ctx().bml_type(expr.ty, expr.span)? {
        return Err(SynthesisError::unsupported(
            format!("state '{}(...)' outside a dialogue assignment or transition", call.name.name),
            expr.span,
        ));
    }
    let args = lowerer.lower_args(call.args)?;
    Ok(java::Expr::bare_call(call.name.name, args))
}

pub fn lower_index(lowerer: &mut ExprLowerer<'_, '_>, index: &IndexExpr<'_>) -> Result<java::Expr> {
    let target_ty = lowerer.ctx().bml_type(index.target.ty, index.target.span)?;
    if !target_ty.is_collection() {
        let type_name = lowerer.ctx().registry().type_name(index.target.ty);
        return Err(SynthesisError::InvalidOperand {
            message: format!("cannot index a value of type '{}'", type_name),
            span: index.target.span,
        });
    }
    let is_list = matches!(target_ty, BmlType::List(_));
    let target = lowerer.lower(index.target)?;
    let key = lowerer.lower(index.index)?;
    let key = if is_list { list_position(key) } else { key };
    Ok(java::Expr::call(target, "get", vec![key]))
}

/// `List.get` takes an `int`; numbers are `long`.
fn list_position(key: java::Expr) -> java::Expr {
    match key {
        java::Expr::LongLit(value) if i32::try_from(value).is_ok() => java::Expr::IntLit(value),
        other => java::Expr::static_call("Math", "toIntExact", vec![other]),
    }
}
