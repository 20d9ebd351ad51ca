//! Unary, binary and conditional operator lowering.

use bml_ast::{BinaryExpr, BinaryOp, TernaryExpr, UnaryExpr, UnaryOp};
use bml_target::{self as java, BinaryOperator, UnaryOperator};

use super::ExprLowerer;
use crate::context::Result;

pub fn binary_operator(op: BinaryOp) -> BinaryOperator {
    match op {
        BinaryOp::Or => BinaryOperator::Or,
        BinaryOp::And => BinaryOperator::And,
        BinaryOp::Equal => BinaryOperator::Equals,
        BinaryOp::NotEqual => BinaryOperator::NotEquals,
        BinaryOp::Less => BinaryOperator::Less,
        BinaryOp::LessEqual => BinaryOperator::LessEquals,
        BinaryOp::Greater => BinaryOperator::Greater,
        BinaryOp::GreaterEqual => BinaryOperator::GreaterEquals,
        BinaryOp::Add => BinaryOperator::Plus,
        BinaryOp::Sub => BinaryOperator::Minus,
        BinaryOp::Mul => BinaryOperator::Multiply,
        BinaryOp::Div => BinaryOperator::Divide,
        BinaryOp::Mod => BinaryOperator::Remainder,
    }
}

pub fn unary_operator(op: UnaryOp) -> UnaryOperator {
    match op {
        UnaryOp::Not => UnaryOperator::LogicalComplement,
        UnaryOp::Neg => UnaryOperator::Minus,
    }
}

pub fn lower_unary(lowerer: &mut ExprLowerer<'_, '_>, unary: &UnaryExpr<'_>) -> Result<java::Expr> {
    let operand = lowerer.lower(unary.operand)?;
    Ok(java::Expr::unary(unary_operator(unary.op), operand))
}

pub fn lower_binary(lowerer: &mut ExprLowerer<'_, '_>, binary: &BinaryExpr<'_>) -> Result<java::Expr> {
    let left = lowerer.lower(binary.left)?;
    let right = lowerer.lower(binary.right)?;
    Ok(java::Expr::binary(left, binary_operator(binary.op), right))
}

pub fn lower_ternary(lowerer: &mut ExprLowerer<'_, '_>, ternary: &TernaryExpr<'_>) -> Result<java::Expr> {
    Ok(java::Expr::Conditional {
        condition: Box::new(lowerer.lower(ternary.condition)?),
        then_expr: Box::new(lowerer.lower(ternary.then_expr)?),
        else_expr: Box::new(lowerer.lower(ternary.else_expr)?),
    })
}
