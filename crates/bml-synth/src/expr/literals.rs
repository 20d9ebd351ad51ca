//! Literal lowering.

use bml_ast::Literal;
use bml_target as java;

/// Literals map one-to-one. Integral numbers are `long` in the target, so
/// their literals carry the suffix and box to `Long` inside generic calls.
pub fn lower_literal(literal: Literal<'_>) -> java::Expr {
    match literal {
        Literal::Int(value) => java::Expr::LongLit(value),
        Literal::Float(value) => java::Expr::double(value),
        Literal::String(value) => java::Expr::string(value),
        Literal::Bool(value) => java::Expr::BoolLit(value),
    }
}
