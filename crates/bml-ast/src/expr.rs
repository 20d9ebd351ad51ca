//! Expression nodes.
//!
//! Every [`Expr`] carries the [`TypeHash`] the semantic pass resolved for it.
//! The synthesizer relies on that hash, not on the shape of the syntax, to
//! decide which code to emit.

use bml_core::{Span, TypeHash};

use crate::ops::{BinaryOp, UnaryOp};

/// An identifier as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// A typed expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expr<'ast> {
    pub kind: ExprKind<'ast>,
    /// Resolved type.
    pub ty: TypeHash,
    pub span: Span,
}

/// The kinds of expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExprKind<'ast> {
    Literal(Literal<'ast>),
    Ident(Ident<'ast>),
    /// Parenthesized expression
    Paren(&'ast Expr<'ast>),
    /// Field access (`receiver.field`)
    Member(&'ast MemberExpr<'ast>),
    /// Method call (`receiver.name(args)`)
    MethodCall(&'ast MethodCallExpr<'ast>),
    /// Free function call (`name(args)`)
    Call(&'ast CallExpr<'ast>),
    /// Indexing (`target[index]`)
    Index(&'ast IndexExpr<'ast>),
    Unary(&'ast UnaryExpr<'ast>),
    Binary(&'ast BinaryExpr<'ast>),
    /// Conditional (`cond ? a : b`)
    Ternary(&'ast TernaryExpr<'ast>),
    /// List literal (`[a, b, c]`)
    ListInit(&'ast [Expr<'ast>]),
    /// Map literal (`{a = 1, b = 2}`)
    MapInit(&'ast [ElementExprPair<'ast>]),
}

/// Literal values. String literals are stored without their quotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'ast> {
    Int(i64),
    Float(f64),
    String(&'ast str),
    Bool(bool),
}

/// `name = expr`, as used by bot-head parameters, component parameters and
/// map literals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementExprPair<'ast> {
    pub name: Ident<'ast>,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberExpr<'ast> {
    pub receiver: &'ast Expr<'ast>,
    pub field: Ident<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub name: Ident<'ast>,
    pub args: &'ast [Argument<'ast>],
    pub span: Span,
}

/// A call argument, optionally named (`intent = "greet"`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Argument<'ast> {
    pub name: Option<Ident<'ast>>,
    pub value: &'ast Expr<'ast>,
}

impl<'ast> CallExpr<'ast> {
    /// Find a named argument.
    pub fn arg(&self, name: &str) -> Option<&'ast Expr<'ast>> {
        self.args
            .iter()
            .find(|a| a.name.is_some_and(|n| n.name == name))
            .map(|a| a.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodCallExpr<'ast> {
    pub receiver: &'ast Expr<'ast>,
    pub call: CallExpr<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    pub target: &'ast Expr<'ast>,
    pub index: &'ast Expr<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: &'ast Expr<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TernaryExpr<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_expr: &'ast Expr<'ast>,
    pub else_expr: &'ast Expr<'ast>,
}

impl<'ast> Expr<'ast> {
    /// Short description of the node kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ExprKind::Literal(_) => "literal",
            ExprKind::Ident(_) => "identifier",
            ExprKind::Paren(_) => "parenthesized expression",
            ExprKind::Member(_) => "field access",
            ExprKind::MethodCall(_) => "method call",
            ExprKind::Call(_) => "function call",
            ExprKind::Index(_) => "index expression",
            ExprKind::Unary(_) => "unary expression",
            ExprKind::Binary(_) => "binary expression",
            ExprKind::Ternary(_) => "conditional expression",
            ExprKind::ListInit(_) => "list literal",
            ExprKind::MapInit(_) => "map literal",
        }
    }

    /// The call node if this is a free function call.
    pub fn as_call(&self) -> Option<&'ast CallExpr<'ast>> {
        match self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }
}
