//! Statement nodes.
//!
//! Each statement records the scope the semantic pass attached to it, so the
//! synthesizer can keep its own scope stack in step with the tree.

use bml_core::{ScopeId, Span};

use crate::expr::{Expr, Ident};
use crate::ops::AssignOp;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stmt<'ast> {
    pub kind: StmtKind<'ast>,
    pub scope: ScopeId,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StmtKind<'ast> {
    Block(Block<'ast>),
    If(&'ast IfStmt<'ast>),
    ForEach(&'ast ForEachStmt<'ast>),
    Assign(&'ast Assignment<'ast>),
    /// Expression evaluated for its side effects.
    Expr(&'ast Expr<'ast>),
}

/// `{ ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub scope: ScopeId,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_branch: &'ast Stmt<'ast>,
    pub else_branch: Option<&'ast Stmt<'ast>>,
}

/// `for key in iterable { }` or `for key, value in map { }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForEachStmt<'ast> {
    /// List element, or map key.
    pub key: Ident<'ast>,
    /// Map value; present only when iterating a map.
    pub value: Option<Ident<'ast>>,
    pub iterable: &'ast Expr<'ast>,
    pub body: Block<'ast>,
}

/// `name op= value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment<'ast> {
    pub target: Ident<'ast>,
    pub op: AssignOp,
    pub value: &'ast Expr<'ast>,
    /// Set by the semantic pass on the assignment that first binds `target`.
    pub declares: bool,
    pub span: Span,
}
