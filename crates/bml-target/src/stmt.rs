//! Java statements.

use crate::expr::Expr;
use crate::types::TypeRef;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    /// Expression statement.
    Expr(Expr),
    /// `ty name = init;`
    LocalVar {
        ty: TypeRef,
        name: String,
        init: Option<Expr>,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// `for (ty name : iterable) body`
    ForEach {
        ty: TypeRef,
        name: String,
        iterable: Expr,
        body: Block,
    },
    Block(Block),
    Return(Option<Expr>),
}

impl Stmt {
    pub fn local(ty: TypeRef, name: impl Into<String>, init: Expr) -> Self {
        Stmt::LocalVar {
            ty,
            name: name.into(),
            init: Some(init),
        }
    }

    /// `var name = init;`
    pub fn var(name: impl Into<String>, init: Expr) -> Self {
        Stmt::local(TypeRef::Var, name, init)
    }
}

impl From<Expr> for Stmt {
    fn from(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }
}

/// A braced statement list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stmts(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn push(&mut self, stmt: impl Into<Stmt>) {
        self.stmts.push(stmt.into());
    }

    /// Insert `stmts` ahead of the existing statements, keeping their order.
    pub fn prepend(&mut self, stmts: Vec<Stmt>) {
        self.stmts.splice(0..0, stmts);
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}
