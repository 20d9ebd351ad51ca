//! If/else lowering.

use bml_ast::IfStmt;
use bml_target as java;

use super::{Result, StmtLowerer};

impl<'c, 'a> StmtLowerer<'c, 'a> {
    pub(super) fn lower_if(&mut self, if_stmt: &IfStmt<'_>) -> Result<java::Stmt> {
        let condition = self.lower_expr(if_stmt.condition)?;
        let then_branch = Box::new(self.lower(if_stmt.then_branch)?);
        let else_branch = match if_stmt.else_branch {
            Some(stmt) => Some(Box::new(self.lower(stmt)?)),
            None => None,
        };
        Ok(java::Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }
}
