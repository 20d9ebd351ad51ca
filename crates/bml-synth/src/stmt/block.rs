//! Block lowering.

use bml_ast::Block;
use bml_target as java;

use super::{Result, StmtLowerer};

impl<'c, 'a> StmtLowerer<'c, 'a> {
    /// Lower a block with its scope pushed.
    pub fn lower_block(&mut self, block: &Block<'_>) -> Result<java::Block> {
        self.ctx().with_scope(block.scope, |ctx| {
            let mut lowerer = StmtLowerer::new(ctx);
            let stmts = block
                .stmts
                .iter()
                .map(|stmt| lowerer.lower(stmt))
                .collect::<Result<Vec<_>>>()?;
            Ok(java::Block::from_stmts(stmts))
        })
    }
}
