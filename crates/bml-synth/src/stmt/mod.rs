//! Statement lowering.
//!
//! The [`StmtLowerer`] turns annotated BML statements into Java statements:
//! - Blocks, with their scope pushed for the duration of the block
//! - Assignments, split by where the target is stored
//! - If/else
//! - For-each over lists and maps
//!
//! # Example
//!
//! ```ignore
//! let mut lowerer = StmtLowerer::new(&mut ctx);
//! let body = lowerer.lower_block(&function.body)?;
//! ```

mod assignment;
mod block;
mod foreach_stmt;
mod if_stmt;

use bml_ast::{Expr, FunctionDef, Stmt, StmtKind};
use bml_target as java;

use crate::context::{Result, SynthesisContext};
use crate::expr::ExprLowerer;

pub(crate) use assignment::setter_name;

/// Lowers statements against a borrowed [`SynthesisContext`].
pub struct StmtLowerer<'c, 'a> {
    ctx: &'c mut SynthesisContext<'a>,
}

impl<'c, 'a> StmtLowerer<'c, 'a> {
    pub fn new(ctx: &'c mut SynthesisContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn ctx(&mut self) -> &mut SynthesisContext<'a> {
        self.ctx
    }

    /// Lower a statement with its scope pushed.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn lower(&mut self, stmt: &Stmt<'_>) -> Result<java::Stmt> {
        self.ctx
            .with_scope(stmt.scope, |ctx| StmtLowerer::new(ctx).lower_kind(stmt))
    }

    fn lower_kind(&mut self, stmt: &Stmt<'_>) -> Result<java::Stmt> {
        match stmt.kind {
            StmtKind::Block(block) => Ok(java::Stmt::Block(self.lower_block(&block)?)),
            StmtKind::If(if_stmt) => self.lower_if(if_stmt),
            StmtKind::ForEach(for_each) => self.lower_for_each(for_each, stmt.span),
            StmtKind::Assign(assignment) => self.lower_assignment(assignment),
            StmtKind::Expr(expr) => Ok(java::Stmt::Expr(self.lower_expr(expr)?)),
        }
    }

    fn lower_expr(&mut self, expr: &Expr<'_>) -> Result<java::Expr> {
        ExprLowerer::new(self.ctx).lower(expr)
    }
}

/// Lower the body of a handler, action or dialogue function.
pub fn lower_function_body(ctx: &mut SynthesisContext<'_>, function: &FunctionDef<'_>) -> Result<java::Block> {
    ctx.with_scope(function.scope, |ctx| StmtLowerer::new(ctx).lower_block(&function.body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthesisConfig;
    use crate::context::Site;
    use bml_ast::{AssignOp, AstBuilder, BinaryOp};
    use bml_core::{BmlType, ScopeId, ScopeKind, ScopeTree, SynthesisError, primitives};
    use bml_registry::TypeRegistry;
    use bumpalo::Bump;

    struct Fixture {
        tree: ScopeTree,
        registry: TypeRegistry,
        config: SynthesisConfig,
        global: ScopeId,
        dialogue: ScopeId,
        function: ScopeId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut tree = ScopeTree::new();
            let global = tree.add_scope(ScopeKind::Global, None);
            let dialogue = tree.add_scope(ScopeKind::Dialogue, Some(global));
            let function = tree.add_scope(ScopeKind::Function, Some(dialogue));
            Self {
                tree,
                registry: TypeRegistry::with_builtins(),
                config: SynthesisConfig::default(),
                global,
                dialogue,
                function,
            }
        }

        fn lower(&self, site: Site, stmt: &Stmt<'_>) -> Result<String> {
            let mut ctx = SynthesisContext::new(&self.tree, &self.registry, &self.config, self.global);
            ctx.stack_mut().enter_dialogue(self.dialogue);
            ctx.with_site(site, |ctx| StmtLowerer::new(ctx).lower(stmt))
                .map(|s| s.to_string())
        }
    }

    #[test]
    fn assignments_follow_storage() {
        let mut fx = Fixture::new();
        fx.tree.define(fx.global, "count", primitives::NUMBER);
        fx.tree.define(fx.global, "motd", primitives::STRING);
        fx.tree.define(fx.dialogue, "topic", primitives::STRING);
        fx.tree.define(fx.function, "local", primitives::NUMBER);
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = fx.function;

        let declare = b.assign("local", AssignOp::Assign, b.int(1), true, f);
        assert_eq!(fx.lower(Site::Action, &declare).unwrap(), "long local = 1L;");

        let set = b.assign("count", AssignOp::Assign, b.int(5), false, f);
        assert_eq!(fx.lower(Site::Action, &set).unwrap(), "EventHandlers.count.setRelease(5L);");

        let add = b.assign("count", AssignOp::AddAssign, b.int(2), false, f);
        assert_eq!(
            fx.lower(Site::Action, &add).unwrap(),
            "EventHandlers.count.accumulateAndGet(2L, (a, b) -> a + b);"
        );

        let topic = b.assign("topic", AssignOp::Assign, b.string("x"), false, f);
        assert_eq!(
            fx.lower(Site::Action, &topic).unwrap(),
            "dialogueAutomaton.setTopic(\"x\");"
        );

        let append = b.assign("topic", AssignOp::AddAssign, b.string("!"), false, f);
        assert_eq!(
            fx.lower(Site::Automaton, &append).unwrap(),
            "this.setTopic(this.getTopic() + (\"!\"));"
        );

        let motd = b.assign("motd", AssignOp::AddAssign, b.string("!"), false, f);
        assert_eq!(fx.lower(Site::Handlers, &motd).unwrap(), "motd += \"!\";");

        let local = b.assign("local", AssignOp::MulAssign, b.int(3), false, f);
        assert_eq!(fx.lower(Site::Action, &local).unwrap(), "local *= 3L;");
    }

    #[test]
    fn compound_on_boolean_global_is_unsupported() {
        let mut fx = Fixture::new();
        fx.tree.define(fx.global, "flag", primitives::BOOLEAN);
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let stmt = b.assign("flag", AssignOp::AddAssign, b.bool(true), false, fx.function);
        assert!(matches!(
            fx.lower(Site::Handlers, &stmt),
            Err(SynthesisError::Unsupported { .. })
        ));

        let declare = b.assign("fresh", AssignOp::AddAssign, b.int(1), true, fx.function);
        assert!(matches!(
            fx.lower(Site::Handlers, &declare),
            Err(SynthesisError::Unsupported { .. })
        ));
    }

    #[test]
    fn map_iteration_binds_key_then_value() {
        let mut fx = Fixture::new();
        let map_ty = fx.registry.canonicalize(&BmlType::Map {
            key: primitives::STRING,
            value: primitives::NUMBER,
        });
        let body_scope = fx.tree.add_scope(ScopeKind::Block, Some(fx.function));
        fx.tree.define(fx.function, "scores", map_ty);
        fx.tree.define(body_scope, "name", primitives::STRING);
        fx.tree.define(body_scope, "score", primitives::NUMBER);
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let print = b.expr_stmt(b.call("log", &[b.var("name", primitives::STRING)], primitives::VOID), body_scope);
        let body = b.block(&[print], body_scope);
        let stmt = b.for_each("name", Some("score"), b.var("scores", map_ty), body, fx.function);

        let java = fx.lower(Site::Handlers, &stmt).unwrap();
        assert_eq!(
            java,
            "for (var entry : scores.entrySet()) {\n    var name = entry.getKey();\n    var score = entry.getValue();\n    log(name);\n}"
        );
    }

    #[test]
    fn map_iteration_avoids_shadowed_entry_name() {
        let mut fx = Fixture::new();
        let map_ty = fx.registry.canonicalize(&BmlType::Map {
            key: primitives::STRING,
            value: primitives::STRING,
        });
        let body_scope = fx.tree.add_scope(ScopeKind::Block, Some(fx.function));
        fx.tree.define(fx.function, "entry", map_ty);
        fx.tree.define(body_scope, "k", primitives::STRING);
        fx.tree.define(body_scope, "v", primitives::STRING);
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let body = b.block(&[], body_scope);
        let stmt = b.for_each("k", Some("v"), b.var("entry", map_ty), body, fx.function);
        let java = fx.lower(Site::Handlers, &stmt).unwrap();
        assert!(java.starts_with("for (var entry1 : entry.entrySet()) {"));
        assert!(java.contains("var k = entry1.getKey();"));
    }

    #[test]
    fn iteration_shape_must_match_collection() {
        let mut fx = Fixture::new();
        let list_ty = fx.registry.canonicalize(&BmlType::List(primitives::STRING));
        fx.tree.define(fx.function, "names", list_ty);
        fx.tree.define(fx.function, "title", primitives::STRING);
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = fx.function;

        let ok = b.for_each("n", None, b.var("names", list_ty), b.block(&[], f), f);
        assert_eq!(fx.lower(Site::Handlers, &ok).unwrap(), "for (var n : names) {\n}");

        let pair = b.for_each("n", Some("m"), b.var("names", list_ty), b.block(&[], f), f);
        assert!(matches!(fx.lower(Site::Handlers, &pair), Err(SynthesisError::InvalidOperand { .. })));

        let scalar = b.for_each("c", None, b.var("title", primitives::STRING), b.block(&[], f), f);
        assert!(matches!(fx.lower(Site::Handlers, &scalar), Err(SynthesisError::InvalidOperand { .. })));
    }

    #[test]
    fn if_else_chains() {
        let mut fx = Fixture::new();
        fx.tree.define(fx.function, "n", primitives::NUMBER);
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = fx.function;

        let cond = b.binary(b.var("n", primitives::NUMBER), BinaryOp::Greater, b.int(0), primitives::BOOLEAN);
        let then_branch = b.block_stmt(b.block(&[b.assign("n", AssignOp::Assign, b.int(0), false, f)], f));
        let stmt = b.if_stmt(cond, then_branch, None, f);
        assert_eq!(
            fx.lower(Site::Handlers, &stmt).unwrap(),
            "if (n > 0L) {\n    n = 0L;\n}"
        );
    }
}
