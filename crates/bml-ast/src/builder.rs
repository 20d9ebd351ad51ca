//! Arena builder for annotated program trees.
//!
//! The upstream semantic pass produces trees through this builder, and the
//! synthesizer's tests and benches use it to assemble fixtures. Every node is
//! allocated in the builder's [`Bump`] arena; spans default to
//! [`Span::default`] unless a `*_at` variant is used.

use bumpalo::Bump;

use bml_core::{ScopeId, Span, TypeHash, primitives};

use crate::decl::{
    BotBody, BotHead, ComponentDecl, DialogueAutomaton, FunctionDef, Program, StateRef,
    TransitionTarget, Transitions,
};
use crate::expr::{
    Argument, BinaryExpr, CallExpr, ElementExprPair, Expr, ExprKind, Ident, IndexExpr, Literal,
    MemberExpr, MethodCallExpr, TernaryExpr, UnaryExpr,
};
use crate::ops::{AssignOp, BinaryOp, UnaryOp};
use crate::stmt::{Assignment, Block, ForEachStmt, IfStmt, Stmt, StmtKind};

/// Allocates program-tree nodes in an arena.
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    pub fn alloc<T>(&self, value: T) -> &'ast T {
        self.arena.alloc(value)
    }

    pub fn slice<T: Copy>(&self, items: &[T]) -> &'ast [T] {
        self.arena.alloc_slice_copy(items)
    }

    pub fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.arena.alloc_str(name), Span::default())
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    pub fn expr(&self, kind: ExprKind<'ast>, ty: TypeHash) -> &'ast Expr<'ast> {
        self.expr_at(kind, ty, Span::default())
    }

    pub fn expr_at(&self, kind: ExprKind<'ast>, ty: TypeHash, span: Span) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr { kind, ty, span })
    }

    pub fn int(&self, value: i64) -> &'ast Expr<'ast> {
        self.expr(ExprKind::Literal(Literal::Int(value)), primitives::NUMBER)
    }

    pub fn float(&self, value: f64) -> &'ast Expr<'ast> {
        self.expr(ExprKind::Literal(Literal::Float(value)), primitives::FLOAT)
    }

    pub fn string(&self, value: &str) -> &'ast Expr<'ast> {
        let value = self.arena.alloc_str(value);
        self.expr(ExprKind::Literal(Literal::String(value)), primitives::STRING)
    }

    pub fn bool(&self, value: bool) -> &'ast Expr<'ast> {
        self.expr(ExprKind::Literal(Literal::Bool(value)), primitives::BOOLEAN)
    }

    pub fn var(&self, name: &str, ty: TypeHash) -> &'ast Expr<'ast> {
        self.expr(ExprKind::Ident(self.ident(name)), ty)
    }

    pub fn paren(&self, inner: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(ExprKind::Paren(inner), inner.ty)
    }

    pub fn member(&self, receiver: &'ast Expr<'ast>, field: &str, ty: TypeHash) -> &'ast Expr<'ast> {
        let member = self.arena.alloc(MemberExpr {
            receiver,
            field: self.ident(field),
        });
        self.expr(ExprKind::Member(member), ty)
    }

    fn call_node(&self, name: &str, args: &[Argument<'ast>]) -> CallExpr<'ast> {
        CallExpr {
            name: self.ident(name),
            args: self.slice(args),
            span: Span::default(),
        }
    }

    fn positional(args: &[&'ast Expr<'ast>]) -> Vec<Argument<'ast>> {
        args.iter()
            .map(|&value| Argument { name: None, value })
            .collect()
    }

    /// `name(args)` with positional arguments.
    pub fn call(&self, name: &str, args: &[&'ast Expr<'ast>], ty: TypeHash) -> &'ast Expr<'ast> {
        let call = self.arena.alloc(self.call_node(name, &Self::positional(args)));
        self.expr(ExprKind::Call(call), ty)
    }

    /// `name(a = x, b = y)`.
    pub fn call_named(
        &self,
        name: &str,
        args: &[(&str, &'ast Expr<'ast>)],
        ty: TypeHash,
    ) -> &'ast Expr<'ast> {
        let args: Vec<_> = args
            .iter()
            .map(|&(n, value)| Argument {
                name: Some(self.ident(n)),
                value,
            })
            .collect();
        let call = self.arena.alloc(self.call_node(name, &args));
        self.expr(ExprKind::Call(call), ty)
    }

    pub fn method_call(
        &self,
        receiver: &'ast Expr<'ast>,
        name: &str,
        args: &[&'ast Expr<'ast>],
        ty: TypeHash,
    ) -> &'ast Expr<'ast> {
        let call = self.arena.alloc(MethodCallExpr {
            receiver,
            call: self.call_node(name, &Self::positional(args)),
        });
        self.expr(ExprKind::MethodCall(call), ty)
    }

    pub fn index(
        &self,
        target: &'ast Expr<'ast>,
        index: &'ast Expr<'ast>,
        ty: TypeHash,
    ) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(IndexExpr { target, index });
        self.expr(ExprKind::Index(node), ty)
    }

    pub fn unary(&self, op: UnaryOp, operand: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(UnaryExpr { op, operand });
        self.expr(ExprKind::Unary(node), operand.ty)
    }

    pub fn binary(
        &self,
        left: &'ast Expr<'ast>,
        op: BinaryOp,
        right: &'ast Expr<'ast>,
        ty: TypeHash,
    ) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(BinaryExpr { left, op, right });
        self.expr(ExprKind::Binary(node), ty)
    }

    pub fn ternary(
        &self,
        condition: &'ast Expr<'ast>,
        then_expr: &'ast Expr<'ast>,
        else_expr: &'ast Expr<'ast>,
    ) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(TernaryExpr {
            condition,
            then_expr,
            else_expr,
        });
        self.expr(ExprKind::Ternary(node), then_expr.ty)
    }

    pub fn list(&self, elements: &[&'ast Expr<'ast>], ty: TypeHash) -> &'ast Expr<'ast> {
        let elements = self
            .arena
            .alloc_slice_fill_iter(elements.iter().map(|e| **e));
        self.expr(ExprKind::ListInit(elements), ty)
    }

    pub fn map(&self, pairs: &[(&str, &'ast Expr<'ast>)], ty: TypeHash) -> &'ast Expr<'ast> {
        let pairs = self
            .arena
            .alloc_slice_fill_iter(pairs.iter().map(|&(name, value)| self.pair(name, value)));
        self.expr(ExprKind::MapInit(pairs), ty)
    }

    pub fn pair(&self, name: &str, value: &'ast Expr<'ast>) -> ElementExprPair<'ast> {
        ElementExprPair {
            name: self.ident(name),
            value,
            span: Span::default(),
        }
    }

    pub fn pairs(&self, pairs: &[(&str, &'ast Expr<'ast>)]) -> &'ast [ElementExprPair<'ast>] {
        self.arena
            .alloc_slice_fill_iter(pairs.iter().map(|&(name, value)| self.pair(name, value)))
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    pub fn block(&self, stmts: &[Stmt<'ast>], scope: ScopeId) -> Block<'ast> {
        Block {
            stmts: self.slice(stmts),
            scope,
            span: Span::default(),
        }
    }

    fn stmt(&self, kind: StmtKind<'ast>, scope: ScopeId) -> Stmt<'ast> {
        Stmt {
            kind,
            scope,
            span: Span::default(),
        }
    }

    pub fn block_stmt(&self, block: Block<'ast>) -> Stmt<'ast> {
        self.stmt(StmtKind::Block(block), block.scope)
    }

    pub fn expr_stmt(&self, expr: &'ast Expr<'ast>, scope: ScopeId) -> Stmt<'ast> {
        self.stmt(StmtKind::Expr(expr), scope)
    }

    pub fn assignment(
        &self,
        target: &str,
        op: AssignOp,
        value: &'ast Expr<'ast>,
        declares: bool,
    ) -> Assignment<'ast> {
        Assignment {
            target: self.ident(target),
            op,
            value,
            declares,
            span: Span::default(),
        }
    }

    /// `target = value` binding a fresh name.
    pub fn declare(&self, target: &str, value: &'ast Expr<'ast>) -> Assignment<'ast> {
        self.assignment(target, AssignOp::Assign, value, true)
    }

    pub fn assign(
        &self,
        target: &str,
        op: AssignOp,
        value: &'ast Expr<'ast>,
        declares: bool,
        scope: ScopeId,
    ) -> Stmt<'ast> {
        let assignment = self.arena.alloc(self.assignment(target, op, value, declares));
        self.stmt(StmtKind::Assign(assignment), scope)
    }

    pub fn if_stmt(
        &self,
        condition: &'ast Expr<'ast>,
        then_branch: Stmt<'ast>,
        else_branch: Option<Stmt<'ast>>,
        scope: ScopeId,
    ) -> Stmt<'ast> {
        let node = self.arena.alloc(IfStmt {
            condition,
            then_branch: self.alloc(then_branch),
            else_branch: else_branch.map(|s| self.alloc(s)),
        });
        self.stmt(StmtKind::If(node), scope)
    }

    pub fn for_each(
        &self,
        key: &str,
        value: Option<&str>,
        iterable: &'ast Expr<'ast>,
        body: Block<'ast>,
        scope: ScopeId,
    ) -> Stmt<'ast> {
        let node = self.arena.alloc(ForEachStmt {
            key: self.ident(key),
            value: value.map(|v| self.ident(v)),
            iterable,
            body,
        });
        self.stmt(StmtKind::ForEach(node), scope)
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    pub fn component(
        &self,
        ty: TypeHash,
        name: &str,
        params: &[(&str, &'ast Expr<'ast>)],
        scope: ScopeId,
    ) -> ComponentDecl<'ast> {
        ComponentDecl {
            ty,
            name: self.ident(name),
            params: self.pairs(params),
            scope,
            span: Span::default(),
        }
    }

    pub fn function(
        &self,
        annotation: Option<&str>,
        name: &str,
        context: &str,
        body: Block<'ast>,
        scope: ScopeId,
    ) -> FunctionDef<'ast> {
        FunctionDef {
            annotation: annotation.map(|a| self.ident(a)),
            name: self.ident(name),
            context: self.ident(context),
            body,
            scope,
            span: Span::default(),
        }
    }

    pub fn bot_head(&self, params: &[(&str, &'ast Expr<'ast>)], scope: ScopeId) -> BotHead<'ast> {
        BotHead {
            params: self.pairs(params),
            scope,
            span: Span::default(),
        }
    }

    pub fn bot_body(
        &self,
        components: &[ComponentDecl<'ast>],
        globals: &[Assignment<'ast>],
        handlers: &[FunctionDef<'ast>],
    ) -> BotBody<'ast> {
        BotBody {
            components: self.slice(components),
            globals: self.slice(globals),
            handlers: self.slice(handlers),
        }
    }

    pub fn dialogue(
        &self,
        name: &str,
        functions: &[FunctionDef<'ast>],
        assignments: &[Assignment<'ast>],
        transitions: &[Transitions<'ast>],
        scope: ScopeId,
    ) -> DialogueAutomaton<'ast> {
        DialogueAutomaton {
            name: self.ident(name),
            functions: self.slice(functions),
            assignments: self.slice(assignments),
            transitions: self.slice(transitions),
            scope,
            span: Span::default(),
        }
    }

    pub fn program(
        &self,
        head: BotHead<'ast>,
        body: BotBody<'ast>,
        dialogues: &[DialogueAutomaton<'ast>],
        scope: ScopeId,
    ) -> Program<'ast> {
        Program {
            head,
            body,
            dialogues: self.slice(dialogues),
            scope,
            span: Span::default(),
        }
    }

    // ==========================================================================
    // Transitions
    // ==========================================================================

    pub fn named_state(&self, name: &str) -> StateRef<'ast> {
        StateRef::Named(self.ident(name))
    }

    pub fn state_call(&self, call: &'ast Expr<'ast>) -> StateRef<'ast> {
        StateRef::Call(call)
    }

    pub fn transitions(
        &self,
        source: StateRef<'ast>,
        targets: &[TransitionTarget<'ast>],
        scope: ScopeId,
    ) -> Transitions<'ast> {
        Transitions {
            source,
            targets: self.slice(targets),
            scope,
            span: source.span(),
        }
    }

    pub fn branches(&self, branches: &[Transitions<'ast>]) -> TransitionTarget<'ast> {
        TransitionTarget::Branches(self.slice(branches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_carry_builtin_types() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        assert_eq!(b.int(3).ty, primitives::NUMBER);
        assert_eq!(b.string("hi").ty, primitives::STRING);
        assert!(matches!(b.string("hi").kind, ExprKind::Literal(Literal::String("hi"))));
    }

    #[test]
    fn named_call_arguments_are_found_by_name() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.call_named(
            "state",
            &[("intent", b.string("greet")), ("action", b.string("Hi"))],
            primitives::VOID,
        );

        let call = call.as_call().unwrap();
        assert!(matches!(
            call.arg("action").unwrap().kind,
            ExprKind::Literal(Literal::String("Hi"))
        ));
        assert!(call.arg("missing").is_none());
    }

    #[test]
    fn map_literal_keeps_source_order() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let map = b.map(&[("b", b.int(2)), ("a", b.int(1))], primitives::VOID);

        let ExprKind::MapInit(pairs) = map.kind else {
            panic!("expected map literal");
        };
        let names: Vec<_> = pairs.iter().map(|p| p.name.name).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
