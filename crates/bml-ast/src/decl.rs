//! Declaration nodes: the bot head and body, functions, and dialogue blocks.

use bml_core::{ScopeId, Span, TypeHash};

use crate::expr::{ElementExprPair, Expr, Ident};
use crate::stmt::{Assignment, Block};

/// A complete annotated BML program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Program<'ast> {
    pub head: BotHead<'ast>,
    pub body: BotBody<'ast>,
    pub dialogues: &'ast [DialogueAutomaton<'ast>],
    /// The global scope.
    pub scope: ScopeId,
    pub span: Span,
}

/// `Bot(name = value, ...)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotHead<'ast> {
    pub params: &'ast [ElementExprPair<'ast>],
    pub scope: ScopeId,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BotBody<'ast> {
    pub components: &'ast [ComponentDecl<'ast>],
    /// Bot-level variable declarations.
    pub globals: &'ast [Assignment<'ast>],
    /// Event handlers.
    pub handlers: &'ast [FunctionDef<'ast>],
}

/// `Telegram(botToken = "...", botName = "...") telegram`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentDecl<'ast> {
    /// The component type.
    pub ty: TypeHash,
    pub name: Ident<'ast>,
    pub params: &'ast [ElementExprPair<'ast>],
    pub scope: ScopeId,
    pub span: Span,
}

impl<'ast> ComponentDecl<'ast> {
    pub fn param(&self, name: &str) -> Option<&ElementExprPair<'ast>> {
        self.params.iter().find(|p| p.name.name == name)
    }
}

/// `@onMessage function name(context) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDef<'ast> {
    /// Event annotation, for handlers.
    pub annotation: Option<Ident<'ast>>,
    pub name: Ident<'ast>,
    /// Name of the event-context parameter.
    pub context: Ident<'ast>,
    pub body: Block<'ast>,
    pub scope: ScopeId,
    pub span: Span,
}

/// `dialogue name { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogueAutomaton<'ast> {
    pub name: Ident<'ast>,
    pub functions: &'ast [FunctionDef<'ast>],
    /// Dialogue-level declarations, states included.
    pub assignments: &'ast [Assignment<'ast>],
    /// Top-level transition chains.
    pub transitions: &'ast [Transitions<'ast>],
    pub scope: ScopeId,
    pub span: Span,
}

/// `source -> target -> [ branch, branch ] -> ...`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transitions<'ast> {
    pub source: StateRef<'ast>,
    pub targets: &'ast [TransitionTarget<'ast>],
    pub scope: ScopeId,
    pub span: Span,
}

/// A reference to a dialogue state inside a transition chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateRef<'ast> {
    /// A fresh, anonymous state built by a state-returning call.
    Call(&'ast Expr<'ast>),
    /// A previously declared state.
    Named(Ident<'ast>),
}

impl<'ast> StateRef<'ast> {
    pub fn span(&self) -> Span {
        match self {
            StateRef::Call(expr) => expr.span,
            StateRef::Named(ident) => ident.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionTarget<'ast> {
    State(StateRef<'ast>),
    /// `[a -> b, c]`: alternative branches out of the preceding state.
    Branches(&'ast [Transitions<'ast>]),
}
