//! Transition wiring.
//!
//! A chain `a -> b -> [c -> d, e] -> f` becomes:
//!
//! ```java
//! a.addTransition("b-intent", b);
//! b.addTransition("c-intent", c);
//! c.addTransition("d-intent", d);
//! b.addTransition("e-intent", e);
//! d.addTransition("f-intent", f);
//! e.addTransition("f-intent", f);
//! ```
//!
//! Chains written directly in the dialogue body additionally hang their
//! source off `defaultState`.

use tracing::debug;

use bml_ast::{DialogueAutomaton, StateRef, TransitionTarget, Transitions};
use bml_core::{Span, StateType, SynthesisError, TypeHash};
use bml_target::{Expr, Stmt, TypeRef};

use super::DialogueSynthesizer;
use crate::context::{Result, SynthesisContext};
use crate::scaffold::ScaffoldSet;

/// Entry state every automaton starts in.
pub const DEFAULT_STATE: &str = "defaultState";

/// A state instance in the automaton's `init` method.
#[derive(Debug, Clone)]
pub(super) struct StateVar {
    pub name: String,
    pub intent: String,
}

impl DialogueSynthesizer {
    /// Wire one top-level transitions block.
    pub(super) fn lower_top_level(
        &mut self,
        ctx: &mut SynthesisContext<'_>,
        dialogue: &DialogueAutomaton<'_>,
        transitions: &Transitions<'_>,
        set: &mut ScaffoldSet,
    ) -> Result<()> {
        let default = StateVar {
            name: DEFAULT_STATE.to_string(),
            intent: String::new(),
        };
        self.lower_chain(ctx, dialogue, transitions, &[default], set)?;
        Ok(())
    }

    /// Wire `transitions`, attaching its source to every state in `from`.
    /// Returns the states the chain ends in.
    fn lower_chain(
        &mut self,
        ctx: &mut SynthesisContext<'_>,
        dialogue: &DialogueAutomaton<'_>,
        transitions: &Transitions<'_>,
        from: &[StateVar],
        set: &mut ScaffoldSet,
    ) -> Result<Vec<StateVar>> {
        ctx.with_scope(transitions.scope, |ctx| {
            let source = self.resolve(ctx, dialogue, &transitions.source, set)?;
            self.connect(from, &source);

            let mut current = vec![source];
            for target in transitions.targets {
                current = match target {
                    TransitionTarget::State(state) => {
                        let next = self.resolve(ctx, dialogue, state, set)?;
                        self.connect(&current, &next);
                        vec![next]
                    }
                    TransitionTarget::Branches(branches) => {
                        let mut ends = Vec::new();
                        for branch in *branches {
                            ends.extend(self.lower_chain(ctx, dialogue, branch, &current, set)?);
                        }
                        ends
                    }
                };
            }
            Ok(current)
        })
    }

    fn connect(&mut self, from: &[StateVar], to: &StateVar) {
        for source in from {
            debug!(from = %source.name, to = %to.name, intent = %to.intent, "transition");
            self.init.push(Expr::call(
                Expr::name(source.name.as_str()),
                "addTransition",
                vec![Expr::string(to.intent.as_str()), Expr::name(to.name.as_str())],
            ));
        }
    }

    /// The state a transition endpoint refers to, creating it for calls.
    fn resolve(
        &mut self,
        ctx: &mut SynthesisContext<'_>,
        dialogue: &DialogueAutomaton<'_>,
        state: &StateRef<'_>,
        set: &mut ScaffoldSet,
    ) -> Result<StateVar> {
        match state {
            StateRef::Call(call) => {
                self.anonymous += 1;
                let name = format!("state{}", self.anonymous);
                let intent = self.declare_state(ctx, dialogue, &name, call.ty, call.span, set)?;
                Ok(StateVar { name, intent })
            }
            StateRef::Named(ident) => {
                let symbol = ctx.scopes().expect(ctx.current_scope(), ident.name, ident.span)?;
                if !self.named.contains(ident.name) {
                    return Err(SynthesisError::InvalidState {
                        name: ident.name.to_string(),
                        message: "not a state declared in this dialogue".to_string(),
                        span: ident.span,
                    });
                }
                let intent = state_type(ctx, ident.name, symbol.ty, ident.span)?.intent.clone();
                Ok(StateVar {
                    name: ident.name.to_string(),
                    intent,
                })
            }
        }
    }
}

/// The state payload of `ty`, for the state called `name`.
pub(super) fn state_type<'a>(
    ctx: &SynthesisContext<'a>,
    name: &str,
    ty: TypeHash,
    span: Span,
) -> Result<&'a StateType> {
    ctx.bml_type(ty, span)?
        .as_state()
        .ok_or_else(|| SynthesisError::InvalidState {
            name: name.to_string(),
            message: format!("has type '{}', not a state", ctx.registry().type_name(ty)),
            span,
        })
}

/// `var name = new NameState(this);`
pub(super) fn instantiate_state(name: &str, class_name: &str) -> Stmt {
    Stmt::var(
        name,
        Expr::new_object(TypeRef::class(class_name), vec![Expr::This]),
    )
}
