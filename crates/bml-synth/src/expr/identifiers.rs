//! Identifier lowering.
//!
//! An identifier is classified by [`SynthesisContext::binding`] and lowered
//! according to where its storage lives:
//!
//! | binding | emitted |
//! |---|---|
//! | thread-shared global | `EventHandlers.name.getAcquire()` |
//! | dialogue field | `dialogueAutomaton.getName()` / `this.getName()` |
//! | other global | `EventHandlers.name` or `BotConfig.NAME` |
//! | local | `name` |
//!
//! [`SynthesisContext::binding`]: crate::context::SynthesisContext::binding

use bml_ast::Ident;
use bml_core::{BmlType, Symbol, SynthesisError};
use bml_target as java;

use super::ExprLowerer;
use crate::context::{Binding, Result, SynthesisContext};
use crate::generators::getter_name;

pub fn lower_ident(lowerer: &mut ExprLowerer<'_, '_>, ident: &Ident<'_>) -> Result<java::Expr> {
    let ctx = lowerer.ctx();
    match ctx.binding(ident.name, ident.span)? {
        Binding::SharedGlobal(symbol) => {
            let storage = ctx.global_ref(symbol);
            Ok(java::Expr::call(storage, "getAcquire", Vec::new()))
        }
        Binding::DialogueField(symbol) => {
            reject_state(ctx, symbol, ident)?;
            let receiver = ctx.automaton_receiver(ident.name, ident.span)?;
            Ok(java::Expr::call(receiver, getter_name(ident.name), Vec::new()))
        }
        Binding::Global(symbol) => Ok(ctx.global_ref(symbol)),
        Binding::Local(symbol) => {
            reject_state(ctx, symbol, ident)?;
            Ok(java::Expr::name(ident.name))
        }
    }
}

/// States are only meaningful in transitions.
fn reject_state(ctx: &SynthesisContext<'_>, symbol: &Symbol, ident: &Ident<'_>) -> Result<()> {
    if let Some(BmlType::State(_)) = ctx.registry().get(symbol.ty) {
        return Err(SynthesisError::unsupported(
            format!("state '{}' used as a value", ident.name),
            ident.span,
        ));
    }
    Ok(())
}
