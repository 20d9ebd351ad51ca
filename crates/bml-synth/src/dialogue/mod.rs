//! Dialogue automaton synthesis.
//!
//! Each `dialogue` block contributes to three places:
//! - its functions become static methods of the actions unit,
//! - its plain declarations become fields (with accessors) of the automaton,
//! - its states become classes of their own, instantiated and wired together
//!   in the automaton's `init` method.
//!
//! `init` is shared by every dialogue of the program, so its statements are
//! collected across blocks and written once by [`DialogueSynthesizer::finish`].

mod states;
mod transitions;

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use bml_ast::{Assignment, DialogueAutomaton, FunctionDef};
use bml_core::{Span, SynthesisError, TypeHash};
use bml_target::{
    self as java, AssignOperator, Block, FieldDecl, MethodDecl, Modifiers, Parameter, Stmt,
    TypeRef,
};

use crate::bot::flush_imports;
use crate::config::ScaffoldKind;
use crate::context::{AUTOMATON_VAR, Result, Site, SynthesisContext};
use crate::expr::lower_expr;
use crate::generators::getter_name;
use crate::scaffold::ScaffoldSet;
use crate::stmt::{lower_function_body, setter_name};

pub use states::{StateUnit, state_class_name, state_unit};
pub use transitions::DEFAULT_STATE;

/// Name of the automaton method whose body is replaced.
pub const INIT_METHOD: &str = "init";
/// Name lookup table of the automaton.
pub const NAMED_STATES: &str = "namedStates";

/// Accumulates the automaton of every dialogue in a program.
#[derive(Debug, Default)]
pub struct DialogueSynthesizer {
    init: Block,
    /// Anonymous states created so far; numbering is shared by all dialogues.
    anonymous: usize,
    classes: FxHashSet<String>,
    /// Named states of the dialogue being lowered.
    named: FxHashSet<String>,
    dialogues: usize,
}

impl DialogueSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower one dialogue block.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn synthesize(
        &mut self,
        ctx: &mut SynthesisContext<'_>,
        dialogue: &DialogueAutomaton<'_>,
        set: &mut ScaffoldSet,
    ) -> Result<()> {
        ctx.stack_mut().enter_dialogue(dialogue.scope);
        self.named.clear();
        let result = self.lower_dialogue(ctx, dialogue, set);
        ctx.stack_mut().leave_dialogue();
        self.dialogues += 1;
        result
    }

    /// Stage the accumulated `init` body. Does nothing when no dialogue was
    /// lowered.
    pub fn finish(self, set: &mut ScaffoldSet) {
        if self.dialogues == 0 {
            return;
        }
        info!(
            dialogues = self.dialogues,
            states = self.classes.len(),
            statements = self.init.len(),
            "dialogue automaton synthesized"
        );
        set.replace_method_body(ScaffoldKind::Automaton, INIT_METHOD, self.init);
    }

    fn lower_dialogue(
        &mut self,
        ctx: &mut SynthesisContext<'_>,
        dialogue: &DialogueAutomaton<'_>,
        set: &mut ScaffoldSet,
    ) -> Result<()> {
        debug!(dialogue = dialogue.name.name, "lowering dialogue");

        ctx.with_site(Site::Action, |ctx| {
            for function in dialogue.functions {
                let method = action_method(ctx, function)?;
                set.add_member(ScaffoldKind::Actions, method);
            }
            Ok(())
        })?;
        flush_imports(ctx, set, ScaffoldKind::Actions);

        ctx.with_site(Site::Automaton, |ctx| {
            for assignment in dialogue.assignments {
                let is_state = ctx
                    .bml_type(assignment.value.ty, assignment.value.span)?
                    .as_state()
                    .is_some();
                if is_state {
                    self.named_state(ctx, dialogue, assignment, set)?;
                } else {
                    for member in automaton_field(ctx, assignment)? {
                        set.add_member(ScaffoldKind::Automaton, member);
                    }
                }
            }
            for transitions in dialogue.transitions {
                self.lower_top_level(ctx, dialogue, transitions, set)?;
            }
            Ok(())
        })?;
        flush_imports(ctx, set, ScaffoldKind::Automaton);
        Ok(())
    }

    /// `name = state(...)`: a state class plus its `init` registration.
    fn named_state(
        &mut self,
        ctx: &mut SynthesisContext<'_>,
        dialogue: &DialogueAutomaton<'_>,
        assignment: &Assignment<'_>,
        set: &mut ScaffoldSet,
    ) -> Result<()> {
        let name = assignment.target.name;
        if !assignment.declares || assignment.op.is_compound() || self.named.contains(name) {
            return Err(SynthesisError::unsupported(
                format!("reassignment of dialogue state '{}'", name),
                assignment.span,
            ));
        }
        if is_reserved(name) {
            return Err(SynthesisError::InvalidState {
                name: name.to_string(),
                message: "the name is taken by a member of the dialogue automaton".into(),
                span: assignment.span,
            });
        }
        self.declare_state(ctx, dialogue, name, assignment.value.ty, assignment.span, set)?;
        self.named.insert(name.to_string());
        self.init.push(java::Expr::call(
            java::Expr::name(NAMED_STATES),
            "put",
            vec![java::Expr::string(name), java::Expr::name(name)],
        ));
        Ok(())
    }

    /// Generate the class for state `name` and instantiate it in `init`.
    /// Returns the state's intent.
    fn declare_state(
        &mut self,
        ctx: &mut SynthesisContext<'_>,
        dialogue: &DialogueAutomaton<'_>,
        name: &str,
        ty: TypeHash,
        span: Span,
        set: &mut ScaffoldSet,
    ) -> Result<String> {
        let state = transitions::state_type(ctx, name, ty, span)?;
        let unit = state_unit(ctx.config(), name, state, dialogue.functions, span)?;
        if !self.classes.insert(unit.class_name.clone()) {
            return Err(SynthesisError::DuplicateState {
                class_name: unit.class_name,
                span,
            });
        }
        debug!(state = name, class = %unit.class_name, intent = %state.intent, "state");

        let states_package = ctx.config().states_package();
        ctx.imports_mut()
            .require_qualified(qualified(&states_package, &unit.class_name));
        self.init.push(transitions::instantiate_state(name, &unit.class_name));
        set.add_unit(unit.path, unit.unit);
        Ok(state.intent.clone())
    }
}

/// Automaton members that `init` refers to by their simple name.
fn is_reserved(name: &str) -> bool {
    name == DEFAULT_STATE || name == NAMED_STATES
}

fn qualified(package: &str, class: &str) -> String {
    if package.is_empty() {
        class.to_string()
    } else {
        format!("{}.{}", package, class)
    }
}

/// A dialogue function as `public static void name(MessageEventContext context)`.
fn action_method(ctx: &mut SynthesisContext<'_>, function: &FunctionDef<'_>) -> Result<MethodDecl> {
    ctx.take_automaton_access();
    let mut body = lower_function_body(ctx, function)?;
    let context = function.context.name;
    if ctx.take_automaton_access() {
        body.prepend(vec![Stmt::var(
            AUTOMATON_VAR,
            java::Expr::call(java::Expr::name(context), "getDialogueAutomaton", Vec::new()),
        )]);
    }
    ctx.require("MessageEventContext");
    debug!(action = function.name.name, "action");
    Ok(MethodDecl::new(
        Modifiers::PUBLIC_STATIC,
        TypeRef::Void,
        function.name.name,
        vec![Parameter::new(TypeRef::class("MessageEventContext"), context)],
        body,
    ))
}

/// `private T name = init;` with its getter and setter.
fn automaton_field(ctx: &mut SynthesisContext<'_>, assignment: &Assignment<'_>) -> Result<Vec<java::Member>> {
    let name = assignment.target.name;
    if !assignment.declares || assignment.op.is_compound() {
        return Err(SynthesisError::unsupported(
            format!("dialogue-level statement '{} {} ...' outside a function", name, assignment.op),
            assignment.span,
        ));
    }
    if is_reserved(name) {
        return Err(SynthesisError::unsupported(
            format!("dialogue field '{}' would replace a member of the dialogue automaton", name),
            assignment.span,
        ));
    }
    let ty = ctx.target_type(assignment.value.ty, assignment.value.span)?;
    let init = lower_expr(ctx, assignment.value)?;

    let getter = MethodDecl::new(
        Modifiers::PUBLIC,
        ty.clone(),
        getter_name(name),
        Vec::new(),
        Block::from_stmts(vec![Stmt::Return(Some(java::Expr::name(name)))]),
    );
    let setter = MethodDecl::new(
        Modifiers::PUBLIC,
        TypeRef::Void,
        setter_name(name),
        vec![Parameter::new(ty.clone(), name)],
        Block::from_stmts(vec![Stmt::Expr(java::Expr::assign(
            java::Expr::field(java::Expr::This, name),
            AssignOperator::Assign,
            java::Expr::name(name),
        ))]),
    );
    Ok(vec![
        FieldDecl::new(Modifiers::PRIVATE, ty, name, Some(init)).into(),
        getter.into(),
        setter.into(),
    ])
}
