//! State classes.
//!
//! Every dialogue state becomes its own unit under the states directory:
//!
//! ```java
//! public class GreetingState extends State {
//!     private final DialogueAutomaton dialogueAutomaton;
//!
//!     public GreetingState(DialogueAutomaton dialogueAutomaton) {
//!         this.dialogueAutomaton = dialogueAutomaton;
//!         super.intent = "greet";
//!     }
//!
//!     @Override
//!     public void action(MessageEventContext context) {
//!         MessageHelper.sendReply(context, "Hello!");
//!     }
//! }
//! ```

use std::path::PathBuf;

use tracing::warn;

use bml_ast::FunctionDef;
use bml_core::{Span, StateAction, StateType, SynthesisError};
use bml_target::{
    Annotation, Block, ClassDecl, CompilationUnit, ConstructorDecl, Expr, FieldDecl, MethodDecl,
    Modifiers, Parameter, Stmt, TypeRef,
};

use crate::config::SynthesisConfig;
use crate::context::{AUTOMATON_VAR, Result};
use crate::imports::ImportSet;

/// Name of the event-context parameter of `State.action`.
const CONTEXT_PARAM: &str = "context";
const MESSAGES_FIELD: &str = "MESSAGES";
const RANDOM_FIELD: &str = "random";

/// A state class ready to be written.
#[derive(Debug)]
pub struct StateUnit {
    pub class_name: String,
    /// Path relative to the output root.
    pub path: PathBuf,
    pub unit: CompilationUnit,
}

/// Build the unit for the state `name` (a declared name or `stateN`).
///
/// `functions` are the dialogue's functions, which a function action may
/// delegate to.
pub fn state_unit(
    config: &SynthesisConfig,
    name: &str,
    state: &StateType,
    functions: &[FunctionDef<'_>],
    span: Span,
) -> Result<StateUnit> {
    let class_name = state_class_name(name);
    let mut imports = ImportSet::new();
    imports.require("State");
    imports.require("DialogueAutomaton");
    imports.require("MessageEventContext");

    let mut class = ClassDecl::new(Modifiers::PUBLIC, class_name.as_str()).extending(TypeRef::class("State"));
    class.push(FieldDecl::new(
        Modifiers::PRIVATE | Modifiers::FINAL,
        TypeRef::class("DialogueAutomaton"),
        AUTOMATON_VAR,
        None,
    ));

    let action = action_body(name, state, functions, span, &mut class, &mut imports)?;

    class.push(constructor(&class_name, &state.intent));
    class.push(
        MethodDecl::new(
            Modifiers::PUBLIC,
            TypeRef::Void,
            "action",
            vec![Parameter::new(TypeRef::class("MessageEventContext"), CONTEXT_PARAM)],
            action,
        )
        .with_annotation(Annotation::marker("Override")),
    );

    let package = config.states_package();
    let mut unit = CompilationUnit::new(Some(package.clone()).filter(|p| !p.is_empty()));
    for import in imports.drain(config, &package) {
        unit.add_import(import);
    }
    unit.types.push(class);

    Ok(StateUnit {
        path: config.states_dir.join(format!("{}.java", class_name)),
        class_name,
        unit,
    })
}

/// `greeting` -> `GreetingState`
pub fn state_class_name(name: &str) -> String {
    format!("{}State", crate::context::capitalize(name))
}

fn constructor(class_name: &str, intent: &str) -> ConstructorDecl {
    let mut body = Block::new();
    body.push(Expr::assign(
        Expr::field(Expr::This, AUTOMATON_VAR),
        bml_target::AssignOperator::Assign,
        Expr::name(AUTOMATON_VAR),
    ));
    body.push(Expr::assign(
        Expr::field(Expr::name("super"), "intent"),
        bml_target::AssignOperator::Assign,
        Expr::string(intent),
    ));
    ConstructorDecl {
        modifiers: Modifiers::PUBLIC,
        name: class_name.to_string(),
        params: vec![Parameter::new(TypeRef::class("DialogueAutomaton"), AUTOMATON_VAR)],
        body,
    }
}

fn send_reply(text: Expr) -> Stmt {
    Stmt::Expr(Expr::static_call(
        "MessageHelper",
        "sendReply",
        vec![Expr::name(CONTEXT_PARAM), text],
    ))
}

/// The body of `action`, adding whatever fields the action needs to `class`.
fn action_body(
    name: &str,
    state: &StateType,
    functions: &[FunctionDef<'_>],
    span: Span,
    class: &mut ClassDecl,
    imports: &mut ImportSet,
) -> Result<Block> {
    let mut body = Block::new();
    match &state.action {
        StateAction::Literal(text) => {
            imports.require("MessageHelper");
            body.push(send_reply(Expr::string(text.as_str())));
        }
        StateAction::Candidates(messages) => {
            if messages.is_empty() {
                return Err(SynthesisError::InvalidState {
                    name: name.to_string(),
                    message: "list action has no candidate messages".to_string(),
                    span,
                });
            }
            imports.require("MessageHelper");
            imports.require("Random");
            imports.require("List");

            let random = TypeRef::class("Random");
            class.push(FieldDecl::new(
                Modifiers::PRIVATE | Modifiers::FINAL,
                random.clone(),
                RANDOM_FIELD,
                Some(Expr::new_object(random, Vec::new())),
            ));
            class.push(FieldDecl::new(
                Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL,
                TypeRef::generic("List", vec![TypeRef::class("String")]),
                MESSAGES_FIELD,
                Some(Expr::static_call(
                    "List",
                    "of",
                    messages.iter().map(|m| Expr::string(m.as_str())).collect(),
                )),
            ));

            let bound = Expr::IntLit(messages.len() as i64);
            body.push(Stmt::var(
                "nextMessage",
                Expr::call(Expr::name(RANDOM_FIELD), "nextInt", vec![bound]),
            ));
            body.push(send_reply(Expr::call(
                Expr::name(MESSAGES_FIELD),
                "get",
                vec![Expr::name("nextMessage")],
            )));
        }
        StateAction::Function(function) => {
            if !functions.iter().any(|f| f.name.name == function) {
                return Err(SynthesisError::UnknownAction {
                    name: function.clone(),
                    span,
                });
            }
            imports.require("Actions");
            body.push(Stmt::Expr(Expr::static_call(
                "Actions",
                function.as_str(),
                vec![Expr::name(CONTEXT_PARAM)],
            )));
        }
        StateAction::Unknown { tag } => {
            warn!(state = name, tag = %tag, "unknown state action kind, emitting empty action");
        }
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bml_ast::AstBuilder;
    use bml_core::ScopeId;
    use bumpalo::Bump;

    fn unit_for(action: StateAction) -> Result<StateUnit> {
        let config = SynthesisConfig::default();
        state_unit(&config, "greeting", &StateType::new("greet", action), &[], Span::default())
    }

    #[test]
    fn literal_state_class() {
        let state = unit_for(StateAction::Literal("Hello!".into())).unwrap();
        assert_eq!(state.class_name, "GreetingState");
        assert_eq!(state.path, PathBuf::from("dialogue/states/GreetingState.java"));
        assert_eq!(
            state.unit.to_string(),
            "package bot.dialogue.states;\n\
             \n\
             import bot.dialogue.DialogueAutomaton;\n\
             import bot.dialogue.State;\n\
             import bot.events.MessageEventContext;\n\
             import bot.events.MessageHelper;\n\
             \n\
             public class GreetingState extends State {\n    \
                 private final DialogueAutomaton dialogueAutomaton;\n\
             \n    \
                 public GreetingState(DialogueAutomaton dialogueAutomaton) {\n        \
                     this.dialogueAutomaton = dialogueAutomaton;\n        \
                     super.intent = \"greet\";\n    \
                 }\n\
             \n    \
                 @Override\n    \
                 public void action(MessageEventContext context) {\n        \
                     MessageHelper.sendReply(context, \"Hello!\");\n    \
                 }\n\
             }\n"
        );
    }

    #[test]
    fn candidate_draw_is_bound_to_candidate_count() {
        let messages = vec!["hi".to_string(), "hello".to_string(), "hey".to_string()];
        let state = unit_for(StateAction::Candidates(messages)).unwrap();
        let source = state.unit.to_string();

        assert!(source.contains("private final Random random = new Random();"));
        assert!(source.contains("private static final List<String> MESSAGES = List.of(\"hi\", \"hello\", \"hey\");"));
        assert!(source.contains("var nextMessage = random.nextInt(3);"));
        assert!(source.contains("MessageHelper.sendReply(context, MESSAGES.get(nextMessage));"));
        assert!(source.contains("import java.util.Random;"));
    }

    #[test]
    fn empty_candidate_list_is_rejected() {
        let err = unit_for(StateAction::Candidates(Vec::new())).unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidState { ref name, .. } if name == "greeting"));
    }

    #[test]
    fn function_action_delegates_to_actions() {
        let config = SynthesisConfig::default();
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let scope = ScopeId(1);
        let functions = [b.function(None, "welcome", "context", b.block(&[], scope), scope)];

        let state = StateType::new("greet", StateAction::Function("welcome".into()));
        let unit = state_unit(&config, "state1", &state, &functions, Span::default()).unwrap();
        assert_eq!(unit.class_name, "State1State");
        let source = unit.unit.to_string();
        assert!(source.contains("        Actions.welcome(context);\n"));
        assert!(source.contains("import bot.dialogue.Actions;"));

        let missing = StateType::new("greet", StateAction::Function("farewell".into()));
        let err = state_unit(&config, "state1", &missing, &functions, Span::default()).unwrap_err();
        assert!(matches!(err, SynthesisError::UnknownAction { ref name, .. } if name == "farewell"));
    }

    #[test]
    fn unknown_action_kind_gets_an_empty_body() {
        let state = unit_for(StateAction::Unknown { tag: "image".into() }).unwrap();
        assert_eq!(state.unit.types[0].method("action").unwrap().body, Block::new());
    }
}
