//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use bml_transpiler::ast::{AssignOp, AstBuilder, Program, TransitionTarget};
use bml_transpiler::{
    BmlType, ComponentKind, ScopeId, ScopeKind, ScopeTree, StateAction, StateType,
    SynthesisConfig, TypeHash, TypeRegistry, primitives,
};
use tempfile::TempDir;

pub const BOT_CONFIG: &str = "package bot;

public class BotConfig {
}
";

pub const DIALOGUE_AUTOMATON: &str = "package bot.dialogue;

import java.util.HashMap;
import java.util.Map;

public class DialogueAutomaton {
    private final Map<String, State> namedStates = new HashMap<>();
    private final State defaultState = new DefaultState(this);

    public void init() {
        // states are wired here
    }

    public State getDefaultState() {
        return defaultState;
    }
}
";

pub const ACTIONS: &str = "package bot.dialogue;

public class Actions {
}
";

pub const EVENT_HANDLERS: &str = "package bot.events;

public class EventHandlers {
}
";

/// Write the four scaffold units under `root`.
pub fn write_scaffolds(root: &Path) {
    for (path, source) in [
        ("BotConfig.java", BOT_CONFIG),
        ("dialogue/DialogueAutomaton.java", DIALOGUE_AUTOMATON),
        ("dialogue/Actions.java", ACTIONS),
        ("events/EventHandlers.java", EVENT_HANDLERS),
    ] {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, source).unwrap();
    }
}

/// A temporary output root holding fresh scaffolds, and a config for it.
pub fn scaffold_root() -> (TempDir, SynthesisConfig) {
    let dir = tempfile::tempdir().unwrap();
    write_scaffolds(dir.path());
    let config = SynthesisConfig::default().with_output_root(dir.path());
    (dir, config)
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// Scopes and types as the semantic pass would hand them over.
pub struct Env {
    pub tree: ScopeTree,
    pub registry: TypeRegistry,
    pub global: ScopeId,
}

impl Env {
    pub fn new() -> Self {
        let mut tree = ScopeTree::new();
        let global = tree.add_scope(ScopeKind::Global, None);
        Self {
            tree,
            registry: TypeRegistry::with_builtins(),
            global,
        }
    }

    pub fn scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        self.tree.add_scope(kind, Some(parent))
    }

    /// A function scope with the event context bound to `context`.
    pub fn function_scope(&mut self, parent: ScopeId) -> ScopeId {
        let scope = self.scope(ScopeKind::Function, parent);
        self.tree.define(scope, "context", ComponentKind::EventContext.type_hash());
        scope
    }

    pub fn state(&mut self, intent: &str, action: StateAction) -> TypeHash {
        self.registry
            .canonicalize(&BmlType::State(StateType::new(intent, action)))
    }

    pub fn ty(&mut self, ty: BmlType) -> TypeHash {
        self.registry.canonicalize(&ty)
    }
}

/// A small but complete bot:
///
/// ```text
/// Bot(name = "DemoBot")
/// Telegram(botToken = "123:abc", botName = "demo_bot") telegram
/// count = 0
/// motd = "Welcome"
///
/// @onMessage function greet(context) {
///     count += 1
///     context.reply(motd)
/// }
///
/// dialogue main {
///     topic = "none"
///     greeting = state(intent = "greet", action = "Hello!")
///
///     function farewell(context) {
///         topic = "bye"
///         context.reply("Goodbye")
///     }
///
///     greeting -> state(intent = "bye", action = farewell)
///     state(intent = "joke", action = ["a", "b", "c"])
/// }
/// ```
pub fn demo_program<'ast>(b: &AstBuilder<'ast>, env: &mut Env) -> Program<'ast> {
    let global = env.global;
    let telegram = ComponentKind::Telegram.type_hash();
    let context = ComponentKind::EventContext.type_hash();
    env.tree.define(global, "count", primitives::NUMBER);
    env.tree.define(global, "motd", primitives::STRING);
    env.tree.define(global, "telegram", telegram);

    let head = b.bot_head(&[("name", b.string("DemoBot"))], global);

    let handler_scope = env.function_scope(global);
    let greet = b.function(
        Some("onMessage"),
        "greet",
        "context",
        b.block(
            &[
                b.assign("count", AssignOp::AddAssign, b.int(1), false, handler_scope),
                b.expr_stmt(
                    b.method_call(
                        b.var("context", context),
                        "reply",
                        &[b.var("motd", primitives::STRING)],
                        primitives::VOID,
                    ),
                    handler_scope,
                ),
            ],
            handler_scope,
        ),
        handler_scope,
    );
    let body = b.bot_body(
        &[b.component(
            telegram,
            "telegram",
            &[("botToken", b.string("123:abc")), ("botName", b.string("demo_bot"))],
            global,
        )],
        &[b.declare("count", b.int(0)), b.declare("motd", b.string("Welcome"))],
        &[greet],
    );

    let dialogue_scope = env.scope(ScopeKind::Dialogue, global);
    let greeting = env.state("greet", StateAction::Literal("Hello!".into()));
    let bye = env.state("bye", StateAction::Function("farewell".into()));
    let joke = env.state(
        "joke",
        StateAction::Candidates(vec!["a".into(), "b".into(), "c".into()]),
    );
    env.tree.define(dialogue_scope, "topic", primitives::STRING);
    env.tree.define(dialogue_scope, "greeting", greeting);

    let action_scope = env.function_scope(dialogue_scope);
    let farewell = b.function(
        None,
        "farewell",
        "context",
        b.block(
            &[
                b.assign("topic", AssignOp::Assign, b.string("bye"), false, action_scope),
                b.expr_stmt(
                    b.method_call(
                        b.var("context", context),
                        "reply",
                        &[b.string("Goodbye")],
                        primitives::VOID,
                    ),
                    action_scope,
                ),
            ],
            action_scope,
        ),
        action_scope,
    );

    let state_call = |ty| b.state_call(b.call("state", &[], ty));
    let dialogue = b.dialogue(
        "main",
        &[farewell],
        &[
            b.declare("topic", b.string("none")),
            b.declare("greeting", b.call("state", &[], greeting)),
        ],
        &[
            b.transitions(
                b.named_state("greeting"),
                &[TransitionTarget::State(state_call(bye))],
                dialogue_scope,
            ),
            b.transitions(state_call(joke), &[], dialogue_scope),
        ],
        dialogue_scope,
    );

    b.program(head, body, &[dialogue], global)
}
