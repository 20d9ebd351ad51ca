//! Builtin component kinds and their surfaces.
//!
//! Components (`user`, `messenger`, `Telegram`, ...) are opaque to the generic
//! synthesizer. What they expose to BML code, and which runtime class backs
//! them in the generated bot, is described here as static tables that the
//! per-kind generators consult.

use crate::TypeHash;
use crate::type_hash::primitives;

/// A parameter accepted when declaring a component in the bot body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentParameter {
    /// Parameter name as written in BML (`botToken = "..."`).
    pub name: &'static str,
    /// Type the argument must resolve to.
    pub expected: TypeHash,
    /// Whether the declaration must supply it.
    pub required: bool,
}

/// A readable field of a component value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentField {
    pub name: &'static str,
    pub ty: TypeHash,
}

/// A callable method of a component value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentMethod {
    pub name: &'static str,
    pub params: &'static [TypeHash],
    pub ret: TypeHash,
}

/// The closed set of component kinds known to the transpiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    /// The event context handed to every handler and action (`context`).
    EventContext,
    /// The user who triggered an event.
    User,
    /// The messenger an event arrived on.
    Messenger,
    /// Telegram messenger connection.
    Telegram,
    /// Slack messenger connection.
    Slack,
    /// Rasa NLU connection.
    Rasa,
}

const USER: TypeHash = ComponentKind::User.type_hash();
const MESSENGER: TypeHash = ComponentKind::Messenger.type_hash();

const CONTEXT_FIELDS: &[ComponentField] = &[
    ComponentField { name: "user", ty: USER },
    ComponentField { name: "messenger", ty: MESSENGER },
    ComponentField { name: "intent", ty: primitives::INTENT },
    ComponentField { name: "entity", ty: primitives::STRING },
    ComponentField { name: "text", ty: primitives::STRING },
];

const USER_FIELDS: &[ComponentField] = &[
    ComponentField { name: "id", ty: primitives::STRING },
    ComponentField { name: "name", ty: primitives::STRING },
    ComponentField { name: "language", ty: primitives::STRING },
];

const MESSENGER_FIELDS: &[ComponentField] = &[ComponentField {
    name: "name",
    ty: primitives::STRING,
}];

const CONTEXT_METHODS: &[ComponentMethod] = &[ComponentMethod {
    name: "reply",
    params: &[primitives::STRING],
    ret: primitives::VOID,
}];

const MESSENGER_METHODS: &[ComponentMethod] = &[ComponentMethod {
    name: "send",
    params: &[USER, primitives::STRING],
    ret: primitives::VOID,
}];

const RASA_METHODS: &[ComponentMethod] = &[ComponentMethod {
    name: "parse",
    params: &[primitives::STRING],
    ret: primitives::INTENT,
}];

const TELEGRAM_PARAMS: &[ComponentParameter] = &[
    ComponentParameter { name: "botToken", expected: primitives::STRING, required: true },
    ComponentParameter { name: "botName", expected: primitives::STRING, required: true },
];

const SLACK_PARAMS: &[ComponentParameter] = &[
    ComponentParameter { name: "botToken", expected: primitives::STRING, required: true },
    ComponentParameter { name: "appToken", expected: primitives::STRING, required: false },
];

const RASA_PARAMS: &[ComponentParameter] = &[
    ComponentParameter { name: "url", expected: primitives::STRING, required: true },
    ComponentParameter { name: "trainingFile", expected: primitives::STRING, required: false },
];

impl ComponentKind {
    /// Every component kind, in declaration order.
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::EventContext,
        ComponentKind::User,
        ComponentKind::Messenger,
        ComponentKind::Telegram,
        ComponentKind::Slack,
        ComponentKind::Rasa,
    ];

    /// The BML type name.
    pub const fn name(self) -> &'static str {
        match self {
            ComponentKind::EventContext => "context",
            ComponentKind::User => "user",
            ComponentKind::Messenger => "messenger",
            ComponentKind::Telegram => "Telegram",
            ComponentKind::Slack => "Slack",
            ComponentKind::Rasa => "Rasa",
        }
    }

    /// Nominal type hash of this component kind.
    pub const fn type_hash(self) -> TypeHash {
        TypeHash::from_name(self.name())
    }

    /// Runtime class backing this kind in the generated bot.
    pub const fn bot_class(self) -> &'static str {
        match self {
            ComponentKind::EventContext => "MessageEventContext",
            ComponentKind::User => "User",
            ComponentKind::Messenger => "Messenger",
            ComponentKind::Telegram => "TelegramComponent",
            ComponentKind::Slack => "SlackComponent",
            ComponentKind::Rasa => "RasaComponent",
        }
    }

    /// Declaration parameters. Empty for kinds that cannot be declared.
    pub fn parameters(self) -> &'static [ComponentParameter] {
        match self {
            ComponentKind::Telegram => TELEGRAM_PARAMS,
            ComponentKind::Slack => SLACK_PARAMS,
            ComponentKind::Rasa => RASA_PARAMS,
            ComponentKind::EventContext | ComponentKind::User | ComponentKind::Messenger => &[],
        }
    }

    pub fn fields(self) -> &'static [ComponentField] {
        match self {
            ComponentKind::EventContext => CONTEXT_FIELDS,
            ComponentKind::User => USER_FIELDS,
            ComponentKind::Messenger => MESSENGER_FIELDS,
            ComponentKind::Telegram | ComponentKind::Slack | ComponentKind::Rasa => &[],
        }
    }

    pub fn methods(self) -> &'static [ComponentMethod] {
        match self {
            ComponentKind::EventContext => CONTEXT_METHODS,
            ComponentKind::Messenger => MESSENGER_METHODS,
            ComponentKind::Rasa => RASA_METHODS,
            ComponentKind::User | ComponentKind::Telegram | ComponentKind::Slack => &[],
        }
    }

    /// Whether a bot body may declare an instance of this kind.
    pub fn is_declarable(self) -> bool {
        !self.parameters().is_empty()
    }

    pub fn field(self, name: &str) -> Option<&'static ComponentField> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn method(self, name: &str) -> Option<&'static ComponentMethod> {
        self.methods().iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_have_distinct_hashes() {
        for (i, a) in ComponentKind::ALL.iter().enumerate() {
            for b in &ComponentKind::ALL[i + 1..] {
                assert_ne!(a.type_hash(), b.type_hash());
            }
        }
    }

    #[test]
    fn only_connections_are_declarable() {
        assert!(ComponentKind::Telegram.is_declarable());
        assert!(ComponentKind::Rasa.is_declarable());
        assert!(!ComponentKind::User.is_declarable());
        assert!(!ComponentKind::EventContext.is_declarable());
    }

    #[test]
    fn context_exposes_user_field() {
        let field = ComponentKind::EventContext.field("user").unwrap();
        assert_eq!(field.ty, ComponentKind::User.type_hash());
        assert!(ComponentKind::EventContext.field("password").is_none());
    }

    #[test]
    fn telegram_requires_token_and_name() {
        let required: Vec<_> = ComponentKind::Telegram
            .parameters()
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();
        assert_eq!(required, ["botToken", "botName"]);
    }
}
