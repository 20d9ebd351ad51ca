//! The BML type model.
//!
//! [`BmlType`] is the resolved type the upstream semantic pass attaches to
//! every expression and declaration. Composite variants refer to their
//! children by [`TypeHash`], so a `BmlType` value is small, hashable and fully
//! determined by its shape.

use crate::component::ComponentKind;
use crate::type_hash::{TypeHash, primitives};

/// A resolved BML type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BmlType {
    Boolean,
    /// Integral number.
    Number,
    Float,
    String,
    Void,
    /// Recognised user-input category.
    Intent,
    List(TypeHash),
    Map {
        key: TypeHash,
        value: TypeHash,
    },
    Function {
        params: Vec<TypeHash>,
        ret: TypeHash,
    },
    Component(ComponentKind),
    State(StateType),
}

/// Payload of a `state` type: the intent that leads into the state and what
/// the bot does once it gets there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateType {
    pub intent: String,
    pub action: StateAction,
}

/// The action a dialogue state performs, keyed by action kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateAction {
    /// Reply with a fixed message.
    Literal(String),
    /// Reply with one of several messages, picked at random.
    Candidates(Vec<String>),
    /// Delegate to a dialogue function by name.
    Function(String),
    /// An action kind this synthesizer does not know how to compile.
    Unknown { tag: String },
}

impl StateAction {
    /// The action-kind tag.
    pub fn tag(&self) -> &str {
        match self {
            StateAction::Literal(_) => "string",
            StateAction::Candidates(_) => "list",
            StateAction::Function(_) => "function",
            StateAction::Unknown { tag } => tag,
        }
    }

    fn payload(&self) -> Vec<&str> {
        match self {
            StateAction::Literal(text) => vec![text.as_str()],
            StateAction::Candidates(texts) => texts.iter().map(String::as_str).collect(),
            StateAction::Function(name) => vec![name.as_str()],
            StateAction::Unknown { .. } => Vec::new(),
        }
    }
}

impl StateType {
    pub fn new(intent: impl Into<String>, action: StateAction) -> Self {
        Self {
            intent: intent.into(),
            action,
        }
    }
}

impl BmlType {
    /// Structural hash of this type.
    pub fn type_hash(&self) -> TypeHash {
        match self {
            BmlType::Boolean => primitives::BOOLEAN,
            BmlType::Number => primitives::NUMBER,
            BmlType::Float => primitives::FLOAT,
            BmlType::String => primitives::STRING,
            BmlType::Void => primitives::VOID,
            BmlType::Intent => primitives::INTENT,
            BmlType::List(elem) => TypeHash::from_composite("list", &[*elem]),
            BmlType::Map { key, value } => TypeHash::from_composite("map", &[*key, *value]),
            BmlType::Function { params, ret } => {
                let mut args = Vec::with_capacity(params.len() + 1);
                args.push(*ret);
                args.extend_from_slice(params);
                TypeHash::from_composite("function", &args)
            }
            BmlType::Component(kind) => kind.type_hash(),
            BmlType::State(state) => {
                TypeHash::from_state(&state.intent, state.action.tag(), &state.action.payload())
            }
        }
    }

    /// Short name of the type's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            BmlType::Boolean => "boolean",
            BmlType::Number => "number",
            BmlType::Float => "float",
            BmlType::String => "string",
            BmlType::Void => "void",
            BmlType::Intent => "intent",
            BmlType::List(_) => "list",
            BmlType::Map { .. } => "map",
            BmlType::Function { .. } => "function",
            BmlType::Component(kind) => kind.name(),
            BmlType::State(_) => "state",
        }
    }

    /// Whether a global of this type is shared across concurrent event
    /// handlers and must be accessed atomically.
    pub fn is_thread_shared(&self) -> bool {
        matches!(self, BmlType::Boolean | BmlType::Number)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, BmlType::List(_) | BmlType::Map { .. })
    }

    pub fn as_state(&self) -> Option<&StateType> {
        match self {
            BmlType::State(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<ComponentKind> {
        match self {
            BmlType::Component(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structurally_equal_types_share_a_hash() {
        let a = BmlType::Map {
            key: primitives::STRING,
            value: BmlType::List(primitives::NUMBER).type_hash(),
        };
        let b = BmlType::Map {
            key: primitives::STRING,
            value: BmlType::List(primitives::NUMBER).type_hash(),
        };
        assert_eq!(a.type_hash(), b.type_hash());
    }

    #[test]
    fn function_return_type_is_part_of_identity() {
        let a = BmlType::Function {
            params: vec![primitives::STRING],
            ret: primitives::VOID,
        };
        let b = BmlType::Function {
            params: vec![primitives::VOID],
            ret: primitives::STRING,
        };
        assert_ne!(a.type_hash(), b.type_hash());
    }

    #[test]
    fn state_payload_kind_changes_hash() {
        let literal = BmlType::State(StateType::new("hi", StateAction::Literal("x".into())));
        let function = BmlType::State(StateType::new("hi", StateAction::Function("x".into())));
        assert_ne!(literal.type_hash(), function.type_hash());
    }

    #[test]
    fn only_boolean_and_number_are_thread_shared() {
        assert!(BmlType::Boolean.is_thread_shared());
        assert!(BmlType::Number.is_thread_shared());
        assert!(!BmlType::Float.is_thread_shared());
        assert!(!BmlType::String.is_thread_shared());
        assert!(!BmlType::List(primitives::NUMBER).is_thread_shared());
    }

    #[test]
    fn action_tags() {
        assert_eq!(StateAction::Literal("a".into()).tag(), "string");
        assert_eq!(StateAction::Candidates(vec![]).tag(), "list");
        assert_eq!(StateAction::Unknown { tag: "image".into() }.tag(), "image");
    }
}
