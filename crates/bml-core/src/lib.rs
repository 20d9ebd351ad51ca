//! BML Core crate.
//!
//! Shared vocabulary of the BML transpiler:
//!
//! - [`Span`]: source locations for error reporting
//! - [`TypeHash`]: structural type identity
//! - [`BmlType`]: the resolved type model (primitives, collections,
//!   components, dialogue states)
//! - [`ComponentKind`]: builtin component kinds and their surfaces
//! - [`ScopeTree`]: scopes and symbols recorded by the semantic pass
//! - [`error`]: the error taxonomy

pub mod component;
pub mod error;
pub mod scope;
pub mod span;
pub mod type_hash;
pub mod types;

pub use component::{ComponentField, ComponentKind, ComponentMethod, ComponentParameter};
pub use error::{ScaffoldError, SynthesisError, TranspileError};
pub use scope::{ScopeId, ScopeKind, ScopeTree, Symbol};
pub use span::Span;
pub use type_hash::{TypeHash, hash_constants, primitives};
pub use types::{BmlType, StateAction, StateType};
