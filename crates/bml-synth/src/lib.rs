//! Java code synthesis for annotated BML programs.
//!
//! This crate lowers a program tree that the semantic pass has fully
//! annotated with types and scopes into edits of a fixed set of Java
//! scaffold units, plus one new unit per dialogue state.
//!
//! ## Structure
//!
//! - [`context`]: per-run traversal state (scopes, site, imports)
//! - [`expr`] and [`stmt`]: expression and statement lowering
//! - [`generators`]: component-specific lowering
//! - [`bot`]: bot head, components, globals and event handlers
//! - [`dialogue`]: dialogue automata, their states and transitions
//! - [`scaffold`]: staged edits and the final commit to disk
//!
//! ## Example
//!
//! ```ignore
//! let config = SynthesisConfig::default();
//! let set = synthesize(&program, &scopes, &registry, &config)?;
//! set.commit(&config)?;
//! ```

pub mod bot;
pub mod config;
pub mod context;
pub mod dialogue;
pub mod expr;
pub mod generators;
pub mod imports;
pub mod scaffold;
pub mod scope;
pub mod stmt;
mod synthesizer;

pub use config::{ScaffoldKind, SynthesisConfig};
pub use context::{Site, SynthesisContext};
pub use dialogue::DialogueSynthesizer;
pub use expr::ExprLowerer;
pub use generators::{Generator, GeneratorRegistry};
pub use imports::ImportSet;
pub use scaffold::{ScaffoldEdit, ScaffoldSet};
pub use scope::ScopeStack;
pub use stmt::StmtLowerer;
pub use synthesizer::{Synthesizer, synthesize};
