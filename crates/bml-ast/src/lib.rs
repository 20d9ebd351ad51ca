//! Annotated BML program tree.
//!
//! This is the contract between the upstream semantic pass and the
//! synthesizer. Nodes borrow from a [`bumpalo::Bump`] arena and are `Copy`;
//! every expression carries its resolved [`TypeHash`](bml_core::TypeHash) and
//! every scope-introducing node its [`ScopeId`](bml_core::ScopeId).
//!
//! # Example
//!
//! ```
//! use bml_ast::{AstBuilder, BinaryOp, ExprKind};
//! use bml_core::primitives;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let sum = b.binary(b.int(1), BinaryOp::Add, b.int(2), primitives::NUMBER);
//! assert!(matches!(sum.kind, ExprKind::Binary(_)));
//! ```

pub mod builder;
pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use stmt::*;
