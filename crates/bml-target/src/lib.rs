//! Java target syntax tree.
//!
//! The synthesizer builds [`CompilationUnit`]s, class members and statements
//! from these types; the [`printer`] turns them into source text. Nodes own
//! their children and derive `Eq + Hash` (float literals go through
//! [`ordered_float::OrderedFloat`]) so generated code can be compared
//! structurally in tests.

pub mod decl;
pub mod expr;
pub mod printer;
pub mod stmt;
pub mod types;

pub use decl::{
    Annotation, ClassDecl, CompilationUnit, ConstructorDecl, FieldDecl, Member, MethodDecl,
    Parameter,
};
pub use expr::{AssignOperator, BinaryOperator, Expr, UnaryOperator};
pub use printer::{Printer, escape_string};
pub use stmt::{Block, Stmt};
pub use types::{Modifiers, TypeRef};
