//! Error types for the BML transpiler.
//!
//! Every error here is fatal: synthesis is a deterministic batch transform,
//! so the only sensible reaction to a failure is to stop and report it.
//!
//! ## Error Hierarchy
//!
//! ```text
//! TranspileError (top-level wrapper)
//! ├── SynthesisError - input-contract violations and unsupported constructs
//! ├── ScaffoldError  - missing or unwritable scaffold units
//! └── Config         - unreadable synthesis configuration
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::{Span, TypeHash};

// ============================================================================
// Synthesis Errors
// ============================================================================

/// Errors raised while lowering the annotated tree.
///
/// Most variants indicate a bug in the upstream semantic pass (the tree was
/// supposed to be fully resolved and well-typed). `Unsupported` marks
/// constructs that are valid BML but have no lowering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthesisError {
    /// A node carries a type hash the registry does not know.
    #[error("at {span}: unresolved type {hash}")]
    MissingType { hash: TypeHash, span: Span },

    /// An identifier does not resolve in any enclosing scope.
    #[error("at {span}: unresolved symbol '{name}'")]
    UnresolvedSymbol { name: String, span: Span },

    /// A type has no target-language counterpart.
    #[error("at {span}: type '{type_name}' has no target type")]
    UnmappedType { type_name: String, span: Span },

    /// A type-specific operation was requested for a type without a generator.
    #[error("at {span}: no generator registered for type '{type_name}'")]
    NoGenerator { type_name: String, span: Span },

    /// A component field that the component kind does not expose.
    #[error("at {span}: '{component}' has no field '{field}'")]
    UnknownField {
        component: String,
        field: String,
        span: Span,
    },

    /// A component method that the component kind does not expose.
    #[error("at {span}: '{component}' has no method '{method}'")]
    UnknownMethod {
        component: String,
        method: String,
        span: Span,
    },

    /// A component declaration with a missing, unknown or mistyped parameter.
    #[error("at {span}: component '{component}' parameter '{parameter}': {message}")]
    ComponentParameter {
        component: String,
        parameter: String,
        message: String,
        span: Span,
    },

    /// An operand of the wrong shape (indexing a string, iterating a number).
    #[error("at {span}: {message}")]
    InvalidOperand { message: String, span: Span },

    /// Valid BML that this synthesizer cannot lower.
    #[error("at {span}: unsupported construct: {construct}")]
    Unsupported { construct: String, span: Span },

    /// A dialogue state whose payload cannot be compiled.
    #[error("at {span}: state '{name}': {message}")]
    InvalidState {
        name: String,
        message: String,
        span: Span,
    },

    /// A function-valued state action naming no dialogue function.
    #[error("at {span}: action function '{name}' is not declared in this dialogue")]
    UnknownAction { name: String, span: Span },

    /// Two dialogue states would be generated into the same class.
    #[error("at {span}: state class '{class_name}' generated twice")]
    DuplicateState { class_name: String, span: Span },

    /// Violated internal invariant.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl SynthesisError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            SynthesisError::MissingType { span, .. } => *span,
            SynthesisError::UnresolvedSymbol { span, .. } => *span,
            SynthesisError::UnmappedType { span, .. } => *span,
            SynthesisError::NoGenerator { span, .. } => *span,
            SynthesisError::UnknownField { span, .. } => *span,
            SynthesisError::UnknownMethod { span, .. } => *span,
            SynthesisError::ComponentParameter { span, .. } => *span,
            SynthesisError::InvalidOperand { span, .. } => *span,
            SynthesisError::Unsupported { span, .. } => *span,
            SynthesisError::InvalidState { span, .. } => *span,
            SynthesisError::UnknownAction { span, .. } => *span,
            SynthesisError::DuplicateState { span, .. } => *span,
            SynthesisError::Internal { .. } => Span::default(),
        }
    }

    pub fn unsupported(construct: impl Into<String>, span: Span) -> Self {
        SynthesisError::Unsupported {
            construct: construct.into(),
            span,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        SynthesisError::Internal {
            message: message.into(),
        }
    }
}

// ============================================================================
// Scaffold Errors
// ============================================================================

/// Errors raised while loading, patching or writing scaffold units.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaffoldError {
    /// The scaffold file does not exist.
    #[error("could not find {file} in {}", .dir.display())]
    NotFound { file: String, dir: PathBuf },

    /// The scaffold file does not declare the expected class.
    #[error("{}: class '{class}' not found", .path.display())]
    MissingClass { class: String, path: PathBuf },

    /// The scaffold class lacks a method the synthesizer rewrites.
    #[error("{}: method '{class}.{method}' not found", .path.display())]
    MissingMethod {
        class: String,
        method: String,
        path: PathBuf,
    },

    /// The scaffold source could not be scanned (unbalanced braces, ...).
    #[error("{}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },

    /// Reading or writing failed.
    #[error("error accessing {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

impl ScaffoldError {
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type of a transpilation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranspileError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),

    /// The synthesis configuration could not be loaded.
    #[error("invalid configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl TranspileError {
    pub fn is_synthesis(&self) -> bool {
        matches!(self, TranspileError::Synthesis(_))
    }

    pub fn is_scaffold(&self) -> bool {
        matches!(self, TranspileError::Scaffold(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_error_display_names_location() {
        let err = SynthesisError::unsupported("compound assignment to boolean global", Span::new(4, 2, 5));
        assert_eq!(
            err.to_string(),
            "at 4:2: unsupported construct: compound assignment to boolean global"
        );
        assert_eq!(err.span(), Span::new(4, 2, 5));
    }

    #[test]
    fn scaffold_error_names_path() {
        let err = ScaffoldError::NotFound {
            file: "BotConfig.java".into(),
            dir: PathBuf::from("bot"),
        };
        assert_eq!(err.to_string(), "could not find BotConfig.java in bot");
    }

    #[test]
    fn errors_convert_into_transpile_error() {
        let err: TranspileError = SynthesisError::internal("boom").into();
        assert!(err.is_synthesis());
        let err: TranspileError = ScaffoldError::Malformed {
            path: PathBuf::from("Actions.java"),
            message: "unbalanced braces".into(),
        }
        .into();
        assert!(err.is_scaffold());
        assert_eq!(err.to_string(), "Actions.java: unbalanced braces");
    }
}
