//! BML transpiler.
//!
//! Compiles a type-annotated BML program into the Java sources of a chat bot
//! by extending a set of scaffold units and generating one class per dialogue
//! state.
//!
//! Parsing and semantic analysis happen upstream: the input is a fully
//! resolved [`ast::Program`] together with the [`ScopeTree`] and
//! [`TypeRegistry`] built while annotating it.
//!
//! ```ignore
//! use bml_transpiler::prelude::*;
//!
//! let transpiler = Transpiler::from_config_file("synth.json")?;
//! let written = transpiler.run(&program, &scopes, &registry)?;
//! ```

use std::path::{Path, PathBuf};

use tracing::info;

pub use bml_ast as ast;
pub use bml_core::{
    BmlType, ComponentKind, ScaffoldError, ScopeId, ScopeKind, ScopeTree, Span, StateAction,
    StateType, Symbol, SynthesisError, TranspileError, TypeHash, primitives,
};
pub use bml_registry::TypeRegistry;
pub use bml_synth::{ScaffoldKind, ScaffoldSet, SynthesisConfig, Synthesizer};
pub use bml_target as java;

pub type Result<T> = std::result::Result<T, TranspileError>;

/// Runs synthesis and commits its output under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Transpiler {
    config: SynthesisConfig,
}

impl Transpiler {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    /// Load the configuration from a JSON file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(SynthesisConfig::from_json_file(path)?))
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Lower `program` without touching the file system.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn synthesize(
        &self,
        program: &ast::Program<'_>,
        scopes: &ScopeTree,
        registry: &TypeRegistry,
    ) -> Result<ScaffoldSet> {
        Ok(Synthesizer::new(scopes, registry, &self.config).synthesize(program)?)
    }

    /// Lower `program` and write the result. Returns the written files.
    ///
    /// Nothing is written unless the whole program lowers and every touched
    /// scaffold loads and patches cleanly.
    pub fn run(
        &self,
        program: &ast::Program<'_>,
        scopes: &ScopeTree,
        registry: &TypeRegistry,
    ) -> Result<Vec<PathBuf>> {
        let set = self.synthesize(program, scopes, registry)?;
        let written = set.commit(&self.config)?;
        info!(root = %self.config.output_root.display(), files = written.len(), "transpilation finished");
        Ok(written)
    }
}

pub mod prelude {
    pub use crate::ast::{AstBuilder, Program};
    pub use crate::{
        BmlType, ScaffoldKind, ScaffoldSet, ScopeTree, SynthesisConfig, TranspileError,
        Transpiler, TypeRegistry,
    };
}
