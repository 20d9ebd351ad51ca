//! Whole-program synthesis.

use tracing::info;

use bml_ast::Program;
use bml_core::{ScopeTree, SynthesisError};
use bml_registry::TypeRegistry;

use crate::bot::synthesize_bot;
use crate::config::SynthesisConfig;
use crate::context::SynthesisContext;
use crate::dialogue::DialogueSynthesizer;
use crate::scaffold::ScaffoldSet;

/// One synthesis run over an annotated program.
///
/// The scope tree and type registry come from the semantic pass that
/// annotated the program; they are only read.
pub struct Synthesizer<'a> {
    scopes: &'a ScopeTree,
    registry: &'a TypeRegistry,
    config: &'a SynthesisConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(scopes: &'a ScopeTree, registry: &'a TypeRegistry, config: &'a SynthesisConfig) -> Self {
        Self {
            scopes,
            registry,
            config,
        }
    }

    /// Lower `program` into staged scaffold edits. Nothing is written.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn synthesize(&self, program: &Program<'_>) -> Result<ScaffoldSet, SynthesisError> {
        let mut ctx = SynthesisContext::new(self.scopes, self.registry, self.config, program.scope);
        let mut set = ScaffoldSet::new();

        synthesize_bot(&mut ctx, &program.head, &program.body, &mut set)?;

        let mut dialogues = DialogueSynthesizer::new();
        for dialogue in program.dialogues {
            dialogues.synthesize(&mut ctx, dialogue, &mut set)?;
        }
        dialogues.finish(&mut set);

        info!(
            components = program.body.components.len(),
            handlers = program.body.handlers.len(),
            dialogues = program.dialogues.len(),
            units = set.units().len(),
            "program synthesized"
        );
        Ok(set)
    }
}

/// Lower `program` with a fresh [`Synthesizer`].
pub fn synthesize(
    program: &Program<'_>,
    scopes: &ScopeTree,
    registry: &TypeRegistry,
    config: &SynthesisConfig,
) -> Result<ScaffoldSet, SynthesisError> {
    Synthesizer::new(scopes, registry, config).synthesize(program)
}
