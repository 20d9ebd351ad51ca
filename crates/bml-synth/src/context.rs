//! Synthesis context shared by every lowering pass of one run.
//!
//! The context owns the traversal state: the [`ScopeStack`], the current
//! emission [`Site`] (which decides how dialogue fields are reached), the
//! imports recorded for the unit being built and the synthetic names that
//! are live in the current subtree. The registries it reads are borrowed for
//! the whole run.

use bml_core::{BmlType, ScopeId, ScopeTree, Span, Symbol, SynthesisError, TypeHash};
use bml_registry::TypeRegistry;
use bml_target::{Expr, TypeRef};

use crate::config::{ScaffoldKind, SynthesisConfig};
use crate::generators::GeneratorRegistry;
use crate::imports::ImportSet;
use crate::scope::ScopeStack;

pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Name of the automaton reference inside actions and state classes.
pub const AUTOMATON_VAR: &str = "dialogueAutomaton";

/// Where the code being lowered will live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    /// Static members of the configuration unit.
    Config,
    /// Static members of the event handlers unit.
    Handlers,
    /// Instance members of the automaton (`this` is the automaton).
    Automaton,
    /// Static action methods (automaton fetched from the event context).
    Action,
    /// State classes (automaton held in a field).
    State,
}

/// How an identifier is bound, in lowering priority order.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
    /// Bot-level boolean/number global, accessed atomically.
    SharedGlobal(&'a Symbol),
    /// Dialogue-level field of the automaton.
    DialogueField(&'a Symbol),
    /// Any other bot-level name.
    Global(&'a Symbol),
    /// Function parameter or local variable.
    Local(&'a Symbol),
}

pub struct SynthesisContext<'a> {
    scopes: &'a ScopeTree,
    registry: &'a TypeRegistry,
    config: &'a SynthesisConfig,
    generators: GeneratorRegistry,
    stack: ScopeStack,
    site: Site,
    /// Set when lowered code referenced the automaton receiver.
    automaton_access: bool,
    imports: ImportSet,
    synthetic: Vec<String>,
}

impl<'a> SynthesisContext<'a> {
    pub fn new(
        scopes: &'a ScopeTree,
        registry: &'a TypeRegistry,
        config: &'a SynthesisConfig,
        global: ScopeId,
    ) -> Self {
        Self {
            scopes,
            registry,
            config,
            generators: GeneratorRegistry::new(),
            stack: ScopeStack::new(global),
            site: Site::Handlers,
            automaton_access: false,
            imports: ImportSet::new(),
            synthetic: Vec::new(),
        }
    }

    pub fn scopes(&self) -> &'a ScopeTree {
        self.scopes
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    pub fn config(&self) -> &'a SynthesisConfig {
        self.config
    }

    pub fn generators(&self) -> GeneratorRegistry {
        self.generators
    }

    pub fn stack(&self) -> &ScopeStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut ScopeStack {
        &mut self.stack
    }

    pub fn current_scope(&self) -> ScopeId {
        self.stack.current()
    }

    // ==========================================================================
    // Scope & site management
    // ==========================================================================

    /// Run `f` with `scope` pushed; the scope is popped even when `f` fails.
    pub fn with_scope<T>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.stack.push(scope);
        let result = f(self);
        self.stack.pop();
        result
    }

    /// Run `f` with the emission site set to `site`.
    pub fn with_site<T>(&mut self, site: Site, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let previous = std::mem::replace(&mut self.site, site);
        let result = f(self);
        self.site = previous;
        result
    }

    pub fn site(&self) -> Site {
        self.site
    }

    /// Whether the automaton receiver was referenced since the last call.
    pub fn take_automaton_access(&mut self) -> bool {
        std::mem::take(&mut self.automaton_access)
    }

    /// The expression reaching the automaton from the current site.
    pub fn automaton_receiver(&mut self, name: &str, span: Span) -> Result<Expr> {
        let receiver = match self.site {
            Site::Automaton => Expr::This,
            Site::Action | Site::State => Expr::name(AUTOMATON_VAR),
            Site::Config | Site::Handlers => {
                return Err(SynthesisError::unsupported(
                    format!("dialogue field '{}' used outside its dialogue", name),
                    span,
                ));
            }
        };
        self.automaton_access = true;
        Ok(receiver)
    }

    // ==========================================================================
    // Name resolution
    // ==========================================================================

    /// Classify `name` for lowering.
    ///
    /// Thread-shared globals win over dialogue fields, which win over plain
    /// references, regardless of shadowing in inner scopes.
    pub fn binding(&self, name: &str, span: Span) -> Result<Binding<'a>> {
        let global = self.stack.global();
        if let Some(symbol) = self.scopes.lookup_local(global, name)
            && self.registry.is_thread_shared(symbol.ty)
        {
            return Ok(Binding::SharedGlobal(symbol));
        }

        if let Some(dialogue) = self.stack.dialogue()
            && let Some(symbol) = self.scopes.lookup_local(dialogue, name)
        {
            return Ok(Binding::DialogueField(symbol));
        }

        let symbol = self.scopes.expect(self.current_scope(), name, span)?;
        if symbol.scope == global {
            Ok(Binding::Global(symbol))
        } else {
            Ok(Binding::Local(symbol))
        }
    }

    /// Receiver qualifying a bot-level global from the current site.
    ///
    /// Components live in the configuration unit as constants, every other
    /// global in the event handlers unit.
    pub fn global_ref(&mut self, symbol: &Symbol) -> Expr {
        let is_component = self
            .registry
            .get(symbol.ty)
            .and_then(BmlType::as_component)
            .is_some();
        let (kind, home_site, name) = if is_component {
            (ScaffoldKind::Config, Site::Config, constant_name(&symbol.name))
        } else {
            (ScaffoldKind::Handlers, Site::Handlers, symbol.name.clone())
        };
        if self.site == home_site {
            return Expr::Name(name);
        }
        let class = self.config.class_name(kind);
        self.imports.require(&class);
        Expr::field(Expr::Name(class), name)
    }

    /// A name not bound anywhere in the current scope chain and not already
    /// taken by another synthetic binding: `base`, `base1`, `base2`, ...
    pub fn fresh_name(&self, base: &str) -> String {
        let current = self.current_scope();
        let taken = |candidate: &str| {
            self.scopes.resolve(current, candidate).is_some()
                || self.synthetic.iter().any(|s| s == candidate)
        };
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{}{}", base, i))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn push_synthetic(&mut self, name: String) {
        self.synthetic.push(name);
    }

    pub fn pop_synthetic(&mut self) {
        self.synthetic.pop();
    }

    // ==========================================================================
    // Types & imports
    // ==========================================================================

    pub fn bml_type(&self, ty: TypeHash, span: Span) -> Result<&'a BmlType> {
        self.registry.expect(ty, span)
    }

    /// Target type for `ty`, recording the classes it mentions.
    pub fn target_type(&mut self, ty: TypeHash, span: Span) -> Result<TypeRef> {
        let target = self.registry.target_type_for(ty, span)?;
        self.imports.require_type(&target);
        Ok(target)
    }

    pub fn require(&mut self, simple_name: &str) {
        self.imports.require(simple_name);
    }

    pub fn require_type(&mut self, ty: &TypeRef) {
        self.imports.require_type(ty);
    }

    pub fn imports_mut(&mut self) -> &mut ImportSet {
        &mut self.imports
    }

    /// Resolve and clear the imports recorded for a unit in `package`.
    pub fn take_imports(&mut self, package: &str) -> Vec<String> {
        self.imports.drain(self.config, package)
    }
}

/// `botToken` -> `BOTTOKEN`
pub fn constant_name(name: &str) -> String {
    name.to_uppercase()
}

/// `greet` -> `Greet`
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bml_core::{ScopeKind, primitives};

    fn fixture() -> (ScopeTree, TypeRegistry, SynthesisConfig, [ScopeId; 3]) {
        let mut tree = ScopeTree::new();
        let global = tree.add_scope(ScopeKind::Global, None);
        let dialogue = tree.add_scope(ScopeKind::Dialogue, Some(global));
        let function = tree.add_scope(ScopeKind::Function, Some(dialogue));
        (
            tree,
            TypeRegistry::with_builtins(),
            SynthesisConfig::default(),
            [global, dialogue, function],
        )
    }

    #[test]
    fn shared_global_beats_dialogue_field() {
        let (mut tree, registry, config, [global, dialogue, function]) = fixture();
        tree.define(global, "count", primitives::NUMBER);
        tree.define(dialogue, "count", primitives::NUMBER);
        tree.define(function, "count", primitives::NUMBER);

        let mut ctx = SynthesisContext::new(&tree, &registry, &config, global);
        ctx.stack_mut().enter_dialogue(dialogue);
        ctx.stack_mut().push(function);

        assert!(matches!(ctx.binding("count", Span::default()), Ok(Binding::SharedGlobal(_))));
    }

    #[test]
    fn dialogue_field_beats_local_and_plain_global() {
        let (mut tree, registry, config, [global, dialogue, function]) = fixture();
        tree.define(global, "title", primitives::STRING);
        tree.define(dialogue, "title", primitives::STRING);
        tree.define(function, "title", primitives::STRING);
        tree.define(function, "other", primitives::STRING);

        let mut ctx = SynthesisContext::new(&tree, &registry, &config, global);
        ctx.stack_mut().enter_dialogue(dialogue);
        ctx.stack_mut().push(function);

        assert!(matches!(ctx.binding("title", Span::default()), Ok(Binding::DialogueField(_))));
        assert!(matches!(ctx.binding("other", Span::default()), Ok(Binding::Local(_))));
        assert!(matches!(
            ctx.binding("missing", Span::default()),
            Err(SynthesisError::UnresolvedSymbol { .. })
        ));
    }

    #[test]
    fn fresh_names_avoid_bound_and_synthetic_names() {
        let (mut tree, registry, config, [global, _, function]) = fixture();
        tree.define(function, "entry", primitives::STRING);

        let mut ctx = SynthesisContext::new(&tree, &registry, &config, global);
        ctx.stack_mut().push(function);
        let first = ctx.fresh_name("entry");
        assert_eq!(first, "entry1");
        ctx.push_synthetic(first);
        assert_eq!(ctx.fresh_name("entry"), "entry2");
        ctx.pop_synthetic();
        assert_eq!(ctx.fresh_name("entry"), "entry1");
    }

    #[test]
    fn automaton_receiver_depends_on_site() {
        let (tree, registry, config, [global, ..]) = fixture();
        let mut ctx = SynthesisContext::new(&tree, &registry, &config, global);

        let this = ctx.with_site(Site::Automaton, |ctx| ctx.automaton_receiver("x", Span::default()));
        assert_eq!(this.unwrap(), Expr::This);
        assert!(ctx.take_automaton_access());
        assert!(!ctx.take_automaton_access());

        let err = ctx.automaton_receiver("x", Span::default()).unwrap_err();
        assert!(matches!(err, SynthesisError::Unsupported { .. }));
    }

    #[test]
    fn name_helpers() {
        assert_eq!(constant_name("botName"), "BOTNAME");
        assert_eq!(capitalize("greet"), "Greet");
        assert_eq!(capitalize(""), "");
    }
}
