//! Lexical scopes and symbols produced by the semantic pass.
//!
//! The upstream pass builds a [`ScopeTree`] while annotating the program and
//! records a [`ScopeId`] on every scope-introducing node. The synthesizer only
//! reads it: it mirrors the tree with its own stack of current scopes and
//! queries the tree to decide how an identifier is accessed.

use rustc_hash::FxHashMap;

use crate::{Span, SynthesisError, TypeHash};

/// Index of a scope in its [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

/// What introduced a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Bot-level declarations.
    Global,
    /// Top-level declarations of one dialogue block.
    Dialogue,
    /// Function or event-handler body.
    Function,
    /// Any nested block, statement or parameter list.
    Block,
}

/// A name bound in some scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: TypeHash,
    /// Scope the symbol is declared in.
    pub scope: ScopeId,
}

#[derive(Debug)]
struct ScopeData {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    symbols: FxHashMap<String, Symbol>,
}

/// Arena of lexical scopes.
#[derive(Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Construction (upstream pass)
    // ==========================================================================

    /// Add a scope nested in `parent`.
    pub fn add_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData {
            kind,
            parent,
            symbols: FxHashMap::default(),
        });
        id
    }

    /// Bind `name` in `scope`, replacing any earlier binding of the same name
    /// in that scope.
    pub fn define(&mut self, scope: ScopeId, name: impl Into<String>, ty: TypeHash) {
        let name = name.into();
        let symbol = Symbol {
            name: name.clone(),
            ty,
            scope,
        };
        self.data_mut(scope).symbols.insert(name, symbol);
    }

    // ==========================================================================
    // Queries (synthesizer)
    // ==========================================================================

    pub fn kind(&self, scope: ScopeId) -> ScopeKind {
        self.data(scope).kind
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.data(scope).parent
    }

    /// Look `name` up in `scope` only, ignoring enclosing scopes.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.data(scope).symbols.get(name)
    }

    /// Resolve `name` starting at `scope` and walking outwards.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = self.data(id);
            if let Some(symbol) = data.symbols.get(name) {
                return Some(symbol);
            }
            current = data.parent;
        }
        None
    }

    /// Like [`resolve`](Self::resolve) but treats a miss as an input-contract
    /// violation.
    pub fn expect(&self, scope: ScopeId, name: &str, span: Span) -> Result<&Symbol, SynthesisError> {
        self.resolve(scope, name)
            .ok_or_else(|| SynthesisError::UnresolvedSymbol {
                name: name.to_string(),
                span,
            })
    }

    /// Whether `inner` is `outer` or nested inside it.
    pub fn is_within(&self, inner: ScopeId, outer: ScopeId) -> bool {
        let mut current = Some(inner);
        while let Some(id) = current {
            if id == outer {
                return true;
            }
            current = self.data(id).parent;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    // Scope ids are only ever handed out by `add_scope`, so indexing cannot
    // go out of bounds for ids from this tree.
    fn data(&self, scope: ScopeId) -> &ScopeData {
        &self.scopes[scope.0 as usize]
    }

    fn data_mut(&mut self, scope: ScopeId) -> &mut ScopeData {
        &mut self.scopes[scope.0 as usize]
    }
}
