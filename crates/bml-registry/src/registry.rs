//! TypeRegistry - canonical storage for resolved BML types.
//!
//! Every type the synthesizer meets is interned here under its structural
//! [`TypeHash`]. Interning the same shape twice yields the same entry, so the
//! rest of the pipeline can compare and look types up by hash alone.
//!
//! The registry also owns the mapping from BML types to Java types, which is
//! the only place that knows how a `list<number>` is spelled in the target.
//!
//! # Example
//!
//! ```
//! use bml_core::{BmlType, primitives};
//! use bml_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::with_builtins();
//! let list = registry.canonicalize(&BmlType::List(primitives::NUMBER));
//! assert_eq!(registry.type_name(list), "list<number>");
//! ```

use rustc_hash::FxHashMap;

use bml_core::{BmlType, ComponentKind, Span, SynthesisError, TypeHash};
use bml_target::TypeRef;

/// Interned BML types keyed by structural hash.
///
/// A registry is owned by one synthesis run; it is never shared between runs.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: FxHashMap<TypeHash, BmlType>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every primitive and component type interned.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for ty in [
            BmlType::Boolean,
            BmlType::Number,
            BmlType::Float,
            BmlType::String,
            BmlType::Void,
            BmlType::Intent,
        ] {
            registry.canonicalize(&ty);
        }
        for kind in ComponentKind::ALL {
            registry.canonicalize(&BmlType::Component(kind));
        }
        registry
    }

    // ==========================================================================
    // Interning
    // ==========================================================================

    /// Intern `ty` and return its canonical hash.
    ///
    /// Idempotent: structurally equal types always return the same hash and
    /// share one stored entry.
    pub fn canonicalize(&mut self, ty: &BmlType) -> TypeHash {
        let hash = ty.type_hash();
        let stored = self.types.entry(hash).or_insert_with(|| ty.clone());
        debug_assert_eq!(&*stored, ty, "type hash collision on {}", hash);
        hash
    }

    pub fn get(&self, hash: TypeHash) -> Option<&BmlType> {
        self.types.get(&hash)
    }

    /// Look a type up, treating a miss as an input-contract violation.
    pub fn expect(&self, hash: TypeHash, span: Span) -> Result<&BmlType, SynthesisError> {
        self.get(hash)
            .ok_or(SynthesisError::MissingType { hash, span })
    }

    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Human-readable BML spelling of a type, for diagnostics.
    pub fn type_name(&self, hash: TypeHash) -> String {
        match self.get(hash) {
            None => hash.to_string(),
            Some(BmlType::List(elem)) => format!("list<{}>", self.type_name(*elem)),
            Some(BmlType::Map { key, value }) => {
                format!("map<{}, {}>", self.type_name(*key), self.type_name(*value))
            }
            Some(BmlType::Function { params, ret }) => {
                let params: Vec<_> = params.iter().map(|p| self.type_name(*p)).collect();
                format!("function({}) -> {}", params.join(", "), self.type_name(*ret))
            }
            Some(BmlType::State(state)) => format!("state<{}>", state.intent),
            Some(other) => other.kind_name().to_string(),
        }
    }

    // ==========================================================================
    // Target Mapping
    // ==========================================================================

    /// The Java type a value of `hash` is declared with.
    pub fn target_type_for(&self, hash: TypeHash, span: Span) -> Result<TypeRef, SynthesisError> {
        let ty = self.expect(hash, span)?;
        let target = match ty {
            BmlType::Boolean => TypeRef::Boolean,
            BmlType::Number => TypeRef::Long,
            BmlType::Float => TypeRef::Double,
            BmlType::String | BmlType::Intent => TypeRef::class("String"),
            BmlType::Void => TypeRef::Void,
            BmlType::List(elem) => {
                TypeRef::generic("List", vec![self.target_type_for(*elem, span)?.boxed()])
            }
            BmlType::Map { key, value } => TypeRef::generic(
                "Map",
                vec![
                    self.target_type_for(*key, span)?.boxed(),
                    self.target_type_for(*value, span)?.boxed(),
                ],
            ),
            BmlType::Function { params, ret } => {
                let ret_ty = self.target_type_for(*ret, span)?;
                match params.as_slice() {
                    [] if ret_ty == TypeRef::Void => TypeRef::class("Runnable"),
                    [] => TypeRef::generic("Supplier", vec![ret_ty.boxed()]),
                    [param] => {
                        let param_ty = self.target_type_for(*param, span)?.boxed();
                        if ret_ty == TypeRef::Void {
                            TypeRef::generic("Consumer", vec![param_ty])
                        } else {
                            TypeRef::generic("Function", vec![param_ty, ret_ty.boxed()])
                        }
                    }
                    _ => {
                        return Err(SynthesisError::UnmappedType {
                            type_name: self.type_name(hash),
                            span,
                        });
                    }
                }
            }
            BmlType::Component(kind) => TypeRef::class(kind.bot_class()),
            BmlType::State(_) => TypeRef::class("State"),
        };
        Ok(target)
    }

    /// The atomic wrapper for a thread-shared global of type `hash`, if any.
    pub fn atomic_type_for(&self, hash: TypeHash) -> Option<TypeRef> {
        match self.get(hash)? {
            BmlType::Boolean => Some(TypeRef::class("AtomicBoolean")),
            BmlType::Number => Some(TypeRef::class("AtomicLong")),
            _ => None,
        }
    }

    /// Whether a global of type `hash` needs atomic access.
    pub fn is_thread_shared(&self, hash: TypeHash) -> bool {
        self.get(hash).is_some_and(BmlType::is_thread_shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bml_core::{StateAction, StateType, primitives};

    fn map_of_lists(registry: &mut TypeRegistry) -> BmlType {
        let list = registry.canonicalize(&BmlType::List(primitives::NUMBER));
        BmlType::Map {
            key: primitives::STRING,
            value: list,
        }
    }

    #[test]
    fn builtins_are_present() {
        let registry = TypeRegistry::with_builtins();
        assert!(registry.contains(primitives::NUMBER));
        assert!(registry.contains(ComponentKind::Telegram.type_hash()));
        assert_eq!(registry.len(), 6 + ComponentKind::ALL.len());
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let mut registry = TypeRegistry::with_builtins();
        let ty = map_of_lists(&mut registry);

        let first = registry.canonicalize(&ty);
        let stored = registry.get(first).unwrap().clone();
        assert_eq!(registry.canonicalize(&stored), first);
    }

    #[test]
    fn independent_constructions_share_one_entry() {
        let mut registry = TypeRegistry::with_builtins();
        let a = map_of_lists(&mut registry);
        let b = map_of_lists(&mut registry);
        let before = registry.len();

        let ha = registry.canonicalize(&a);
        let hb = registry.canonicalize(&b);

        assert_eq!(ha, hb);
        assert_eq!(registry.len(), before + 1);
        assert!(std::ptr::eq(registry.get(ha).unwrap(), registry.get(hb).unwrap()));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "type hash collision")]
    fn colliding_hash_is_caught() {
        let mut registry = TypeRegistry::with_builtins();
        let list = BmlType::List(primitives::STRING);
        registry.types.insert(list.type_hash(), BmlType::List(primitives::NUMBER));
        registry.canonicalize(&list);
    }

    #[test]
    fn canonicalization_is_order_independent() {
        let mut forward = TypeRegistry::new();
        let list = forward.canonicalize(&BmlType::List(primitives::STRING));
        let map = forward.canonicalize(&BmlType::Map {
            key: primitives::STRING,
            value: list,
        });

        let mut backward = TypeRegistry::new();
        let map_first = backward.canonicalize(&BmlType::Map {
            key: primitives::STRING,
            value: BmlType::List(primitives::STRING).type_hash(),
        });
        let list_second = backward.canonicalize(&BmlType::List(primitives::STRING));

        assert_eq!(map, map_first);
        assert_eq!(list, list_second);
    }

    #[test]
    fn target_types_for_collections_box_their_arguments() {
        let mut registry = TypeRegistry::with_builtins();
        let ty = map_of_lists(&mut registry);
        let hash = registry.canonicalize(&ty);

        let target = registry.target_type_for(hash, Span::default()).unwrap();
        assert_eq!(target.to_string(), "Map<String, List<Long>>");
    }

    #[test]
    fn function_types_map_to_functional_interfaces() {
        let mut registry = TypeRegistry::with_builtins();
        let runnable = registry.canonicalize(&BmlType::Function {
            params: vec![],
            ret: primitives::VOID,
        });
        let consumer = registry.canonicalize(&BmlType::Function {
            params: vec![primitives::STRING],
            ret: primitives::VOID,
        });
        let function = registry.canonicalize(&BmlType::Function {
            params: vec![primitives::NUMBER],
            ret: primitives::BOOLEAN,
        });
        let span = Span::default();

        assert_eq!(registry.target_type_for(runnable, span).unwrap().to_string(), "Runnable");
        assert_eq!(
            registry.target_type_for(consumer, span).unwrap().to_string(),
            "Consumer<String>"
        );
        assert_eq!(
            registry.target_type_for(function, span).unwrap().to_string(),
            "Function<Long, Boolean>"
        );
    }

    #[test]
    fn binary_function_type_is_unmapped() {
        let mut registry = TypeRegistry::with_builtins();
        let hash = registry.canonicalize(&BmlType::Function {
            params: vec![primitives::NUMBER, primitives::NUMBER],
            ret: primitives::NUMBER,
        });

        let err = registry.target_type_for(hash, Span::new(2, 5, 3)).unwrap_err();
        assert!(matches!(err, SynthesisError::UnmappedType { ref type_name, .. }
            if type_name == "function(number, number) -> number"));
    }

    #[test]
    fn missing_child_type_is_reported() {
        let mut registry = TypeRegistry::new();
        let hash = registry.canonicalize(&BmlType::List(primitives::NUMBER));

        let err = registry.target_type_for(hash, Span::default()).unwrap_err();
        assert!(matches!(err, SynthesisError::MissingType { hash: h, .. } if h == primitives::NUMBER));
    }

    #[test]
    fn domain_types() {
        let mut registry = TypeRegistry::with_builtins();
        let state = registry.canonicalize(&BmlType::State(StateType::new(
            "greet",
            StateAction::Literal("Hi".into()),
        )));
        let span = Span::default();

        assert_eq!(registry.target_type_for(state, span).unwrap(), TypeRef::class("State"));
        assert_eq!(
            registry
                .target_type_for(ComponentKind::EventContext.type_hash(), span)
                .unwrap(),
            TypeRef::class("MessageEventContext")
        );
        assert_eq!(
            registry.target_type_for(primitives::INTENT, span).unwrap(),
            TypeRef::class("String")
        );
    }

    #[test]
    fn only_boolean_and_number_have_atomic_wrappers() {
        let registry = TypeRegistry::with_builtins();
        assert_eq!(
            registry.atomic_type_for(primitives::NUMBER),
            Some(TypeRef::class("AtomicLong"))
        );
        assert_eq!(
            registry.atomic_type_for(primitives::BOOLEAN),
            Some(TypeRef::class("AtomicBoolean"))
        );
        assert_eq!(registry.atomic_type_for(primitives::FLOAT), None);
        assert!(!registry.is_thread_shared(primitives::STRING));
    }
}
