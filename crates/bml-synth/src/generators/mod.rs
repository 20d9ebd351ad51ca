//! Type-specific code generators.
//!
//! Component values (`context`, `user`, `Telegram`, ...) are opaque to the
//! generic lowering. Field access, method calls and instantiation on them are
//! delegated to a [`Generator`] picked by the value's type.
//!
//! Dispatch is closed: [`GeneratorRegistry::for_kind`] matches exhaustively
//! over [`ComponentKind`], so adding a kind without a generator fails to
//! compile. Non-component types have no generator.

mod component;
mod event_context;

use bml_ast::{CallExpr, ComponentDecl, Ident};
use bml_core::{BmlType, ComponentKind, Span, SynthesisError, TypeHash};
use bml_registry::TypeRegistry;
use bml_target::Expr;

use crate::context::Result;
use crate::expr::ExprLowerer;

pub use component::ComponentGenerator;
pub use event_context::EventContextGenerator;

/// Code generation strategy for one component kind.
pub trait Generator: Sync {
    fn kind(&self) -> ComponentKind;

    /// Runtime class backing the component in the generated bot.
    fn bot_class(&self) -> &'static str {
        self.kind().bot_class()
    }

    /// `new BotClass(args)` for a bot-body component declaration.
    fn generate_component_instantiation(
        &self,
        decl: &ComponentDecl<'_>,
        lowerer: &mut ExprLowerer<'_, '_>,
    ) -> Result<Expr>;

    /// `receiver.field` on a value of this kind.
    fn generate_field_access(&self, receiver: Expr, field: &Ident<'_>) -> Result<Expr>;

    /// `receiver.method(args)` on a value of this kind.
    fn generate_function_call(
        &self,
        receiver: Expr,
        call: &CallExpr<'_>,
        lowerer: &mut ExprLowerer<'_, '_>,
    ) -> Result<Expr>;
}

static EVENT_CONTEXT: EventContextGenerator = EventContextGenerator;
static USER: ComponentGenerator = ComponentGenerator::new(ComponentKind::User);
static MESSENGER: ComponentGenerator = ComponentGenerator::new(ComponentKind::Messenger);
static TELEGRAM: ComponentGenerator = ComponentGenerator::new(ComponentKind::Telegram);
static SLACK: ComponentGenerator = ComponentGenerator::new(ComponentKind::Slack);
static RASA: ComponentGenerator = ComponentGenerator::new(ComponentKind::Rasa);

/// Maps types to their generators.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorRegistry;

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn for_kind(&self, kind: ComponentKind) -> &'static dyn Generator {
        match kind {
            ComponentKind::EventContext => &EVENT_CONTEXT,
            ComponentKind::User => &USER,
            ComponentKind::Messenger => &MESSENGER,
            ComponentKind::Telegram => &TELEGRAM,
            ComponentKind::Slack => &SLACK,
            ComponentKind::Rasa => &RASA,
        }
    }

    /// The generator for values of type `ty`.
    pub fn generator_for(
        &self,
        registry: &TypeRegistry,
        ty: TypeHash,
        span: Span,
    ) -> Result<&'static dyn Generator> {
        match registry.expect(ty, span)? {
            BmlType::Component(kind) => Ok(self.for_kind(*kind)),
            _ => Err(SynthesisError::NoGenerator {
                type_name: registry.type_name(ty),
                span,
            }),
        }
    }

    /// Whether values of type `ty` are handled by a generator.
    pub fn has_generator(&self, registry: &TypeRegistry, ty: TypeHash) -> bool {
        matches!(registry.get(ty), Some(BmlType::Component(_)))
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// `getField` accessor name for a component field.
pub(crate) fn getter_name(field: &str) -> String {
    format!("get{}", crate::context::capitalize(field))
}

/// Field access through the component's getter, validated against its
/// field table.
pub(crate) fn field_getter(kind: ComponentKind, receiver: Expr, field: &Ident<'_>) -> Result<Expr> {
    if kind.field(field.name).is_none() {
        return Err(SynthesisError::UnknownField {
            component: kind.name().to_string(),
            field: field.name.to_string(),
            span: field.span,
        });
    }
    Ok(Expr::call(receiver, getter_name(field.name), Vec::new()))
}

/// Lower the arguments of a component method call, validated against its
/// method table.
pub(crate) fn method_args(
    kind: ComponentKind,
    call: &CallExpr<'_>,
    lowerer: &mut ExprLowerer<'_, '_>,
) -> Result<Vec<Expr>> {
    let Some(method) = kind.method(call.name.name) else {
        return Err(SynthesisError::UnknownMethod {
            component: kind.name().to_string(),
            method: call.name.name.to_string(),
            span: call.name.span,
        });
    };
    if method.params.len() != call.args.len() {
        return Err(SynthesisError::InvalidOperand {
            message: format!(
                "'{}.{}' takes {} argument(s), got {}",
                kind.name(),
                method.name,
                method.params.len(),
                call.args.len()
            ),
            span: call.span,
        });
    }
    lowerer.lower_args(call.args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bml_core::primitives;

    #[test]
    fn every_kind_has_a_matching_generator() {
        let generators = GeneratorRegistry::new();
        for kind in ComponentKind::ALL {
            let generator = generators.for_kind(kind);
            assert_eq!(generator.kind(), kind);
            assert_eq!(generator.bot_class(), kind.bot_class());
        }
    }

    #[test]
    fn non_component_types_have_no_generator() {
        let registry = TypeRegistry::with_builtins();
        let generators = GeneratorRegistry::new();

        let err = generators
            .generator_for(&registry, primitives::STRING, Span::new(1, 1, 1))
            .err()
            .unwrap();
        assert!(matches!(err, SynthesisError::NoGenerator { ref type_name, .. } if type_name == "string"));
        assert!(generators.has_generator(&registry, ComponentKind::User.type_hash()));
    }

    #[test]
    fn unknown_field_is_reported() {
        let field = Ident::new("password", Span::new(4, 9, 8));
        let err = field_getter(ComponentKind::User, Expr::name("user"), &field).unwrap_err();
        assert!(matches!(err, SynthesisError::UnknownField { ref field, .. } if field == "password"));
    }

    #[test]
    fn field_access_goes_through_getter() {
        let field = Ident::new("name", Span::default());
        let access = field_getter(ComponentKind::User, Expr::name("user"), &field).unwrap();
        assert_eq!(access.to_string(), "user.getName()");
    }
}
