//! Bot head and body synthesis.
//!
//! - Head parameters become `public static final` constants of the
//!   configuration unit.
//! - Component declarations become constants holding the wired component
//!   instance, also in the configuration unit.
//! - Bot-level globals become static fields of the event handlers unit;
//!   boolean and number globals are wrapped in their atomic counterpart.
//! - Event handlers become static methods of the event handlers unit.

use tracing::debug;

use bml_ast::{Assignment, BotBody, BotHead, FunctionDef};
use bml_core::SynthesisError;
use bml_target::{self as java, Annotation, FieldDecl, MethodDecl, Modifiers, Parameter, TypeRef};

use crate::config::ScaffoldKind;
use crate::context::{Result, Site, SynthesisContext, constant_name};
use crate::expr::{ExprLowerer, lower_expr};
use crate::scaffold::ScaffoldSet;
use crate::stmt::lower_function_body;

/// Annotation marking event-handler methods in the generated bot.
pub const EVENT_HANDLER_ANNOTATION: &str = "EventHandler";

/// Lower the bot head and the bot body into their scaffold edits.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn synthesize_bot(
    ctx: &mut SynthesisContext<'_>,
    head: &BotHead<'_>,
    body: &BotBody<'_>,
    set: &mut ScaffoldSet,
) -> Result<()> {
    ctx.with_site(Site::Config, |ctx| {
        ctx.with_scope(head.scope, |ctx| synthesize_head(ctx, head, set))?;
        synthesize_components(ctx, body, set)
    })?;
    flush_imports(ctx, set, ScaffoldKind::Config);

    ctx.with_site(Site::Handlers, |ctx| {
        for global in body.globals {
            let field = synthesize_global(ctx, global)?;
            set.add_member(ScaffoldKind::Handlers, field);
        }
        for handler in body.handlers {
            let method = synthesize_handler(ctx, handler)?;
            set.add_member(ScaffoldKind::Handlers, method);
        }
        Ok(())
    })?;
    flush_imports(ctx, set, ScaffoldKind::Handlers);
    Ok(())
}

/// Move the imports recorded so far into the edits of `kind`.
pub(crate) fn flush_imports(ctx: &mut SynthesisContext<'_>, set: &mut ScaffoldSet, kind: ScaffoldKind) {
    let package = ctx.config().package_of(kind);
    for import in ctx.take_imports(&package) {
        set.add_import(kind, import);
    }
}

fn synthesize_head(ctx: &mut SynthesisContext<'_>, head: &BotHead<'_>, set: &mut ScaffoldSet) -> Result<()> {
    for param in head.params {
        let ty = ctx.target_type(param.value.ty, param.value.span)?;
        let value = lower_expr(ctx, param.value)?;
        let name = constant_name(param.name.name);
        debug!(constant = %name, "bot head parameter");
        set.add_member(
            ScaffoldKind::Config,
            FieldDecl::new(Modifiers::CONSTANT, ty, name, Some(value)),
        );
    }
    Ok(())
}

fn synthesize_components(ctx: &mut SynthesisContext<'_>, body: &BotBody<'_>, set: &mut ScaffoldSet) -> Result<()> {
    for decl in body.components {
        let generator = ctx
            .generators()
            .generator_for(ctx.registry(), decl.ty, decl.span)?;
        let instance = ctx.with_scope(decl.scope, |ctx| {
            generator.generate_component_instantiation(decl, &mut ExprLowerer::new(ctx))
        })?;
        let name = constant_name(decl.name.name);
        debug!(component = %name, class = generator.bot_class(), "component");
        set.add_member(
            ScaffoldKind::Config,
            FieldDecl::new(
                Modifiers::CONSTANT,
                TypeRef::class(generator.bot_class()),
                name,
                Some(instance),
            ),
        );
    }
    Ok(())
}

fn synthesize_global(ctx: &mut SynthesisContext<'_>, global: &Assignment<'_>) -> Result<FieldDecl> {
    let name = global.target.name;
    if !global.declares || global.op.is_compound() {
        return Err(SynthesisError::unsupported(
            format!("bot-level statement '{} {} ...' outside a handler", name, global.op),
            global.span,
        ));
    }

    let value = lower_expr(ctx, global.value)?;
    let registry = ctx.registry();
    if let Some(atomic) = registry.atomic_type_for(global.value.ty) {
        ctx.require_type(&atomic);
        let init = java::Expr::new_object(atomic.clone(), vec![value]);
        return Ok(FieldDecl::new(Modifiers::CONSTANT, atomic, name, Some(init)));
    }

    let ty = ctx.target_type(global.value.ty, global.value.span)?;
    Ok(FieldDecl::new(Modifiers::PUBLIC_STATIC, ty, name, Some(value)))
}

fn synthesize_handler(ctx: &mut SynthesisContext<'_>, handler: &FunctionDef<'_>) -> Result<MethodDecl> {
    let body = lower_function_body(ctx, handler)?;
    ctx.require("MessageEventContext");

    let mut method = MethodDecl::new(
        Modifiers::PUBLIC_STATIC,
        TypeRef::Void,
        handler.name.name,
        vec![Parameter::new(TypeRef::class("MessageEventContext"), handler.context.name)],
        body,
    );
    if let Some(annotation) = handler.annotation {
        ctx.require(EVENT_HANDLER_ANNOTATION);
        method = method.with_annotation(Annotation::single(
            EVENT_HANDLER_ANNOTATION,
            java::Expr::string(annotation.name),
        ));
    }
    debug!(handler = handler.name.name, "event handler");
    Ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthesisConfig;
    use bml_ast::{AssignOp, AstBuilder};
    use bml_core::{ComponentKind, ScopeKind, ScopeTree, primitives};
    use bml_registry::TypeRegistry;
    use bumpalo::Bump;

    fn members(set: &ScaffoldSet, kind: ScaffoldKind) -> Vec<String> {
        set.members(kind).map(|m| m.to_string()).collect()
    }

    #[test]
    fn head_and_components_land_in_config() {
        let mut tree = ScopeTree::new();
        let global = tree.add_scope(ScopeKind::Global, None);
        let registry = TypeRegistry::with_builtins();
        let config = SynthesisConfig::default();
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let head = b.bot_head(&[("name", b.string("Helper")), ("retries", b.int(3))], global);
        let telegram = b.component(
            ComponentKind::Telegram.type_hash(),
            "telegram",
            &[("botToken", b.string("t0k")), ("botName", b.string("helper_bot"))],
            global,
        );
        let body = b.bot_body(&[telegram], &[], &[]);

        let mut ctx = SynthesisContext::new(&tree, &registry, &config, global);
        let mut set = ScaffoldSet::new();
        synthesize_bot(&mut ctx, &head, &body, &mut set).unwrap();

        assert_eq!(
            members(&set, ScaffoldKind::Config),
            [
                "public static final String NAME = \"Helper\";",
                "public static final long RETRIES = 3L;",
                "public static final TelegramComponent TELEGRAM = new TelegramComponent(\"t0k\", \"helper_bot\");",
            ]
        );
        assert_eq!(
            set.imports(ScaffoldKind::Config).collect::<Vec<_>>(),
            ["bot.components.TelegramComponent"]
        );
    }

    #[test]
    fn optional_component_parameters_default_to_null() {
        let mut tree = ScopeTree::new();
        let global = tree.add_scope(ScopeKind::Global, None);
        let registry = TypeRegistry::with_builtins();
        let config = SynthesisConfig::default();
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let head = b.bot_head(&[], global);
        let rasa = b.component(ComponentKind::Rasa.type_hash(), "rasa", &[("url", b.string("http://nlu"))], global);
        let body = b.bot_body(&[rasa], &[], &[]);

        let mut ctx = SynthesisContext::new(&tree, &registry, &config, global);
        let mut set = ScaffoldSet::new();
        synthesize_bot(&mut ctx, &head, &body, &mut set).unwrap();
        assert_eq!(
            members(&set, ScaffoldKind::Config),
            ["public static final RasaComponent RASA = new RasaComponent(\"http://nlu\", null);"]
        );

        let missing = b.component(ComponentKind::Telegram.type_hash(), "telegram", &[("botToken", b.string("x"))], global);
        let body = b.bot_body(&[missing], &[], &[]);
        let err = synthesize_bot(&mut ctx, &head, &body, &mut ScaffoldSet::new()).unwrap_err();
        assert!(
            matches!(err, SynthesisError::ComponentParameter { ref parameter, .. } if parameter == "botName")
        );
    }

    #[test]
    fn globals_and_handlers_land_in_event_handlers() {
        let mut tree = ScopeTree::new();
        let global = tree.add_scope(ScopeKind::Global, None);
        let handler_scope = tree.add_scope(ScopeKind::Function, Some(global));
        tree.define(global, "count", primitives::NUMBER);
        tree.define(global, "motd", primitives::STRING);
        tree.define(handler_scope, "context", ComponentKind::EventContext.type_hash());
        let registry = TypeRegistry::with_builtins();
        let config = SynthesisConfig::default();
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let bump = b.assign("count", AssignOp::AddAssign, b.int(1), false, handler_scope);
        let handler = b.function(
            Some("onMessage"),
            "greet",
            "context",
            b.block(&[bump], handler_scope),
            handler_scope,
        );
        let body = b.bot_body(
            &[],
            &[b.declare("count", b.int(0)), b.declare("motd", b.string("hi"))],
            &[handler],
        );
        let head = b.bot_head(&[], global);

        let mut ctx = SynthesisContext::new(&tree, &registry, &config, global);
        let mut set = ScaffoldSet::new();
        synthesize_bot(&mut ctx, &head, &body, &mut set).unwrap();

        assert_eq!(
            members(&set, ScaffoldKind::Handlers),
            [
                "public static final AtomicLong count = new AtomicLong(0L);",
                "public static String motd = \"hi\";",
                "@EventHandler(\"onMessage\")\npublic static void greet(MessageEventContext context) {\n    count.accumulateAndGet(1L, (a, b) -> a + b);\n}",
            ]
        );
        let imports: Vec<_> = set.imports(ScaffoldKind::Handlers).collect();
        assert_eq!(imports, ["java.util.concurrent.atomic.AtomicLong"]);
    }

    #[test]
    fn bot_level_reassignment_is_unsupported() {
        let mut tree = ScopeTree::new();
        let global = tree.add_scope(ScopeKind::Global, None);
        tree.define(global, "count", primitives::NUMBER);
        let registry = TypeRegistry::with_builtins();
        let config = SynthesisConfig::default();
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let body = b.bot_body(&[], &[b.assignment("count", AssignOp::Assign, b.int(2), false)], &[]);
        let mut ctx = SynthesisContext::new(&tree, &registry, &config, global);
        let err = synthesize_bot(&mut ctx, &b.bot_head(&[], global), &body, &mut ScaffoldSet::new()).unwrap_err();
        assert!(matches!(err, SynthesisError::Unsupported { .. }));
    }
}
