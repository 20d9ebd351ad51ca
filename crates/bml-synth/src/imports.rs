//! Import bookkeeping for generated units.
//!
//! Lowering records the simple names of the classes it emits; when a unit is
//! finished the recorded names are resolved to fully qualified imports.
//! Names without a known home (`java.lang`, classes in the same package) are
//! dropped.

use std::collections::BTreeSet;

use bml_target::TypeRef;

use crate::config::{ScaffoldKind, SynthesisConfig};

/// Simple class names referenced by the unit being built.
#[derive(Debug, Default)]
pub struct ImportSet {
    names: BTreeSet<String>,
    explicit: BTreeSet<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reference to a class by simple name.
    pub fn require(&mut self, simple_name: &str) {
        if !self.names.contains(simple_name) {
            self.names.insert(simple_name.to_string());
        }
    }

    /// Record every class a type mentions.
    pub fn require_type(&mut self, ty: &TypeRef) {
        match ty {
            TypeRef::Class(name) => self.require(name),
            TypeRef::Generic { name, args } => {
                self.require(name);
                for arg in args {
                    self.require_type(arg);
                }
            }
            TypeRef::Var | TypeRef::Void | TypeRef::Boolean | TypeRef::Long | TypeRef::Double => {}
        }
    }

    /// Record a fully qualified import directly.
    pub fn require_qualified(&mut self, fqn: impl Into<String>) {
        self.explicit.insert(fqn.into());
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.explicit.is_empty()
    }

    /// Resolve and clear the recorded names.
    ///
    /// Imports from `package` itself are omitted. The result is sorted.
    pub fn drain(&mut self, config: &SynthesisConfig, package: &str) -> Vec<String> {
        let mut resolved: BTreeSet<String> = std::mem::take(&mut self.explicit);
        for name in std::mem::take(&mut self.names) {
            if let Some(fqn) = qualify(config, &name) {
                resolved.insert(fqn);
            }
        }
        resolved
            .into_iter()
            .filter(|fqn| fqn.rsplit_once('.').is_none_or(|(pkg, _)| pkg != package))
            .collect()
    }
}

/// Fully qualified name of a class the generated code may reference.
pub fn qualify(config: &SynthesisConfig, simple_name: &str) -> Option<String> {
    let package = match simple_name {
        "List" | "Map" | "Random" => "java.util".to_string(),
        "Supplier" | "Consumer" | "Function" => "java.util.function".to_string(),
        "AtomicLong" | "AtomicBoolean" => "java.util.concurrent.atomic".to_string(),
        "State" | "DialogueAutomaton" => config.package_of(ScaffoldKind::Automaton),
        "Actions" => config.package_of(ScaffoldKind::Actions),
        "BotConfig" => config.package_of(ScaffoldKind::Config),
        "MessageEventContext" | "MessageHelper" | "User" | "Messenger" | "EventHandler"
        | "EventHandlers" => config.package_of(ScaffoldKind::Handlers),
        "TelegramComponent" | "SlackComponent" | "RasaComponent" => config.components_package(),
        _ => return None,
    };
    if package.is_empty() {
        return None;
    }
    Some(format!("{}.{}", package, simple_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_sorted_and_skips_own_package() {
        let config = SynthesisConfig::default();
        let mut imports = ImportSet::new();
        imports.require_type(&TypeRef::generic("List", vec![TypeRef::class("String")]));
        imports.require("AtomicLong");
        imports.require("State");
        imports.require("MessageHelper");

        let drained = imports.drain(&config, "bot.dialogue");
        assert_eq!(
            drained,
            [
                "bot.events.MessageHelper",
                "java.util.List",
                "java.util.concurrent.atomic.AtomicLong",
            ]
        );
        assert!(imports.is_empty());
    }

    #[test]
    fn unknown_names_are_not_imported() {
        let config = SynthesisConfig::default();
        assert_eq!(qualify(&config, "String"), None);
        assert_eq!(qualify(&config, "GreetState"), None);
        assert_eq!(
            qualify(&config, "TelegramComponent").as_deref(),
            Some("bot.components.TelegramComponent")
        );
    }
}
