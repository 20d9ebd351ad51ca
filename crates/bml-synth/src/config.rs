//! Synthesis configuration.
//!
//! Names where the bot sources live and which scaffold units the synthesizer
//! patches. Unit paths are relative to [`SynthesisConfig::output_root`]; each
//! unit's Java package is derived from [`SynthesisConfig::base_package`] plus
//! the unit's directory, and its class name from the file stem.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bml_core::TranspileError;

/// The scaffold units the synthesizer extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScaffoldKind {
    /// Bot configuration constants and component wiring.
    Config,
    /// The dialogue automaton with its `init` method.
    Automaton,
    /// Static action methods called from dialogue states.
    Actions,
    /// Bot-level globals and event handlers.
    Handlers,
}

impl ScaffoldKind {
    pub const ALL: [ScaffoldKind; 4] = [
        ScaffoldKind::Config,
        ScaffoldKind::Automaton,
        ScaffoldKind::Actions,
        ScaffoldKind::Handlers,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Directory holding the bot sources.
    pub output_root: PathBuf,
    /// Java package of `output_root`.
    pub base_package: String,
    pub config_unit: PathBuf,
    pub automaton_unit: PathBuf,
    pub actions_unit: PathBuf,
    pub handlers_unit: PathBuf,
    /// Directory for generated state classes.
    pub states_dir: PathBuf,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("bot"),
            base_package: "bot".to_string(),
            config_unit: PathBuf::from("BotConfig.java"),
            automaton_unit: PathBuf::from("dialogue/DialogueAutomaton.java"),
            actions_unit: PathBuf::from("dialogue/Actions.java"),
            handlers_unit: PathBuf::from("events/EventHandlers.java"),
            states_dir: PathBuf::from("dialogue/states"),
        }
    }
}

impl SynthesisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TranspileError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| TranspileError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| TranspileError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_base_package(mut self, package: impl Into<String>) -> Self {
        self.base_package = package.into();
        self
    }

    pub fn with_states_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.states_dir = dir.into();
        self
    }

    pub fn with_unit(mut self, kind: ScaffoldKind, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match kind {
            ScaffoldKind::Config => self.config_unit = path,
            ScaffoldKind::Automaton => self.automaton_unit = path,
            ScaffoldKind::Actions => self.actions_unit = path,
            ScaffoldKind::Handlers => self.handlers_unit = path,
        }
        self
    }

    // ==========================================================================
    // Derived names
    // ==========================================================================

    /// Path of a scaffold unit relative to the output root.
    pub fn unit(&self, kind: ScaffoldKind) -> &Path {
        match kind {
            ScaffoldKind::Config => &self.config_unit,
            ScaffoldKind::Automaton => &self.automaton_unit,
            ScaffoldKind::Actions => &self.actions_unit,
            ScaffoldKind::Handlers => &self.handlers_unit,
        }
    }

    /// Absolute (root-joined) path of a scaffold unit.
    pub fn unit_path(&self, kind: ScaffoldKind) -> PathBuf {
        self.output_root.join(self.unit(kind))
    }

    /// Name of the class a scaffold unit declares.
    pub fn class_name(&self, kind: ScaffoldKind) -> String {
        self.unit(kind)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Java package of a scaffold unit.
    pub fn package_of(&self, kind: ScaffoldKind) -> String {
        self.package_for_dir(self.unit(kind).parent())
    }

    pub fn states_package(&self) -> String {
        self.package_for_dir(Some(&self.states_dir))
    }

    /// Package for classes the bot runtime keeps next to its components.
    pub fn components_package(&self) -> String {
        self.package_for_dir(Some(Path::new("components")))
    }

    fn package_for_dir(&self, dir: Option<&Path>) -> String {
        let mut package = self.base_package.clone();
        for part in dir.into_iter().flat_map(Path::components) {
            let part = part.as_os_str().to_string_lossy();
            if package.is_empty() {
                package.push_str(&part);
            } else {
                package.push('.');
                package.push_str(&part);
            }
        }
        package
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_unit_names_and_packages() {
        let config = SynthesisConfig::default();
        assert_eq!(config.class_name(ScaffoldKind::Automaton), "DialogueAutomaton");
        assert_eq!(config.package_of(ScaffoldKind::Automaton), "bot.dialogue");
        assert_eq!(config.package_of(ScaffoldKind::Config), "bot");
        assert_eq!(config.package_of(ScaffoldKind::Handlers), "bot.events");
        assert_eq!(config.states_package(), "bot.dialogue.states");
        assert_eq!(config.unit_path(ScaffoldKind::Actions), Path::new("bot/dialogue/Actions.java"));
    }

    #[test]
    fn builder_setters() {
        let config = SynthesisConfig::new()
            .with_base_package("com.example.bot")
            .with_unit(ScaffoldKind::Config, "Settings.java");
        assert_eq!(config.class_name(ScaffoldKind::Config), "Settings");
        assert_eq!(config.package_of(ScaffoldKind::Actions), "com.example.bot.dialogue");
    }

    #[test]
    fn partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth.json");
        fs::write(&path, r#"{ "output_root": "out/bot", "base_package": "demo" }"#).unwrap();

        let config = SynthesisConfig::from_json_file(&path).unwrap();
        assert_eq!(config.output_root, PathBuf::from("out/bot"));
        assert_eq!(config.states_package(), "demo.dialogue.states");
        assert_eq!(config.actions_unit, PathBuf::from("dialogue/Actions.java"));
    }

    #[test]
    fn unknown_json_field_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth.json");
        fs::write(&path, r#"{ "output_rot": "x" }"#).unwrap();

        let err = SynthesisConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, TranspileError::Config { .. }));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = SynthesisConfig::from_json_file("/nonexistent/synth.json").unwrap_err();
        assert!(matches!(err, TranspileError::Config { ref path, .. } if path.ends_with("synth.json")));
    }
}
