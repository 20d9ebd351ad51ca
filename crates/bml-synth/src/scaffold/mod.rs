//! Staged scaffold edits.
//!
//! Synthesis never touches the file system. Every change it wants to make to
//! a scaffold unit, and every new unit it creates, is recorded in a
//! [`ScaffoldSet`]. Only [`ScaffoldSet::commit`] writes, and only after every
//! scaffold has been loaded and patched in memory, so a missing file, class
//! or method aborts the run before anything on disk changes.

mod patch;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use bml_core::ScaffoldError;
use bml_target::{Block, CompilationUnit, Member};

use crate::config::{ScaffoldKind, SynthesisConfig};

pub use patch::{add_import, add_members, apply, replace_method_body};

/// One change to a scaffold unit.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaffoldEdit {
    /// Append a member to the unit's class.
    AddMember(Member),
    /// Add a fully qualified import.
    AddImport(String),
    /// Replace the statements of a method of the unit's class.
    ReplaceMethodBody { method: String, body: Block },
}

/// Everything a synthesis run wants written.
#[derive(Debug, Default)]
pub struct ScaffoldSet {
    edits: BTreeMap<ScaffoldKind, Vec<ScaffoldEdit>>,
    /// New units, keyed by path relative to the output root.
    units: Vec<(PathBuf, CompilationUnit)>,
}

impl ScaffoldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, kind: ScaffoldKind, member: impl Into<Member>) {
        self.push(kind, ScaffoldEdit::AddMember(member.into()));
    }

    /// Record an import for `kind`; repeats are dropped.
    pub fn add_import(&mut self, kind: ScaffoldKind, import: impl Into<String>) {
        let import = import.into();
        if self.imports(kind).any(|existing| existing == import) {
            return;
        }
        self.push(kind, ScaffoldEdit::AddImport(import));
    }

    pub fn replace_method_body(&mut self, kind: ScaffoldKind, method: impl Into<String>, body: Block) {
        self.push(
            kind,
            ScaffoldEdit::ReplaceMethodBody {
                method: method.into(),
                body,
            },
        );
    }

    pub fn add_unit(&mut self, path: impl Into<PathBuf>, unit: CompilationUnit) {
        self.units.push((path.into(), unit));
    }

    fn push(&mut self, kind: ScaffoldKind, edit: ScaffoldEdit) {
        self.edits.entry(kind).or_default().push(edit);
    }

    /// Edits recorded for one scaffold, in recording order.
    pub fn edits(&self, kind: ScaffoldKind) -> &[ScaffoldEdit] {
        self.edits.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Members recorded for one scaffold.
    pub fn members(&self, kind: ScaffoldKind) -> impl Iterator<Item = &Member> {
        self.edits(kind).iter().filter_map(|edit| match edit {
            ScaffoldEdit::AddMember(member) => Some(member),
            _ => None,
        })
    }

    /// Imports recorded for one scaffold.
    pub fn imports(&self, kind: ScaffoldKind) -> impl Iterator<Item = &str> {
        self.edits(kind).iter().filter_map(|edit| match edit {
            ScaffoldEdit::AddImport(import) => Some(import.as_str()),
            _ => None,
        })
    }

    /// The replacement body recorded for `kind.method`, if any.
    pub fn method_body(&self, kind: ScaffoldKind, method: &str) -> Option<&Block> {
        self.edits(kind).iter().find_map(|edit| match edit {
            ScaffoldEdit::ReplaceMethodBody { method: m, body } if m == method => Some(body),
            _ => None,
        })
    }

    /// New units with their output-root-relative paths.
    pub fn units(&self) -> &[(PathBuf, CompilationUnit)] {
        &self.units
    }

    /// A new unit by the name of its class.
    pub fn unit(&self, class: &str) -> Option<&CompilationUnit> {
        self.units
            .iter()
            .map(|(_, unit)| unit)
            .find(|unit| unit.class(class).is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.units.is_empty()
    }

    // ==========================================================================
    // Commit
    // ==========================================================================

    /// Load and patch every touched scaffold and print every new unit,
    /// without writing anything.
    pub fn render(&self, config: &SynthesisConfig) -> Result<Vec<(PathBuf, String)>, ScaffoldError> {
        let mut rendered = Vec::with_capacity(self.edits.len() + self.units.len());

        for (&kind, edits) in &self.edits {
            let path = config.unit_path(kind);
            let source = read_scaffold(&path, config)?;
            let class = config.class_name(kind);
            debug!(unit = %path.display(), edits = edits.len(), "patching scaffold");
            rendered.push((path.clone(), apply(&source, &class, edits, &path)?));
        }

        for (relative, unit) in &self.units {
            rendered.push((config.output_root.join(relative), unit.to_string()));
        }
        Ok(rendered)
    }

    /// Write all staged changes. Returns the written paths.
    ///
    /// Each file is written to a uniquely named temporary sibling and
    /// persisted over its destination.
    pub fn commit(&self, config: &SynthesisConfig) -> Result<Vec<PathBuf>, ScaffoldError> {
        let rendered = self.render(config)?;
        let mut written = Vec::with_capacity(rendered.len());
        for (path, contents) in rendered {
            write_replacing(&path, &contents)?;
            written.push(path);
        }
        info!(files = written.len(), "committed bot sources");
        Ok(written)
    }
}

fn read_scaffold(path: &Path, config: &SynthesisConfig) -> Result<String, ScaffoldError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ScaffoldError::NotFound {
            file: path
                .strip_prefix(&config.output_root)
                .unwrap_or(path)
                .display()
                .to_string(),
            dir: config.output_root.clone(),
        },
        _ => ScaffoldError::io(path, &e),
    })
}

fn write_replacing(path: &Path, contents: &str) -> Result<(), ScaffoldError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, &e))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|e| ScaffoldError::io(parent, &e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| ScaffoldError::io(file.path(), &e))?;
    file.persist(path).map_err(|e| ScaffoldError::io(path, &e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bml_target::{ClassDecl, Expr, FieldDecl, Modifiers, TypeRef};

    fn config_in(dir: &Path) -> SynthesisConfig {
        SynthesisConfig::default().with_output_root(dir)
    }

    #[test]
    fn commit_patches_scaffold_and_writes_new_units() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(
            dir.path().join("BotConfig.java"),
            "package bot;\n\npublic class BotConfig {\n}\n",
        )
        .unwrap();

        let mut set = ScaffoldSet::new();
        set.add_member(
            ScaffoldKind::Config,
            FieldDecl::new(Modifiers::CONSTANT, TypeRef::Long, "MAX", Some(Expr::IntLit(3))),
        );
        let mut unit = CompilationUnit::new(Some("bot.dialogue.states".into()));
        unit.types.push(ClassDecl::new(Modifiers::PUBLIC, "GreetState"));
        set.add_unit("dialogue/states/GreetState.java", unit);

        let written = set.commit(&config).unwrap();
        assert_eq!(written.len(), 2);

        let patched = fs::read_to_string(dir.path().join("BotConfig.java")).unwrap();
        assert!(patched.contains("public static final long MAX = 3;"));
        let state = fs::read_to_string(dir.path().join("dialogue/states/GreetState.java")).unwrap();
        assert!(state.starts_with("package bot.dialogue.states;"));
    }

    #[test]
    fn commit_leaves_unrelated_siblings_alone() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(dir.path().join("BotConfig.java"), "package bot;\n\npublic class BotConfig {\n}\n").unwrap();
        fs::write(dir.path().join("BotConfig.java.tmp"), "keep me").unwrap();

        let mut set = ScaffoldSet::new();
        set.add_member(
            ScaffoldKind::Config,
            FieldDecl::new(Modifiers::CONSTANT, TypeRef::Long, "MAX", Some(Expr::IntLit(3))),
        );
        set.commit(&config).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("BotConfig.java.tmp")).unwrap(), "keep me");
        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, ["BotConfig.java", "BotConfig.java.tmp"]);
    }

    #[test]
    fn missing_scaffold_aborts_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(dir.path().join("BotConfig.java"), "public class BotConfig {\n}\n").unwrap();

        let mut set = ScaffoldSet::new();
        set.add_member(
            ScaffoldKind::Config,
            FieldDecl::new(Modifiers::CONSTANT, TypeRef::Long, "MAX", Some(Expr::IntLit(3))),
        );
        set.add_import(ScaffoldKind::Handlers, "java.util.List");

        let err = set.commit(&config).unwrap_err();
        assert!(
            matches!(err, ScaffoldError::NotFound { ref file, .. } if file.ends_with("EventHandlers.java"))
        );
        let untouched = fs::read_to_string(dir.path().join("BotConfig.java")).unwrap();
        assert_eq!(untouched, "public class BotConfig {\n}\n");
    }

    #[test]
    fn queries_expose_recorded_edits() {
        let mut set = ScaffoldSet::new();
        assert!(set.is_empty());
        set.add_import(ScaffoldKind::Actions, "java.util.Random");
        set.add_import(ScaffoldKind::Actions, "java.util.Random");
        set.replace_method_body(ScaffoldKind::Automaton, "init", Block::new());

        assert_eq!(set.imports(ScaffoldKind::Actions).collect::<Vec<_>>(), ["java.util.Random"]);
        assert!(set.method_body(ScaffoldKind::Automaton, "init").is_some());
        assert_eq!(set.members(ScaffoldKind::Config).count(), 0);
    }
}
