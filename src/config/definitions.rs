//! Config-file definitions and their grouping by target path.
use regex::bytes::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::loader;
use crate::error::{LoadError, ValidationError};
use crate::paths;

/// Substitution point inside `replace` and `cmd` templates.
pub const PLACEHOLDER: &str = "{}";

/// One editable target declared in `configs.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigDefinition {
    /// Record key in the definitions source.
    pub name: String,
    /// Category used for theme matching; the record's `type`, or `name`.
    pub kind: String,
    /// Absolute path of the file to edit.
    pub path: PathBuf,
    /// Pattern locating the line(s) to replace.
    pub pattern: Regex,
    /// Replacement line; always contains [`PLACEHOLDER`].
    pub replacement_template: String,
    /// Shell command run after a successful edit.
    pub command_template: Option<String>,
    /// Synthesize the file from the template when it does not exist.
    pub create_if_missing: bool,
}

impl ConfigDefinition {
    /// Render the replacement line for `value`.
    ///
    /// Every placeholder occurrence is substituted.
    #[must_use]
    pub fn render_line(&self, value: &str) -> String {
        self.replacement_template.replace(PLACEHOLDER, value)
    }
}

/// `create` accepts the literal string `"true"` or a boolean.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreateFlag {
    Bool(bool),
    Text(String),
}

impl CreateFlag {
    fn enabled(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s == "true",
        }
    }
}

/// A definition record as written in the source, before validation.
#[derive(Debug, Default, Deserialize)]
struct DefinitionRecord {
    #[serde(rename = "type")]
    kind: Option<String>,
    path: Option<String>,
    regex: Option<String>,
    replace: Option<String>,
    cmd: Option<String>,
    create: Option<CreateFlag>,
}

/// Treat empty strings the same as absent keys.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl DefinitionRecord {
    fn validate(self, name: String, home: &Path) -> Result<ConfigDefinition, ValidationError> {
        let path = present(self.path);
        let regex = present(self.regex);
        let replace = present(self.replace);

        let (Some(path), Some(regex), Some(replace)) = (path.clone(), regex.clone(), replace.clone())
        else {
            let fields = [("path", &path), ("regex", &regex), ("replace", &replace)]
                .into_iter()
                .filter(|(_, v)| v.is_none())
                .map(|(k, _)| k)
                .collect();
            return Err(ValidationError::MissingFields {
                definition: name,
                fields,
            });
        };

        if !replace.contains(PLACEHOLDER) {
            return Err(ValidationError::MissingPlaceholder {
                definition: name,
                replace,
            });
        }

        let pattern = Regex::new(&regex).map_err(|source| ValidationError::InvalidPattern {
            definition: name.clone(),
            source,
        })?;

        Ok(ConfigDefinition {
            kind: present(self.kind).unwrap_or_else(|| name.clone()),
            name,
            path: paths::resolve_path(&path, home),
            pattern,
            replacement_template: replace,
            command_template: present(self.cmd),
            create_if_missing: self.create.as_ref().is_some_and(CreateFlag::enabled),
        })
    }
}

/// Definitions that target one file, in source order.
#[derive(Debug, Clone)]
pub struct EditGroup {
    /// Target file shared by every definition in the group.
    pub path: PathBuf,
    /// Definitions applied to `path`, in order.
    pub definitions: Vec<ConfigDefinition>,
}

/// Definitions grouped by target path.
///
/// Groups appear in the order their path is first seen.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    groups: Vec<EditGroup>,
}

impl EditSet {
    /// Group `definitions` by path, keeping first-seen order.
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = ConfigDefinition>) -> Self {
        let mut set = Self::default();
        for definition in definitions {
            set.push(definition);
        }
        set
    }

    fn push(&mut self, definition: ConfigDefinition) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.path == definition.path) {
            group.definitions.push(definition);
        } else {
            self.groups.push(EditGroup {
                path: definition.path.clone(),
                definitions: vec![definition],
            });
        }
    }

    /// All groups.
    #[must_use]
    pub fn groups(&self) -> &[EditGroup] {
        &self.groups
    }

    /// Iterate over every definition, group by group.
    pub fn definitions(&self) -> impl Iterator<Item = &ConfigDefinition> {
        self.groups.iter().flat_map(|g| g.definitions.iter())
    }

    /// Number of distinct paths.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of definitions.
    #[must_use]
    pub fn definition_count(&self) -> usize {
        self.groups.iter().map(|g| g.definitions.len()).sum()
    }

    /// `true` when there is nothing to edit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Union of every definition's `type` and `name`.
    ///
    /// Themes are validated against this set.
    #[must_use]
    pub fn known_keys(&self) -> HashSet<String> {
        self.definitions()
            .flat_map(|d| [d.kind.clone(), d.name.clone()])
            .collect()
    }

    /// Copy of this set keeping only definitions accepted by `keep`.
    ///
    /// Groups left empty are dropped entirely.
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(&ConfigDefinition) -> bool) -> Self {
        let groups = self
            .groups
            .iter()
            .filter_map(|group| {
                let definitions: Vec<ConfigDefinition> =
                    group.definitions.iter().filter(|d| keep(d)).cloned().collect();
                (!definitions.is_empty()).then(|| EditGroup {
                    path: group.path.clone(),
                    definitions,
                })
            })
            .collect();
        Self { groups }
    }
}

/// Load and validate definitions from `source`, resolving `~` against `home`.
///
/// # Errors
///
/// Returns an error if the source cannot be read or decoded, or if any
/// definition fails validation. A single bad definition fails the whole load.
pub fn load(source: &Path, home: &Path) -> Result<EditSet, LoadError> {
    let records = loader::load_records::<DefinitionRecord>(source)?;
    let definitions = records
        .into_iter()
        .map(|(name, record)| record.validate(name, home))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(EditSet::from_definitions(definitions))
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn write_configs(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs.yaml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn home() -> PathBuf {
        PathBuf::from("/home/ada")
    }

    #[test]
    fn type_defaults_to_name() {
        let (_dir, path) = write_configs(
            "kitty:\n  path: ~/.config/kitty/theme.conf\n  regex: '^include .*'\n  replace: 'include {}.conf'\n",
        );
        let set = load(&path, &home()).unwrap();
        let def = set.definitions().next().unwrap();
        assert_eq!(def.name, "kitty");
        assert_eq!(def.kind, "kitty");
        assert_eq!(def.path, PathBuf::from("/home/ada/.config/kitty/theme.conf"));
        assert!(!def.create_if_missing);
        assert!(def.command_template.is_none());
    }

    #[test]
    fn explicit_type_and_command() {
        let (_dir, path) = write_configs(
            "zsh:\n  type: shell\n  path: /tmp/zshrc\n  regex: 'THEME=.*'\n  replace: 'THEME={}'\n  cmd: 'echo {}'\n",
        );
        let set = load(&path, &home()).unwrap();
        let def = set.definitions().next().unwrap();
        assert_eq!(def.kind, "shell");
        assert_eq!(def.command_template.as_deref(), Some("echo {}"));
    }

    #[test]
    fn missing_fields_are_all_named() {
        let (_dir, path) = write_configs("kitty:\n  regex: 'x'\n");
        let err = load(&path, &home()).unwrap_err();
        match err {
            LoadError::Validation(ValidationError::MissingFields { definition, fields }) => {
                assert_eq!(definition, "kitty");
                assert_eq!(fields, vec!["path", "replace"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let (_dir, path) = write_configs("kitty:\n  path: ''\n  regex: 'x'\n  replace: '{}'\n");
        let err = load(&path, &home()).unwrap_err();
        assert!(err.to_string().contains("[path]"), "got: {err}");
    }

    #[test]
    fn replace_without_placeholder_is_rejected() {
        let (_dir, path) =
            write_configs("kitty:\n  path: /tmp/k\n  regex: 'x'\n  replace: 'include dark.conf'\n");
        let err = load(&path, &home()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::MissingPlaceholder { .. })
        ));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let (_dir, path) = write_configs("kitty:\n  path: /tmp/k\n  regex: '(unclosed'\n  replace: '{}'\n");
        let err = load(&path, &home()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn one_bad_definition_fails_the_load() {
        let (_dir, path) = write_configs(
            "good:\n  path: /tmp/g\n  regex: 'x'\n  replace: '{}'\nbad:\n  path: /tmp/b\n  regex: 'x'\n",
        );
        assert!(load(&path, &home()).is_err());
    }

    #[test]
    fn create_flag_accepts_literal_string_and_bool() {
        let (_dir, path) = write_configs(
            "a:\n  path: /tmp/a\n  regex: 'x'\n  replace: '{}'\n  create: 'true'\n\
             b:\n  path: /tmp/b\n  regex: 'x'\n  replace: '{}'\n  create: true\n\
             c:\n  path: /tmp/c\n  regex: 'x'\n  replace: '{}'\n  create: 'yes'\n",
        );
        let set = load(&path, &home()).unwrap();
        let flags: Vec<bool> = set.definitions().map(|d| d.create_if_missing).collect();
        assert_eq!(flags, [true, true, false]);
    }

    #[test]
    fn definitions_sharing_a_path_are_grouped_in_order() {
        let (_dir, path) = write_configs(
            "fg:\n  path: /tmp/term.conf\n  regex: 'fg=.*'\n  replace: 'fg={}'\n\
             other:\n  path: /tmp/other.conf\n  regex: 'x'\n  replace: '{}'\n\
             bg:\n  path: /tmp/term.conf\n  regex: 'bg=.*'\n  replace: 'bg={}'\n",
        );
        let set = load(&path, &home()).unwrap();
        assert_eq!(set.path_count(), 2);
        assert_eq!(set.definition_count(), 3);
        let first = &set.groups()[0];
        assert_eq!(first.path, PathBuf::from("/tmp/term.conf"));
        let names: Vec<&str> = first.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["fg", "bg"]);
    }

    #[test]
    fn known_keys_cover_types_and_names() {
        let (_dir, path) = write_configs(
            "zsh:\n  type: shell\n  path: /tmp/z\n  regex: 'x'\n  replace: '{}'\n",
        );
        let keys = load(&path, &home()).unwrap().known_keys();
        assert!(keys.contains("zsh"));
        assert!(keys.contains("shell"));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn filtered_drops_empty_groups() {
        let (_dir, path) = write_configs(
            "a:\n  path: /tmp/one\n  regex: 'x'\n  replace: '{}'\n\
             b:\n  path: /tmp/two\n  regex: 'x'\n  replace: '{}'\n",
        );
        let set = load(&path, &home()).unwrap();
        let only_a = set.filtered(|d| d.name == "a");
        assert_eq!(only_a.path_count(), 1);
        assert_eq!(only_a.groups()[0].path, PathBuf::from("/tmp/one"));
    }

    #[test]
    fn render_line_replaces_every_placeholder() {
        let (_dir, path) =
            write_configs("a:\n  path: /tmp/a\n  regex: 'x'\n  replace: '{}-{}'\n");
        let set = load(&path, &home()).unwrap();
        let def = set.definitions().next().unwrap();
        assert_eq!(def.render_line("dark"), "dark-dark");
    }
}
