//! Theme selection and per-definition value resolution.
use super::definitions::{ConfigDefinition, EditSet};
use super::themes::Theme;
use crate::error::ThemrError;

/// Find the theme called `name`.
///
/// # Errors
///
/// Returns [`ThemrError::ThemeNotFound`] if no theme has that name.
pub fn select<'a>(themes: &'a [Theme], name: &str) -> Result<&'a Theme, ThemrError> {
    themes
        .iter()
        .find(|t| t.name() == name)
        .ok_or_else(|| ThemrError::ThemeNotFound(name.to_string()))
}

/// Keep only definitions whose type the theme sets a value for.
///
/// Definitions addressed solely by name are not kept; the name only
/// overrides a value the type already selects.
#[must_use]
pub fn filter(theme: &Theme, edit_set: &EditSet) -> EditSet {
    edit_set.filtered(|d| theme.contains(&d.kind))
}

/// Value to substitute for `definition`: by name first, then by type.
#[must_use]
pub fn resolve_value<'a>(theme: &'a Theme, definition: &ConfigDefinition) -> Option<&'a str> {
    theme
        .get(&definition.name)
        .or_else(|| theme.get(&definition.kind))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use regex::bytes::Regex;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn definition(name: &str, kind: &str, path: &str) -> ConfigDefinition {
        ConfigDefinition {
            name: name.to_string(),
            kind: kind.to_string(),
            path: PathBuf::from(path),
            pattern: Regex::new("x").unwrap(),
            replacement_template: "{}".to_string(),
            command_template: None,
            create_if_missing: false,
        }
    }

    fn theme(name: &str, pairs: &[(&str, &str)]) -> Theme {
        let values: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Theme::new(name, values)
    }

    #[test]
    fn name_overrides_type() {
        let t = theme("night", &[("shell", "dark"), ("zsh", "contrast")]);
        let zsh = definition("zsh", "shell", "/tmp/zshrc");
        let bash = definition("bash", "shell", "/tmp/bashrc");
        assert_eq!(resolve_value(&t, &zsh), Some("contrast"));
        assert_eq!(resolve_value(&t, &bash), Some("dark"));
    }

    #[test]
    fn unaddressed_definition_has_no_value() {
        let t = theme("night", &[("shell", "dark")]);
        assert_eq!(resolve_value(&t, &definition("kitty", "kitty", "/tmp/k")), None);
    }

    #[test]
    fn select_finds_by_name() {
        let themes = vec![theme("day", &[("a", "1")]), theme("night", &[("a", "2")])];
        assert_eq!(select(&themes, "night").unwrap().get("a"), Some("2"));
    }

    #[test]
    fn select_unknown_theme_fails() {
        let themes = vec![theme("day", &[("a", "1")])];
        let err = select(&themes, "dusk").unwrap_err();
        assert!(matches!(err, ThemrError::ThemeNotFound(ref n) if n == "dusk"));
    }

    #[test]
    fn filter_keeps_addressed_types_and_drops_empty_paths() {
        let set = EditSet::from_definitions([
            definition("zsh", "shell", "/tmp/zshrc"),
            definition("kitty", "kitty", "/tmp/kitty.conf"),
            definition("bash", "shell", "/tmp/bashrc"),
        ]);
        let t = theme("night", &[("shell", "dark")]);
        let working = filter(&t, &set);
        assert_eq!(working.path_count(), 2);
        let names: Vec<&str> = working.definitions().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["zsh", "bash"]);
    }

    #[test]
    fn every_filtered_definition_resolves() {
        let set = EditSet::from_definitions([
            definition("zsh", "shell", "/tmp/zshrc"),
            definition("fg", "term", "/tmp/term"),
            definition("bg", "term", "/tmp/term"),
        ]);
        let t = theme("night", &[("shell", "dark"), ("term", "black"), ("bg", "white")]);
        let working = filter(&t, &set);
        assert!(working.definitions().all(|d| resolve_value(&t, d).is_some()));
        assert_eq!(working.definition_count(), 3);
    }
}
