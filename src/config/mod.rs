//! Loading of the definitions and themes sources from the config directory.
pub mod definitions;
pub mod loader;
pub mod resolve;
pub mod themes;

use std::path::Path;

use crate::error::LoadError;
use definitions::EditSet;
use themes::Theme;

/// File stem of the definitions source (`configs.yaml`).
pub const DEFINITIONS_STEM: &str = "configs";
/// File stem of the themes source (`themes.yaml`).
pub const THEMES_STEM: &str = "themes";

/// Everything loaded from one config directory.
#[derive(Debug)]
pub struct Config {
    /// Validated definitions grouped by path.
    pub edit_set: EditSet,
    /// Validated themes, in source order.
    pub themes: Vec<Theme>,
}

impl Config {
    /// Load definitions then themes from `dir`, resolving `~` against `home`.
    ///
    /// Themes are validated against the keys known from the definitions.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoadError`] from either source.
    pub fn load(dir: &Path, home: &Path) -> Result<Self, LoadError> {
        let edit_set = definitions::load(&loader::locate(dir, DEFINITIONS_STEM), home)?;
        let themes = themes::load(&loader::locate(dir, THEMES_STEM), &edit_set.known_keys())?;
        Ok(Self { edit_set, themes })
    }

    /// Theme names in source order.
    pub fn theme_names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(Theme::name)
    }

    /// Definition names in group order.
    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.edit_set.definitions().map(|d| d.name.as_str())
    }
}
