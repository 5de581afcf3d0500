//! Config directory discovery and home-directory expansion.
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "THEMR_CONFIG_DIR";

/// Resolve the directory holding `configs.yaml` and `themes.yaml`.
///
/// Order: explicit override, `$THEMR_CONFIG_DIR`, `$XDG_CONFIG_HOME/themr`,
/// then the platform config directory joined with `themr`.
///
/// # Errors
///
/// Returns an error if no candidate can be determined (e.g. `$HOME` unset).
pub fn config_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME")
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir).join("themr"));
    }
    dirs::config_dir()
        .map(|dir| dir.join("themr"))
        .ok_or_else(|| anyhow::anyhow!("could not determine user config directory (is $HOME unset?)"))
}

/// Return the user's home directory.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not determine home directory"))
}

/// Expand a leading `~` to `home` and make the result absolute.
///
/// Only `~` and `~/...` are expanded; `~user` forms are left untouched.
/// Relative paths are made absolute against the current directory.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use themr::paths::resolve_path;
///
/// let home = Path::new("/home/ada");
/// assert_eq!(resolve_path("~/.config/kitty/kitty.conf", home),
///            PathBuf::from("/home/ada/.config/kitty/kitty.conf"));
/// assert_eq!(resolve_path("/etc/motd", home), PathBuf::from("/etc/motd"));
/// ```
#[must_use]
pub fn resolve_path(raw: &str, home: &Path) -> PathBuf {
    let expanded = if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    };
    std::path::absolute(&expanded).unwrap_or(expanded)
}
