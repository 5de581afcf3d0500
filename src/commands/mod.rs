//! Top-level command orchestration.
pub mod apply;
pub mod list;

use std::sync::Arc;

use anyhow::{Context as _, Result, bail};

use crate::cli::Cli;
use crate::config::Config;
use crate::logging::Logger;
use crate::paths;

/// Dispatch to listing or apply according to the parsed arguments.
///
/// Listing takes precedence over applying; both listings may be printed.
///
/// # Errors
///
/// Returns an error if no theme is given outside listing mode, if the
/// sources fail to load, or if any edit fails.
pub fn run(cli: &Cli, log: &Arc<Logger>) -> Result<()> {
    if !cli.is_listing() && cli.theme.is_none() {
        bail!("no theme name given (see --help)");
    }

    let config = load(cli, log)?;

    if cli.is_listing() {
        list::run(&config, cli.list_themes, cli.list_configs);
        return Ok(());
    }

    match &cli.theme {
        Some(name) => apply::run(&config, name, cli.apply_mode(), log),
        None => bail!("no theme name given (see --help)"),
    }
}

/// Resolve the config directory and load both sources.
///
/// # Errors
///
/// Returns an error if the config or home directory cannot be determined or
/// if either source fails to load or validate.
pub fn load(cli: &Cli, log: &Logger) -> Result<Config> {
    let dir = paths::config_dir(cli.config_dir.as_deref())?;
    let home = paths::home_dir()?;

    log.debug(&format!("config directory: {}", dir.display()));
    let config = Config::load(&dir, &home)
        .with_context(|| format!("loading configuration from {}", dir.display()))?;

    log.debug(&format!(
        "{} config(s) across {} file(s): {}",
        config.edit_set.definition_count(),
        config.edit_set.path_count(),
        config.definition_names().collect::<Vec<_>>().join(", ")
    ));
    log.debug(&format!(
        "{} theme(s): {}",
        config.themes.len(),
        config.theme_names().collect::<Vec<_>>().join(", ")
    ));
    Ok(config)
}
