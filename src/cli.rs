//! Command-line arguments.
use std::path::PathBuf;

use clap::Parser;

use crate::apply::ApplyMode;

/// Version string, from `THEMR_VERSION` at build time when set.
pub const VERSION: &str = match option_env!("THEMR_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point for themr.
#[derive(Parser, Debug)]
#[command(
    name = "themr",
    about = "Apply a theme across many configuration files",
    version = VERSION
)]
pub struct Cli {
    /// Name of the theme to apply
    pub theme: Option<String>,

    /// List available themes and exit
    #[arg(short = 'l', long)]
    pub list_themes: bool,

    /// List available configs and exit
    #[arg(short = 'c', long)]
    pub list_configs: bool,

    /// Apply sequentially and log command output (implies --verbose)
    #[arg(short, long)]
    pub debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the config directory
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Cli {
    /// Whether debug output should reach the console.
    #[must_use]
    pub const fn show_debug(&self) -> bool {
        self.verbose || self.debug
    }

    /// Whether a listing flag was given.
    #[must_use]
    pub const fn is_listing(&self) -> bool {
        self.list_themes || self.list_configs
    }

    /// Apply mode selected by `--debug`.
    #[must_use]
    pub const fn apply_mode(&self) -> ApplyMode {
        if self.debug {
            ApplyMode::Sequential
        } else {
            ApplyMode::Parallel
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_theme() {
        let cli = Cli::parse_from(["themr", "night"]);
        assert_eq!(cli.theme.as_deref(), Some("night"));
        assert!(!cli.is_listing());
        assert_eq!(cli.apply_mode(), ApplyMode::Parallel);
    }

    #[test]
    fn parse_no_arguments() {
        let cli = Cli::parse_from(["themr"]);
        assert!(cli.theme.is_none());
        assert!(!cli.is_listing());
    }

    #[test]
    fn parse_list_flags_short() {
        let cli = Cli::parse_from(["themr", "-l", "-c"]);
        assert!(cli.list_themes);
        assert!(cli.list_configs);
        assert!(cli.is_listing());
    }

    #[test]
    fn parse_list_flags_long() {
        let cli = Cli::parse_from(["themr", "--list-themes"]);
        assert!(cli.list_themes);
        assert!(!cli.list_configs);
    }

    #[test]
    fn debug_implies_verbose_and_sequential() {
        let cli = Cli::parse_from(["themr", "-d", "night"]);
        assert!(cli.show_debug());
        assert_eq!(cli.apply_mode(), ApplyMode::Sequential);
    }

    #[test]
    fn verbose_alone_keeps_parallel() {
        let cli = Cli::parse_from(["themr", "-v", "night"]);
        assert!(cli.show_debug());
        assert_eq!(cli.apply_mode(), ApplyMode::Parallel);
    }

    #[test]
    fn parse_config_dir_override() {
        let cli = Cli::parse_from(["themr", "--config-dir", "/tmp/themr", "night"]);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/themr")));
    }
}
