// Shared helpers for integration tests.
//
// Provides a temporary config directory plus a scratch directory for target
// files, and a fluent builder so each integration test can describe its
// configs and themes without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use themr::cli::Cli;
use themr::config::Config;
use themr::logging::Logger;

/// An isolated config directory and target tree backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory; `config/` holds the sources, `files/` the targets.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Directory holding `configs.yaml` and `themes.yaml`.
    pub fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    /// Absolute path of a target file inside the scratch tree.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.path().join("files").join(name)
    }

    /// Read a target file.
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.file(name)).expect("read target file")
    }

    /// Load both sources from the config directory.
    pub fn load_config(&self) -> Config {
        Config::load(&self.config_dir(), Path::new("/nonexistent-home")).expect("load config")
    }

    /// Parse `args` as if given on the command line, with `--config-dir`
    /// pointing at this context.
    pub fn cli(&self, args: &[&str]) -> Cli {
        let dir = self.config_dir();
        let mut argv = vec!["themr", "--config-dir", dir.to_str().expect("utf-8 path")];
        argv.extend_from_slice(args);
        <Cli as clap::Parser>::parse_from(argv)
    }

    /// A logger with no subscriber attached and no log file, so the
    /// user's cache directory is left alone.
    pub fn logger() -> Arc<Logger> {
        Arc::new(Logger::with_log_path(None))
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
    configs: String,
    themes: String,
}

impl TestContextBuilder {
    /// Begin building an empty context.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("config")).expect("create config dir");
        std::fs::create_dir_all(root.path().join("files")).expect("create files dir");
        Self {
            ctx: IntegrationTestContext { root },
            configs: String::new(),
            themes: String::new(),
        }
    }

    /// Declare a config definition targeting `files/<file>`.
    ///
    /// `extra` is appended verbatim as further YAML keys (e.g. `"type: shell"`).
    pub fn with_config(mut self, name: &str, file: &str, regex: &str, replace: &str, extra: &[&str]) -> Self {
        let path = self.ctx.file(file);
        self.configs.push_str(&format!(
            "{name}:\n  path: '{}'\n  regex: '{regex}'\n  replace: '{replace}'\n",
            path.display()
        ));
        for line in extra {
            self.configs.push_str(&format!("  {line}\n"));
        }
        self
    }

    /// Declare a theme with `key: value` pairs.
    pub fn with_theme(mut self, name: &str, values: &[(&str, &str)]) -> Self {
        self.themes.push_str(&format!("{name}:\n"));
        for (key, value) in values {
            self.themes.push_str(&format!("  {key}: '{value}'\n"));
        }
        self
    }

    /// Append `yaml` to the themes source as written, without quoting.
    pub fn with_themes_yaml(mut self, yaml: &str) -> Self {
        self.themes.push_str(yaml);
        self
    }

    /// Absolute path of a target file, before the context is built.
    pub fn file(&self, name: &str) -> PathBuf {
        self.ctx.file(name)
    }

    /// Write `content` to `files/<name>`.
    pub fn with_file(self, name: &str, content: &str) -> Self {
        std::fs::write(self.ctx.file(name), content).expect("write target file");
        self
    }

    /// Write the sources and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        let dir = self.ctx.config_dir();
        std::fs::write(dir.join("configs.yaml"), &self.configs).expect("write configs.yaml");
        std::fs::write(dir.join("themes.yaml"), &self.themes).expect("write themes.yaml");
        self.ctx
    }
}
