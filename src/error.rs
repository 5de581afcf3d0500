//! Domain-specific error types for themr.
//!
//! Internal modules return typed errors while the command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ThemrError                      fatal, raised before any file is touched
//! ├── Load(LoadError)             reading, decoding and validating sources
//! │   └── Validation(ValidationError)
//! └── ThemeNotFound               the requested theme does not exist
//!
//! ApplyError                      per definition, recorded in the report
//! CommandError                    per definition, reported as a warning
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level fatal error.
#[derive(Error, Debug)]
pub enum ThemrError {
    /// Loading the definitions or themes failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// No theme with the requested name exists.
    #[error("no theme named '{0}'")]
    ThemeNotFound(String),
}

/// Errors that arise while loading the definitions and themes sources.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source file could not be read.
    #[error("could not read {}: {source}", .path.display())]
    SourceRead {
        /// Path of the source that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The source file is not a keyed collection of records.
    #[error("{} is invalid: {message}", .path.display())]
    Parse {
        /// Path of the offending source.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// A definition record is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A theme does not set a value for any known config type or name.
    #[error("theme '{0}' must set a value for at least one known config type or name")]
    InertTheme(String),
}

/// Malformed definition records.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// One or more required keys are absent or empty.
    #[error("missing key(s): [{}] in config for {definition}", .fields.join(", "))]
    MissingFields {
        /// Name of the definition.
        definition: String,
        /// Every missing key, in declaration order.
        fields: Vec<&'static str>,
    },

    /// The replacement template has no `{}` placeholder.
    #[error("missing '{{}}' placeholder in replacement line '{replace}' in config for {definition}")]
    MissingPlaceholder {
        /// Name of the definition.
        definition: String,
        /// The offending template.
        replace: String,
    },

    /// The pattern is not a valid regular expression.
    #[error("could not parse regex for {definition}: {source}")]
    InvalidPattern {
        /// Name of the definition.
        definition: String,
        /// Compiler error.
        source: regex::Error,
    },
}

/// Failures local to a single definition during apply.
#[derive(Error, Debug)]
pub enum ApplyError {
    /// The target file could not be read.
    #[error("{definition}: could not read {}: {source}", .path.display())]
    FileRead {
        /// Name of the definition.
        definition: String,
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The target file could not be written.
    #[error("{definition}: could not write {}: {source}", .path.display())]
    FileWrite {
        /// Name of the definition.
        definition: String,
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The pattern did not match the file content.
    #[error("{definition}: regex '{pattern}' failed to match a line in {}", .path.display())]
    PatternMismatch {
        /// Name of the definition.
        definition: String,
        /// Target path.
        path: PathBuf,
        /// Source text of the pattern.
        pattern: String,
    },
}

impl ApplyError {
    /// Name of the definition the failure belongs to.
    #[must_use]
    pub fn definition(&self) -> &str {
        match self {
            Self::FileRead { definition, .. }
            | Self::FileWrite { definition, .. }
            | Self::PatternMismatch { definition, .. } => definition,
        }
    }
}

/// Failures of the follow-up command. Never fatal.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The shell could not be started.
    #[error("could not start '{command}': {source}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The command exited unsuccessfully.
    #[error("'{command}' failed (exit {})", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    Failed {
        /// Rendered command line.
        command: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },
}
