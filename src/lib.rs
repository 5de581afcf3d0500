//! Theme applier for configuration files.
//!
//! themr applies a named theme across many independently formatted config
//! files. Each config definition declares a file, a regular expression
//! locating the line(s) to rewrite, a replacement template with a `{}`
//! placeholder, and an optional command to run afterwards. Themes map config
//! types (or individual config names) to the value substituted for `{}`.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: load and validate `configs.yaml` and `themes.yaml`, select and resolve themes
//! - **[`apply`]**: the per-file edit engine and its parallel and sequential modes
//! - **[`exec`]**: detached or captured follow-up shell commands
//! - **[`commands`]**: top-level orchestration (`apply`, `list`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod apply;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod paths;
