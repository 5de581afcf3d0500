//! Per-definition edit: read, verify, substitute, write, run the command.
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use regex::bytes::NoExpand;

use super::report::{EditOutcome, EditRecord};
use crate::config::definitions::ConfigDefinition;
use crate::error::ApplyError;
use crate::exec::{self, CommandMode};
use crate::logging::Log;

/// Mode applied to files synthesized from a template.
#[cfg(unix)]
const CREATED_FILE_MODE: u32 = 0o600;

/// Create the parent directory of `path` if it does not exist.
fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write a file that did not exist before, owner-only on Unix.
fn write_new(path: &Path, content: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        options.mode(CREATED_FILE_MODE);
    }
    options.open(path)?.write_all(content)
}

/// Edit `definition.path` so that every pattern match becomes the rendered
/// line for `value`.
///
/// Content is matched as bytes, so lines outside the match need not be
/// UTF-8. Overwriting an existing file in place keeps its permission bits.
fn edit_file(definition: &ConfigDefinition, value: &str) -> Result<EditOutcome, ApplyError> {
    let path = &definition.path;
    let (content, existed) = match fs::read(path) {
        Ok(content) => (content, true),
        Err(e) if e.kind() == io::ErrorKind::NotFound && definition.create_if_missing => {
            (definition.replacement_template.clone().into_bytes(), false)
        }
        Err(source) => {
            return Err(ApplyError::FileRead {
                definition: definition.name.clone(),
                path: path.clone(),
                source,
            });
        }
    };

    if !definition.pattern.is_match(&content) {
        return Err(ApplyError::PatternMismatch {
            definition: definition.name.clone(),
            path: path.clone(),
            pattern: definition.pattern.as_str().to_string(),
        });
    }

    let line = definition.render_line(value);
    let updated = definition.pattern.replace_all(&content, NoExpand(line.as_bytes()));

    let write_error = |source| ApplyError::FileWrite {
        definition: definition.name.clone(),
        path: path.clone(),
        source,
    };
    if !existed {
        write_new(path, &updated).map_err(write_error)?;
        return Ok(EditOutcome::Created);
    }
    if *updated == *content {
        return Ok(EditOutcome::Unchanged);
    }
    fs::write(path, &updated).map_err(write_error)?;
    Ok(EditOutcome::Applied)
}

/// Apply one definition with its resolved `value` and run its command.
///
/// The command only runs after a successful edit, including an unchanged one.
pub(super) fn apply_definition(
    definition: &ConfigDefinition,
    value: &str,
    command_mode: CommandMode,
    log: &dyn Log,
) -> EditRecord {
    let outcome = edit_file(definition, value);
    match &outcome {
        Ok(EditOutcome::Applied) => log.info(&format!("{}: set {value}", definition.name)),
        Ok(EditOutcome::Created) => log.info(&format!(
            "{}: created {} with {value}",
            definition.name,
            definition.path.display()
        )),
        Ok(EditOutcome::Unchanged) => {
            log.debug(&format!("{}: already {value}", definition.name));
        }
        Err(e) => log.error(&e.to_string()),
    }

    let command_error = match (&outcome, &definition.command_template) {
        (Ok(_), Some(template)) => exec::run(template, value, command_mode, log).err(),
        _ => None,
    };
    if let Some(e) = &command_error {
        log.warn(&format!("{}: {e}", definition.name));
    }

    EditRecord {
        definition: definition.name.clone(),
        path: definition.path.clone(),
        outcome,
        command_error,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use regex::bytes::Regex;
    use std::path::PathBuf;

    fn definition(path: PathBuf, regex: &str, replace: &str) -> ConfigDefinition {
        ConfigDefinition {
            name: "term".to_string(),
            kind: "term".to_string(),
            path,
            pattern: Regex::new(regex).unwrap(),
            replacement_template: replace.to_string(),
            command_template: None,
            create_if_missing: false,
        }
    }

    #[test]
    fn replaces_every_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("term.conf");
        fs::write(&path, "color=white\nsize=12\ncolor=black\n").unwrap();
        let def = definition(path.clone(), "color=.*", "color={}");
        assert_eq!(edit_file(&def, "0x1a1a1a").unwrap(), EditOutcome::Applied);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "color=0x1a1a1a\nsize=12\ncolor=0x1a1a1a\n"
        );
    }

    #[test]
    fn unchanged_content_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("term.conf");
        fs::write(&path, "color=dark\n").unwrap();
        let def = definition(path, "color=.*", "color={}");
        assert_eq!(edit_file(&def, "dark").unwrap(), EditOutcome::Unchanged);
    }

    #[test]
    fn replacement_is_literal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt");
        fs::write(&path, "PS1=old\n").unwrap();
        let def = definition(path.clone(), "PS1=(.*)", "PS1={}");
        edit_file(&def, "$1 $USER").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "PS1=$1 $USER\n");
    }

    #[test]
    fn non_utf8_bytes_outside_the_match_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("term.conf");
        fs::write(&path, b"# caf\xe9\ncolor=white\n").unwrap();
        let def = definition(path.clone(), "color=.*", "color={}");
        assert_eq!(edit_file(&def, "dark").unwrap(), EditOutcome::Applied);
        assert_eq!(fs::read(&path).unwrap(), b"# caf\xe9\ncolor=dark\n");
    }

    #[test]
    fn mismatch_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("term.conf");
        fs::write(&path, "size=12\n").unwrap();
        let def = definition(path.clone(), "^color=.*", "color={}");
        let err = edit_file(&def, "dark").unwrap_err();
        assert!(matches!(err, ApplyError::PatternMismatch { ref pattern, .. } if pattern == "^color=.*"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "size=12\n");
    }

    #[test]
    fn missing_file_without_create_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let def = definition(dir.path().join("absent"), "x", "{}");
        let err = edit_file(&def, "dark").unwrap_err();
        assert!(matches!(err, ApplyError::FileRead { .. }));
    }

    #[test]
    fn create_if_missing_synthesizes_from_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("theme.conf");
        let mut def = definition(path.clone(), "^include .*", "include {}.conf");
        def.create_if_missing = true;
        assert_eq!(edit_file(&def, "dark").unwrap(), EditOutcome::Created);
        assert_eq!(fs::read_to_string(&path).unwrap(), "include dark.conf");
    }

    #[cfg(unix)]
    #[test]
    fn failed_write_is_file_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("theme.conf");
        std::os::unix::fs::symlink(dir.path().join("gone").join("theme.conf"), &link).unwrap();
        let mut def = definition(link, "^theme=.*", "theme={}");
        def.create_if_missing = true;
        let err = edit_file(&def, "dark").unwrap_err();
        assert!(matches!(err, ApplyError::FileWrite { .. }), "got: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn created_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt as _;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.conf");
        let mut def = definition(path.clone(), "theme=.*", "theme={}");
        def.create_if_missing = true;
        edit_file(&def, "dark").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn existing_permissions_are_preserved() {
        use std::os::unix::fs::PermissionsExt as _;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, "THEME=light\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        let def = definition(path.clone(), "THEME=.*", "THEME={}");
        assert_eq!(edit_file(&def, "dark").unwrap(), EditOutcome::Applied);
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[cfg(unix)]
    #[test]
    fn command_runs_after_successful_edit_only() {
        let (log, tmp, _guard) = isolated_logger();
        let path = tmp.path().join("term.conf");
        fs::write(&path, "color=white\n").unwrap();
        let marker = tmp.path().join("marker");

        let mut def = definition(path, "color=.*", "color={}");
        def.command_template = Some(format!("echo {{}} > '{}'", marker.display()));
        let record = apply_definition(&def, "dark", CommandMode::Captured, &log);
        assert!(record.outcome.is_ok());
        assert!(record.command_error.is_none());
        assert_eq!(fs::read_to_string(&marker).unwrap().trim(), "dark");

        fs::remove_file(&marker).unwrap();
        def.pattern = Regex::new("^nothing$").unwrap();
        let record = apply_definition(&def, "dark", CommandMode::Captured, &log);
        assert!(record.is_failure());
        assert!(!marker.exists(), "command must not run after a failed edit");
    }

    #[cfg(unix)]
    #[test]
    fn command_failure_is_recorded_not_fatal() {
        let (log, tmp, _guard) = isolated_logger();
        let path = tmp.path().join("term.conf");
        fs::write(&path, "color=white\n").unwrap();
        let mut def = definition(path, "color=.*", "color={}");
        def.command_template = Some("exit 7".to_string());
        let record = apply_definition(&def, "dark", CommandMode::Captured, &log);
        assert_eq!(record.outcome.unwrap(), EditOutcome::Applied);
        assert!(record.command_error.is_some());
    }
}
