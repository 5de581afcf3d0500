//! Follow-up shell commands run after a definition is applied.
use std::io::{self, Read as _};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::definitions::PLACEHOLDER;
use crate::error::CommandError;
use crate::logging::Log;

/// How a follow-up command is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandMode {
    /// Spawn with null stdio and never wait for the child.
    Detached,
    /// Run to completion and log the captured output.
    Captured,
}

/// Result of a captured command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Standard output and standard error, interleaved as written.
    pub output: String,
    /// Whether the command exited successfully.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    fn new(output: &[u8], status: ExitStatus) -> Self {
        Self {
            output: String::from_utf8_lossy(output).into_owned(),
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Substitute `value` for the first placeholder in `template`.
///
/// A template without a placeholder is returned unchanged.
#[must_use]
pub fn render(template: &str, value: &str) -> String {
    template.replacen(PLACEHOLDER, value, 1)
}

/// Build the platform shell invocation for `command`.
fn shell(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

/// Start `cmd` with null stdio without waiting for it.
#[allow(clippy::zombie_processes)]
fn spawn_detached(cmd: &mut Command) -> io::Result<()> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
}

/// Run `cmd` to completion with stdout and stderr sharing one pipe.
fn run_combined(mut cmd: Command) -> io::Result<ExecResult> {
    let (mut reader, writer) = io::pipe()?;
    cmd.stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);
    let mut child = cmd.spawn()?;
    // The command still holds the write ends; the read only ends once they close.
    drop(cmd);

    let mut output = Vec::new();
    let read = reader.read_to_end(&mut output);
    let status = child.wait()?;
    read?;
    Ok(ExecResult::new(&output, status))
}

/// Render `template` with `value` and run it through the shell.
///
/// In [`CommandMode::Detached`] the child is spawned and forgotten; only a
/// spawn failure is reported. In [`CommandMode::Captured`] the command runs
/// to completion and its combined output is logged at debug level, one line
/// per entry prefixed with the line index.
///
/// # Errors
///
/// Returns [`CommandError::Spawn`] if the shell cannot be started and, in
/// captured mode, [`CommandError::Failed`] on a non-zero exit.
pub fn run(template: &str, value: &str, mode: CommandMode, log: &dyn Log) -> Result<(), CommandError> {
    let command = render(template, value);
    log.debug(&format!("running: {command}"));

    let mut cmd = shell(&command);
    match mode {
        CommandMode::Detached => {
            spawn_detached(&mut cmd).map_err(|source| CommandError::Spawn { command, source })
        }
        CommandMode::Captured => {
            let result = match run_combined(cmd) {
                Ok(result) => result,
                Err(source) => return Err(CommandError::Spawn { command, source }),
            };
            for (i, line) in result.output.lines().enumerate() {
                log.debug(&format!("[{i}]: {line}"));
            }
            if result.success {
                Ok(())
            } else {
                Err(CommandError::Failed {
                    command,
                    code: result.code,
                })
            }
        }
    }
}
