//! Apply engine: edits every file of a working set for one theme.
//!
//! Each distinct path is one unit of work. In [`ApplyMode::Parallel`] the
//! paths are processed concurrently on the rayon pool, each with its own
//! [`BufferedLog`] that is flushed when the path is done; the definitions of
//! one path always run in order on the same thread. In
//! [`ApplyMode::Sequential`] everything runs on the calling thread.
mod edit;
mod report;

pub use report::{ApplyReport, EditOutcome, EditRecord, EditStats};

use std::sync::Arc;

use crate::config::definitions::{EditGroup, EditSet};
use crate::config::resolve::resolve_value;
use crate::config::themes::Theme;
use crate::exec::CommandMode;
use crate::logging::{BufferedLog, Log, Logger};

/// Scheduling of file edits and follow-up commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// One task per path on the rayon pool; commands are detached.
    #[default]
    Parallel,
    /// Everything on the calling thread; command output is captured.
    Sequential,
}

impl ApplyMode {
    /// How follow-up commands run in this mode.
    #[must_use]
    pub const fn command_mode(self) -> CommandMode {
        match self {
            Self::Parallel => CommandMode::Detached,
            Self::Sequential => CommandMode::Captured,
        }
    }
}

/// Apply `theme` to every definition in `edit_set`.
///
/// A failure on one definition never stops any other definition, on the
/// same path or elsewhere. Records are returned in group order, then
/// definition order, regardless of mode.
#[must_use]
pub fn apply(theme: &Theme, edit_set: &EditSet, mode: ApplyMode, log: &Arc<Logger>) -> ApplyReport {
    let command_mode = mode.command_mode();
    let records: Vec<EditRecord> = match mode {
        ApplyMode::Sequential => edit_set
            .groups()
            .iter()
            .flat_map(|group| apply_group(theme, group, command_mode, log.as_ref()))
            .collect(),
        ApplyMode::Parallel => {
            use rayon::prelude::*;
            let per_group: Vec<Vec<EditRecord>> = edit_set
                .groups()
                .par_iter()
                .map(|group| {
                    let buffered = BufferedLog::new(Arc::clone(log));
                    let records = apply_group(theme, group, command_mode, &buffered);
                    buffered.flush();
                    records
                })
                .collect();
            per_group.into_iter().flatten().collect()
        }
    };
    ApplyReport::new(records)
}

/// Apply every definition of one path, in order.
fn apply_group(
    theme: &Theme,
    group: &EditGroup,
    command_mode: CommandMode,
    log: &dyn Log,
) -> Vec<EditRecord> {
    log.debug(&format!(
        "{}: {} definition(s)",
        group.path.display(),
        group.definitions.len()
    ));
    group
        .definitions
        .iter()
        .filter_map(|definition| {
            let Some(value) = resolve_value(theme, definition) else {
                log.debug(&format!(
                    "{}: theme '{}' sets no value, skipping",
                    definition.name,
                    theme.name()
                ));
                return None;
            };
            Some(edit::apply_definition(definition, value, command_mode, log))
        })
        .collect()
}
