//! Outcome records collected by [`apply`](super::apply).
use std::ops::AddAssign;
use std::path::PathBuf;

use crate::error::{ApplyError, CommandError};

/// What happened to a file for one definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Content changed and was written back.
    Applied,
    /// The file did not exist and was synthesized from the template.
    Created,
    /// Content already matched the theme; nothing was written.
    Unchanged,
}

/// Result of applying one definition.
#[derive(Debug)]
pub struct EditRecord {
    /// Name of the definition.
    pub definition: String,
    /// Target path.
    pub path: PathBuf,
    /// Edit result; errors are local to this definition.
    pub outcome: Result<EditOutcome, ApplyError>,
    /// Follow-up command failure, if any. Never an edit failure.
    pub command_error: Option<CommandError>,
}

impl EditRecord {
    /// `true` when the edit itself failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Per-outcome counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EditStats {
    /// Definitions whose file was rewritten.
    pub applied: u32,
    /// Definitions whose file was created.
    pub created: u32,
    /// Definitions whose file already matched.
    pub unchanged: u32,
    /// Definitions whose edit failed.
    pub failed: u32,
}

impl EditStats {
    /// Format the summary string (e.g. "3 applied, 1 unchanged").
    ///
    /// Zero `created` and `failed` counts are omitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use themr::apply::EditStats;
    ///
    /// let stats = EditStats { applied: 3, created: 0, unchanged: 1, failed: 0 };
    /// assert_eq!(stats.summary(), "3 applied, 1 unchanged");
    ///
    /// let stats = EditStats { applied: 1, created: 1, unchanged: 0, failed: 2 };
    /// assert_eq!(stats.summary(), "1 applied, 1 created, 0 unchanged, 2 failed");
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} applied", self.applied)];
        if self.created > 0 {
            parts.push(format!("{} created", self.created));
        }
        parts.push(format!("{} unchanged", self.unchanged));
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        parts.join(", ")
    }
}

impl AddAssign<&EditRecord> for EditStats {
    fn add_assign(&mut self, record: &EditRecord) {
        match record.outcome {
            Ok(EditOutcome::Applied) => self.applied += 1,
            Ok(EditOutcome::Created) => self.created += 1,
            Ok(EditOutcome::Unchanged) => self.unchanged += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Every record produced by one apply, in group then definition order.
#[derive(Debug, Default)]
pub struct ApplyReport {
    records: Vec<EditRecord>,
}

impl ApplyReport {
    /// Wrap the collected records.
    #[must_use]
    pub const fn new(records: Vec<EditRecord>) -> Self {
        Self { records }
    }

    /// All records.
    #[must_use]
    pub fn records(&self) -> &[EditRecord] {
        &self.records
    }

    /// Edit failures, in order.
    pub fn failures(&self) -> impl Iterator<Item = &ApplyError> {
        self.records.iter().filter_map(|r| r.outcome.as_ref().err())
    }

    /// Number of failed edits.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// `true` if any edit failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.records.iter().any(EditRecord::is_failure)
    }

    /// Follow-up command failures paired with their definition name.
    pub fn command_failures(&self) -> impl Iterator<Item = (&str, &CommandError)> {
        self.records
            .iter()
            .filter_map(|r| r.command_error.as_ref().map(|e| (r.definition.as_str(), e)))
    }

    /// Outcome counters.
    #[must_use]
    pub fn stats(&self) -> EditStats {
        let mut stats = EditStats::default();
        for record in &self.records {
            stats += record;
        }
        stats
    }
}
