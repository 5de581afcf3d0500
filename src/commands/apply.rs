//! Command: apply a theme.
use std::sync::Arc;

use anyhow::{Result, bail};

use crate::apply::{self, ApplyMode, ApplyReport, EditOutcome, EditRecord};
use crate::config::Config;
use crate::config::resolve;
use crate::logging::Logger;

/// Apply the theme called `name` to every config it addresses.
///
/// # Errors
///
/// Returns an error if the theme does not exist or if any edit failed.
/// Follow-up command failures are only reported as warnings.
pub fn run(config: &Config, name: &str, mode: ApplyMode, log: &Arc<Logger>) -> Result<()> {
    let theme = resolve::select(&config.themes, name)?;
    let working = resolve::filter(theme, &config.edit_set);

    log.stage(&format!("Applying theme {name}"));
    if working.is_empty() {
        log.info(&format!("theme '{name}' selects no configs"));
        return Ok(());
    }
    log.debug(&format!(
        "{} config(s) across {} file(s), {mode:?}",
        working.definition_count(),
        working.path_count()
    ));

    let report = apply::apply(theme, &working, mode, log);
    print_summary(&report, log);

    let count = report.failure_count();
    if count > 0 {
        bail!("{count} config(s) failed");
    }
    Ok(())
}

/// Icon and ANSI color for one record.
const fn marker(record: &EditRecord) -> (&'static str, &'static str) {
    match (&record.outcome, &record.command_error) {
        (Err(_), _) => ("✗", "\x1b[31m"),
        (Ok(_), Some(_)) => ("○", "\x1b[33m"),
        (Ok(EditOutcome::Unchanged), None) => ("·", "\x1b[2m"),
        (Ok(EditOutcome::Applied | EditOutcome::Created), None) => ("✓", "\x1b[32m"),
    }
}

/// One summary line for `record`, without color.
#[must_use]
pub fn summary_line(record: &EditRecord) -> String {
    let (icon, _) = marker(record);
    let detail = match (&record.outcome, &record.command_error) {
        (Err(e), _) => format!(" ({e})"),
        (Ok(_), Some(e)) => format!(" (command: {e})"),
        (Ok(EditOutcome::Created), None) => " (created)".to_string(),
        (Ok(EditOutcome::Unchanged), None) => " (unchanged)".to_string(),
        (Ok(EditOutcome::Applied), None) => String::new(),
    };
    format!("{icon} {}{detail}", record.definition)
}

/// Print one line per record, the totals, and the log file location.
#[allow(clippy::print_stdout)]
fn print_summary(report: &ApplyReport, log: &Logger) {
    if report.records().is_empty() {
        return;
    }

    println!();
    log.stage("Summary");
    for record in report.records() {
        let (_, color) = marker(record);
        log.info(&format!("{color}{}\x1b[0m", summary_line(record)));
    }

    println!();
    let commands = report.command_failures().count();
    let mut totals = report.stats().summary();
    if commands > 0 {
        totals.push_str(&format!(", {commands} command(s) failed"));
    }
    log.info(&totals);

    if let Some(path) = log.log_path() {
        log.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
    }
}
