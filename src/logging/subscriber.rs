//! Tracing subscriber setup: console formatter, persistent log file, and
//! initialisation.
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{format_utc_datetime, log_file_path, strip_ansi};

/// Tracing target used for stage headers.
pub(super) const STAGE_TARGET: &str = "themr::stage";

/// Environment variable holding a console filter directive, e.g. `debug`.
pub const LOG_ENV_VAR: &str = "THEMR_LOG";

/// Size past which the log is moved to `themr.log.old` before a run.
const MAX_LOG_BYTES: u64 = 1024 * 1024;

/// Collects the formatted `message` field of an event.
#[derive(Default)]
struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

fn message(event: &tracing::Event<'_>) -> String {
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    visitor.0
}

/// Label written in the level column of the log file.
fn file_label(level: Level, target: &str) -> &'static str {
    if level == Level::INFO && target == STAGE_TARGET {
        "==>"
    } else {
        level.as_str()
    }
}

/// Appends every event to the persistent log, one timestamped line each.
///
/// Runs accumulate in the same file so that a failed apply can still be
/// inspected after the next one.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log under the themr cache directory.
    ///
    /// Returns `None` if the cache directory or the file is unavailable.
    pub(super) fn new() -> Option<Self> {
        Self::open(&log_file_path()?).ok()
    }

    /// Open `path` for appending, rolling an oversized log over first.
    fn open(path: &Path) -> io::Result<Self> {
        if fs::metadata(path).is_ok_and(|m| m.len() > MAX_LOG_BYTES) {
            fs::rename(path, path.with_extension("log.old"))?;
        }
        let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let metadata = event.metadata();
        let label = file_label(*metadata.level(), metadata.target());
        let line = format!(
            "{} {label:<5} {}",
            format_utc_datetime(),
            strip_ansi(&message(event))
        );
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console output: colored level tags for problems, an arrow for stages.
struct ThemrFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ThemrFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let msg = message(event);
        match *metadata.level() {
            Level::ERROR => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            Level::WARN => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            Level::INFO if metadata.target() == STAGE_TARGET => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            Level::INFO => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// The console shows `info` and above, or `debug` when `verbose` is set;
/// a [`LOG_ENV_VAR`] directive replaces either. Warnings and errors go to
/// stderr, the rest to stdout. Every event at `debug` and above is also
/// appended to `$XDG_CACHE_HOME/themr/themr.log`.
///
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let make_writer = io::stderr
        .with_max_level(Level::WARN)
        .and(io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ThemrFormatter)
        .with_writer(make_writer)
        .with_filter(console_filter);

    let file_layer = FileLayer::new().map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
