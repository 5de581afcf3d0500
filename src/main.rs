//! themr command-line entry point.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use themr::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.show_debug());
    let log = Arc::new(logging::Logger::new());

    match commands::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
