//! Scigrade - rubric scoring of science answers
//!
//! Sends a free-text answer to a chat-completion model with a five-criterion
//! rubric and renders the per-criterion scores and feedback.

mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use scigrade_core::error::{ExitCode as ScigradeExitCode, ScigradeError};
use scigrade_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return argument_failure(err),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => exit_with(ScigradeExitCode::Success),
        Err(e) => {
            if cli.format == OutputFormat::Json {
                eprintln!("{}", e.to_json());
            } else if !cli.quiet {
                eprintln!("error: {}", e);
            }
            exit_with(e.exit_code())
        }
    }
}

/// Report a clap failure. With `--format json` on the command line the
/// failure is written as an error envelope; help and version output and the
/// human format keep clap's own rendering.
fn argument_failure(err: clap::Error) -> ExitCode {
    let wants_json = format_from_argv(std::env::args().skip(1)) == Some(OutputFormat::Json);
    if !wants_json || matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        err.exit();
    }

    let error = match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::ArgumentConflict
        | ErrorKind::MissingRequiredArgument => ScigradeError::UsageError(err.to_string()),
        _ => ScigradeError::Other(err.to_string()),
    };
    eprintln!("{}", error.to_json());
    exit_with(error.exit_code())
}

/// Last `--format` value on the raw command line, if it parses
fn format_from_argv(args: impl IntoIterator<Item = String>) -> Option<OutputFormat> {
    let mut args = args.into_iter();
    let mut format = None;
    while let Some(arg) = args.next() {
        let value = match arg.strip_prefix("--format") {
            Some("") => args.next(),
            Some(rest) => rest.strip_prefix('=').map(str::to_string),
            None => None,
        };
        if let Some(parsed) = value.and_then(|v| v.parse().ok()) {
            format = Some(parsed);
        }
    }
    format
}

fn exit_with(code: ScigradeExitCode) -> ExitCode {
    ExitCode::from(code as u8)
}
