//! `scigrade interactive` command - grade answers read from stdin in turn
//!
//! Each answer ends with a line holding only `.` (or end of input). A
//! submission is awaited before the next answer is read, so results never
//! interleave. A failed submission is reported and the session continues.

use std::io::{BufRead, Write};

use scigrade_core::error::{Result, ScigradeError};
use scigrade_core::{EvaluationRequest, Evaluator};
use tracing::{debug, warn};

use crate::cli::{Cli, OutputFormat, TargetArgs};
use crate::commands::{input, render};

/// Execute the interactive command
pub async fn execute<R: BufRead, W: Write>(
    cli: &Cli,
    evaluator: &Evaluator,
    target: &TargetArgs,
    mut reader: R,
    out: &mut W,
) -> Result<()> {
    let mut submitted = 0usize;
    let mut failed = 0usize;

    loop {
        if cli.format == OutputFormat::Human && !cli.quiet {
            eprintln!(
                "Answer for {} / '{}' (finish with a line containing only '{}'):",
                target.subject,
                target.topic,
                input::END_OF_ANSWER
            );
        }

        let Some(answer) = input::next_answer(&mut reader)? else {
            break;
        };

        let request = match EvaluationRequest::new(answer, target.subject, target.topic.clone())
        {
            Ok(request) => request,
            Err(e) => {
                report_error(cli, &e);
                continue;
            }
        };

        submitted += 1;
        match evaluator.evaluate(&request).await {
            Ok(result) => match cli.format {
                OutputFormat::Human => {
                    writeln!(out, "{}", render::human_report(&result))?;
                }
                OutputFormat::Json => {
                    let report = render::json_report(&request, evaluator.model(), &result);
                    writeln!(out, "{}", serde_json::to_string(&report)?)?;
                }
            },
            Err(e) => {
                failed += 1;
                warn!(error = %e, kind = e.error_type(), "submission_failed");
                report_error(cli, &e);
            }
        }
    }

    debug!(submitted, failed, "interactive_done");
    Ok(())
}

fn report_error(cli: &Cli, error: &ScigradeError) {
    if cli.format == OutputFormat::Json {
        eprintln!("{}", error.to_json());
    } else {
        eprintln!("error: {}", error);
    }
}
