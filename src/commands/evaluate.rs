//! `scigrade evaluate` command - grade one answer

use std::io::Write;

use scigrade_core::error::Result;
use scigrade_core::{EvaluationRequest, Evaluator};

use crate::cli::{Cli, OutputFormat};
use crate::commands::render;

/// Execute the evaluate command
pub async fn execute(cli: &Cli, evaluator: &Evaluator, request: &EvaluationRequest) -> Result<()> {
    if cli.format == OutputFormat::Human && !cli.quiet {
        eprintln!("Evaluating...");
    }

    let result = evaluator.evaluate(request).await?;

    let mut stdout = std::io::stdout().lock();
    match cli.format {
        OutputFormat::Human => {
            write!(stdout, "{}", render::human_report(&result))?;
        }
        OutputFormat::Json => {
            let report = render::json_report(request, evaluator.model(), &result);
            writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }

    Ok(())
}
