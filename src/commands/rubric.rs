//! `scigrade rubric` command - show the scoring rubric

use scigrade_core::error::Result;
use scigrade_core::rubric::{MAX_SCORE, MIN_SCORE};
use scigrade_core::Rubric;

use crate::cli::{Cli, OutputFormat};

/// Execute the rubric command
pub fn execute(cli: &Cli, rubric: &Rubric) -> Result<()> {
    match cli.format {
        OutputFormat::Human => {
            let width = rubric
                .names()
                .map(|n| n.chars().count())
                .max()
                .unwrap_or(0);
            for criterion in rubric.criteria() {
                println!("{:<width$}  {}", criterion.name, criterion.description);
            }
            if !cli.quiet {
                println!();
                println!("Each criterion is scored from {} to {}.", MIN_SCORE, MAX_SCORE);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "min_score": MIN_SCORE,
                "max_score": MAX_SCORE,
                "criteria": rubric.criteria(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
