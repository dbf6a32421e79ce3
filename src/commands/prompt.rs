//! `scigrade prompt` command - show the prompt without calling the model

use scigrade_core::error::Result;
use scigrade_core::{EvaluationRequest, PromptBuilder, Rubric};

use crate::cli::{Cli, OutputFormat};

/// Execute the prompt command
pub fn execute(cli: &Cli, request: &EvaluationRequest) -> Result<()> {
    let prompt = PromptBuilder::new(Rubric::science()).build(request);

    match cli.format {
        OutputFormat::Human => println!("{}", prompt),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "subject": request.subject.as_str(),
                "topic": request.topic,
                "prompt": prompt,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
