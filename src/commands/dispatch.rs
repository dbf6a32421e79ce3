//! Command dispatch logic for scigrade

use std::time::Instant;

use scigrade_core::config::Config;
use scigrade_core::error::{Result, ScigradeError};
use scigrade_core::{EvaluationRequest, Evaluator, Rubric};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::commands;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    match &cli.command {
        Commands::Rubric => commands::rubric::execute(cli, &Rubric::science()),

        Commands::Prompt { target, answer } => {
            let answer = commands::input::read_answer(answer)?;
            let request = EvaluationRequest::new(answer, target.subject, target.topic.clone())?;
            commands::prompt::execute(cli, &request)
        }

        Commands::Evaluate { target, answer } => {
            let answer = commands::input::read_answer(answer)?;
            let request = EvaluationRequest::new(answer, target.subject, target.topic.clone())?;
            let evaluator = build_evaluator(cli, start)?;
            runtime()?.block_on(commands::evaluate::execute(cli, &evaluator, &request))
        }

        Commands::Interactive { target } => {
            let evaluator = build_evaluator(cli, start)?;
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            runtime()?.block_on(commands::interactive::execute(
                cli,
                &evaluator,
                target,
                stdin.lock(),
                &mut stdout.lock(),
            ))
        }
    }
}

/// Resolve configuration: file, then environment, then CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::discover(cli.config.as_deref())?;
    config.apply_env_overrides(|var| std::env::var(var).ok())?;
    if let Some(secrets) = &cli.secrets {
        config.secrets_path = secrets.clone();
    }
    config.validate()?;
    Ok(config)
}

fn build_evaluator(cli: &Cli, start: Instant) -> Result<Evaluator> {
    let config = load_config(cli)?;
    let evaluator = Evaluator::from_config(&config, Rubric::science())?;
    debug!(
        elapsed = ?start.elapsed(),
        model = %evaluator.model(),
        has_credential = evaluator.has_credential(),
        "build_evaluator"
    );
    Ok(evaluator)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ScigradeError::Other(format!("failed to start async runtime: {}", e)))
}
