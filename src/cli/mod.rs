//! CLI argument parsing for scigrade
//!
//! Global flags: --format, --quiet, --verbose, --log-level, --log-json,
//! --config, --secrets

pub mod args;
pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{AnswerArgs, TargetArgs};
use parse::parse_format;
pub use scigrade_core::format::OutputFormat;

/// Scigrade - rubric scoring of science answers by a chat-completion model
#[derive(Parser, Debug)]
#[command(name = "scigrade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human or json)
    #[arg(long, global = true, value_parser = parse_format, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter (e.g. debug, or scigrade_core=trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: .scigrade/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Managed-secrets file holding the API key
    #[arg(long, global = true)]
    pub secrets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate an answer against the rubric
    Evaluate {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        answer: AnswerArgs,
    },

    /// Print the prompt that would be sent, without calling the model
    Prompt {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        answer: AnswerArgs,
    },

    /// Show the scoring rubric
    Rubric,

    /// Evaluate answers read from stdin one after another
    Interactive {
        #[command(flatten)]
        target: TargetArgs,
    },
}
