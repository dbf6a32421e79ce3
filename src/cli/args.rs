use super::parse::parse_subject;
use clap::Args;
use scigrade_core::Subject;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Subject of the question (Biology, Physics, Chemistry)
    #[arg(long, short, value_parser = parse_subject, default_value = "Biology")]
    pub subject: Subject,

    /// Topic of the question
    #[arg(long, short, default_value = "")]
    pub topic: String,
}

#[derive(Args, Debug, Clone)]
pub struct AnswerArgs {
    /// Answer text (read from stdin when neither --answer nor --answer-file is given)
    #[arg(long, short, conflicts_with = "answer_file")]
    pub answer: Option<String>,

    /// Read the answer from a file
    #[arg(long)]
    pub answer_file: Option<PathBuf>,
}
