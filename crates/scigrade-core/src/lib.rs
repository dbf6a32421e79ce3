//! Scigrade Core Library
//!
//! Rubric scoring of free-text science answers by a remote chat-completion
//! model: prompt construction, the endpoint client, and tolerant decoding of
//! the model's reply.

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod evaluation;
pub mod evaluator;
pub mod format;
pub mod gate;
pub mod logging;
pub mod prompt;
pub mod relaxed;
pub mod rubric;
pub mod subject;

pub use evaluation::{CriterionScore, EvaluationResult, Scorecard};
pub use evaluator::Evaluator;
pub use prompt::{EvaluationRequest, PromptBuilder};
pub use rubric::Rubric;
pub use subject::Subject;
