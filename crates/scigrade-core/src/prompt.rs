//! Prompt construction for rubric scoring.
//!
//! The builder is a pure function of the request and the rubric it was
//! constructed with. The answer is embedded verbatim; no escaping is
//! applied, so instructions written inside an answer reach the model
//! unchanged.

use crate::error::{Result, ScigradeError};
use crate::rubric::{Rubric, MAX_SCORE, MIN_SCORE};
use crate::subject::Subject;

/// One user submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub answer: String,
    pub subject: Subject,
    pub topic: String,
}

impl EvaluationRequest {
    /// Validate and build a request. The answer must contain something
    /// other than whitespace; it is stored untrimmed.
    pub fn new(
        answer: impl Into<String>,
        subject: Subject,
        topic: impl Into<String>,
    ) -> Result<Self> {
        let answer = answer.into();
        if answer.trim().is_empty() {
            return Err(ScigradeError::EmptyAnswer);
        }

        Ok(Self {
            answer,
            subject,
            topic: topic.into(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    rubric: Rubric,
}

impl PromptBuilder {
    pub fn new(rubric: Rubric) -> Self {
        Self { rubric }
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn build(&self, request: &EvaluationRequest) -> String {
        let keys = self
            .rubric
            .names()
            .map(|name| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(", ");

        let example = self
            .rubric
            .names()
            .map(|name| format!("\"{}\": [score, \"feedback\"]", name))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"You are an expert in {subject}. Evaluate the following answer on the topic '{topic}' using the rubric below.

# Rubric
{criteria}

# Answer
{answer}

# Instructions
For each criterion, provide:
1. An integer score from {min} to {max}
2. A concise explanation of the reasoning, highlighting inaccuracies or gaps.

Return only a JSON object with exactly these keys: {keys}.
Each value must be a two-element array: [integer score, "feedback"].
Format the response as JSON like:
{{{example}}}

Provide JSON only, no additional text."#,
            subject = request.subject,
            topic = request.topic,
            criteria = self.rubric.criteria_text(),
            answer = request.answer,
            min = MIN_SCORE,
            max = MAX_SCORE,
            keys = keys,
            example = example,
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(Rubric::science())
    }
}
