//! Evaluation results and reply decoding.
//!
//! A reply either decodes into a [`Scorecard`] covering exactly the rubric's
//! criteria, or it is kept verbatim as [`EvaluationResult::Raw`]. Decode
//! failures never escape this module as errors.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::relaxed::{self, ParseError};
use crate::rubric::{Rubric, MAX_SCORE, MIN_SCORE};

/// Score and feedback for one criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriterionScore {
    pub criterion: String,
    pub score: i64,
    pub feedback: String,
}

/// Per-criterion scores in rubric order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    scores: Vec<CriterionScore>,
}

impl Scorecard {
    pub fn scores(&self) -> &[CriterionScore] {
        &self.scores
    }

    pub fn get(&self, criterion: &str) -> Option<&CriterionScore> {
        self.scores.iter().find(|s| s.criterion == criterion)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Mean score across criteria, or 0.0 for an empty card
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let total: i64 = self.scores.iter().map(|s| s.score).sum();
        total as f64 / self.scores.len() as f64
    }
}

/// Outcome of one evaluation. Callers must branch on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationResult {
    /// The reply decoded into the expected criterion mapping
    Parsed(Scorecard),
    /// The reply could not be decoded; the original text, unmodified
    Raw(String),
}

impl EvaluationResult {
    pub fn is_parsed(&self) -> bool {
        matches!(self, EvaluationResult::Parsed(_))
    }

    pub fn scorecard(&self) -> Option<&Scorecard> {
        match self {
            EvaluationResult::Parsed(card) => Some(card),
            EvaluationResult::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            EvaluationResult::Parsed(_) => None,
            EvaluationResult::Raw(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("reply is not an object")]
    NotAnObject,

    #[error("missing criterion {0}")]
    MissingCriterion(String),

    #[error("unexpected criterion {0}")]
    UnexpectedCriterion(String),

    #[error("{0}: expected a [score, feedback] pair")]
    NotAPair(String),

    #[error("{criterion}: score {value} is not an integer")]
    InvalidScore { criterion: String, value: String },

    #[error("{criterion}: score {score} outside 1..=5")]
    ScoreOutOfRange { criterion: String, score: i64 },

    #[error("{0}: feedback is not text")]
    FeedbackNotText(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("reply is not JSON: {0}")]
    Syntax(#[from] ParseError),

    #[error("reply has the wrong shape: {0}")]
    Shape(#[from] ShapeError),
}

/// Decode a reply into a scorecard for `rubric`.
pub fn try_decode(reply: &str, rubric: &Rubric) -> Result<Scorecard, DecodeError> {
    let value = relaxed::parse_reply(reply)?;
    Ok(scorecard_from_value(&value, rubric)?)
}

/// Decode a reply, falling back to the raw text on any decode failure.
pub fn decode(reply: &str, rubric: &Rubric) -> EvaluationResult {
    match try_decode(reply, rubric) {
        Ok(card) => {
            tracing::debug!(criteria = card.len(), "reply_parsed");
            EvaluationResult::Parsed(card)
        }
        Err(err) => {
            tracing::debug!(error = %err, "reply_raw_fallback");
            EvaluationResult::Raw(reply.to_string())
        }
    }
}

fn scorecard_from_value(value: &Value, rubric: &Rubric) -> Result<Scorecard, ShapeError> {
    let object = value.as_object().ok_or(ShapeError::NotAnObject)?;

    if let Some(extra) = object.keys().find(|key| !rubric.contains(key)) {
        return Err(ShapeError::UnexpectedCriterion(extra.clone()));
    }

    let scores = rubric
        .names()
        .map(|name| {
            let entry = object
                .get(name)
                .ok_or_else(|| ShapeError::MissingCriterion(name.to_string()))?;
            criterion_score(name, entry)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scorecard { scores })
}

fn criterion_score(name: &str, entry: &Value) -> Result<CriterionScore, ShapeError> {
    let pair = match entry.as_array() {
        Some(pair) if pair.len() == 2 => pair,
        _ => return Err(ShapeError::NotAPair(name.to_string())),
    };

    let score = integer_score(&pair[0]).ok_or_else(|| ShapeError::InvalidScore {
        criterion: name.to_string(),
        value: pair[0].to_string(),
    })?;
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ShapeError::ScoreOutOfRange {
            criterion: name.to_string(),
            score,
        });
    }

    let feedback = pair[1]
        .as_str()
        .ok_or_else(|| ShapeError::FeedbackNotText(name.to_string()))?;

    Ok(CriterionScore {
        criterion: name.to_string(),
        score,
        feedback: feedback.to_string(),
    })
}

/// Integers, whole floats (`4.0`) and numeric strings (`"4"`) are accepted
fn integer_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MITOCHONDRIA_REPLY: &str = r#"{"Accuracy":[5,"Correct"],"Completeness":[3,"Missing detail on electron transport chain"],"Clarity":[4,"Clear"],"Depth":[3,"Surface level"],"Relevance":[5,"On topic"]}"#;

    fn expect_parsed(result: EvaluationResult) -> Scorecard {
        match result {
            EvaluationResult::Parsed(card) => card,
            EvaluationResult::Raw(raw) => panic!("expected parsed result, got raw: {raw}"),
        }
    }

    #[test]
    fn test_decode_mitochondria_reply() {
        let rubric = Rubric::science();
        let card = expect_parsed(decode(MITOCHONDRIA_REPLY, &rubric));

        let expected = [
            ("Accuracy", 5, "Correct"),
            ("Completeness", 3, "Missing detail on electron transport chain"),
            ("Clarity", 4, "Clear"),
            ("Depth", 3, "Surface level"),
            ("Relevance", 5, "On topic"),
        ];
        assert_eq!(card.len(), expected.len());
        for (score, (criterion, value, feedback)) in card.scores().iter().zip(expected) {
            assert_eq!(score.criterion, criterion);
            assert_eq!(score.score, value);
            assert_eq!(score.feedback, feedback);
        }
        assert_eq!(card.average(), 4.0);
    }

    #[test]
    fn test_criterion_set_matches_rubric() {
        let rubric = Rubric::science();
        let card = expect_parsed(decode(MITOCHONDRIA_REPLY, &rubric));
        let names: Vec<&str> = card.scores().iter().map(|s| s.criterion.as_str()).collect();
        assert_eq!(names, rubric.names().collect::<Vec<_>>());
    }

    #[test]
    fn test_decode_python_style_reply_with_apostrophes() {
        let reply = r#"{'Accuracy': [4, "It's mostly right"], 'Completeness': [3, 'Partial'], 'Clarity': [5, 'Clear'], 'Depth': [2, "Doesn't explain why"], 'Relevance': [5, 'On topic']}"#;
        let card = expect_parsed(decode(reply, &Rubric::science()));
        assert_eq!(card.get("Accuracy").unwrap().feedback, "It's mostly right");
        assert_eq!(card.get("Depth").unwrap().feedback, "Doesn't explain why");
    }

    #[test]
    fn test_prose_falls_back_to_raw() {
        for reply in [
            "I cannot evaluate this.",
            "I'm not able to process this request.",
        ] {
            assert_eq!(
                decode(reply, &Rubric::science()),
                EvaluationResult::Raw(reply.to_string())
            );
        }
    }

    #[test]
    fn test_hostile_nesting_falls_back_to_raw() {
        let reply = "[".repeat(200_000);
        let result = decode(&reply, &Rubric::science());
        assert_eq!(result.raw(), Some(reply.as_str()));
    }

    #[test]
    fn test_raw_keeps_original_text_unmodified() {
        let reply = "  {'Accuracy': [5, 'ok']  ";
        let result = decode(reply, &Rubric::science());
        assert_eq!(result.raw(), Some(reply));
        assert!(!result.is_parsed());
    }

    #[test]
    fn test_missing_criterion_is_shape_error() {
        let reply = r#"{"Accuracy":[5,"a"],"Completeness":[3,"b"],"Clarity":[4,"c"],"Depth":[3,"d"]}"#;
        assert_eq!(
            try_decode(reply, &Rubric::science()),
            Err(DecodeError::Shape(ShapeError::MissingCriterion(
                "Relevance".to_string()
            )))
        );
    }

    #[test]
    fn test_extra_criterion_is_shape_error() {
        let reply = r#"{"Accuracy":[5,"a"],"Completeness":[3,"b"],"Clarity":[4,"c"],"Depth":[3,"d"],"Relevance":[5,"e"],"Style":[1,"f"]}"#;
        assert_eq!(
            try_decode(reply, &Rubric::science()),
            Err(DecodeError::Shape(ShapeError::UnexpectedCriterion(
                "Style".to_string()
            )))
        );
    }

    #[test]
    fn test_out_of_range_score_falls_back() {
        let reply = r#"{"Accuracy":[7,"a"],"Completeness":[3,"b"],"Clarity":[4,"c"],"Depth":[3,"d"],"Relevance":[5,"e"]}"#;
        assert_eq!(
            try_decode(reply, &Rubric::science()),
            Err(DecodeError::Shape(ShapeError::ScoreOutOfRange {
                criterion: "Accuracy".to_string(),
                score: 7
            }))
        );
        assert!(!decode(reply, &Rubric::science()).is_parsed());
    }

    #[test]
    fn test_fractional_score_rejected_whole_float_accepted() {
        let rubric = Rubric::science();
        let fractional = r#"{"Accuracy":[4.5,"a"],"Completeness":[3,"b"],"Clarity":[4,"c"],"Depth":[3,"d"],"Relevance":[5,"e"]}"#;
        assert!(matches!(
            try_decode(fractional, &rubric),
            Err(DecodeError::Shape(ShapeError::InvalidScore { .. }))
        ));

        let whole = r#"{"Accuracy":[4.0,"a"],"Completeness":["3","b"],"Clarity":[4,"c"],"Depth":[3,"d"],"Relevance":[5,"e"]}"#;
        let card = try_decode(whole, &rubric).unwrap();
        assert_eq!(card.get("Accuracy").unwrap().score, 4);
        assert_eq!(card.get("Completeness").unwrap().score, 3);
    }

    #[test]
    fn test_non_pair_values_fall_back() {
        let rubric = Rubric::science();
        assert!(matches!(
            try_decode("[1, 2]", &rubric),
            Err(DecodeError::Shape(ShapeError::NotAnObject))
        ));
        let triple = r#"{"Accuracy":[5,"a","x"],"Completeness":[3,"b"],"Clarity":[4,"c"],"Depth":[3,"d"],"Relevance":[5,"e"]}"#;
        assert_eq!(
            try_decode(triple, &rubric),
            Err(DecodeError::Shape(ShapeError::NotAPair("Accuracy".to_string())))
        );
        let numeric_feedback = r#"{"Accuracy":[5,5],"Completeness":[3,"b"],"Clarity":[4,"c"],"Depth":[3,"d"],"Relevance":[5,"e"]}"#;
        assert_eq!(
            try_decode(numeric_feedback, &rubric),
            Err(DecodeError::Shape(ShapeError::FeedbackNotText(
                "Accuracy".to_string()
            )))
        );
    }

    #[test]
    fn test_fenced_reply_is_parsed() {
        let reply = format!("```json\n{}\n```", MITOCHONDRIA_REPLY);
        assert!(decode(&reply, &Rubric::science()).is_parsed());
    }
}
