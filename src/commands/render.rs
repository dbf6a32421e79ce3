//! Rendering of evaluation results: score table, bar chart, JSON

use chrono::Utc;
use scigrade_core::rubric::MAX_SCORE;
use scigrade_core::{EvaluationRequest, EvaluationResult, Scorecard};

const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';
const CRITERION_HEADER: &str = "Criterion";
const SCORE_HEADER: &str = "Score";
const FEEDBACK_HEADER: &str = "Feedback";

/// Criterion / score / feedback table
pub fn score_table(card: &Scorecard) -> String {
    let name_width = criterion_width(card);
    let mut out = format!(
        "{:<name_width$}  {}  {}\n",
        CRITERION_HEADER, SCORE_HEADER, FEEDBACK_HEADER
    );

    for entry in card.scores() {
        out.push_str(&format!(
            "{:<name_width$}  {:<score_width$}  {}\n",
            entry.criterion,
            entry.score,
            entry.feedback,
            score_width = SCORE_HEADER.len(),
        ));
    }
    out
}

/// One horizontal bar per criterion, scaled to the maximum score
pub fn score_chart(card: &Scorecard) -> String {
    let name_width = criterion_width(card);
    let max = usize::try_from(MAX_SCORE).unwrap_or(0);

    card.scores()
        .iter()
        .map(|entry| {
            let filled = usize::try_from(entry.score).unwrap_or(0).min(max);
            let bar: String = std::iter::repeat(BAR_FULL)
                .take(filled)
                .chain(std::iter::repeat(BAR_EMPTY).take(max - filled))
                .collect();
            format!("{:<name_width$}  {} {}\n", entry.criterion, bar, entry.score)
        })
        .collect()
}

/// Full human-readable report for one result
pub fn human_report(result: &EvaluationResult) -> String {
    match result {
        EvaluationResult::Parsed(card) => format!(
            "Rubric Scores & Feedback\n\n{}\nScores Visualization\n\n{}\nAverage: {:.2} / {}\n",
            score_table(card),
            score_chart(card),
            card.average(),
            MAX_SCORE
        ),
        EvaluationResult::Raw(text) => format!(
            "Rubric Scores & Feedback\n\nThe model reply could not be read as scores. Raw reply:\n\n{}\n",
            text
        ),
    }
}

/// JSON document for one result
pub fn json_report(
    request: &EvaluationRequest,
    model: &str,
    result: &EvaluationResult,
) -> serde_json::Value {
    let mut report = serde_json::json!({
        "subject": request.subject.as_str(),
        "topic": request.topic,
        "model": model,
        "evaluated_at": Utc::now().to_rfc3339(),
    });

    match result {
        EvaluationResult::Parsed(card) => {
            report["status"] = serde_json::json!("parsed");
            report["scores"] = serde_json::json!(card.scores());
            report["average"] = serde_json::json!(card.average());
        }
        EvaluationResult::Raw(text) => {
            report["status"] = serde_json::json!("raw");
            report["raw"] = serde_json::json!(text);
        }
    }

    report
}

fn criterion_width(card: &Scorecard) -> usize {
    card.scores()
        .iter()
        .map(|s| s.criterion.chars().count())
        .chain(std::iter::once(CRITERION_HEADER.len()))
        .max()
        .unwrap_or(CRITERION_HEADER.len())
}
