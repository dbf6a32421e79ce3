//! The fixed scoring rubric.
//!
//! A rubric is an ordered list of named criteria. It is built once and
//! handed to the prompt builder and the evaluator; nothing mutates it
//! after construction.

use serde::Serialize;

/// Lowest score a criterion can receive
pub const MIN_SCORE: i64 = 1;
/// Highest score a criterion can receive
pub const MAX_SCORE: i64 = 5;

const SCIENCE_CRITERIA: [(&str, &str); 5] = [
    ("Accuracy", "Scientifically correct information?"),
    ("Completeness", "Addresses all parts of the question?"),
    (
        "Clarity",
        "Is the answer clearly written and understandable?",
    ),
    ("Depth", "Demonstrates deep understanding?"),
    ("Relevance", "Information relevant to the question?"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Criterion {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rubric {
    criteria: Vec<Criterion>,
}

impl Rubric {
    /// The five-criterion rubric used for science answers
    pub fn science() -> Self {
        Self {
            criteria: SCIENCE_CRITERIA
                .iter()
                .map(|(name, description)| Criterion {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.criteria.iter().map(|c| c.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.criteria.iter().any(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// One `- Name: description` line per criterion, in rubric order
    pub fn criteria_text(&self) -> String {
        self.criteria
            .iter()
            .map(|c| format!("- {}: {}", c.name, c.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::science()
    }
}
