//! Scoring error types.
//!
//! Graders themselves never fail. These errors come from the boundary around
//! them: routing an answer to a grader and recording session scores.

use thiserror::Error;

/// Errors raised around the graders.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    /// No grader exists for this question type.
    #[error("unsupported question type: {0}")]
    UnsupportedQuestion(String),

    /// The answer is not in the shape the question's grader expects.
    #[error("question type {question_type} expects a {expected} answer, got {found}")]
    AnswerShape {
        question_type: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A score was already recorded for this question in the session.
    #[error("question '{0}' already has a recorded score")]
    DuplicateScore(String),
}

impl ScoringError {
    /// Returns `true` if the error should degrade to a zero score rather
    /// than abort the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScoringError::UnsupportedQuestion(_) | ScoringError::AnswerShape { .. }
        )
    }
}
