//! Session grading orchestrator.
//!
//! Grades every answered question of a question set, feeds the scores into a
//! [`SessionScores`] aggregate and produces a [`SessionReport`].

use std::collections::BTreeMap;
use std::time::Instant;

use uuid::Uuid;

use crate::aggregate::SessionScores;
use crate::config::GradingConfig;
use crate::dispatch::grade_question;
use crate::model::{Answer, QuestionSet};
use crate::report::{QuestionOutcome, QuestionSetSummary, SessionReport};

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_question_graded(&self, outcome: &QuestionOutcome);
    fn on_question_skipped(&self, question_id: &str);
    fn on_session_complete(&self, graded: usize, skipped: usize);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_question_graded(&self, _: &QuestionOutcome) {}
    fn on_question_skipped(&self, _: &str) {}
    fn on_session_complete(&self, _: usize, _: usize) {}
}

/// Grades whole sessions with a fixed configuration.
pub struct GradingEngine {
    config: GradingConfig,
}

impl GradingEngine {
    pub fn new(config: GradingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Grade the answered questions of `set`, in question order.
    ///
    /// Questions without an answer are skipped and listed in the report;
    /// answers for unknown question ids are ignored with a warning.
    pub fn run(
        &self,
        set: &QuestionSet,
        answers: &BTreeMap<String, Answer>,
        progress: &dyn ProgressReporter,
    ) -> SessionReport {
        let start = Instant::now();
        let mut scores = SessionScores::new();
        let mut outcomes = Vec::new();
        let mut unanswered = Vec::new();

        for question in &set.questions {
            let Some(answer) = answers.get(&question.id) else {
                progress.on_question_skipped(&question.id);
                unanswered.push(question.id.clone());
                continue;
            };

            let result = grade_question(question, answer, &self.config);
            let skill = question.kind.skill();

            if let Err(e) = scores.record(&question.id, skill, result.score) {
                tracing::warn!("{e}, keeping the first score");
                continue;
            }

            let outcome = QuestionOutcome {
                question_id: question.id.clone(),
                question_type: question.kind.type_name().to_string(),
                skill,
                verdict: result.verdict(),
                result,
            };
            progress.on_question_graded(&outcome);
            outcomes.push(outcome);
        }

        for id in answers.keys() {
            if !set.questions.iter().any(|q| &q.id == id) {
                tracing::warn!("answer for unknown question '{id}' ignored");
            }
        }

        progress.on_session_complete(outcomes.len(), unanswered.len());

        SessionReport {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            question_set: QuestionSetSummary {
                id: set.id.clone(),
                name: set.name.clone(),
                question_count: set.questions.len(),
            },
            outcomes,
            unanswered,
            summary: scores.finish(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}
