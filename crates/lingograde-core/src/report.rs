//! Session report types and their markdown rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::SessionSummary;
use crate::model::{GradeResult, Skill, Verdict};

/// A graded test session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the session was graded.
    pub created_at: DateTime<Utc>,
    /// Summary of the question set.
    pub question_set: QuestionSetSummary,
    /// One entry per graded question, in question order.
    pub outcomes: Vec<QuestionOutcome>,
    /// Questions that had no answer.
    #[serde(default)]
    pub unanswered: Vec<String>,
    /// Overall, scaled and per-skill scores.
    pub summary: SessionSummary,
    /// Wall-clock grading time in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a question set (without the questions themselves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSetSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

/// The graded result of one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub question_type: String,
    pub skill: Option<Skill>,
    pub verdict: Verdict,
    pub result: GradeResult,
}

impl SessionReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a report previously produced by [`SessionReport::to_json`].
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.question_set.name));
        md.push_str(&format!(
            "**Score:** {} ({}), {} of {} questions answered\n\n",
            self.summary.scaled_score,
            self.summary.band,
            self.summary.answered,
            self.question_set.question_count
        ));

        if !self.summary.subscores.is_empty() {
            md.push_str("| Skill | Subscore |\n");
            md.push_str("|-------|----------|\n");
            for (skill, score) in &self.summary.subscores {
                md.push_str(&format!("| {skill} | {score} |\n"));
            }
            md.push('\n');
        }

        if !self.outcomes.is_empty() {
            md.push_str("### Questions\n\n");
            md.push_str("| Question | Type | Score | Verdict |\n");
            md.push_str("|----------|------|-------|---------|\n");
            for o in &self.outcomes {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    o.question_id, o.question_type, o.result.score, o.verdict
                ));
            }
            md.push('\n');
        }

        if !self.unanswered.is_empty() {
            md.push_str(&format!("**Unanswered:** {}\n", self.unanswered.join(", ")));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, Band};
    use crate::model::Feedback;
    use std::collections::BTreeMap;

    fn make_report(outcomes: Vec<QuestionOutcome>, unanswered: Vec<String>) -> SessionReport {
        let scores: BTreeMap<String, u32> = outcomes
            .iter()
            .map(|o| (o.question_id.clone(), o.result.score))
            .collect();
        SessionReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            question_set: QuestionSetSummary {
                id: "test".into(),
                name: "Test".into(),
                question_count: outcomes.len() + unanswered.len(),
            },
            outcomes,
            unanswered,
            summary: aggregate(&scores),
            duration_ms: 0,
        }
    }

    fn outcome(id: &str, score: f64) -> QuestionOutcome {
        let result = GradeResult::new(score, Feedback::Message(String::new()));
        QuestionOutcome {
            question_id: id.into(),
            question_type: "listen-type".into(),
            skill: Some(Skill::Listening),
            verdict: result.verdict(),
            result,
        }
    }

    #[test]
    fn markdown_output() {
        let report = make_report(
            vec![outcome("lt1", 100.0), outcome("lt2", 40.0)],
            vec!["wap1".into()],
        );
        let md = report.to_markdown();
        assert!(md.contains("## Test"));
        assert!(md.contains("| lt2 | listen-type | 40 | incorrect |"));
        assert!(md.contains("**Unanswered:** wap1"));
        assert!(md.contains("2 of 3 questions answered"));
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report(vec![outcome("lt1", 80.0)], vec![]);
        let json = report.to_json().unwrap();
        let loaded = SessionReport::from_json(&json).unwrap();

        assert_eq!(loaded.question_set.id, "test");
        assert_eq!(loaded.outcomes.len(), 1);
        assert_eq!(loaded.summary.band, Band::C1);
    }
}
