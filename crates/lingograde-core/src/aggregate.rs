//! Session-level aggregation: overall score, scaled score and band.
//!
//! Per-question scores (0–100) are averaged, then projected linearly onto
//! the 10–160 reporting scale.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::Skill;

/// Lowest value of the reporting scale.
pub const SCALE_MIN: f64 = 10.0;
/// Width of the reporting scale.
pub const SCALE_SPAN: f64 = 150.0;

/// Proficiency band, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    A1,
    A2,
    B1,
    B2,
    C1,
}

impl Band {
    /// Band for a scaled score.
    pub fn from_scaled(scaled: u32) -> Self {
        match scaled {
            s if s >= 125 => Band::C1,
            s if s >= 105 => Band::B2,
            s if s >= 85 => Band::B1,
            s if s >= 60 => Band::A2,
            _ => Band::A1,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Band::A1 => "A1",
            Band::A2 => "A2",
            Band::B1 => "B1",
            Band::B2 => "B2",
            Band::C1 => "C1",
        };
        write!(f, "{name}")
    }
}

/// Rounded mean of the scores, or 0 when there are none.
pub fn overall_score<I>(scores: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), s| (sum + s as u64, count + 1));
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u32
}

/// `round(10 + overall / 100 * 150)`.
pub fn scaled_score(overall: u32) -> u32 {
    (SCALE_MIN + overall as f64 / 100.0 * SCALE_SPAN).round() as u32
}

/// Final result of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub overall_score: u32,
    pub scaled_score: u32,
    pub band: Band,
    /// Scaled subscores, only for skills with at least one answered question.
    #[serde(default)]
    pub subscores: BTreeMap<Skill, u32>,
    pub answered: usize,
}

/// Aggregate a plain question-id → score mapping.
pub fn aggregate(scores: &BTreeMap<String, u32>) -> SessionSummary {
    let overall = overall_score(scores.values().copied());
    let scaled = scaled_score(overall);
    SessionSummary {
        overall_score: overall,
        scaled_score: scaled,
        band: Band::from_scaled(scaled),
        subscores: BTreeMap::new(),
        answered: scores.len(),
    }
}

#[derive(Debug, Clone)]
struct Entry {
    skill: Option<Skill>,
    score: u32,
}

/// Per-question scores collected during a test session.
///
/// Created empty, filled with at most one score per question, and consumed
/// by [`SessionScores::finish`].
#[derive(Debug, Clone, Default)]
pub struct SessionScores {
    entries: BTreeMap<String, Entry>,
}

impl SessionScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a question's score. A second score for the same question is
    /// rejected and leaves the first in place.
    pub fn record(
        &mut self,
        question_id: &str,
        skill: Option<Skill>,
        score: u32,
    ) -> Result<(), ScoringError> {
        if self.entries.contains_key(question_id) {
            return Err(ScoringError::DuplicateScore(question_id.to_string()));
        }
        self.entries.insert(
            question_id.to_string(),
            Entry {
                skill,
                score: score.min(100),
            },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, question_id: &str) -> Option<u32> {
        self.entries.get(question_id).map(|e| e.score)
    }

    /// Compute the session summary, consuming the scores.
    pub fn finish(self) -> SessionSummary {
        let plain: BTreeMap<String, u32> = self
            .entries
            .iter()
            .map(|(id, e)| (id.clone(), e.score))
            .collect();
        let mut summary = aggregate(&plain);

        for skill in Skill::ALL {
            let scores: Vec<u32> = self
                .entries
                .values()
                .filter(|e| e.skill == Some(skill))
                .map(|e| e.score)
                .collect();
            if !scores.is_empty() {
                summary
                    .subscores
                    .insert(skill, scaled_score(overall_score(scores)));
            }
        }

        tracing::debug!(
            overall = summary.overall_score,
            scaled = summary.scaled_score,
            band = %summary.band,
            "session aggregated"
        );

        summary
    }
}
