//! Core data model types for lingograde.
//!
//! Questions, answers and rubrics flow into the graders; `GradeResult` is
//! what every grader hands back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Grade results
// ---------------------------------------------------------------------------

/// The universal output of a grader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Integer score, always within 0..=100.
    pub score: u32,
    /// Structured feedback for display.
    pub feedback: Feedback,
    /// Set only by exact-match graders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    /// Reference text to show next to the learner's answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_answer: Option<String>,
    /// Grader-specific metadata.
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

impl GradeResult {
    /// Build a result from an unrounded score, rounding to the nearest
    /// integer and clamping into 0..=100.
    pub fn new(raw_score: f64, feedback: Feedback) -> Self {
        Self {
            score: clamp_score(raw_score),
            feedback,
            correct: None,
            model_answer: None,
            diagnostics: Diagnostics::None,
        }
    }

    /// A zero score carrying only an explanatory message.
    pub fn zero(message: impl Into<String>) -> Self {
        Self::new(0.0, Feedback::Message(message.into()))
    }

    pub fn with_correct(mut self, correct: bool) -> Self {
        self.correct = Some(correct);
        self
    }

    pub fn with_model_answer(mut self, model_answer: Option<String>) -> Self {
        self.model_answer = model_answer;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Display classification used by feedback screens.
    pub fn verdict(&self) -> Verdict {
        if self.correct == Some(true) || self.score >= 80 {
            Verdict::Correct
        } else if self.score >= 50 {
            Verdict::PartiallyCorrect
        } else {
            Verdict::Incorrect
        }
    }
}

/// Round half away from zero and clamp into 0..=100. NaN maps to 0.
pub fn clamp_score(raw: f64) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u32
}

/// Coarse classification of a result for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    PartiallyCorrect,
    Incorrect,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "correct"),
            Verdict::PartiallyCorrect => write!(f, "partially correct"),
            Verdict::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// Closed set of feedback shapes a grader can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Feedback {
    /// A single human-readable line.
    Message(String),
    /// One judgment per blank, in blank order.
    Blanks(Vec<BlankFeedback>),
    /// Word-by-word dictation comparison.
    Dictation(DictationFeedback),
    /// Per-criterion rubric breakdown.
    Criteria(Vec<CriterionScore>),
}

/// Outcome of comparing one unit of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    Correct,
    Partial,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlankFeedback {
    pub index: usize,
    pub judgment: Judgment,
    /// The reference text as written in the question.
    pub expected: String,
    /// Recorded for typo-tolerant partial credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordFeedback {
    pub index: usize,
    pub judgment: Judgment,
    /// What the learner typed at this position.
    pub word: String,
    /// Present unless the word was accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictationFeedback {
    pub words: Vec<WordFeedback>,
    /// Reference positions the learner never reached.
    pub missing_words: usize,
    /// Learner words past the end of the reference. Informational only.
    pub extra_words: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub points: u32,
    pub comment: String,
}

/// Rubric criteria for open-ended answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Length,
    Relevance,
    LexicalDiversity,
    SentenceVariety,
    Duration,
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Length => write!(f, "Length"),
            Criterion::Relevance => write!(f, "Relevance"),
            Criterion::LexicalDiversity => write!(f, "Lexical diversity"),
            Criterion::SentenceVariety => write!(f, "Sentence structure"),
            Criterion::Duration => write!(f, "Duration"),
        }
    }
}

/// Grader-specific metadata that accompanies the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostics {
    #[default]
    None,
    Blanks {
        total_blanks: usize,
    },
    Dictation {
        /// Unrounded percentage.
        accuracy: f64,
        transcript: String,
    },
    Writing {
        word_count: usize,
        diversity: f64,
    },
    Speaking {
        duration_score: u32,
        needs_self_assessment: bool,
        checklist: Vec<SelfAssessmentItem>,
    },
}

/// A qualitative criterion the learner rates themselves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfAssessmentItem {
    pub name: String,
    pub description: String,
}

impl SelfAssessmentItem {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Checklist used when a speaking rubric does not supply its own.
pub fn default_self_assessment() -> Vec<SelfAssessmentItem> {
    vec![
        SelfAssessmentItem::new("Relevance", "Did I address the prompt?"),
        SelfAssessmentItem::new("Fluency", "Did I speak naturally, without long pauses?"),
        SelfAssessmentItem::new("Vocabulary", "Did I use varied and appropriate vocabulary?"),
        SelfAssessmentItem::new("Grammar", "Did I use correct grammatical structures?"),
        SelfAssessmentItem::new("Pronunciation", "Was my pronunciation clear and understandable?"),
    ]
}

// ---------------------------------------------------------------------------
// Rubrics
// ---------------------------------------------------------------------------

/// Acceptance criteria for an essay or spoken answer.
///
/// Unset fields fall back to [`GradingConfig`](crate::config::GradingConfig)
/// defaults at grading time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    #[serde(default)]
    pub min_words: Option<u32>,
    #[serde(default)]
    pub max_words: Option<u32>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub min_duration_ms: Option<u64>,
    #[serde(default)]
    pub max_duration_ms: Option<u64>,
    #[serde(default)]
    pub model_answer: Option<String>,
    #[serde(default)]
    pub self_assessment: Option<Vec<SelfAssessmentItem>>,
}

// ---------------------------------------------------------------------------
// Questions and answers
// ---------------------------------------------------------------------------

/// A question as supplied by the question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub kind: QuestionKind,
}

/// One C-test gap: the visible prefix and the letters that complete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CTestBlank {
    #[serde(default)]
    pub given: String,
    pub answer: String,
}

/// Reference data for each supported question type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    ReadSelect {
        word: String,
        is_real: bool,
    },
    MultipleChoice {
        prompt: String,
        options: Vec<String>,
        answer: String,
    },
    FillBlanks {
        sentence: String,
        answers: Vec<String>,
    },
    ReadComplete {
        passage: String,
        blanks: Vec<CTestBlank>,
    },
    ListenType {
        transcript: String,
    },
    WritePhoto {
        prompt: String,
        rubric: Rubric,
    },
    WritingSample {
        prompt: String,
        rubric: Rubric,
    },
    SpeakPhoto {
        prompt: String,
        rubric: Rubric,
    },
    ReadSpeak {
        prompt: String,
        rubric: Rubric,
    },
    SpeakingSample {
        prompt: String,
        rubric: Rubric,
    },
    /// A type the scoring core has no grader for.
    Unsupported {
        type_name: String,
    },
}

impl QuestionKind {
    /// The kebab-case type tag used in question files.
    pub fn type_name(&self) -> &str {
        match self {
            QuestionKind::ReadSelect { .. } => "read-select",
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
            QuestionKind::FillBlanks { .. } => "fill-blanks",
            QuestionKind::ReadComplete { .. } => "read-complete",
            QuestionKind::ListenType { .. } => "listen-type",
            QuestionKind::WritePhoto { .. } => "write-photo",
            QuestionKind::WritingSample { .. } => "writing-sample",
            QuestionKind::SpeakPhoto { .. } => "speak-photo",
            QuestionKind::ReadSpeak { .. } => "read-speak",
            QuestionKind::SpeakingSample { .. } => "speaking-sample",
            QuestionKind::Unsupported { type_name } => type_name,
        }
    }

    /// The skill a question type contributes to, if it is graded.
    pub fn skill(&self) -> Option<Skill> {
        match self {
            QuestionKind::ReadSelect { .. }
            | QuestionKind::MultipleChoice { .. }
            | QuestionKind::FillBlanks { .. }
            | QuestionKind::ReadComplete { .. } => Some(Skill::Reading),
            QuestionKind::ListenType { .. } => Some(Skill::Listening),
            QuestionKind::WritePhoto { .. } | QuestionKind::WritingSample { .. } => {
                Some(Skill::Writing)
            }
            QuestionKind::SpeakPhoto { .. }
            | QuestionKind::ReadSpeak { .. }
            | QuestionKind::SpeakingSample { .. } => Some(Skill::Speaking),
            QuestionKind::Unsupported { .. } => None,
        }
    }
}

/// A learner's raw answer, in the shape the matching grader expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Real/invented word classification.
    Choice(bool),
    /// Free text: dictation, essays, a chosen option, a single blank.
    Text(String),
    /// One entry per blank.
    Blanks(Vec<String>),
    /// A finished recording.
    Recording { duration_ms: u64 },
}

impl Answer {
    /// Short name of the answer shape, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Answer::Choice(_) => "choice",
            Answer::Text(_) => "text",
            Answer::Blanks(_) => "blanks",
            Answer::Recording { .. } => "recording",
        }
    }
}

/// Language skill used for subscores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Reading,
    Writing,
    Listening,
    Speaking,
}

impl Skill {
    pub const ALL: [Skill; 4] = [
        Skill::Reading,
        Skill::Writing,
        Skill::Listening,
        Skill::Speaking,
    ];
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skill::Reading => write!(f, "reading"),
            Skill::Writing => write!(f, "writing"),
            Skill::Listening => write!(f, "listening"),
            Skill::Speaking => write!(f, "speaking"),
        }
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reading" => Ok(Skill::Reading),
            "writing" => Ok(Skill::Writing),
            "listening" => Ok(Skill::Listening),
            "speaking" => Ok(Skill::Speaking),
            other => Err(format!("unknown skill: {other}")),
        }
    }
}

/// A collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}
