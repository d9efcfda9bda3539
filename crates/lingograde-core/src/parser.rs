//! TOML question set and answer sheet parser.
//!
//! Loads question sets from TOML files and directories, loads learner answer
//! sheets, and validates question reference data.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    Answer, CTestBlank, Question, QuestionKind, QuestionSet, Rubric, SelfAssessmentItem,
};

/// Intermediate TOML structure for parsing question set files.
#[derive(Debug, Deserialize)]
struct TomlQuestionFile {
    question_set: TomlQuestionSetHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestionSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

/// Flat view of a question; which fields matter depends on `type`.
#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    is_real: Option<bool>,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    sentence: String,
    #[serde(default)]
    passage: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    answers: Option<Vec<String>>,
    #[serde(default)]
    blanks: Option<Vec<TomlBlank>>,
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    min_words: Option<u32>,
    #[serde(default)]
    max_words: Option<u32>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    model_answer: Option<String>,
    #[serde(default)]
    min_duration_ms: Option<u64>,
    #[serde(default)]
    max_duration_ms: Option<u64>,
    #[serde(default)]
    self_assessment: Option<Vec<TomlSelfAssessment>>,
}

#[derive(Debug, Deserialize)]
struct TomlBlank {
    #[serde(default)]
    given: String,
    answer: String,
}

#[derive(Debug, Deserialize)]
struct TomlSelfAssessment {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlAnswerSheet {
    #[serde(default)]
    answers: BTreeMap<String, Answer>,
}

impl TomlQuestion {
    fn rubric(&mut self) -> Rubric {
        Rubric {
            min_words: self.min_words,
            max_words: self.max_words,
            keywords: self.keywords.take(),
            min_duration_ms: self.min_duration_ms,
            max_duration_ms: self.max_duration_ms,
            model_answer: self.model_answer.take(),
            self_assessment: self.self_assessment.take().map(|items| {
                items
                    .into_iter()
                    .map(|i| SelfAssessmentItem {
                        name: i.name,
                        description: i.description,
                    })
                    .collect()
            }),
        }
    }

    fn into_question(mut self) -> Result<Question> {
        let id = self.id.clone();
        let type_name = std::mem::take(&mut self.kind);
        let missing =
            |field: &str| anyhow::anyhow!("question '{id}' ({type_name}) is missing `{field}`");

        let kind = match type_name.as_str() {
            "read-select" => QuestionKind::ReadSelect {
                is_real: self.is_real.ok_or_else(|| missing("is_real"))?,
                word: self.word.take().unwrap_or_default(),
            },
            "multiple-choice" => QuestionKind::MultipleChoice {
                answer: self.answer.take().ok_or_else(|| missing("answer"))?,
                prompt: std::mem::take(&mut self.prompt),
                options: std::mem::take(&mut self.options),
            },
            "fill-blanks" => {
                let answers = match (self.answers.take(), self.answer.take()) {
                    (Some(answers), _) => answers,
                    (None, Some(answer)) => vec![answer],
                    (None, None) => return Err(missing("answer")),
                };
                QuestionKind::FillBlanks {
                    sentence: std::mem::take(&mut self.sentence),
                    answers,
                }
            }
            "read-complete" => QuestionKind::ReadComplete {
                blanks: self
                    .blanks
                    .take()
                    .ok_or_else(|| missing("blanks"))?
                    .into_iter()
                    .map(|b| CTestBlank {
                        given: b.given,
                        answer: b.answer,
                    })
                    .collect(),
                passage: std::mem::take(&mut self.passage),
            },
            "listen-type" => QuestionKind::ListenType {
                transcript: self.transcript.take().ok_or_else(|| missing("transcript"))?,
            },
            "write-photo" => QuestionKind::WritePhoto {
                rubric: self.rubric(),
                prompt: std::mem::take(&mut self.prompt),
            },
            "writing-sample" => QuestionKind::WritingSample {
                rubric: self.rubric(),
                prompt: std::mem::take(&mut self.prompt),
            },
            "speak-photo" => QuestionKind::SpeakPhoto {
                rubric: self.rubric(),
                prompt: std::mem::take(&mut self.prompt),
            },
            "read-speak" => QuestionKind::ReadSpeak {
                rubric: self.rubric(),
                prompt: std::mem::take(&mut self.prompt),
            },
            "speaking-sample" => QuestionKind::SpeakingSample {
                rubric: self.rubric(),
                prompt: std::mem::take(&mut self.prompt),
            },
            other => QuestionKind::Unsupported {
                type_name: other.to_string(),
            },
        };

        Ok(Question { id: self.id, kind })
    }
}

/// Parse a single TOML file into a `QuestionSet`.
pub fn parse_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;

    parse_question_set_str(&content, path)
}

/// Parse a TOML string into a `QuestionSet`.
pub fn parse_question_set_str(content: &str, source_path: &Path) -> Result<QuestionSet> {
    let parsed: TomlQuestionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(TomlQuestion::into_question)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid question in {}", source_path.display()))?;

    Ok(QuestionSet {
        id: parsed.question_set.id,
        name: parsed.question_set.name,
        description: parsed.question_set.description,
        questions,
    })
}

/// Recursively load all `.toml` question set files from a directory.
///
/// Files that fail to parse (answer sheets among them) are skipped with a
/// warning.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_question_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Parse an answer sheet file: an `[answers]` table of question id to answer.
pub fn parse_answer_sheet(path: &Path) -> Result<BTreeMap<String, Answer>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer sheet: {}", path.display()))?;

    parse_answer_sheet_str(&content, path)
}

/// Parse an answer sheet from a TOML string.
pub fn parse_answer_sheet_str(
    content: &str,
    source_path: &Path,
) -> Result<BTreeMap<String, Answer>> {
    let parsed: TomlAnswerSheet = toml::from_str(content)
        .with_context(|| format!("failed to parse answer sheet: {}", source_path.display()))?;
    Ok(parsed.answers)
}

/// A warning from question set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn for_question(question: &Question, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(question.id.clone()),
            message: message.into(),
        }
    }
}

/// Validate a question set for malformed reference data.
///
/// The graders guard their own divisions, so none of these are fatal; they
/// point at question-bank mistakes that would silently score 0.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "question set has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for question in &set.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning::for_question(
                question,
                format!("duplicate question ID: {}", question.id),
            ));
        }
    }

    for question in &set.questions {
        match &question.kind {
            QuestionKind::Unsupported { type_name } => {
                warnings.push(ValidationWarning::for_question(
                    question,
                    format!("unsupported question type '{type_name}' will score 0"),
                ));
            }
            QuestionKind::MultipleChoice {
                options, answer, ..
            } => {
                if !options.is_empty() && !options.contains(answer) {
                    warnings.push(ValidationWarning::for_question(
                        question,
                        format!("answer '{answer}' is not one of the options"),
                    ));
                }
            }
            QuestionKind::FillBlanks { answers, .. } => {
                if answers.is_empty() {
                    warnings.push(ValidationWarning::for_question(question, "no blanks defined"));
                } else if answers.iter().any(|a| a.trim().is_empty()) {
                    warnings.push(ValidationWarning::for_question(
                        question,
                        "a blank has an empty answer",
                    ));
                }
            }
            QuestionKind::ReadComplete { blanks, .. } => {
                if blanks.is_empty() {
                    warnings.push(ValidationWarning::for_question(question, "no blanks defined"));
                } else if blanks.iter().any(|b| b.answer.trim().is_empty()) {
                    warnings.push(ValidationWarning::for_question(
                        question,
                        "a blank has an empty answer",
                    ));
                }
            }
            QuestionKind::ListenType { transcript } => {
                if transcript.trim().is_empty() {
                    warnings.push(ValidationWarning::for_question(question, "transcript is empty"));
                }
            }
            QuestionKind::WritePhoto { rubric, .. } | QuestionKind::WritingSample { rubric, .. } => {
                if rubric.min_words == Some(0) {
                    warnings.push(ValidationWarning::for_question(
                        question,
                        "min_words is 0 and will fall back to the default",
                    ));
                }
                if let (Some(min), Some(max)) = (rubric.min_words, rubric.max_words) {
                    if min > max {
                        warnings.push(ValidationWarning::for_question(
                            question,
                            format!("min_words ({min}) exceeds max_words ({max})"),
                        ));
                    }
                }
            }
            QuestionKind::SpeakPhoto { rubric, .. }
            | QuestionKind::ReadSpeak { rubric, .. }
            | QuestionKind::SpeakingSample { rubric, .. } => {
                if let (Some(min), Some(max)) = (rubric.min_duration_ms, rubric.max_duration_ms) {
                    if min > max {
                        warnings.push(ValidationWarning::for_question(
                            question,
                            format!("min_duration_ms ({min}) exceeds max_duration_ms ({max})"),
                        ));
                    }
                }
            }
            QuestionKind::ReadSelect { .. } => {}
        }
    }

    warnings
}
