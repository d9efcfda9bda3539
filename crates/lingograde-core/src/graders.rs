//! One pure grading function per question type.
//!
//! Every grader takes the learner's answer and the question's reference
//! data and returns a fresh [`GradeResult`]. None of them fails: missing
//! answers compare as empty strings and every mean is taken over at least
//! one item.

use crate::config::GradingConfig;
use crate::distance::{edit_distance, similarity};
use crate::model::{
    default_self_assessment, BlankFeedback, CTestBlank, Criterion, CriterionScore, Diagnostics,
    DictationFeedback, Feedback, GradeResult, Judgment, Rubric, WordFeedback,
};
use crate::normalize::{normalize, words};
use crate::writing::score_writing;

/// Similarity at or above which a fill-in blank earns typo credit.
pub const FILL_BLANK_TYPO_SIMILARITY: f64 = 0.8;
/// Points for a fill-in blank within typo tolerance.
pub const FILL_BLANK_TYPO_POINTS: f64 = 80.0;

/// Maximum edit distance for C-test partial credit.
pub const CTEST_MAX_TYPO_DISTANCE: usize = 1;
/// C-test answers this short or shorter never earn partial credit.
pub const CTEST_MIN_PARTIAL_LENGTH: usize = 2;
/// Points for a C-test blank within typo tolerance.
pub const CTEST_TYPO_POINTS: f64 = 50.0;

/// Dictation word similarity for a full point.
pub const DICTATION_FULL_SIMILARITY: f64 = 0.8;
/// Dictation word similarity for half a point.
pub const DICTATION_HALF_SIMILARITY: f64 = 0.5;

/// Flat duration score for answers that run over the maximum.
pub const OVERLONG_DURATION_SCORE: u32 = 80;

impl AsRef<str> for CTestBlank {
    fn as_ref(&self) -> &str {
        &self.answer
    }
}

/// Real-or-invented word recognition.
pub fn grade_read_and_select(user_says_real: bool, is_real: bool) -> GradeResult {
    let correct = user_says_real == is_real;
    let feedback = if correct {
        "Correct!".to_string()
    } else {
        let class = if is_real { "a REAL word" } else { "an INVENTED word" };
        format!("The correct answer is: {class}")
    };

    GradeResult::new(if correct { 100.0 } else { 0.0 }, Feedback::Message(feedback))
        .with_correct(correct)
}

/// Exact string match against the correct option.
pub fn grade_multiple_choice(user_answer: &str, correct_answer: &str) -> GradeResult {
    let correct = user_answer == correct_answer;
    let feedback = if correct {
        "Correct!".to_string()
    } else {
        format!("The correct answer is: {correct_answer}")
    };

    GradeResult::new(if correct { 100.0 } else { 0.0 }, Feedback::Message(feedback))
        .with_correct(correct)
        .with_model_answer(Some(correct_answer.to_string()))
}

/// Fill-in-the-blank with typo tolerance.
///
/// Each blank earns 100 for an exact normalized match, 80 when the
/// similarity ratio is at least 0.8, and 0 otherwise.
pub fn grade_fill_blanks<S, T>(user_answers: &[S], correct_answers: &[T]) -> GradeResult
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let mut total = 0.0;
    let mut feedback = Vec::with_capacity(correct_answers.len());

    for (index, correct) in correct_answers.iter().enumerate() {
        let user = normalize(user_answers.get(index).map_or("", |u| u.as_ref()));
        let expected = normalize(correct.as_ref());

        let (points, judgment, recorded) = if user == expected {
            (100.0, Judgment::Correct, None)
        } else {
            let ratio = similarity(&user, &expected);
            if ratio >= FILL_BLANK_TYPO_SIMILARITY {
                (FILL_BLANK_TYPO_POINTS, Judgment::Partial, Some(ratio))
            } else {
                (0.0, Judgment::Incorrect, None)
            }
        };

        total += points;
        feedback.push(BlankFeedback {
            index,
            judgment,
            expected: correct.as_ref().to_string(),
            similarity: recorded,
        });
    }

    let mean = total / correct_answers.len().max(1) as f64;
    GradeResult::new(mean, Feedback::Blanks(feedback)).with_diagnostics(Diagnostics::Blanks {
        total_blanks: correct_answers.len(),
    })
}

/// C-test character completion.
///
/// Stricter than [`grade_fill_blanks`]: only a single-character slip earns
/// partial credit, and only on answers longer than two characters.
pub fn grade_read_complete<S, T>(user_answers: &[S], blanks: &[T]) -> GradeResult
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let mut total = 0.0;
    let mut feedback = Vec::with_capacity(blanks.len());

    for (index, blank) in blanks.iter().enumerate() {
        let user = normalize(user_answers.get(index).map_or("", |u| u.as_ref()));
        let expected = normalize(blank.as_ref());

        let (points, judgment) = if user == expected {
            (100.0, Judgment::Correct)
        } else if edit_distance(&user, &expected) <= CTEST_MAX_TYPO_DISTANCE
            && expected.chars().count() > CTEST_MIN_PARTIAL_LENGTH
        {
            (CTEST_TYPO_POINTS, Judgment::Partial)
        } else {
            (0.0, Judgment::Incorrect)
        };

        total += points;
        feedback.push(BlankFeedback {
            index,
            judgment,
            expected: blank.as_ref().to_string(),
            similarity: None,
        });
    }

    let mean = total / blanks.len().max(1) as f64;
    GradeResult::new(mean, Feedback::Blanks(feedback)).with_diagnostics(Diagnostics::Blanks {
        total_blanks: blanks.len(),
    })
}

/// Dictation, compared word by word at matching positions.
///
/// Words past the end of the reference are counted in `extra_words` but do
/// not lower the score.
pub fn grade_listen_and_type(user_answer: &str, transcript: &str) -> GradeResult {
    let typed = words(user_answer);
    let reference = words(transcript);

    let mut points = 0.0;
    let mut feedback = DictationFeedback::default();

    for (index, expected) in reference.iter().enumerate() {
        let Some(word) = typed.get(index) else {
            feedback.missing_words += 1;
            continue;
        };

        let ratio = similarity(word, expected);
        let (earned, judgment) = if ratio >= DICTATION_FULL_SIMILARITY {
            (1.0, Judgment::Correct)
        } else if ratio >= DICTATION_HALF_SIMILARITY {
            (0.5, Judgment::Partial)
        } else {
            (0.0, Judgment::Incorrect)
        };

        points += earned;
        feedback.words.push(WordFeedback {
            index,
            judgment,
            word: word.clone(),
            expected: (judgment != Judgment::Correct).then(|| expected.clone()),
        });
    }

    feedback.extra_words = typed.len().saturating_sub(reference.len());

    let accuracy = points / reference.len().max(1) as f64 * 100.0;
    GradeResult::new(accuracy, Feedback::Dictation(feedback)).with_diagnostics(
        Diagnostics::Dictation {
            accuracy,
            transcript: transcript.to_string(),
        },
    )
}

/// Essay scored against its rubric. See [`crate::writing`].
pub fn grade_writing(text: &str, rubric: &Rubric, config: &GradingConfig) -> GradeResult {
    score_writing(text, rubric, config)
}

/// Spoken answer, judged on recording length only.
///
/// Full credit inside the rubric's window, linear credit below it and a
/// flat 80 above it. Content is left to the learner's self-assessment, so
/// the result always asks for one.
pub fn grade_speaking(duration_ms: u64, rubric: &Rubric, config: &GradingConfig) -> GradeResult {
    let (min, max) = config.duration_window(rubric.min_duration_ms, rubric.max_duration_ms);
    let seconds = |ms: u64| (ms as f64 / 1000.0).round() as u64;

    let (duration_score, comment) = if (min..=max).contains(&duration_ms) {
        (100, format!("Adequate duration ({}s)", seconds(duration_ms)))
    } else if duration_ms < min {
        let score = (100.0 * duration_ms as f64 / min as f64).round() as u32;
        (
            score,
            format!(
                "Answer too short: {}s / {}s",
                seconds(duration_ms),
                seconds(min)
            ),
        )
    } else {
        (
            OVERLONG_DURATION_SCORE,
            format!("Answer too long ({}s)", seconds(duration_ms)),
        )
    };

    let checklist = rubric
        .self_assessment
        .clone()
        .filter(|items| !items.is_empty())
        .unwrap_or_else(default_self_assessment);

    let feedback = Feedback::Criteria(vec![CriterionScore {
        criterion: Criterion::Duration,
        points: duration_score,
        comment,
    }]);

    GradeResult::new(duration_score as f64, feedback)
        .with_model_answer(rubric.model_answer.clone())
        .with_diagnostics(Diagnostics::Speaking {
            duration_score,
            needs_self_assessment: true,
            checklist,
        })
}
