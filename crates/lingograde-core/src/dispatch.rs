//! Routes a learner's answer to the grader for its question type.

use crate::config::GradingConfig;
use crate::error::ScoringError;
use crate::graders::{
    grade_fill_blanks, grade_listen_and_type, grade_multiple_choice, grade_read_and_select,
    grade_read_complete, grade_speaking, grade_writing,
};
use crate::model::{Answer, GradeResult, Question, QuestionKind};

/// Grade an answer, failing on unsupported types or mismatched answers.
pub fn try_grade(
    question: &Question,
    answer: &Answer,
    config: &GradingConfig,
) -> Result<GradeResult, ScoringError> {
    let shape_error = |expected: &'static str| ScoringError::AnswerShape {
        question_type: question.kind.type_name().to_string(),
        expected,
        found: answer.shape(),
    };

    let result = match (&question.kind, answer) {
        (QuestionKind::ReadSelect { is_real, .. }, Answer::Choice(user)) => {
            grade_read_and_select(*user, *is_real)
        }
        (QuestionKind::ReadSelect { .. }, _) => return Err(shape_error("choice")),

        (QuestionKind::MultipleChoice { answer: correct, .. }, Answer::Text(user)) => {
            grade_multiple_choice(user, correct)
        }
        (QuestionKind::MultipleChoice { .. }, _) => return Err(shape_error("text")),

        (QuestionKind::FillBlanks { answers, .. }, Answer::Blanks(user)) => {
            grade_fill_blanks(user.as_slice(), answers.as_slice())
        }
        (QuestionKind::FillBlanks { answers, .. }, Answer::Text(user)) => {
            grade_fill_blanks(std::slice::from_ref(user), answers.as_slice())
        }
        (QuestionKind::FillBlanks { .. }, _) => return Err(shape_error("blanks")),

        (QuestionKind::ReadComplete { blanks, .. }, Answer::Blanks(user)) => {
            grade_read_complete(user.as_slice(), blanks.as_slice())
        }
        (QuestionKind::ReadComplete { .. }, _) => return Err(shape_error("blanks")),

        (QuestionKind::ListenType { transcript }, Answer::Text(user)) => {
            grade_listen_and_type(user, transcript)
        }
        (QuestionKind::ListenType { .. }, _) => return Err(shape_error("text")),

        (
            QuestionKind::WritePhoto { rubric, .. } | QuestionKind::WritingSample { rubric, .. },
            Answer::Text(text),
        ) => grade_writing(text, rubric, config),
        (QuestionKind::WritePhoto { .. } | QuestionKind::WritingSample { .. }, _) => {
            return Err(shape_error("text"))
        }

        (
            QuestionKind::SpeakPhoto { rubric, .. }
            | QuestionKind::ReadSpeak { rubric, .. }
            | QuestionKind::SpeakingSample { rubric, .. },
            Answer::Recording { duration_ms },
        ) => grade_speaking(*duration_ms, rubric, config),
        (
            QuestionKind::SpeakPhoto { .. }
            | QuestionKind::ReadSpeak { .. }
            | QuestionKind::SpeakingSample { .. },
            _,
        ) => return Err(shape_error("recording")),

        (QuestionKind::Unsupported { type_name }, _) => {
            return Err(ScoringError::UnsupportedQuestion(type_name.clone()))
        }
    };

    tracing::debug!(
        question = %question.id,
        kind = question.kind.type_name(),
        score = result.score,
        "graded"
    );

    Ok(result)
}

/// Grade an answer, degrading unsupported types and mismatched answers to
/// a zero score with an explanation so a session can always continue.
pub fn grade_question(question: &Question, answer: &Answer, config: &GradingConfig) -> GradeResult {
    match try_grade(question, answer, config) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("question '{}' scored 0: {e}", question.id);
            match e {
                ScoringError::UnsupportedQuestion(_) => {
                    GradeResult::zero("Automatic grading is not available for this question type.")
                }
                other => GradeResult::zero(format!("Answer could not be graded: {other}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Diagnostics, Feedback, Rubric};

    fn question(kind: QuestionKind) -> Question {
        Question {
            id: "q1".into(),
            kind,
        }
    }

    #[test]
    fn routes_read_select() {
        let q = question(QuestionKind::ReadSelect {
            word: "RESILIENT".into(),
            is_real: true,
        });
        let result = grade_question(&q, &Answer::Choice(true), &GradingConfig::default());
        assert_eq!(result.score, 100);
        assert_eq!(result.correct, Some(true));
    }

    #[test]
    fn routes_single_text_to_fill_blanks() {
        let q = question(QuestionKind::FillBlanks {
            sentence: "She has been working here _____ 2020.".into(),
            answers: vec!["since".into()],
        });
        let result = grade_question(&q, &Answer::Text("sinse".into()), &GradingConfig::default());
        assert_eq!(result.score, 80);
    }

    #[test]
    fn routes_speaking_recording() {
        let q = question(QuestionKind::SpeakPhoto {
            prompt: "Describe the photo".into(),
            rubric: Rubric {
                min_duration_ms: Some(30_000),
                max_duration_ms: Some(90_000),
                ..Rubric::default()
            },
        });
        let result = grade_question(
            &q,
            &Answer::Recording {
                duration_ms: 100_000,
            },
            &GradingConfig::default(),
        );
        assert_eq!(result.score, 80);
        assert!(matches!(
            result.diagnostics,
            Diagnostics::Speaking {
                needs_self_assessment: true,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_type_scores_zero_with_message() {
        let q = question(QuestionKind::Unsupported {
            type_name: "interactive-speaking".into(),
        });
        let config = GradingConfig::default();
        let answer = Answer::Text("hello".into());

        assert_eq!(
            try_grade(&q, &answer, &config).unwrap_err(),
            ScoringError::UnsupportedQuestion("interactive-speaking".into())
        );

        let result = grade_question(&q, &answer, &config);
        assert_eq!(result.score, 0);
        assert!(matches!(result.feedback, Feedback::Message(ref m) if m.contains("not available")));
    }

    #[test]
    fn mismatched_answer_shape_scores_zero() {
        let q = question(QuestionKind::ListenType {
            transcript: "the cat sat".into(),
        });
        let config = GradingConfig::default();
        let answer = Answer::Recording { duration_ms: 1000 };

        let err = try_grade(&q, &answer, &config).unwrap_err();
        assert!(err.is_recoverable());

        let result = grade_question(&q, &answer, &config);
        assert_eq!(result.score, 0);
        assert_eq!(result.correct, None);
    }
}
