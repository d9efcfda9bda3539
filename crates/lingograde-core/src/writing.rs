//! Heuristic multi-criterion rubric for essay answers.
//!
//! Four criteria worth up to [`CRITERION_MAX`] points each: length, keyword
//! coverage, lexical diversity and sentence variety. Keyword coverage only
//! takes part when the rubric lists keywords.

use std::collections::HashSet;

use crate::config::GradingConfig;
use crate::model::{Criterion, CriterionScore, Diagnostics, Feedback, GradeResult, Rubric};

/// Points available per criterion.
pub const CRITERION_MAX: u32 = 25;

/// Unique-word ratio that earns full diversity credit.
pub const DIVERSITY_TARGET: f64 = 0.6;

/// Average words per sentence that earns full variety credit.
pub const SENTENCE_LENGTH_SWEET_SPOT: (f64, f64) = (8.0, 20.0);

/// Surface statistics of a piece of writing.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub unique_words: usize,
}

impl TextStats {
    /// Words are whitespace-separated runs; sentences are the non-blank
    /// pieces between `.`, `!` and `?`. Uniqueness ignores case only.
    pub fn of(text: &str) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        let unique_words = words
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<HashSet<_>>()
            .len();
        let sentence_count = text
            .split(['.', '!', '?'])
            .filter(|s| !s.trim().is_empty())
            .count();

        Self {
            word_count: words.len(),
            sentence_count,
            unique_words,
        }
    }

    /// Share of distinct words, in 0..=1.
    pub fn diversity(&self) -> f64 {
        self.unique_words as f64 / self.word_count.max(1) as f64
    }

    pub fn average_sentence_length(&self) -> f64 {
        self.word_count as f64 / self.sentence_count.max(1) as f64
    }
}

/// `min(25, round(25 * words / min_words))`.
pub fn length_points(word_count: usize, min_words: u32) -> u32 {
    let ratio = word_count as f64 / min_words.max(1) as f64;
    ((CRITERION_MAX as f64 * ratio).round() as u32).min(CRITERION_MAX)
}

/// `round(25 * matched / total)`, or `None` when no keywords are configured.
///
/// A keyword matches when it occurs anywhere in the text, ignoring case.
pub fn keyword_points(text: &str, keywords: &[String]) -> Option<(u32, usize)> {
    if keywords.is_empty() {
        return None;
    }
    let haystack = text.to_lowercase();
    let found = keywords
        .iter()
        .filter(|kw| haystack.contains(&kw.to_lowercase()))
        .count();
    let points = (CRITERION_MAX as f64 * found as f64 / keywords.len() as f64).round() as u32;
    Some((points, found))
}

/// Full credit once [`DIVERSITY_TARGET`] of the words are distinct.
pub fn diversity_points(diversity: f64) -> u32 {
    (CRITERION_MAX as f64 * (diversity / DIVERSITY_TARGET).min(1.0)).round() as u32
}

/// 25 inside the sweet spot, 15 for shorter averages of at least 5 words,
/// 5 otherwise. Averages above the sweet spot also land in the 5-point
/// bucket.
pub fn variety_points(average_sentence_length: f64) -> u32 {
    let (low, high) = SENTENCE_LENGTH_SWEET_SPOT;
    if (low..=high).contains(&average_sentence_length) {
        25
    } else if average_sentence_length >= 5.0 {
        if average_sentence_length > high {
            5
        } else {
            15
        }
    } else {
        5
    }
}

/// Score an essay against its rubric.
pub fn score_writing(text: &str, rubric: &Rubric, config: &GradingConfig) -> GradeResult {
    let stats = TextStats::of(text);
    let min_words = config.min_words(rubric.min_words);
    let mut criteria = Vec::with_capacity(4);

    // 1. Length
    let length = length_points(stats.word_count, min_words);
    let mut length_comment = if stats.word_count >= min_words as usize {
        format!("Adequate length ({} words)", stats.word_count)
    } else {
        format!("Too short: {}/{} words", stats.word_count, min_words)
    };
    if let Some(max_words) = rubric.max_words {
        if stats.word_count > max_words as usize {
            length_comment.push_str(&format!("; over the {max_words}-word limit"));
        }
    }
    criteria.push(CriterionScore {
        criterion: Criterion::Length,
        points: length,
        comment: length_comment,
    });

    // 2. Keyword coverage
    let keywords = rubric.keywords.as_deref().unwrap_or_default();
    if let Some((points, found)) = keyword_points(text, keywords) {
        criteria.push(CriterionScore {
            criterion: Criterion::Relevance,
            points,
            comment: format!("Keywords found: {found}/{}", keywords.len()),
        });
    }

    // 3. Lexical diversity
    let diversity = stats.diversity();
    criteria.push(CriterionScore {
        criterion: Criterion::LexicalDiversity,
        points: diversity_points(diversity),
        comment: format!("{:.0}% unique words", diversity * 100.0),
    });

    // 4. Sentence variety
    let average = stats.average_sentence_length();
    criteria.push(CriterionScore {
        criterion: Criterion::SentenceVariety,
        points: variety_points(average),
        comment: format!("Average of {average:.1} words per sentence"),
    });

    let total: u32 = criteria.iter().map(|c| c.points).sum();

    GradeResult::new(total.min(100) as f64, Feedback::Criteria(criteria))
        .with_model_answer(rubric.model_answer.clone())
        .with_diagnostics(Diagnostics::Writing {
            word_count: stats.word_count,
            diversity,
        })
}
