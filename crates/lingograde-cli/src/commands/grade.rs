//! The `lingograde grade` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lingograde_core::config::load_config_from;
use lingograde_core::engine::{GradingEngine, ProgressReporter};
use lingograde_core::model::{Diagnostics, Feedback, GradeResult, Judgment, Verdict};
use lingograde_core::parser;
use lingograde_core::report::{QuestionOutcome, SessionReport};

use crate::OutputFormat;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_question_graded(&self, outcome: &QuestionOutcome) {
        eprintln!(
            "  Graded: {} [{}] {} ({})",
            outcome.question_id, outcome.question_type, outcome.result.score, outcome.verdict
        );
    }

    fn on_question_skipped(&self, question_id: &str) {
        eprintln!("  Skipped: {question_id} (no answer)");
    }

    fn on_session_complete(&self, graded: usize, skipped: usize) {
        eprintln!("\nComplete: {graded} graded, {skipped} unanswered");
    }
}

pub fn execute(
    questions_path: PathBuf,
    answers_path: PathBuf,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let set = parser::parse_question_set(&questions_path)?;
    let answers = parser::parse_answer_sheet(&answers_path)?;

    for w in parser::validate_question_set(&set) {
        match &w.question_id {
            Some(id) => tracing::warn!("[{id}] {}", w.message),
            None => tracing::warn!("{}", w.message),
        }
    }

    let engine = GradingEngine::new(config);
    let report = engine.run(&set, &answers, &ConsoleReporter);

    match format {
        OutputFormat::Text => print_summary(&report),
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Markdown => print!("{}", report.to_markdown()),
    }

    Ok(())
}

fn print_summary(report: &SessionReport) {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Score", "Verdict", "Feedback"]);

    for o in &report.outcomes {
        table.add_row(vec![
            Cell::new(&o.question_id),
            Cell::new(&o.question_type),
            Cell::new(o.result.score),
            Cell::new(o.verdict),
            Cell::new(describe(&o.result)),
        ]);
    }

    println!("{}\n", report.question_set.name);
    println!("{table}");

    let summary = &report.summary;
    if !summary.subscores.is_empty() {
        let mut skills = Table::new();
        skills.set_header(vec!["Skill", "Subscore"]);
        for (skill, score) in &summary.subscores {
            skills.add_row(vec![Cell::new(skill), Cell::new(score)]);
        }
        println!("\n{skills}");
    }

    println!(
        "\nOverall: {}  Scaled: {}  Band: {}",
        summary.overall_score, summary.scaled_score, summary.band
    );
    if !report.unanswered.is_empty() {
        println!("Unanswered: {}", report.unanswered.join(", "));
    }
}

/// One-line summary of a result's feedback for the table.
fn describe(result: &GradeResult) -> String {
    let mut line = match &result.feedback {
        Feedback::Message(message) => message.clone(),
        Feedback::Blanks(blanks) => {
            let correct = blanks
                .iter()
                .filter(|b| b.judgment == Judgment::Correct)
                .count();
            format!("{correct}/{} blanks correct", blanks.len())
        }
        Feedback::Dictation(dictation) => {
            let mut s = format!(
                "{} words checked, {} missing",
                dictation.words.len(),
                dictation.missing_words
            );
            if dictation.extra_words > 0 {
                s.push_str(&format!(", {} extra", dictation.extra_words));
            }
            s
        }
        Feedback::Criteria(criteria) => criteria
            .iter()
            .map(|c| format!("{} {}", c.criterion, c.points))
            .collect::<Vec<_>>()
            .join(", "),
    };

    if let Diagnostics::Speaking {
        needs_self_assessment: true,
        ..
    } = result.diagnostics
    {
        line.push_str(" (self-assessment pending)");
    }
    if let Some(model_answer) = &result.model_answer {
        if result.verdict() != Verdict::Correct {
            line.push_str(&format!("; expected: {model_answer}"));
        }
    }

    line
}
