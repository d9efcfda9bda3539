//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PRACTICE: &str = "../../question-sets/practice.toml";
const PRACTICE_ANSWERS: &str = "../../question-sets/practice-answers.toml";

fn lingograde() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("lingograde").unwrap();
    cmd.env_remove("LINGOGRADE_MIN_WORDS");
    cmd
}

#[test]
fn validate_practice_set() {
    lingograde()
        .arg("validate")
        .arg("--questions")
        .arg(PRACTICE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Practice Test (12 questions)"))
        .stdout(predicate::str::contains("All question sets valid"));
}

#[test]
fn validate_directory_skips_answer_sheets() {
    lingograde()
        .arg("validate")
        .arg("--questions")
        .arg("../../question-sets")
        .assert()
        .success()
        .stdout(predicate::str::contains("Practice Test"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
[question_set]
id = "broken"
name = "Broken"

[[questions]]
id = "mc1"
type = "multiple-choice"
options = ["a", "b"]
answer = "c"

[[questions]]
id = "is1"
type = "interactive-speaking"
"#,
    )
    .unwrap();

    lingograde()
        .arg("validate")
        .arg("--questions")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[mc1] WARNING"))
        .stdout(predicate::str::contains("[is1] WARNING"))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    lingograde()
        .arg("validate")
        .arg("--questions")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn grade_text_output() {
    lingograde()
        .arg("grade")
        .arg("--questions")
        .arg(PRACTICE)
        .arg("--answers")
        .arg(PRACTICE_ANSWERS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Practice Test"))
        .stdout(predicate::str::contains("rs006"))
        .stdout(predicate::str::contains("Band:"))
        .stdout(predicate::str::contains("Unanswered: lt002"))
        .stderr(predicate::str::contains("Skipped: lt002"));
}

#[test]
fn grade_json_output() {
    let output = lingograde()
        .arg("grade")
        .arg("--questions")
        .arg(PRACTICE)
        .arg("--answers")
        .arg(PRACTICE_ANSWERS)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let score_of = |id: &str| {
        report["outcomes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["question_id"] == id)
            .map(|o| o["result"]["score"].as_u64().unwrap())
            .unwrap()
    };

    assert_eq!(score_of("rs001"), 100);
    assert_eq!(score_of("rs006"), 0);
    assert_eq!(score_of("fb002"), 80);
    assert_eq!(score_of("rc001"), 100);
    assert_eq!(score_of("sap001"), 100);
    assert_eq!(score_of("rts001"), 50);
    assert_eq!(report["unanswered"], serde_json::json!(["lt002"]));
    assert_eq!(report["summary"]["answered"], 11);
    assert!(report["summary"]["subscores"]["speaking"].is_u64());
}

#[test]
fn grade_markdown_output() {
    lingograde()
        .arg("grade")
        .arg("--questions")
        .arg(PRACTICE)
        .arg("--answers")
        .arg(PRACTICE_ANSWERS)
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Practice Test"))
        .stdout(predicate::str::contains("| fb002 | fill-blanks | 80 | correct |"))
        .stdout(predicate::str::contains("**Unanswered:** lt002"));
}

#[test]
fn grade_unsupported_question_scores_zero() {
    let dir = TempDir::new().unwrap();
    let questions = dir.path().join("q.toml");
    let answers = dir.path().join("a.toml");
    std::fs::write(
        &questions,
        r#"
[question_set]
id = "x"
name = "X"

[[questions]]
id = "is1"
type = "interactive-speaking"
"#,
    )
    .unwrap();
    std::fs::write(&answers, "[answers]\nis1 = \"hello\"\n").unwrap();

    lingograde()
        .arg("grade")
        .arg("--questions")
        .arg(&questions)
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("not available"));
}

#[test]
fn grade_with_missing_config_fails() {
    lingograde()
        .arg("grade")
        .arg("--questions")
        .arg(PRACTICE)
        .arg("--answers")
        .arg(PRACTICE_ANSWERS)
        .arg("--config")
        .arg("no_such_config.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn grade_rejects_unknown_format() {
    lingograde()
        .arg("grade")
        .arg("--questions")
        .arg(PRACTICE)
        .arg("--answers")
        .arg(PRACTICE_ANSWERS)
        .arg("--format")
        .arg("html")
        .assert()
        .failure();
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    lingograde()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lingograde.toml"))
        .stdout(predicate::str::contains("Created question-sets/example.toml"))
        .stdout(predicate::str::contains(
            "Created question-sets/example-answers.toml",
        ));

    assert!(dir.path().join("lingograde.toml").exists());
    assert!(dir.path().join("question-sets/example.toml").exists());

    // The generated files grade cleanly.
    lingograde()
        .current_dir(dir.path())
        .arg("grade")
        .arg("--questions")
        .arg("question-sets/example.toml")
        .arg("--answers")
        .arg("question-sets/example-answers.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Example Question Set"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    lingograde()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    lingograde()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    lingograde()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Automated grader for language-test answers",
        ));
}

#[test]
fn version_output() {
    lingograde()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lingograde"));
}
