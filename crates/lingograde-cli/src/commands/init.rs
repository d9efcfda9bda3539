//! The `lingograde init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("lingograde.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("question-sets").context("failed to create question-sets/")?;
    write_if_missing(Path::new("question-sets/example.toml"), EXAMPLE_QUESTION_SET)?;
    write_if_missing(
        Path::new("question-sets/example-answers.toml"),
        EXAMPLE_ANSWERS,
    )?;

    println!("\nNext steps:");
    println!("  1. Edit lingograde.toml to tune the rubric defaults");
    println!("  2. Run: lingograde validate --questions question-sets/example.toml");
    println!(
        "  3. Run: lingograde grade --questions question-sets/example.toml \
         --answers question-sets/example-answers.toml"
    );

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lingograde configuration

# Minimum word count for writing answers whose rubric sets none.
default_min_words = 30

# Target duration window for spoken answers, in milliseconds.
default_min_duration_ms = 30000
default_max_duration_ms = 120000
"#;

const EXAMPLE_QUESTION_SET: &str = r#"[question_set]
id = "example"
name = "Example Question Set"
description = "A short mixed set to get started"

[[questions]]
id = "rs001"
type = "read-select"
word = "RESILIENT"
is_real = true

[[questions]]
id = "fb001"
type = "fill-blanks"
sentence = "She has been working here _____ 2020."
answer = "since"

[[questions]]
id = "rc001"
type = "read-complete"
passage = "The Museum ha_ an incre_____ collection of anc____ artifacts."
blanks = [
    { given = "ha", answer = "s" },
    { given = "incre", answer = "dible" },
    { given = "anc", answer = "ient" },
]

[[questions]]
id = "lt001"
type = "listen-type"
transcript = "The meeting has been rescheduled to next Monday."

[[questions]]
id = "ws001"
type = "writing-sample"
prompt = "Describe your favourite place to relax."
min_words = 30
keywords = ["place", "relax", "favourite"]

[[questions]]
id = "sp001"
type = "speak-photo"
prompt = "Describe the photo."
min_duration_ms = 30000
max_duration_ms = 90000
"#;

const EXAMPLE_ANSWERS: &str = r#"[answers]
rs001 = true
fb001 = "sinse"
rc001 = ["s", "dible", "ent"]
lt001 = "the meeting has been rescheduled to monday"
ws001 = "My favourite place to relax is a small park near my home. There is a quiet bench under an old oak tree. I go there after work to read, listen to the birds and forget about my busy day."
sp001 = { duration_ms = 45000 }
"#;
