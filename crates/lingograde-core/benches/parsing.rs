use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lingograde_core::normalize::normalize;
use lingograde_core::parser::{parse_answer_sheet_str, parse_question_set_str};

const QUESTION_SET: &str = r#"
[question_set]
id = "bench"
name = "Bench"

[[questions]]
id = "rs001"
type = "read-select"
word = "RESILIENT"
is_real = true

[[questions]]
id = "rc002"
type = "read-complete"
passage = "Climate cha___ is one of t__ most pre_____ issues fac___ humanity tod___."
blanks = [
    { given = "cha", answer = "nge" },
    { given = "t", answer = "he" },
    { given = "pre", answer = "ssing" },
    { given = "fac", answer = "ing" },
    { given = "tod", answer = "ay" },
]

[[questions]]
id = "lt003"
type = "listen-type"
transcript = "The committee unanimously approved the proposal after lengthy deliberations."

[[questions]]
id = "ws001"
type = "writing-sample"
prompt = "Describe a memorable trip."
min_words = 50
keywords = ["trip", "travel", "memorable"]
"#;

const ANSWERS: &str = r#"
[answers]
rs001 = true
rc002 = ["nge", "he", "ssing", "ing", "ay"]
lt003 = "the committee unanimously approved the proposal"
ws001 = "My most memorable trip was to the mountains."
"#;

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("short", |b| b.iter(|| normalize(black_box("  Since!  "))));

    group.bench_function("paragraph", |b| {
        let text = "The Museum has an INCREDIBLE collection of ancient artifacts!!  ".repeat(20);
        b.iter(|| normalize(black_box(&text)))
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("question_set", |b| {
        b.iter(|| parse_question_set_str(black_box(QUESTION_SET), Path::new("bench.toml")))
    });

    group.bench_function("answer_sheet", |b| {
        b.iter(|| parse_answer_sheet_str(black_box(ANSWERS), Path::new("answers.toml")))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_parse);
criterion_main!(benches);
