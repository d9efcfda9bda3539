//! Levenshtein edit distance and the similarity ratio derived from it.
//!
//! Distances are measured in Unicode scalar values, so an accented letter
//! costs one edit like any other character.

/// Minimum number of single-character insertions, deletions and
/// substitutions needed to turn `a` into `b`.
///
/// Uses a single rolling row sized to the shorter input plus one, so memory
/// stays linear even for whole-paragraph dictation answers.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // `short` is the column dimension.
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, lc) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if lc == sc {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }

    row[short.len()]
}

/// `1 - distance / max(len(reference), 1)`.
///
/// Not clamped: an input much longer than the reference yields a negative
/// ratio, which every threshold treats as a miss.
pub fn similarity(input: &str, reference: &str) -> f64 {
    let distance = edit_distance(input, reference);
    let reference_len = reference.chars().count().max(1);
    1.0 - distance as f64 / reference_len as f64
}
