//! String similarity and tech-level parsing.

#![allow(clippy::cast_precision_loss)]

/// Named tech levels, lowest first. Matched by substring when a level has
/// no embedded number.
const TECH_LADDER: &[(&str, u32)] = &[
    ("примитивный", 1),
    ("древний", 2),
    ("средневековый", 3),
    ("индустриальный", 4),
    ("современный", 5),
    ("продвинутый", 6),
    ("футуристический", 7),
    ("фантастический", 8),
    ("primitive", 1),
    ("ancient", 2),
    ("medieval", 3),
    ("industrial", 4),
    ("modern", 5),
    ("advanced", 6),
    ("futuristic", 7),
    ("fantastic", 8),
];

/// Levenshtein edit distance over Unicode scalar values.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            row[j + 1] = (prev[j + 1] + 1).min(row[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev[b.len()]
}

/// Case-insensitive name similarity in `[0, 1]`: one minus the edit distance
/// divided by the longer length. Two empty names are identical.
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

/// Parses a tech level: the first embedded integer, else the ladder, else 0.
#[must_use]
pub fn parse_tech_level(level: &str) -> u32 {
    let digits: String = level
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    if !digits.is_empty() {
        return digits.parse().unwrap_or(u32::MAX);
    }

    let lower = level.to_lowercase();
    TECH_LADDER
        .iter()
        .find(|(name, _)| lower.contains(name))
        .map_or(0, |(_, rank)| *rank)
}
