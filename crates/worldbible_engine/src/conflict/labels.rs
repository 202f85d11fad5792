//! Relationship label classes recognised by the pairwise checkers.
//!
//! Labels are free text, so classes are matched by case-insensitive
//! substring. Russian and English spellings are both recognised.

use worldbible_storage::Relationship;

/// Parent-like labels.
pub const PARENT: &[&str] = &["родитель", "parent"];

/// Labels placing the source at a location.
pub const CO_LOCATION: &[&str] = &["находится", "посещает", "located", "visits"];

/// Labels marking participation in an event.
pub const PARTICIPATES: &[&str] = &["участвует", "participates"];

/// Labels marking a technology dependency.
pub const DEPENDS: &[&str] = &["зависит", "depends"];

/// Pairs of labels that contradict each other when held toward one target.
pub const OPPOSITES: &[(&str, &str)] = &[
    ("друг", "враг"),
    ("союзник", "противник"),
    ("любовь", "ненависть"),
    ("friend", "enemy"),
    ("ally", "adversary"),
    ("love", "hate"),
];

/// Returns true if the relationship's label contains any keyword of `class`.
#[must_use]
pub fn is_in_class(rel: &Relationship, class: &[&str]) -> bool {
    let label = rel.rel_type.to_lowercase();
    class.iter().any(|keyword| label.contains(keyword))
}
