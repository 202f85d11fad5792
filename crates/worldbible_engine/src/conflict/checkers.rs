//! Structural pairwise checkers.
//!
//! A checker is registered for an ordered pair of kinds. When a pair arrives
//! in the opposite order the same checker runs with its arguments swapped.
//! Pairs with no registered checker fall back to [`check_generic`].

use std::collections::BTreeSet;

use worldbible_foundation::{ElementId, ElementKind, Severity};
use worldbible_storage::{World, WorldElement};

use super::ConflictCandidate;
use super::labels::{CO_LOCATION, DEPENDS, OPPOSITES, PARENT, PARTICIPATES, is_in_class};
use super::similarity::{name_similarity, parse_tech_level};

/// What a checker may read besides the pair itself.
#[derive(Clone, Copy)]
pub struct CheckContext<'w> {
    /// The world both elements belong to.
    pub world: &'w World,
    /// Similarity above which names count as near-duplicates.
    pub name_threshold: f64,
}

/// A pairwise checker.
pub type Checker = fn(&WorldElement, &WorldElement, &CheckContext<'_>) -> Option<ConflictCandidate>;

/// Specialized checkers by ordered kind pair.
pub const CHECKERS: &[(ElementKind, ElementKind, Checker)] = &[
    (ElementKind::Character, ElementKind::Character, check_character_character),
    (ElementKind::Character, ElementKind::Location, check_character_location),
    (ElementKind::Character, ElementKind::Event, check_character_event),
    (ElementKind::Event, ElementKind::Event, check_event_event),
    (ElementKind::Technology, ElementKind::Technology, check_technology_technology),
];

/// Runs the checker registered for the pair's kinds, or the generic one.
#[must_use]
pub fn check_pair(
    a: &WorldElement,
    b: &WorldElement,
    ctx: &CheckContext<'_>,
) -> Option<ConflictCandidate> {
    for (first, second, checker) in CHECKERS {
        if (a.kind, b.kind) == (*first, *second) {
            return checker(a, b, ctx);
        }
        if (b.kind, a.kind) == (*first, *second) {
            return checker(b, a, ctx);
        }
    }
    check_generic(a, b, ctx)
}

// =============================================================================
// Specialized checkers
// =============================================================================

/// Two characters listing each other as parent, or one character holding
/// opposed labels toward the other.
#[must_use]
pub fn check_character_character(
    a: &WorldElement,
    b: &WorldElement,
    _ctx: &CheckContext<'_>,
) -> Option<ConflictCandidate> {
    let claims_parent =
        |from: &WorldElement, to: &WorldElement| from.relationships_to(to.id).any(|r| is_in_class(r, PARENT));
    if claims_parent(a, b) && claims_parent(b, a) {
        return Some(ConflictCandidate::new(
            a.id,
            b.id,
            "Cyclic parentage: both characters are listed as each other's parent",
            Severity::Error,
        ));
    }

    opposed_labels(a, b).or_else(|| opposed_labels(b, a))
}

fn opposed_labels(from: &WorldElement, to: &WorldElement) -> Option<ConflictCandidate> {
    let holds = |keyword: &str| {
        from.relationships_to(to.id)
            .any(|r| r.rel_type.to_lowercase().contains(keyword))
    };
    OPPOSITES
        .iter()
        .find(|&&(left, right)| holds(left) && holds(right))
        .map(|&(left, right)| {
            ConflictCandidate::new(
                from.id,
                to.id,
                format!(
                    "Contradictory relationships: \"{}\" is both \"{left}\" and \"{right}\" toward \"{}\"",
                    from.name, to.name
                ),
                Severity::Warning,
            )
        })
}

/// A character placed at more than one location appearing in the same chapter.
#[must_use]
pub fn check_character_location(
    character: &WorldElement,
    location: &WorldElement,
    ctx: &CheckContext<'_>,
) -> Option<ConflictCandidate> {
    let claimed: BTreeSet<ElementId> = character
        .relationships
        .iter()
        .filter(|r| is_in_class(r, CO_LOCATION))
        .map(|r| r.target_id)
        .collect();
    if !claimed.contains(&location.id) {
        return None;
    }

    character.appearances.iter().find_map(|chapter| {
        let here = claimed
            .iter()
            .filter_map(|id| ctx.world.element(*id))
            .filter(|e| e.kind == ElementKind::Location && e.appearances.contains(chapter))
            .count();
        let current_here = location.appearances.contains(chapter);
        (current_here && here > 1).then(|| {
            let title = ctx
                .world
                .chapter(*chapter)
                .map_or_else(|| chapter.to_string(), |c| c.title.clone());
            ConflictCandidate::new(
                character.id,
                location.id,
                format!(
                    "\"{}\" is in several locations at once in chapter \"{title}\"",
                    character.name
                ),
                Severity::Warning,
            )
        })
    })
}

/// A character taking part in an event while also taking part in another
/// event that is not separated from it by date.
#[must_use]
pub fn check_character_event(
    character: &WorldElement,
    event: &WorldElement,
    ctx: &CheckContext<'_>,
) -> Option<ConflictCandidate> {
    if !lists_participant(event, character) {
        return None;
    }
    let date = event_date(event);

    let other = character
        .relationships
        .iter()
        .filter(|r| r.target_id != event.id && is_in_class(r, PARTICIPATES))
        .filter_map(|r| ctx.world.element(r.target_id))
        .filter(|e| e.kind == ElementKind::Event)
        .find(|other| match (date, event_date(other)) {
            (Some(d1), Some(d2)) => d1 == d2,
            _ => true,
        })?;

    Some(ConflictCandidate::new(
        character.id,
        event.id,
        format!(
            "\"{}\" takes part in \"{}\" and \"{}\", which may happen at the same time",
            character.name, event.name, other.name
        ),
        Severity::Warning,
    ))
}

/// Two events on the same date sharing participants.
#[must_use]
pub fn check_event_event(
    a: &WorldElement,
    b: &WorldElement,
    ctx: &CheckContext<'_>,
) -> Option<ConflictCandidate> {
    let date = event_date(a)?;
    if event_date(b) != Some(date) {
        return None;
    }

    let theirs = b.list_attribute("participants");
    let shared: Vec<String> = a
        .list_attribute("participants")
        .iter()
        .filter(|p| theirs.contains(p))
        .map(|p| participant_name(p, ctx.world))
        .collect();
    if shared.is_empty() {
        return None;
    }

    Some(ConflictCandidate::new(
        a.id,
        b.id,
        format!(
            "Events \"{}\" and \"{}\" both happen on {date} with shared participants: {}",
            a.name,
            b.name,
            shared.join(", ")
        ),
        Severity::Warning,
    ))
}

/// A technology depending on a more advanced one.
#[must_use]
pub fn check_technology_technology(
    a: &WorldElement,
    b: &WorldElement,
    _ctx: &CheckContext<'_>,
) -> Option<ConflictCandidate> {
    anachronistic_dependency(a, b).or_else(|| anachronistic_dependency(b, a))
}

fn anachronistic_dependency(from: &WorldElement, to: &WorldElement) -> Option<ConflictCandidate> {
    let from_level = non_blank(from.text_attribute("techLevel"))?;
    let to_level = non_blank(to.text_attribute("techLevel"))?;
    if !from.relationships_to(to.id).any(|r| is_in_class(r, DEPENDS)) {
        return None;
    }
    (parse_tech_level(from_level) < parse_tech_level(to_level)).then(|| {
        ConflictCandidate::new(
            from.id,
            to.id,
            format!(
                "Technology \"{}\" (level {from_level}) depends on \"{}\" (level {to_level}), which is anachronistic",
                from.name, to.name
            ),
            Severity::Warning,
        )
    })
}

// =============================================================================
// Generic fallback
// =============================================================================

/// Near-duplicate names.
#[must_use]
pub fn check_generic(
    a: &WorldElement,
    b: &WorldElement,
    ctx: &CheckContext<'_>,
) -> Option<ConflictCandidate> {
    let similarity = name_similarity(&a.name, &b.name);
    (similarity > ctx.name_threshold).then(|| {
        ConflictCandidate::new(
            a.id,
            b.id,
            format!(
                "Near-duplicate names \"{}\" and \"{}\" ({:.0}% similar)",
                a.name,
                b.name,
                similarity * 100.0
            ),
            Severity::Warning,
        )
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn event_date(event: &WorldElement) -> Option<&str> {
    non_blank(event.text_attribute("date"))
}

/// Participants are stored as text: an element id or a free-form name.
fn lists_participant(event: &WorldElement, character: &WorldElement) -> bool {
    let id = character.id.to_string();
    event
        .list_attribute("participants")
        .iter()
        .any(|p| *p == id || p.eq_ignore_ascii_case(&character.name))
}

fn participant_name(participant: &str, world: &World) -> String {
    participant
        .parse::<ElementId>()
        .ok()
        .and_then(|id| world.element(id))
        .map_or_else(|| participant.to_string(), |e| e.name.clone())
}
