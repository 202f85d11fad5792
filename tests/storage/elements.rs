//! Element store tests

use worldbible_foundation::{
    Attribute, CanonTier, ConflictStatus, ElementKind, ErrorKind, Severity,
};
use worldbible_storage::{ElementPatch, NewElement, SettingsPatch, World};

fn world() -> World {
    World::new("storage", "")
}

// =============================================================================
// Create / Update
// =============================================================================

#[test]
fn create_starts_at_version_one() {
    let mut world = world();
    let id = world
        .create_element(
            NewElement::new(ElementKind::Character, "Ilsa")
                .with_attribute("age", 31_i64)
                .with_attribute("goals", Attribute::list(["escape"])),
        )
        .unwrap();
    let element = world.element(id).unwrap();
    assert_eq!(element.version, 1);
    assert_eq!(element.kind, ElementKind::Character);
    assert_eq!(element.list_attribute("goals"), ["escape"]);
}

#[test]
fn canon_tier_defaults_from_settings() {
    let mut world = world();
    world
        .update_settings(SettingsPatch::new().default_canon_tier(CanonTier::Speculative))
        .unwrap();
    let implicit = world
        .create_element(NewElement::new(ElementKind::Concept, "Magic"))
        .unwrap();
    let explicit = world
        .create_element(NewElement::new(ElementKind::Concept, "Faith").with_canon_tier(CanonTier::Primary))
        .unwrap();
    assert_eq!(world.element(implicit).unwrap().canon_tier, CanonTier::Speculative);
    assert_eq!(world.element(explicit).unwrap().canon_tier, CanonTier::Primary);
}

#[test]
fn schema_violation_stores_nothing() {
    let mut world = world();
    let err = world
        .create_element(NewElement::new(ElementKind::Character, "Ilsa").with_attribute("age", "old"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SchemaViolation { .. }));
    assert_eq!(world.element_count(), 0);

    let id = world
        .create_element(NewElement::new(ElementKind::Location, "Harbor"))
        .unwrap();
    let err = world
        .update_element(
            id,
            ElementPatch::new().attributes([("wingspan".to_string(), Attribute::from(3_i64))].into()),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SchemaViolation { .. }));
    assert_eq!(world.element(id).unwrap().version, 1);
}

#[test]
fn every_mutation_bumps_version() {
    let mut world = world();
    let a = world
        .create_element(NewElement::new(ElementKind::Character, "Ilsa"))
        .unwrap();
    let b = world
        .create_element(NewElement::new(ElementKind::Character, "Viktor"))
        .unwrap();

    world.update_element(a, ElementPatch::new().notes("draft")).unwrap();
    world.add_relationship(a, b, "friend", "").unwrap();
    let conflict = world.add_conflict(a, b, "manual", Severity::Warning).unwrap();
    world
        .set_conflict_status(a, conflict, ConflictStatus::Ignored, None)
        .unwrap();
    world.remove_relationship(a, b, "friend").unwrap();

    assert_eq!(world.element(a).unwrap().version, 6);
    assert_eq!(world.element(b).unwrap().version, 1);
}

#[test]
fn missing_ids_are_not_found() {
    let mut world = world();
    let a = world
        .create_element(NewElement::new(ElementKind::Event, "Siege"))
        .unwrap();
    let ghost = worldbible_foundation::ElementId::new();

    assert!(world.get_element(ghost).unwrap_err().is_not_found());
    assert!(world.update_element(ghost, ElementPatch::new()).unwrap_err().is_not_found());
    assert!(world.add_relationship(a, ghost, "x", "").unwrap_err().is_not_found());
    assert!(world.add_conflict(ghost, a, "x", Severity::Error).unwrap_err().is_not_found());
    assert!(world.delete_element(ghost).unwrap_err().is_not_found());
    assert!(world.element(a).unwrap().relationships.is_empty());
}

// =============================================================================
// Conflicts
// =============================================================================

#[test]
fn conflict_status_transitions() {
    let mut world = world();
    let a = world
        .create_element(NewElement::new(ElementKind::Location, "North"))
        .unwrap();
    let b = world
        .create_element(NewElement::new(ElementKind::Location, "South"))
        .unwrap();
    let c = world.add_conflict(a, b, "border dispute", Severity::Warning).unwrap();

    let err = world
        .set_conflict_status(a, c, ConflictStatus::Ignored, Some("why".into()))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidTransition { .. }));

    world
        .set_conflict_status(a, c, ConflictStatus::Resolved, Some("treaty".into()))
        .unwrap();
    let conflict = world.element(a).unwrap().conflict(c).unwrap();
    assert_eq!(conflict.status, ConflictStatus::Resolved);
    assert_eq!(conflict.resolution.as_deref(), Some("treaty"));
    assert!(conflict.resolved_at.is_some());

    let err = world
        .set_conflict_status(a, c, ConflictStatus::Ignored, None)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidTransition { .. }));
    assert!(world.unresolved_conflicts().is_empty());
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn delete_leaves_no_references() {
    let mut world = world();
    let x = world
        .create_element(NewElement::new(ElementKind::Character, "X"))
        .unwrap();
    let y = world
        .create_element(NewElement::new(ElementKind::Character, "Y"))
        .unwrap();
    let chapter = world.add_chapter("One", None, None);
    world.add_relationship(y, x, "rival", "").unwrap();
    world.add_relationship(y, y, "self", "").unwrap();
    let resolved = world.add_conflict(y, x, "old", Severity::Warning).unwrap();
    world
        .set_conflict_status(y, resolved, ConflictStatus::Resolved, None)
        .unwrap();
    world.add_conflict(y, x, "new", Severity::Error).unwrap();
    world.add_element_to_chapter(chapter, x, true).unwrap();
    let version = world.element(y).unwrap().version;

    let removed = world.delete_element(x).unwrap();
    assert_eq!(removed.name, "X");
    assert!(!world.contains(x));

    let survivor = world.element(y).unwrap();
    assert!(survivor.relationships.iter().all(|r| r.target_id != x));
    assert_eq!(survivor.relationships.len(), 1);
    assert!(survivor.conflicts.is_empty());
    assert_eq!(survivor.version, version + 1);
    assert!(!world.chapter(chapter).unwrap().mentions(x));
}
