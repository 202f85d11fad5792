//! Snapshot restore tests

use worldbible_foundation::{ElementKind, ErrorKind, SnapshotId};
use worldbible_storage::{ElementPatch, NewElement, World};
use worldbible_timeline::{
    AUTO_BACKUP_TAG, PRE_RESTORE_TAG, SnapshotRequest, WorldState, create_snapshot,
    restore_snapshot,
};

fn populated() -> World {
    let mut world = World::new("timeline", "");
    let chapter = world.add_chapter("One", None, None);
    let ilsa = world
        .create_element(NewElement::new(ElementKind::Character, "Ilsa"))
        .unwrap();
    let harbor = world
        .create_element(NewElement::new(ElementKind::Location, "Harbor"))
        .unwrap();
    world.add_relationship(ilsa, harbor, "lives in", "").unwrap();
    world.add_element_to_chapter(chapter, ilsa, true).unwrap();
    world
}

#[test]
fn restoring_the_backup_undoes_a_restore() {
    let mut world = populated();
    let snapshot = create_snapshot(&mut world, SnapshotRequest::new("baseline")).unwrap();

    let extra = world
        .create_element(NewElement::new(ElementKind::Concept, "Tides"))
        .unwrap();
    let ilsa = world
        .elements_of_kind(ElementKind::Character)
        .next()
        .unwrap()
        .id;
    world
        .update_element(ilsa, ElementPatch::new().name("Ilsa Lund"))
        .unwrap();
    let edited = WorldState::of(&world);

    let backup = restore_snapshot(&mut world, snapshot).unwrap();
    assert!(!world.contains(extra));
    assert_eq!(world.element(ilsa).unwrap().name, "Ilsa");

    let backup_record = world.snapshot(backup).unwrap();
    assert!(backup_record.has_tag(AUTO_BACKUP_TAG));
    assert!(backup_record.has_tag(PRE_RESTORE_TAG));
    assert_eq!(
        backup_record.description,
        "Automatic backup before restoring \"baseline\""
    );

    restore_snapshot(&mut world, backup).unwrap();
    assert_eq!(WorldState::of(&world), edited);
}

#[test]
fn restore_keeps_rules_settings_and_snapshots() {
    let mut world = populated();
    let snapshot = create_snapshot(&mut world, SnapshotRequest::new("baseline")).unwrap();
    world.add_rule("r", "(report \"x\")", worldbible_foundation::Severity::Warning);

    restore_snapshot(&mut world, snapshot).unwrap();
    assert_eq!(world.rules().len(), 1);
    assert_eq!(world.snapshots().len(), 2);
    assert!(world.snapshot(snapshot).is_some());
}

#[test]
fn failed_restore_changes_nothing() {
    let mut world = populated();
    let snapshot = create_snapshot(&mut world, SnapshotRequest::new("baseline")).unwrap();
    world.snapshots_mut()[0].world_state = r#"{"elements": 12}"#.into();
    let before = world.clone();

    let err = restore_snapshot(&mut world, snapshot).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationFailure(_)));
    assert_eq!(world, before);

    assert!(restore_snapshot(&mut world, SnapshotId::new()).unwrap_err().is_not_found());
    assert_eq!(world, before);
}

#[test]
fn backup_is_newest_even_when_snapshots_are_future_dated() {
    let mut world = populated();
    world
        .update_settings(worldbible_storage::SettingsPatch::new().max_snapshots(2))
        .unwrap();
    let later = chrono::Utc::now() + chrono::TimeDelta::days(30);
    let first = create_snapshot(&mut world, SnapshotRequest::new("a").captured_at(later)).unwrap();
    create_snapshot(
        &mut world,
        SnapshotRequest::new("b").captured_at(later + chrono::TimeDelta::seconds(1)),
    )
    .unwrap();
    let tides = world
        .create_element(NewElement::new(ElementKind::Concept, "Tides"))
        .unwrap();
    let before = WorldState::of(&world);

    let backup = restore_snapshot(&mut world, first).unwrap();
    assert!(!world.contains(tides));
    assert!(world.snapshot(backup).is_some());
    assert!(world.snapshots().len() <= 2);

    restore_snapshot(&mut world, backup).unwrap();
    assert_eq!(WorldState::of(&world), before);
}
