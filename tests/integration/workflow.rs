//! End-to-end editing workflow through a session

use worldbible_engine::{DetectorConfig, analyze_world};
use worldbible_foundation::{ConflictStatus, ElementKind, Severity};
use worldbible_runtime::{Session, SessionConfig};
use worldbible_storage::{ElementPatch, NewElement, World};
use worldbible_timeline::{SnapshotRequest, WorldState};

#[test]
fn edit_analyze_snapshot_restore_persist() {
    let mut session = Session::new(World::new("saga", ""));
    let chapter = session.add_chapter("Opening", None, None);

    let anna = session
        .create_element(NewElement::new(ElementKind::Character, "Anna"))
        .unwrap();
    let boris = session
        .create_element(NewElement::new(ElementKind::Character, "Boris"))
        .unwrap();
    session.add_element_to_chapter(chapter, anna, true).unwrap();
    session.add_relationship(anna, boris, "parent", "").unwrap();
    session.add_relationship(boris, anna, "parent", "").unwrap();

    let unresolved = session.world().unresolved_conflicts();
    assert_eq!(unresolved.len(), 1);
    let (owner, conflict) = unresolved[0];
    assert_eq!(conflict.severity, Severity::Error);
    let conflict_id = conflict.id;

    let baseline = session
        .create_snapshot(SnapshotRequest::new("cycle present").with_chapter(chapter))
        .unwrap();

    session
        .set_conflict_status(owner, conflict_id, ConflictStatus::Resolved, Some("adoption".into()))
        .unwrap();
    assert!(session.world().unresolved_conflicts().is_empty());
    session
        .update_element(boris, ElementPatch::new().description("Anna's ward"))
        .unwrap();
    assert!(session.world().unresolved_conflicts().is_empty());

    let resolved_state = WorldState::of(session.world());
    let backup = session.restore_snapshot(baseline).unwrap();
    assert_eq!(session.world().unresolved_conflicts().len(), 1);

    session.restore_snapshot(backup).unwrap();
    assert_eq!(WorldState::of(session.world()), resolved_state);

    let path = std::env::temp_dir().join(format!("worldbible_workflow_{}.json", std::process::id()));
    session.save(&path).unwrap();
    let reopened = Session::open(&path, SessionConfig::default()).unwrap();
    assert_eq!(WorldState::of(reopened.world()), resolved_state);
    assert_eq!(reopened.snapshots().len(), 3);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn deleting_an_element_leaves_no_dangling_references() {
    let mut session = Session::new(World::new("saga", ""));
    let x = session
        .create_element(NewElement::new(ElementKind::Concept, "Aragorn"))
        .unwrap();
    let y = session
        .create_element(NewElement::new(ElementKind::Concept, "Aragon"))
        .unwrap();
    session.add_relationship(y, x, "named after", "").unwrap();
    assert!(!session.world().element(y).unwrap().conflicts.is_empty());

    session.delete_element(x).unwrap();
    let world = session.world();
    for element in world.elements() {
        assert!(element.relationships.iter().all(|r| world.contains(r.target_id)));
        assert!(element.conflicts.iter().all(|c| world.contains(c.with_element_id)));
    }

    let graph = session.graph(None, 3).unwrap();
    assert!(graph.edges.iter().all(|e| world.contains(e.target)));
    assert!(analyze_world(world, &DetectorConfig::default()).is_empty());
}

#[test]
fn strictness_setting_drives_session_analysis() {
    let mut session = Session::new(World::new("saga", ""));
    session
        .update_settings(
            worldbible_storage::SettingsPatch::new()
                .conflict_detection_level(worldbible_foundation::Strictness::Lenient),
        )
        .unwrap();
    session
        .create_element(NewElement::new(ElementKind::Concept, "Aragorn"))
        .unwrap();
    session
        .create_element(NewElement::new(ElementKind::Concept, "Aragon"))
        .unwrap();
    assert!(session.world().unresolved_conflicts().is_empty());
}
