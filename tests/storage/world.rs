//! World lifecycle, settings and rule tests

use worldbible_foundation::{ErrorKind, RuleId, Severity, Strictness};
use worldbible_storage::{RulePatch, SettingsPatch, World};

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn new_world_is_empty_with_defaults() {
    let world = World::new("Middle Shore", "coastal fantasy");
    let metadata = world.metadata();
    assert_eq!(metadata.name, "Middle Shore");
    assert_eq!(metadata.elements_count, 0);
    assert_eq!(metadata.chapters_count, 0);
    assert_eq!(world.settings().max_snapshots, 50);
    assert_eq!(world.settings().auto_save_interval, 5);
    assert_eq!(world.settings().conflict_detection_level, Strictness::Moderate);
    assert_eq!(world.created_at(), world.modified_at());
}

#[test]
fn properties_update_modification_time() {
    let mut world = World::new("draft", "");
    let created = world.modified_at();
    world.update_properties(Some("final".into()), None);
    assert_eq!(world.name(), "final");
    assert_eq!(world.description(), "");
    assert!(world.modified_at() >= created);
}

// =============================================================================
// Settings
// =============================================================================

#[test]
fn invalid_settings_change_nothing() {
    let mut world = World::new("settings", "");
    let err = world
        .update_settings(
            SettingsPatch::new()
                .conflict_detection_level(Strictness::Strict)
                .max_snapshots(0),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
    assert_eq!(world.settings().conflict_detection_level, Strictness::Moderate);
    assert_eq!(world.settings().max_snapshots, 50);

    world
        .update_settings(SettingsPatch::new().conflict_detection_level(Strictness::Strict))
        .unwrap();
    assert_eq!(world.settings().conflict_detection_level, Strictness::Strict);
}

// =============================================================================
// Rules
// =============================================================================

#[test]
fn rule_lifecycle() {
    let mut world = World::new("rules", "");
    let id = world.add_rule(
        "characters have names",
        "(when (empty? (name self)) (report \"unnamed\"))",
        Severity::Error,
    );
    assert!(world.rule(id).unwrap().active);
    assert_eq!(world.active_rules().count(), 1);

    world.set_rule_active(id, false).unwrap();
    assert_eq!(world.active_rules().count(), 0);

    world
        .update_rule(id, RulePatch::new().severity(Severity::Warning).active(true))
        .unwrap();
    assert_eq!(world.rule(id).unwrap().severity, Severity::Warning);

    let removed = world.delete_rule(id).unwrap();
    assert_eq!(removed.description, "characters have names");
    assert!(world.rules().is_empty());
    assert!(world.delete_rule(id).unwrap_err().is_not_found());
    assert!(world.set_rule_active(RuleId::new(), true).unwrap_err().is_not_found());
}
