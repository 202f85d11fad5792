//! Snapshot retention tests

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use worldbible_foundation::ElementKind;
use worldbible_storage::{NewElement, SettingsPatch, World};
use worldbible_timeline::{SnapshotRequest, create_snapshot, list_snapshots};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn descriptions(world: &World) -> Vec<String> {
    world
        .snapshots()
        .iter()
        .map(|s| s.description.clone())
        .collect()
}

#[test]
fn only_the_newest_survive() {
    let mut world = World::new("timeline", "");
    world
        .create_element(NewElement::new(ElementKind::Location, "Harbor"))
        .unwrap();
    world
        .update_settings(SettingsPatch::new().max_snapshots(2))
        .unwrap();

    for (t, name) in [(1, "S1"), (2, "S2"), (3, "S3")] {
        create_snapshot(&mut world, SnapshotRequest::new(name).captured_at(at(t))).unwrap();
    }
    assert_eq!(descriptions(&world), ["S2", "S3"]);
}

#[test]
fn late_insert_of_an_old_snapshot_is_evicted_first() {
    let mut world = World::new("timeline", "");
    world
        .update_settings(SettingsPatch::new().max_snapshots(2))
        .unwrap();
    create_snapshot(&mut world, SnapshotRequest::new("new").captured_at(at(10))).unwrap();
    create_snapshot(&mut world, SnapshotRequest::new("newer").captured_at(at(20))).unwrap();
    create_snapshot(&mut world, SnapshotRequest::new("ancient").captured_at(at(1))).unwrap();

    assert_eq!(descriptions(&world), ["new", "newer"]);
    let listed: Vec<&str> = list_snapshots(&world)
        .iter()
        .map(|s| s.description.as_str())
        .collect();
    assert_eq!(listed, ["newer", "new"]);
}

#[test]
fn lowering_the_cap_evicts_immediately() {
    let mut world = World::new("timeline", "");
    for t in 1..=4 {
        create_snapshot(&mut world, SnapshotRequest::new(t.to_string()).captured_at(at(t))).unwrap();
    }
    world
        .update_settings(SettingsPatch::new().max_snapshots(1))
        .unwrap();
    assert!(world.snapshots().len() <= world.settings().max_snapshots);
    assert_eq!(descriptions(&world), ["4"]);

    create_snapshot(&mut world, SnapshotRequest::new("5").captured_at(at(5))).unwrap();
    assert_eq!(descriptions(&world), ["5"]);
}

proptest! {
    #[test]
    fn count_never_exceeds_cap(
        times in prop::collection::vec(0i64..10_000, 1..30),
        max in 1usize..6,
        lowered in 1usize..6,
    ) {
        let mut world = World::new("prop", "");
        world.update_settings(SettingsPatch::new().max_snapshots(max)).unwrap();
        for t in &times {
            create_snapshot(&mut world, SnapshotRequest::new(t.to_string()).captured_at(at(*t))).unwrap();
            prop_assert!(world.snapshots().len() <= max);
        }

        let mut expected = times.clone();
        expected.sort_unstable();
        let newest: Vec<i64> = expected.iter().rev().take(max).copied().collect();
        let mut kept: Vec<i64> = world.snapshots().iter().map(|s| s.captured_at.timestamp()).collect();
        kept.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(kept, newest);

        world.update_settings(SettingsPatch::new().max_snapshots(lowered)).unwrap();
        prop_assert!(world.snapshots().len() <= lowered);
    }
}
