//! Pairwise conflict detection and merge-back tests

use proptest::prelude::*;
use worldbible_engine::{ConflictCandidate, DetectorConfig, analyze_element, analyze_world, apply_candidates};
use worldbible_foundation::{Attribute, ConflictStatus, ElementId, ElementKind, Severity, Strictness};
use worldbible_storage::{NewElement, World};

fn add(world: &mut World, kind: ElementKind, name: &str) -> ElementId {
    world.create_element(NewElement::new(kind, name)).unwrap()
}

fn sorted(mut candidates: Vec<ConflictCandidate>) -> Vec<ConflictCandidate> {
    candidates.sort();
    candidates
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn cyclic_parentage_is_an_error() {
    let mut world = World::new("engine", "");
    let a = add(&mut world, ElementKind::Character, "Anna");
    let b = add(&mut world, ElementKind::Character, "Boris");
    world.add_relationship(a, b, "Родитель", "").unwrap();
    world.add_relationship(b, a, "Родитель", "").unwrap();

    let analysis = analyze_world(&world, &DetectorConfig::default());
    assert_eq!(analysis.candidates.len(), 1);
    let candidate = &analysis.candidates[0];
    assert_eq!(candidate.severity, Severity::Error);
    assert!(candidate.description.contains("Cyclic parentage"));
}

#[test]
fn near_duplicate_names_warn() {
    let mut world = World::new("engine", "");
    let a = add(&mut world, ElementKind::Concept, "Aragorn");
    let b = add(&mut world, ElementKind::Concept, "Aragon");

    let analysis = analyze_world(&world, &DetectorConfig::default());
    assert_eq!(analysis.candidates.len(), 1);
    let candidate = &analysis.candidates[0];
    assert_eq!(candidate.severity, Severity::Warning);
    assert!(candidate.description.contains("Aragorn"));
    assert!(candidate.description.contains("Aragon"));
    assert!(candidate.description.contains("86%"));
    let pair = [candidate.source_id, candidate.target_id];
    assert!(pair.contains(&a) && pair.contains(&b));

    let lenient = DetectorConfig::for_strictness(Strictness::Lenient);
    assert!(analyze_world(&world, &lenient).is_empty());
}

#[test]
fn character_in_two_places_in_one_chapter() {
    let mut world = World::new("engine", "");
    let chapter = world.add_chapter("Storm", None, None);
    let ilsa = add(&mut world, ElementKind::Character, "Ilsa");
    let harbor = add(&mut world, ElementKind::Location, "Harbor");
    let keep = add(&mut world, ElementKind::Location, "Keep");
    world.add_relationship(ilsa, harbor, "located in", "").unwrap();
    world.add_relationship(ilsa, keep, "visits", "").unwrap();
    for id in [ilsa, harbor, keep] {
        world.add_element_to_chapter(chapter, id, true).unwrap();
    }

    let analysis = analyze_world(&world, &DetectorConfig::default());
    let targets: Vec<ElementId> = analysis
        .candidates
        .iter()
        .filter(|c| c.source_id == ilsa)
        .map(|c| c.target_id)
        .collect();
    assert_eq!(targets.len(), 2);
    assert!(targets.contains(&harbor) && targets.contains(&keep));
    assert!(analysis.candidates[0].description.contains("Storm"));
}

#[test]
fn overlapping_events() {
    let mut world = World::new("engine", "");
    let ilsa = add(&mut world, ElementKind::Character, "Ilsa");
    let siege = world
        .create_element(
            NewElement::new(ElementKind::Event, "Siege")
                .with_attribute("date", "1204")
                .with_attribute("participants", Attribute::list(["Ilsa", "Viktor"])),
        )
        .unwrap();
    let wedding = world
        .create_element(
            NewElement::new(ElementKind::Event, "Wedding")
                .with_attribute("date", "1204")
                .with_attribute("participants", Attribute::list(["Viktor"])),
        )
        .unwrap();
    world.add_relationship(ilsa, wedding, "participates", "").unwrap();

    let analysis = analyze_world(&world, &DetectorConfig::default());
    let descriptions: Vec<&str> = analysis.candidates.iter().map(|c| c.description.as_str()).collect();
    assert!(descriptions.iter().any(|d| d.contains("shared participants: Viktor")));
    assert!(
        analysis
            .candidates
            .iter()
            .any(|c| c.source_id == ilsa && c.target_id == siege)
    );
}

#[test]
fn anachronistic_technology() {
    let mut world = World::new("engine", "");
    let plough = world
        .create_element(NewElement::new(ElementKind::Technology, "Plough").with_attribute("techLevel", "medieval"))
        .unwrap();
    let reactor = world
        .create_element(NewElement::new(ElementKind::Technology, "Reactor").with_attribute("techLevel", "Tier 6"))
        .unwrap();
    world.add_relationship(plough, reactor, "depends on", "").unwrap();

    let analysis = analyze_world(&world, &DetectorConfig::default());
    assert_eq!(analysis.candidates.len(), 1);
    assert_eq!(analysis.candidates[0].source_id, plough);
    assert!(analysis.candidates[0].description.contains("anachronistic"));
}

#[test]
fn incremental_analysis_only_involves_the_element() {
    let mut world = World::new("engine", "");
    add(&mut world, ElementKind::Concept, "Aragorn");
    add(&mut world, ElementKind::Concept, "Aragon");
    let other = add(&mut world, ElementKind::Concept, "Zebra");

    let analysis = analyze_element(&world, other, &DetectorConfig::default()).unwrap();
    assert!(analysis.is_empty());
    assert!(analyze_element(&world, ElementId::new(), &DetectorConfig::default())
        .unwrap_err()
        .is_not_found());
}

// =============================================================================
// Merge-back
// =============================================================================

#[test]
fn merge_never_reraises_settled_conflicts() {
    let mut world = World::new("engine", "");
    let a = add(&mut world, ElementKind::Concept, "Aragorn");
    add(&mut world, ElementKind::Concept, "Aragon");
    let config = DetectorConfig::default();

    let candidates = analyze_world(&world, &config).candidates;
    let first = apply_candidates(&mut world, candidates);
    assert_eq!(first.added.len(), 1);
    let (owner, conflict) = first.added[0];
    world
        .set_conflict_status(owner, conflict, ConflictStatus::Ignored, None)
        .unwrap();

    let candidates = analyze_world(&world, &config).candidates;
    let second = apply_candidates(&mut world, candidates);
    assert!(second.added.is_empty());
    assert_eq!(second.duplicates, 1);
    assert!(world.unresolved_conflicts().is_empty());

    world.delete_element(a).unwrap();
    let dropped = apply_candidates(
        &mut world,
        [ConflictCandidate::new(a, owner, "stale", Severity::Warning)],
    );
    assert_eq!(dropped.dropped, 1);
}

// =============================================================================
// Properties
// =============================================================================

const NAMES: [&str; 6] = ["Aragorn", "Aragon", "Arwen", "Boromir", "Boromyr", "Eowyn"];
const LABELS: [&str; 5] = ["parent", "friend", "enemy", "located in", "depends on"];

fn arbitrary_world(kinds: &[u8], edges: &[(usize, usize, usize)]) -> World {
    let mut world = World::new("prop", "");
    let ids: Vec<ElementId> = kinds
        .iter()
        .enumerate()
        .map(|(i, k)| {
            let kind = match k % 4 {
                0 => ElementKind::Character,
                1 => ElementKind::Location,
                2 => ElementKind::Technology,
                _ => ElementKind::Concept,
            };
            world
                .create_element(NewElement::new(kind, NAMES[i % NAMES.len()]))
                .unwrap()
        })
        .collect();
    for (from, to, label) in edges {
        world
            .add_relationship(ids[from % ids.len()], ids[to % ids.len()], LABELS[label % LABELS.len()], "")
            .unwrap();
    }
    world
}

proptest! {
    #[test]
    fn analysis_is_deterministic(
        kinds in prop::collection::vec(any::<u8>(), 1..12),
        edges in prop::collection::vec((any::<usize>(), any::<usize>(), any::<usize>()), 0..30),
    ) {
        let world = arbitrary_world(&kinds, &edges);
        let config = DetectorConfig::default();
        let first = sorted(analyze_world(&world, &config).candidates);
        let second = sorted(analyze_world(&world.clone(), &config).candidates);
        prop_assert_eq!(first, second);
    }
}
