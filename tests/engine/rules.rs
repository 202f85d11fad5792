//! World rule track tests

use worldbible_engine::{DetectorConfig, analyze_element, analyze_world};
use worldbible_foundation::{ElementKind, ErrorKind, Severity};
use worldbible_storage::{NewElement, World};

fn world_with_characters() -> World {
    let mut world = World::new("rules", "");
    world
        .create_element(NewElement::new(ElementKind::Character, "Ilsa").with_description("a pilot"))
        .unwrap();
    world
        .create_element(NewElement::new(ElementKind::Character, "Viktor"))
        .unwrap();
    world
        .create_element(NewElement::new(ElementKind::Location, "Harbor"))
        .unwrap();
    world
}

const UNDESCRIBED: &str =
    "(when (and (= (kind self) \"character\") (empty? (description self))) (report \"has no description\"))";

#[test]
fn rule_reports_become_candidates_with_rule_severity() {
    let mut world = world_with_characters();
    world.add_rule("characters are described", UNDESCRIBED, Severity::Error);

    let analysis = analyze_world(&world, &DetectorConfig::default());
    let from_rule: Vec<_> = analysis
        .candidates
        .iter()
        .filter(|c| c.description == "has no description")
        .collect();
    assert_eq!(from_rule.len(), 1);
    assert_eq!(from_rule[0].severity, Severity::Error);
    assert_eq!(from_rule[0].source_id, from_rule[0].target_id);
    assert_eq!(
        world.element(from_rule[0].source_id).unwrap().name,
        "Viktor"
    );
}

#[test]
fn inactive_rules_are_skipped() {
    let mut world = world_with_characters();
    let id = world.add_rule("characters are described", UNDESCRIBED, Severity::Error);
    world.set_rule_active(id, false).unwrap();
    assert!(analyze_world(&world, &DetectorConfig::default()).is_empty());
}

#[test]
fn failing_rules_are_isolated() {
    let mut world = world_with_characters();
    world.add_rule("broken", "(report (+ 1 (name self)))", Severity::Error);
    world.add_rule("does not parse", "(report", Severity::Error);
    world.add_rule("characters are described", UNDESCRIBED, Severity::Warning);

    let analysis = analyze_world(&world, &DetectorConfig::default());
    assert_eq!(analysis.candidates.len(), 1);

    let compile_failures = analysis.failures.iter().filter(|f| f.element_id.is_none()).count();
    let eval_failures = analysis.failures.iter().filter(|f| f.element_id.is_some()).count();
    assert_eq!(compile_failures, 1);
    assert_eq!(eval_failures, world.element_count());
    assert!(
        analysis
            .failures
            .iter()
            .all(|f| matches!(f.error.kind, ErrorKind::RuleEvaluationFailure { .. }))
    );

    let quiet = DetectorConfig::default().with_rule_failures(false);
    assert!(analyze_world(&world, &quiet).failures.is_empty());
}

#[test]
fn step_budget_applies_per_evaluation() {
    let mut world = world_with_characters();
    world.add_rule(
        "expensive",
        "(each [a (elements)] (each [b (elements)] (when (= a b) (report \"self\"))))",
        Severity::Warning,
    );
    let id = world.element_ids().next().unwrap();

    let tight = DetectorConfig::default().with_max_steps(10);
    let analysis = analyze_element(&world, id, &tight).unwrap();
    assert!(analysis.candidates.is_empty());
    assert_eq!(analysis.failures.len(), 1);

    let analysis = analyze_element(&world, id, &DetectorConfig::default()).unwrap();
    assert_eq!(analysis.candidates.len(), 3);
}
