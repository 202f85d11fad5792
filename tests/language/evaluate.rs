//! Rule evaluation tests against a world

use worldbible_foundation::{Attribute, ElementId, ElementKind, ErrorKind, SemanticLimit};
use worldbible_language::{EvalLimits, Report, compile, evaluate};
use worldbible_storage::{NewElement, World};

struct Fixture {
    world: World,
    ilsa: ElementId,
    harbor: ElementId,
    siege: ElementId,
}

fn fixture() -> Fixture {
    let mut world = World::new("language", "");
    let ilsa = world
        .create_element(
            NewElement::new(ElementKind::Character, "Ilsa")
                .with_attribute("age", 31_i64)
                .with_tag("protagonist"),
        )
        .unwrap();
    let harbor = world
        .create_element(NewElement::new(ElementKind::Location, "Harbor"))
        .unwrap();
    let siege = world
        .create_element(
            NewElement::new(ElementKind::Event, "Siege of the Harbor")
                .with_attribute("participants", Attribute::list(["ILSA", "Viktor"])),
        )
        .unwrap();
    world.add_relationship(ilsa, harbor, "located in", "").unwrap();
    Fixture {
        world,
        ilsa,
        harbor,
        siege,
    }
}

fn run(f: &Fixture, subject: ElementId, source: &str) -> Vec<Report> {
    let rule = compile(source).unwrap();
    evaluate(&rule, &f.world, subject, EvalLimits::default()).unwrap()
}

#[test]
fn reports_target_the_subject_by_default() {
    let f = fixture();
    let reports = run(&f, f.ilsa, "(when (has-tag? self \"protagonist\") (report \"main\"))");
    assert_eq!(
        reports,
        [Report {
            target: f.ilsa,
            message: "main".into()
        }]
    );
    assert!(run(&f, f.harbor, "(when (has-tag? self \"protagonist\") (report \"main\"))").is_empty());
}

#[test]
fn rules_can_read_the_rest_of_the_world() {
    let f = fixture();
    let source = "(each [e (elements-of \"event\")]
                    (when (includes? (attr e :participants) (name self))
                      (report e (str (name self) \" takes part in \" (name e)))))";
    let reports = run(&f, f.ilsa, source);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].target, f.siege);
    assert_eq!(reports[0].message, "Ilsa takes part in Siege of the Harbor");
}

#[test]
fn relationships_resolve_to_elements() {
    let f = fixture();
    let reports = run(
        &f,
        f.ilsa,
        "(each [r (relationships self)] (report (target r) (kind (target r))))",
    );
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].target, f.harbor);
    assert_eq!(reports[0].message, "location");
}

#[test]
fn failures_are_typed() {
    let f = fixture();
    let rule = compile("(report (+ (attr self :age) (name self)))").unwrap();
    let err = evaluate(&rule, &f.world, f.ilsa, EvalLimits::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));

    let rule = compile("(each [e (elements)] (each [g (elements)] (each [h (elements)] (str e g h))))").unwrap();
    let limits = EvalLimits {
        max_steps: 20,
        ..EvalLimits::default()
    };
    let err = evaluate(&rule, &f.world, f.ilsa, limits).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(SemanticLimit::MaxSteps { limit: 20 })
    ));
}

#[test]
fn missing_subject_reads_as_nil() {
    let f = fixture();
    let reports = run(&f, ElementId::new(), "(when (nil? (name self)) (report \"gone\"))");
    assert_eq!(reports.len(), 1);
}
