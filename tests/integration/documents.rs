//! World document round-trip tests

use proptest::prelude::*;
use worldbible_foundation::{Attribute, ElementKind, Severity};
use worldbible_runtime::{from_json, from_msgpack, to_json, to_msgpack};
use worldbible_storage::{BriefSection, NewElement, World};
use worldbible_timeline::{SnapshotRequest, create_snapshot};

fn rich_world() -> World {
    let mut world = World::new("Средиземье", "a world with \"quotes\" and unicode ✓");
    let chapter = world.add_chapter("Глава 1", Some("начало".into()), None);
    let a = world
        .create_element(
            NewElement::new(ElementKind::Character, "Арагорн")
                .with_attribute("age", 87_i64)
                .with_attribute("abilities", Attribute::list(["swordsmanship", "tracking"]))
                .with_tag("ranger")
                .with_notes("heir"),
        )
        .unwrap();
    let b = world
        .create_element(
            NewElement::new(ElementKind::Location, "Ривенделл")
                .with_attribute("climate", "temperate")
                .with_image_url("https://example.invalid/rivendell.png"),
        )
        .unwrap();
    world.add_relationship(a, b, "посещает", "often").unwrap();
    world.add_element_to_chapter(chapter, a, true).unwrap();
    world.add_conflict(a, b, "manual", Severity::Error).unwrap();
    world.add_rule("r", "(report \"x\")", Severity::Warning);
    world
        .add_brief_template(
            "Pitch",
            "",
            vec![BriefSection::new("Cast", 3).with_type("character").required()],
        )
        .unwrap();
    create_snapshot(&mut world, SnapshotRequest::new("first").with_tag("draft")).unwrap();
    world
}

#[test]
fn json_round_trip_is_byte_exact() {
    let text = to_json(&rich_world()).unwrap();
    let reparsed = from_json(&text).unwrap();
    assert_eq!(to_json(&reparsed).unwrap(), text);
}

#[test]
fn document_has_the_expected_top_level_keys() {
    let text = to_json(&rich_world()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let object = value.as_object().unwrap();
    for key in [
        "id",
        "name",
        "description",
        "elements",
        "chapters",
        "snapshots",
        "rules",
        "briefTemplates",
        "settings",
        "createdAt",
        "modifiedAt",
        "lastOpenedAt",
    ] {
        assert!(object.contains_key(key), "missing {key}");
    }
    let snapshot = &object["snapshots"][0];
    assert!(snapshot["worldState"].is_string());
    assert!(snapshot["date"].is_string());
}

#[test]
fn msgpack_preserves_everything() {
    let world = rich_world();
    assert_eq!(from_msgpack(&to_msgpack(&world).unwrap()).unwrap(), world);
}

#[test]
fn minimal_document_gets_defaults() {
    let text = r#"{
        "id": "6f1d2a3b-4c5d-4e6f-8a9b-0c1d2e3f4a5b",
        "name": "bare",
        "createdAt": "2024-01-01T00:00:00Z",
        "modifiedAt": "2024-01-01T00:00:00Z",
        "lastOpenedAt": "2024-01-01T00:00:00Z"
    }"#;
    let world = from_json(text).unwrap();
    assert_eq!(world.name(), "bare");
    assert_eq!(world.element_count(), 0);
    assert_eq!(world.settings().max_snapshots, 50);
}

proptest! {
    #[test]
    fn arbitrary_text_round_trips(
        name in "\\PC{0,20}",
        description in "\\PC{0,40}",
        tags in prop::collection::vec("[a-z]{1,8}", 0..4),
    ) {
        let mut world = World::new(name.clone(), description.clone());
        let mut new_element = NewElement::new(ElementKind::Concept, name).with_description(description);
        for tag in tags {
            new_element = new_element.with_tag(tag);
        }
        world.create_element(new_element).unwrap();

        let text = to_json(&world).unwrap();
        let parsed = from_json(&text).unwrap();
        prop_assert_eq!(&parsed, &world);
        prop_assert_eq!(to_json(&parsed).unwrap(), text);
    }
}

#[test]
fn brief_templates_and_custom_types_survive_a_save() {
    let text = r#"{
        "id": "6f1d2a3b-4c5d-4e6f-8a9b-0c1d2e3f4a5b",
        "name": "templated",
        "briefTemplates": [{
            "id": "0b9c8d7e-6f5a-4b3c-9d2e-1f0a9b8c7d6e",
            "name": "Pitch",
            "description": "one page",
            "sections": [{"title": "Relics", "elementTypes": ["artifact"], "maxElements": 2, "required": false}],
            "createdAt": "2024-01-01T00:00:00Z",
            "modifiedAt": "2024-01-01T00:00:00Z"
        }],
        "settings": {
            "theme": "light",
            "customElementTypes": {"artifact": {"name": "Artifact", "icon": "gem", "defaultProperties": []}}
        },
        "createdAt": "2024-01-01T00:00:00Z",
        "modifiedAt": "2024-01-01T00:00:00Z",
        "lastOpenedAt": "2024-01-01T00:00:00Z"
    }"#;
    let world = from_json(text).unwrap();
    assert_eq!(world.brief_templates().len(), 1);
    assert_eq!(world.brief_templates()[0].sections[0].element_types, ["artifact"]);
    assert!(world.settings().knows_element_type("artifact"));

    let saved: serde_json::Value = serde_json::from_str(&to_json(&world).unwrap()).unwrap();
    assert_eq!(saved["briefTemplates"][0]["name"], "Pitch");
    assert_eq!(saved["settings"]["theme"], "light");
    assert_eq!(saved["settings"]["customElementTypes"]["artifact"]["icon"], "gem");
}
