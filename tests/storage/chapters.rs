//! Chapter tests

use worldbible_foundation::{ChapterId, ElementKind};
use worldbible_storage::{ChapterPatch, NewElement, World};

fn orders(world: &World) -> Vec<(String, u32)> {
    world
        .chapters()
        .iter()
        .map(|c| (c.title.clone(), c.order))
        .collect()
}

#[test]
fn chapters_stay_sorted_by_order() {
    let mut world = World::new("chapters", "");
    world.add_chapter("One", None, None);
    world.add_chapter("Two", None, None);
    world.add_chapter("Prologue", Some("before it all".into()), Some(0));

    assert_eq!(
        orders(&world),
        [("Prologue".into(), 0), ("One".into(), 1), ("Two".into(), 2)]
    );
}

#[test]
fn reordering_resorts() {
    let mut world = World::new("chapters", "");
    let one = world.add_chapter("One", None, None);
    world.add_chapter("Two", None, None);
    world
        .update_chapter(one, ChapterPatch::new().order(5).title("Epilogue"))
        .unwrap();
    assert_eq!(orders(&world), [("Two".into(), 2), ("Epilogue".into(), 5)]);

    let err = world
        .update_chapter(ChapterId::new(), ChapterPatch::new().title("x"))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn delete_renumbers_and_clears_appearances() {
    let mut world = World::new("chapters", "");
    let one = world.add_chapter("One", None, None);
    let two = world.add_chapter("Two", None, None);
    world.add_chapter("Three", None, None);
    let ilsa = world
        .create_element(NewElement::new(ElementKind::Character, "Ilsa"))
        .unwrap();
    world.add_element_to_chapter(one, ilsa, true).unwrap();
    world.add_element_to_chapter(two, ilsa, false).unwrap();

    world.delete_chapter(one).unwrap();
    assert_eq!(orders(&world), [("Two".into(), 1), ("Three".into(), 2)]);
    assert_eq!(world.element(ilsa).unwrap().appearances, [two]);
}

#[test]
fn membership_is_idempotent_and_two_sided() {
    let mut world = World::new("chapters", "");
    let chapter = world.add_chapter("One", None, None);
    let harbor = world
        .create_element(NewElement::new(ElementKind::Location, "Harbor"))
        .unwrap();

    world.add_element_to_chapter(chapter, harbor, true).unwrap();
    world.add_element_to_chapter(chapter, harbor, true).unwrap();
    world.add_element_to_chapter(chapter, harbor, false).unwrap();

    let c = world.chapter(chapter).unwrap();
    assert_eq!(c.new_elements, [harbor]);
    assert_eq!(c.modified_elements, [harbor]);
    assert_eq!(world.element(harbor).unwrap().appearances, [chapter]);
    assert_eq!(world.element(harbor).unwrap().version, 2);

    world.remove_element_from_chapter(chapter, harbor).unwrap();
    assert!(!world.chapter(chapter).unwrap().mentions(harbor));
    assert!(world.element(harbor).unwrap().appearances.is_empty());
}
