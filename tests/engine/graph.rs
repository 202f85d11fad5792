//! Relationship graph tests

use std::collections::HashSet;

use proptest::prelude::*;
use worldbible_engine::{build_graph, degree_map};
use worldbible_foundation::{ElementId, ElementKind, ErrorKind};
use worldbible_storage::{NewElement, World};

/// a -> b -> c -> d, plus x -> a.
fn chain() -> (World, [ElementId; 5]) {
    let mut world = World::new("graph", "");
    let mut add = |name: &str| {
        world
            .create_element(NewElement::new(ElementKind::Location, name))
            .unwrap()
    };
    let ids = [add("a"), add("b"), add("c"), add("d"), add("x")];
    let [a, b, c, d, x] = ids;
    world.add_relationship(a, b, "road", "").unwrap();
    world.add_relationship(b, c, "road", "").unwrap();
    world.add_relationship(c, d, "road", "").unwrap();
    world.add_relationship(x, a, "road", "").unwrap();
    (world, ids)
}

#[test]
fn rooted_graph_respects_depth() {
    let (world, [a, b, c, d, x]) = chain();
    let graph = build_graph(&world, Some(a), 2).unwrap();

    let root = graph.node(a).unwrap();
    assert_eq!(root.depth, 0);
    assert!((root.weight - 20.0).abs() < f64::EPSILON);
    assert_eq!(graph.node(b).unwrap().depth, 1);
    assert!((graph.node(c).unwrap().weight - 5.0).abs() < f64::EPSILON);
    assert!(!graph.contains(d));
    assert_eq!(graph.node(x).unwrap().depth, 1);
    assert_eq!(graph.edges.len(), 3);
}

#[test]
fn unrooted_graph_covers_every_element_once() {
    let (world, ids) = chain();
    let shallow = build_graph(&world, None, 1).unwrap();
    assert_eq!(shallow.nodes.len(), ids.len());
    assert!(shallow.edges.len() <= 4);

    let graph = build_graph(&world, None, 4).unwrap();
    let seen: HashSet<ElementId> = graph.nodes.iter().map(|n| n.id).collect();
    assert_eq!(seen.len(), graph.nodes.len());
    assert_eq!(seen, ids.into_iter().collect());
    assert_eq!(graph.edges.len(), 4);

    let degrees = degree_map(&graph);
    assert_eq!(degrees[&ids[0]], 2);
    assert_eq!(degrees[&ids[3]], 1);
}

#[test]
fn invalid_requests() {
    let (world, [a, ..]) = chain();
    assert!(matches!(
        build_graph(&world, Some(a), 0).unwrap_err().kind,
        ErrorKind::InvalidArgument(_)
    ));
    assert!(build_graph(&world, Some(ElementId::new()), 3).unwrap_err().is_not_found());
}

proptest! {
    #[test]
    fn nodes_are_unique_and_edges_resolve(
        count in 1usize..15,
        edges in prop::collection::vec((any::<usize>(), any::<usize>()), 0..40),
        depth in 1u32..5,
        rooted in any::<bool>(),
    ) {
        let mut world = World::new("prop", "");
        let ids: Vec<ElementId> = (0..count)
            .map(|i| world.create_element(NewElement::new(ElementKind::Concept, format!("n{i}"))).unwrap())
            .collect();
        for (from, to) in edges {
            world.add_relationship(ids[from % count], ids[to % count], "link", "").unwrap();
        }

        let graph = build_graph(&world, rooted.then_some(ids[0]), depth).unwrap();
        let nodes: HashSet<ElementId> = graph.nodes.iter().map(|n| n.id).collect();
        prop_assert_eq!(nodes.len(), graph.nodes.len());
        for edge in &graph.edges {
            prop_assert!(world.contains(edge.target));
            prop_assert!(nodes.contains(&edge.source));
            prop_assert!(nodes.contains(&edge.target));
        }
    }
}
