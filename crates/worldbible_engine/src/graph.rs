//! Relationship graph building.
//!
//! Breadth-first expansion from a root element, or from every element in id
//! order when no root is given. Each element becomes a node at most once, at
//! the first depth it is reached. Only nodes shallower than the requested
//! depth are expanded. The root additionally pulls in elements that point at
//! it, so "who references me" shows up next to "who I reference".

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;
use worldbible_foundation::{CanonTier, ElementId, ElementKind, Error, Result};
use worldbible_storage::{World, WorldElement};

/// Display weight of a root node.
const ROOT_WEIGHT: f64 = 20.0;

/// Display weight numerator for non-root nodes; divided by depth.
const DEPTH_WEIGHT: f64 = 10.0;

/// A graph node.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    /// Element id.
    pub id: ElementId,
    /// Element name.
    pub name: String,
    /// Element kind.
    pub kind: ElementKind,
    /// Element canon tier.
    pub tier: CanonTier,
    /// Hops from the nearest expansion start.
    pub depth: u32,
    /// Display weight, shrinking with depth.
    pub weight: f64,
}

/// A directed graph edge, mirroring one stored relationship.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    /// Element owning the relationship.
    pub source: ElementId,
    /// Relationship target.
    pub target: ElementId,
    /// Relationship label.
    pub rel_type: String,
    /// Relationship description.
    pub description: String,
}

/// Nodes and edges of a relationship graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationshipGraph {
    /// Nodes in visit order.
    pub nodes: Vec<GraphNode>,
    /// Edges in discovery order.
    pub edges: Vec<GraphEdge>,
}

impl RelationshipGraph {
    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: ElementId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns true if the element is a node.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    /// Edges leaving `id`.
    pub fn edges_from(&self, id: ElementId) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges.iter().filter(move |e| e.source == id)
    }
}

/// Builds a relationship graph.
///
/// # Errors
///
/// Returns `InvalidArgument` if `depth` is 0 and `NotFound` if `root` is
/// given but absent.
pub fn build_graph(world: &World, root: Option<ElementId>, depth: u32) -> Result<RelationshipGraph> {
    if depth == 0 {
        return Err(Error::invalid_argument("graph depth must be at least 1"));
    }

    let mut builder = Builder::new(world, depth);
    match root {
        Some(id) => {
            let element = world.get_element(id)?;
            builder.expand_from(element, true);
        }
        None => {
            for element in world.elements() {
                if !builder.visited.contains(&element.id) {
                    builder.expand_from(element, false);
                }
            }
        }
    }

    let graph = builder.graph;
    debug!(
        root = ?root,
        depth,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "graph built"
    );
    Ok(graph)
}

struct Builder<'w> {
    world: &'w World,
    max_depth: u32,
    visited: HashSet<ElementId>,
    /// `(source, relationship index)` pairs already emitted.
    emitted: HashSet<(ElementId, usize)>,
    graph: RelationshipGraph,
}

impl<'w> Builder<'w> {
    fn new(world: &'w World, max_depth: u32) -> Self {
        Self {
            world,
            max_depth,
            visited: HashSet::new(),
            emitted: HashSet::new(),
            graph: RelationshipGraph::default(),
        }
    }

    fn expand_from(&mut self, start: &'w WorldElement, with_incoming: bool) {
        let mut queue = VecDeque::new();
        self.visit(start, 0, &mut queue);

        if with_incoming {
            let incoming = self.incoming_indexed(start.id);
            for (source, index) in incoming {
                self.emit(source, index);
                self.visit(source, 1, &mut queue);
            }
        }

        while let Some((element, depth)) = queue.pop_front() {
            if depth >= self.max_depth {
                continue;
            }
            for (index, rel) in element.relationships.iter().enumerate() {
                let Some(target) = self.world.element(rel.target_id) else {
                    continue;
                };
                self.emit(element, index);
                self.visit(target, depth + 1, &mut queue);
            }
        }
    }

    /// Relationships pointing at `target`, with their index on the source.
    fn incoming_indexed(&self, target: ElementId) -> Vec<(&'w WorldElement, usize)> {
        self.world
            .elements()
            .filter(|e| e.id != target)
            .flat_map(|e| {
                e.relationships
                    .iter()
                    .enumerate()
                    .filter(move |(_, r)| r.target_id == target)
                    .map(move |(i, _)| (e, i))
            })
            .collect()
    }

    fn visit(
        &mut self,
        element: &'w WorldElement,
        depth: u32,
        queue: &mut VecDeque<(&'w WorldElement, u32)>,
    ) {
        if !self.visited.insert(element.id) {
            return;
        }
        let weight = if depth == 0 {
            ROOT_WEIGHT
        } else {
            DEPTH_WEIGHT / f64::from(depth)
        };
        self.graph.nodes.push(GraphNode {
            id: element.id,
            name: element.name.clone(),
            kind: element.kind,
            tier: element.canon_tier,
            depth,
            weight,
        });
        queue.push_back((element, depth));
    }

    fn emit(&mut self, source: &WorldElement, index: usize) {
        if !self.emitted.insert((source.id, index)) {
            return;
        }
        if let Some(rel) = source.relationships.get(index) {
            self.graph.edges.push(GraphEdge {
                source: source.id,
                target: rel.target_id,
                rel_type: rel.rel_type.clone(),
                description: rel.description.clone(),
            });
        }
    }
}

/// Counts edges per node, for callers sizing a layout.
#[must_use]
pub fn degree_map(graph: &RelationshipGraph) -> HashMap<ElementId, usize> {
    let mut degrees: HashMap<ElementId, usize> = graph.nodes.iter().map(|n| (n.id, 0)).collect();
    for edge in &graph.edges {
        *degrees.entry(edge.source).or_default() += 1;
        *degrees.entry(edge.target).or_default() += 1;
    }
    degrees
}
