//! Conflict detection and relationship graphs for worldbible.
//!
//! This crate provides:
//! - [`analyze_world`] / [`analyze_element`] - pairwise and rule-based conflict detection
//! - [`apply_candidates`] - merging detected conflicts into the world
//! - [`build_graph`] - bounded relationship graphs for reasoning and display
//! - [`DetectorConfig`] - analysis tuning

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod conflict;
pub mod graph;

pub use config::DetectorConfig;
pub use conflict::{
    Analysis, ConflictCandidate, MergeOutcome, RuleFailure, analyze_element, analyze_world,
    apply_candidates,
};
pub use graph::{GraphEdge, GraphNode, RelationshipGraph, build_graph, degree_map};
