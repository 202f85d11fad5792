//! Integration tests for Layer 3: Engine
//!
//! Tests for conflict detection, merge-back, world rules and graph building.

mod conflicts;
mod graph;
mod rules;
