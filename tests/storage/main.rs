//! Integration tests for Layer 1: Storage
//!
//! Tests for elements, relationships, chapters, rules and world settings.

mod chapters;
mod elements;
mod world;
