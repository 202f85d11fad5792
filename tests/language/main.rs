//! Integration tests for Layer 2: Language
//!
//! Tests for rule compilation and evaluation against real worlds.

mod compile;
mod evaluate;
