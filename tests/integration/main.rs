//! Cross-layer integration tests for worldbible
//!
//! Tests that verify correct interaction between multiple crates.

mod documents;
mod workflow;
