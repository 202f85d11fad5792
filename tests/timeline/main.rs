//! Integration tests for Layer 3: Timeline
//!
//! Tests for snapshot capture, retention and restore.

mod restore;
mod retention;
