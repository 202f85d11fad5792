//! worldbible - World consistency and versioning engine
//!
//! This crate re-exports all layers of the worldbible system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: worldbible_runtime    - Documents, sessions, CLI
//! Layer 3: worldbible_engine     - Conflict detection, relationship graph
//!          worldbible_timeline   - Snapshots, retention, restore
//! Layer 2: worldbible_language   - Rule DSL: lexer, parser, compiler, interpreter
//! Layer 1: worldbible_storage    - Elements, chapters, rules, the World aggregate
//! Layer 0: worldbible_foundation - Core types (ids, enums, Attribute, Error)
//! ```

pub use worldbible_engine as engine;
pub use worldbible_foundation as foundation;
pub use worldbible_language as language;
pub use worldbible_runtime as runtime;
pub use worldbible_storage as storage;
pub use worldbible_timeline as timeline;
