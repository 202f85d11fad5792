//! Element store, relationships, chapters, rules and the World aggregate.
//!
//! This crate provides:
//! - [`WorldElement`] - Typed narrative element with relationships and conflicts
//! - [`Chapter`] - Ordered organizational unit referencing elements
//! - [`WorldRule`] - User-authored consistency rule (source text only)
//! - [`BriefTemplate`] - Outline of a brief drawn from the world's elements
//! - [`Snapshot`] - Opaque capture of a world's mutable extent
//! - [`World`] - Aggregate root owning all of the above
//!
//! Every mutation goes through [`World`], which keeps element versions,
//! timestamps and referential cleanup consistent. The snapshot list is
//! held to `maxSnapshots` by [`retention::enforce`] whenever it grows or
//! the cap shrinks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod brief;
pub mod chapter;
pub mod element;
pub mod rule;
pub mod retention;
pub mod schema;
pub mod settings;
pub mod snapshot;
pub mod world;

pub use brief::{BriefSection, BriefTemplate, BriefTemplatePatch, validate_sections};
pub use chapter::{Chapter, ChapterPatch};
pub use element::{Conflict, ElementPatch, NewElement, Relationship, WorldElement};
pub use rule::{RulePatch, WorldRule};
pub use schema::{ElementSchema, FieldSchema, schema_for, validate_attributes};
pub use settings::{CustomElementType, SettingsPatch, Theme, WorldSettings};
pub use snapshot::Snapshot;
pub use world::{World, WorldMetadata};
