//! Core ids, enums, attribute values, and errors for worldbible.
//!
//! This crate provides:
//! - [`ElementId`], [`ConflictId`], [`ChapterId`], [`SnapshotId`], [`RuleId`] - Opaque identifiers
//! - [`ElementKind`], [`CanonTier`], [`ConflictStatus`], [`Severity`], [`Strictness`] - Closed enums
//! - [`Attribute`] - Kind-specific attribute values and their [`AttributeType`]
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attribute;
pub mod error;
pub mod id;
pub mod types;

pub use attribute::{Attribute, AttributeType};
pub use error::{Error, ErrorContext, ErrorKind, SemanticLimit};
pub use id::{ChapterId, ConflictId, ElementId, RuleId, SnapshotId, TemplateId, WorldId};
pub use types::{CanonTier, ConflictStatus, ElementKind, Severity, Strictness};

/// Result type alias using worldbible's Error type.
pub type Result<T> = std::result::Result<T, Error>;
