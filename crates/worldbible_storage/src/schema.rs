//! Per-kind attribute schemas.
//!
//! Each element kind declares the attribute keys it understands and their
//! types. Writes carrying unknown keys or values of the wrong type are
//! rejected before any state changes.

use std::collections::BTreeMap;

use worldbible_foundation::{Attribute, AttributeType, ElementKind, Error, Result};

/// Schema for a single attribute field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSchema {
    /// Attribute key (camelCase).
    pub name: &'static str,
    /// Accepted value type.
    pub ty: AttributeType,
}

impl FieldSchema {
    const fn new(name: &'static str, ty: AttributeType) -> Self {
        Self { name, ty }
    }
}

/// The attribute schema of one element kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementSchema {
    /// Kind this schema applies to.
    pub kind: ElementKind,
    /// Declared fields.
    pub fields: &'static [FieldSchema],
}

impl ElementSchema {
    /// Returns the field schema by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

use AttributeType::{Int, List, Text};

const CHARACTER: &[FieldSchema] = &[
    FieldSchema::new("age", Int),
    FieldSchema::new("gender", Text),
    FieldSchema::new("occupation", Text),
    FieldSchema::new("origin", Text),
    FieldSchema::new("abilities", List),
    FieldSchema::new("goals", List),
    FieldSchema::new("personality", Text),
    FieldSchema::new("appearance", Text),
];

const TECHNOLOGY: &[FieldSchema] = &[
    FieldSchema::new("inventor", Text),
    FieldSchema::new("creationDate", Text),
    FieldSchema::new("techLevel", Text),
    FieldSchema::new("materials", List),
    FieldSchema::new("limitations", List),
    FieldSchema::new("applications", List),
];

const LOCATION: &[FieldSchema] = &[
    FieldSchema::new("coordinates", Text),
    FieldSchema::new("climate", Text),
    FieldSchema::new("population", Int),
    FieldSchema::new("governmentType", Text),
    FieldSchema::new("keyFeatures", List),
    FieldSchema::new("history", Text),
];

const EVENT: &[FieldSchema] = &[
    FieldSchema::new("date", Text),
    FieldSchema::new("duration", Text),
    FieldSchema::new("participants", List),
    FieldSchema::new("causes", List),
    FieldSchema::new("consequences", List),
    FieldSchema::new("significance", Text),
];

const CONCEPT: &[FieldSchema] = &[
    FieldSchema::new("domain", Text),
    FieldSchema::new("originators", List),
    FieldSchema::new("development", Text),
    FieldSchema::new("applications", List),
    FieldSchema::new("implications", List),
];

const SOCIAL: &[FieldSchema] = &[
    FieldSchema::new("hierarchy", List),
    FieldSchema::new("roles", List),
    FieldSchema::new("interactions", List),
    FieldSchema::new("evolution", Text),
    FieldSchema::new("significance", Text),
];

const RULE: &[FieldSchema] = &[
    FieldSchema::new("scope", Text),
    FieldSchema::new("exceptions", List),
    FieldSchema::new("implications", List),
    FieldSchema::new("enforcement", Text),
];

/// Returns the attribute schema for an element kind.
#[must_use]
pub const fn schema_for(kind: ElementKind) -> ElementSchema {
    let fields = match kind {
        ElementKind::Character => CHARACTER,
        ElementKind::Technology => TECHNOLOGY,
        ElementKind::Location => LOCATION,
        ElementKind::Event => EVENT,
        ElementKind::Concept => CONCEPT,
        ElementKind::Social => SOCIAL,
        ElementKind::Rule => RULE,
    };
    ElementSchema { kind, fields }
}

/// Validates an attribute map against the schema of `kind`.
///
/// # Errors
///
/// Returns `SchemaViolation` for the first unknown key or mistyped value.
pub fn validate_attributes(kind: ElementKind, attributes: &BTreeMap<String, Attribute>) -> Result<()> {
    let schema = schema_for(kind);
    for (key, value) in attributes {
        let Some(field) = schema.field(key) else {
            return Err(Error::schema_violation(kind.as_str(), key, "unknown attribute"));
        };
        let actual = value.attribute_type();
        if !field.ty.accepts(actual) {
            return Err(Error::schema_violation(
                kind.as_str(),
                key,
                format!("expected {}, got {actual}", field.ty),
            ));
        }
    }
    Ok(())
}
