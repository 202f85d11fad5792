//! Runtime values of the rule language.

use std::fmt;

use worldbible_foundation::{Attribute, ElementId};
use worldbible_storage::Relationship;

/// A relationship seen from rule code, with its owning element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipValue {
    /// Element that owns the relationship.
    pub source: ElementId,
    /// Element the relationship points at (may be dangling).
    pub target: ElementId,
    /// Relationship label.
    pub rel_type: String,
    /// Description, possibly empty.
    pub description: String,
}

impl RelationshipValue {
    /// Wraps a stored relationship.
    #[must_use]
    pub fn from_stored(source: ElementId, rel: &Relationship) -> Self {
        Self {
            source,
            target: rel.target_id,
            rel_type: rel.rel_type.clone(),
            description: rel.description.clone(),
        }
    }
}

/// A rule-language value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Absence.
    Nil,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    Str(String),
    /// Ordered collection.
    List(Vec<Value>),
    /// Reference to an element by id.
    Element(ElementId),
    /// A relationship.
    Relationship(Box<RelationshipValue>),
}

impl Value {
    /// Returns true unless the value is `nil` or `false`.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// Type name used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Element(_) => "element",
            Self::Relationship(_) => "relationship",
        }
    }

    /// Returns the numeric value as f64.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Equality used by `=`: numbers compare across int and float.
    #[must_use]
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            _ => self == other,
        }
    }
}

impl From<&Attribute> for Value {
    fn from(attr: &Attribute) -> Self {
        match attr {
            Attribute::Bool(b) => Self::Bool(*b),
            Attribute::Int(n) => Self::Int(*n),
            Attribute::Float(n) => Self::Float(*n),
            Attribute::Text(s) => Self::Str(s.clone()),
            Attribute::List(items) => Self::List(items.iter().cloned().map(Self::Str).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Display form used by `str` and `report`; `nil` displays as empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Element(id) => write!(f, "{id}"),
            Self::Relationship(rel) => write!(f, "{} -> {}", rel.rel_type, rel.target),
        }
    }
}
