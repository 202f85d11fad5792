//! Kind-specific attribute values.
//!
//! Attributes are the open part of an element: a character has an age and
//! goals, an event a date and participants. Values are scalars or ordered
//! string lists; the storage layer validates them against a per-kind schema.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    /// Boolean flag.
    Bool(bool),
    /// Integer quantity.
    Int(i64),
    /// Fractional quantity.
    Float(f64),
    /// Free text.
    Text(String),
    /// Ordered list of strings (ids or names).
    List(Vec<String>),
}

impl Attribute {
    /// Creates a text attribute.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a list attribute.
    #[must_use]
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns the type descriptor of this value.
    #[must_use]
    pub const fn attribute_type(&self) -> AttributeType {
        match self {
            Self::Bool(_) => AttributeType::Bool,
            Self::Int(_) => AttributeType::Int,
            Self::Float(_) => AttributeType::Float,
            Self::Text(_) => AttributeType::Text,
            Self::List(_) => AttributeType::List,
        }
    }

    /// Attempts to extract text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true for empty text and empty lists.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Attribute {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for Attribute {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Declared type of an attribute field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// Boolean flag.
    Bool,
    /// Integer.
    Int,
    /// Float; integers are accepted too.
    Float,
    /// Free text.
    Text,
    /// List of strings.
    List,
}

impl AttributeType {
    /// Checks whether a value of `actual` type may be stored in a field of this type.
    #[must_use]
    pub const fn accepts(self, actual: AttributeType) -> bool {
        matches!(
            (self, actual),
            (Self::Bool, Self::Bool)
                | (Self::Int | Self::Float, Self::Int)
                | (Self::Float, Self::Float)
                | (Self::Text, Self::Text)
                | (Self::List, Self::List)
        )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::List => "list",
        })
    }
}
