//! Syntax tree of rule source.

use crate::span::Span;

/// A parsed form.
#[derive(Clone, Debug, PartialEq)]
pub enum Ast {
    /// `nil`
    Nil(Span),
    /// `true` or `false`
    Bool(bool, Span),
    /// Integer literal.
    Int(i64, Span),
    /// Float literal.
    Float(f64, Span),
    /// String literal.
    String(String, Span),
    /// Symbol.
    Symbol(String, Span),
    /// Keyword (`:age`).
    Keyword(String, Span),
    /// `( ... )`
    List(Vec<Ast>, Span),
    /// `[ ... ]`
    Vector(Vec<Ast>, Span),
}

impl Ast {
    /// Returns the source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Nil(s)
            | Self::Bool(_, s)
            | Self::Int(_, s)
            | Self::Float(_, s)
            | Self::String(_, s)
            | Self::Symbol(_, s)
            | Self::Keyword(_, s)
            | Self::List(_, s)
            | Self::Vector(_, s) => *s,
        }
    }

    /// Returns the symbol name, if this is a symbol.
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name, _) => Some(name),
            _ => None,
        }
    }

    /// Returns the items of a list form.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Ast]> {
        match self {
            Self::List(items, _) => Some(items),
            _ => None,
        }
    }

    /// Returns the items of a vector form.
    #[must_use]
    pub fn as_vector(&self) -> Option<&[Ast]> {
        match self {
            Self::Vector(items, _) => Some(items),
            _ => None,
        }
    }

    /// Human-readable node type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil(_) => "nil",
            Self::Bool(..) => "bool",
            Self::Int(..) => "int",
            Self::Float(..) => "float",
            Self::String(..) => "string",
            Self::Symbol(..) => "symbol",
            Self::Keyword(..) => "keyword",
            Self::List(..) => "list",
            Self::Vector(..) => "vector",
        }
    }
}
