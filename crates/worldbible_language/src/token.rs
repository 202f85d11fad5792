//! Tokens produced by the [`Lexer`](crate::Lexer).

use crate::span::Span;

/// A token with its position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What was scanned.
    pub kind: TokenKind,
    /// Where it was scanned.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token types of the rule language.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `nil`
    Nil,
    /// `true`
    True,
    /// `false`
    False,
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal with escapes resolved.
    String(String),
    /// Symbol such as `name` or `has-tag?`.
    Symbol(String),
    /// Keyword such as `:age`, used as an attribute key.
    Keyword(String),
    /// `;` comment up to end of line.
    Comment(String),
    /// End of input.
    Eof,
    /// Lexical error.
    Error(String),
}

impl TokenKind {
    /// Returns true for tokens the parser skips.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Human-readable name for error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Nil => "nil",
            Self::True => "true",
            Self::False => "false",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Keyword(_) => "keyword",
            Self::Comment(_) => "comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
