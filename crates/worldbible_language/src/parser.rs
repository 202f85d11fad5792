//! Parser from tokens to [`Ast`].

use worldbible_foundation::{Error, ErrorKind, Result};

use crate::ast::Ast;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Recursive-descent parser over a [`Lexer`].
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
}

impl<'src> Parser<'src> {
    /// Creates a parser for `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parses one form.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` on malformed input.
    pub fn parse(&mut self) -> Result<Ast> {
        self.parse_form()
    }

    /// Parses every form up to end of input.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` on malformed input.
    pub fn parse_all(&mut self) -> Result<Vec<Ast>> {
        let mut forms = Vec::new();
        self.skip_trivia();
        while self.current.kind != TokenKind::Eof {
            forms.push(self.parse_form()?);
            self.skip_trivia();
        }
        Ok(forms)
    }

    fn parse_form(&mut self) -> Result<Ast> {
        self.skip_trivia();
        let span = self.current.span;
        let ast = match &self.current.kind {
            TokenKind::Nil => Ast::Nil(span),
            TokenKind::True => Ast::Bool(true, span),
            TokenKind::False => Ast::Bool(false, span),
            TokenKind::Int(n) => Ast::Int(*n, span),
            TokenKind::Float(n) => Ast::Float(*n, span),
            TokenKind::String(s) => Ast::String(s.clone(), span),
            TokenKind::Symbol(name) => Ast::Symbol(name.clone(), span),
            TokenKind::Keyword(name) => Ast::Keyword(name.clone(), span),
            TokenKind::LParen => return self.parse_seq(&TokenKind::RParen, "list", Ast::List),
            TokenKind::LBracket => {
                return self.parse_seq(&TokenKind::RBracket, "vector", Ast::Vector);
            }
            TokenKind::Eof => return Err(self.error("unexpected end of input")),
            TokenKind::Error(msg) => return Err(self.error(msg)),
            TokenKind::RParen | TokenKind::RBracket | TokenKind::Comment(_) => {
                return Err(self.error(&format!("unexpected {}", self.current.kind.name())));
            }
        };
        self.advance();
        Ok(ast)
    }

    /// Parses a delimited sequence; the opening token is current.
    fn parse_seq(
        &mut self,
        close: &TokenKind,
        what: &str,
        build: fn(Vec<Ast>, Span) -> Ast,
    ) -> Result<Ast> {
        let start = self.current.span;
        self.advance();

        let mut items = Vec::new();
        self.skip_trivia();
        while self.current.kind != *close {
            match self.current.kind {
                TokenKind::Eof => {
                    return Err(Self::error_at(start, &format!("unterminated {what}")));
                }
                TokenKind::RParen | TokenKind::RBracket => {
                    return Err(self.error(&format!(
                        "expected {}, found {}",
                        close.name(),
                        self.current.kind.name()
                    )));
                }
                _ => items.push(self.parse_form()?),
            }
            self.skip_trivia();
        }

        let end = self.current.span;
        self.advance();
        Ok(build(items, start.to(end)))
    }

    fn skip_trivia(&mut self) {
        while self.current.kind.is_trivia() {
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn error(&self, message: &str) -> Error {
        Self::error_at(self.current.span, message)
    }

    fn error_at(span: Span, message: &str) -> Error {
        Error::new(ErrorKind::ParseError {
            message: message.to_string(),
            line: span.line,
            column: span.column,
        })
    }
}

/// Parses every form in `source`.
///
/// # Errors
///
/// Returns `ParseError` on malformed input.
pub fn parse(source: &str) -> Result<Vec<Ast>> {
    Parser::new(source).parse_all()
}

/// Parses the first form in `source`.
///
/// # Errors
///
/// Returns `ParseError` on malformed input.
pub fn parse_one(source: &str) -> Result<Ast> {
    Parser::new(source).parse()
}
