//! Lexer for rule source text.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Converts rule source into tokens.
pub struct Lexer<'src> {
    source: &'src str,
    rest: &'src str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans the next token. Returns `Eof` forever once input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
            );
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ';' => self.scan_comment(),
            ':' => self.scan_keyword(),
            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            '-' | '+' if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number()
            }
            c if is_symbol_start(c) => self.scan_symbol(),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
        )
    }

    /// Tokenizes the whole source, comments included, ending with `Eof`.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        // Commas are whitespace.
        while self.peek_char().is_some_and(|c| c.is_whitespace() || c == ',') {
            self.advance();
        }
    }

    fn scan_comment(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        TokenKind::Comment(text)
    }

    fn scan_keyword(&mut self) -> TokenKind {
        self.advance();
        let name = self.scan_symbol_text();
        if name.is_empty() {
            TokenKind::Error("expected keyword name after ':'".into())
        } else {
            TokenKind::Keyword(name)
        }
    }

    fn scan_string(&mut self) -> TokenKind {
        self.advance();
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return TokenKind::String(text);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(c) => return TokenKind::Error(format!("invalid escape sequence: \\{c}")),
                        None => return TokenKind::Error("unterminated string literal".into()),
                    };
                    self.advance();
                    text.push(escaped);
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => return TokenKind::Error("unterminated string literal".into()),
            }
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;
        let mut has_dot = false;

        if matches!(self.peek_char(), Some('-' | '+')) {
            self.advance();
        }
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !has_dot && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
            {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.position];
        if has_dot {
            text.parse::<f64>()
                .map_or_else(|e| TokenKind::Error(format!("invalid float: {e}")), TokenKind::Float)
        } else {
            text.parse::<i64>()
                .map_or_else(|e| TokenKind::Error(format!("invalid integer: {e}")), TokenKind::Int)
        }
    }

    fn scan_symbol(&mut self) -> TokenKind {
        let name = self.scan_symbol_text();
        match name.as_str() {
            "nil" => TokenKind::Nil,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Symbol(name),
        }
    }

    fn scan_symbol_text(&mut self) -> String {
        let start = self.position;
        while self.peek_char().is_some_and(is_symbol_char) {
            self.advance();
        }
        self.source[start..self.position].to_string()
    }
}

fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '_' | '+' | '-' | '*' | '/' | '!' | '?' | '<' | '>' | '=')
}

fn is_symbol_char(c: char) -> bool {
    is_symbol_start(c) || c.is_ascii_digit() || c == '.'
}
