//! Rule language for worldbible.
//!
//! World rules are written as s-expressions and compiled into a restricted
//! expression tree before they ever run. The interpreter only knows a fixed
//! set of special forms and builtins, reads the world through
//! [`RuleContext`], and reports contradictions through an explicit sink.
//!
//! - [`Lexer`] / [`Parser`] - source text to [`Ast`]
//! - [`Compiler`] - [`Ast`] to [`CompiledRule`]
//! - [`Interpreter`] - evaluates a [`CompiledRule`] against one element
//!
//! ```text
//! (each [r (relationships self)]
//!   (when (nil? (target r))
//!     (report (str (name self) " points at a deleted element"))))
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod compiler;
pub mod context;
pub mod expr;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;
pub mod value;

pub use ast::Ast;
pub use compiler::{CompiledRule, Compiler, compile};
pub use context::RuleContext;
pub use expr::{Builtin, Expr, IterMode};
pub use interpreter::{EvalLimits, Interpreter, Report, evaluate};
pub use lexer::Lexer;
pub use parser::{Parser, parse, parse_one};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use value::{RelationshipValue, Value};
