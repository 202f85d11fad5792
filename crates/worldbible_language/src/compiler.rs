//! Compiler from [`Ast`] to [`Expr`].
//!
//! All name resolution happens here: special forms are recognised, builtins
//! are checked for arity, and `let`/iteration bindings are assigned slots.
//! Anything the compiler does not recognise is rejected before evaluation.

use std::collections::HashMap;

use worldbible_foundation::{Error, ErrorContext, ErrorKind, Result};

use crate::ast::Ast;
use crate::expr::{Builtin, Expr, IterMode};
use crate::parser::parse;
use crate::span::Span;
use crate::value::Value;

/// A rule ready for evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledRule {
    /// Top-level forms, evaluated in order.
    pub body: Vec<Expr>,
    /// Number of local slots the body needs.
    pub locals: u16,
}

/// Compiles rule source into a [`CompiledRule`].
#[derive(Debug, Default)]
pub struct Compiler {
    scopes: Vec<HashMap<String, u16>>,
    next_local: u16,
}

impl Compiler {
    /// Creates a compiler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and compiles `source`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for malformed syntax, `UndefinedSymbol` for
    /// unknown names, and `ArityMismatch` for wrong argument counts.
    pub fn compile(mut self, source: &str) -> Result<CompiledRule> {
        let forms = parse(source)?;
        let body = self.compile_body(&forms)?;
        Ok(CompiledRule {
            body,
            locals: self.next_local,
        })
    }

    fn compile_body(&mut self, forms: &[Ast]) -> Result<Vec<Expr>> {
        forms.iter().map(|f| self.compile_form(f)).collect()
    }

    fn compile_form(&mut self, ast: &Ast) -> Result<Expr> {
        match ast {
            Ast::Nil(_) => Ok(Expr::Literal(Value::Nil)),
            Ast::Bool(b, _) => Ok(Expr::Literal(Value::Bool(*b))),
            Ast::Int(n, _) => Ok(Expr::Literal(Value::Int(*n))),
            Ast::Float(n, _) => Ok(Expr::Literal(Value::Float(*n))),
            Ast::String(s, _) | Ast::Keyword(s, _) => Ok(Expr::Literal(Value::Str(s.clone()))),
            Ast::Symbol(name, span) => self.resolve(name, *span),
            Ast::Vector(items, _) => Ok(Expr::Vector(self.compile_body(items)?)),
            Ast::List(items, span) => self.compile_list(items, *span),
        }
    }

    fn resolve(&self, name: &str, span: Span) -> Result<Expr> {
        if name == "self" {
            return Ok(Expr::Subject);
        }
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
            .map(Expr::Local)
            .ok_or_else(|| Error::undefined_symbol(name).with_context(position(span)))
    }

    fn compile_list(&mut self, items: &[Ast], span: Span) -> Result<Expr> {
        let Some((head, args)) = items.split_first() else {
            return Err(syntax_error(span, "empty form cannot be evaluated"));
        };
        let Some(name) = head.as_symbol() else {
            return Err(Error::type_mismatch("symbol in call position", head.type_name())
                .with_context(position(head.span())));
        };

        match name {
            "if" => {
                check_arity(name, "2..3", args.len(), (2..=3).contains(&args.len()), span)?;
                let cond = self.compile_form(&args[0])?;
                let then = self.compile_form(&args[1])?;
                let otherwise = match args.get(2) {
                    Some(form) => self.compile_form(form)?,
                    None => Expr::Literal(Value::Nil),
                };
                Ok(Expr::If(Box::new(cond), Box::new(then), Box::new(otherwise)))
            }
            "when" => {
                check_arity(name, "at least 1", args.len(), !args.is_empty(), span)?;
                let cond = self.compile_form(&args[0])?;
                let body = self.compile_body(&args[1..])?;
                Ok(Expr::When(Box::new(cond), body))
            }
            "and" => Ok(Expr::And(self.compile_body(args)?)),
            "or" => Ok(Expr::Or(self.compile_body(args)?)),
            "not" => {
                check_arity(name, "1", args.len(), args.len() == 1, span)?;
                Ok(Expr::Not(Box::new(self.compile_form(&args[0])?)))
            }
            "do" => Ok(Expr::Do(self.compile_body(args)?)),
            "let" => self.compile_let(args, span),
            "report" => {
                check_arity(name, "1..2", args.len(), (1..=2).contains(&args.len()), span)?;
                let (target, message) = if args.len() == 2 {
                    (Some(Box::new(self.compile_form(&args[0])?)), &args[1])
                } else {
                    (None, &args[0])
                };
                Ok(Expr::Report {
                    target,
                    message: Box::new(self.compile_form(message)?),
                })
            }
            _ => {
                if let Some(mode) = IterMode::from_name(name) {
                    return self.compile_iterate(name, mode, args, span);
                }
                let Some(builtin) = Builtin::from_name(name) else {
                    return Err(Error::undefined_symbol(name).with_context(position(head.span())));
                };
                if !builtin.accepts(args.len()) {
                    return Err(Error::arity_mismatch(name, builtin.arity_text(), args.len())
                        .with_context(position(span)));
                }
                Ok(Expr::Call(builtin, self.compile_body(args)?))
            }
        }
    }

    fn compile_let(&mut self, args: &[Ast], span: Span) -> Result<Expr> {
        let Some(bindings) = args.first().and_then(Ast::as_vector) else {
            return Err(syntax_error(span, "let requires a binding vector"));
        };
        if bindings.len() % 2 != 0 {
            return Err(syntax_error(span, "let bindings must come in name/value pairs"));
        }

        self.scopes.push(HashMap::new());
        let result = self.compile_let_scope(bindings, &args[1..]);
        self.scopes.pop();
        result
    }

    /// Compiles bindings and body; the caller owns the scope push/pop.
    fn compile_let_scope(&mut self, bindings: &[Ast], body: &[Ast]) -> Result<Expr> {
        let mut compiled = Vec::with_capacity(bindings.len() / 2);
        for pair in bindings.chunks_exact(2) {
            let value = self.compile_form(&pair[1])?;
            let slot = self.bind(&pair[0])?;
            compiled.push((slot, value));
        }
        let body = self.compile_body(body)?;
        Ok(Expr::Let(compiled, body))
    }

    fn compile_iterate(
        &mut self,
        name: &str,
        mode: IterMode,
        args: &[Ast],
        span: Span,
    ) -> Result<Expr> {
        let binding = args.first().and_then(Ast::as_vector);
        let Some([var, coll]) = binding else {
            return Err(syntax_error(
                span,
                &format!("{name} requires a binding vector [name collection]"),
            ));
        };

        let collection = self.compile_form(coll)?;
        self.scopes.push(HashMap::new());
        let result = self.bind(var).and_then(|slot| {
            let body = self.compile_body(&args[1..])?;
            Ok(Expr::Iterate {
                mode,
                slot,
                collection: Box::new(collection),
                body,
            })
        });
        self.scopes.pop();
        result
    }

    /// Allocates a slot for a binding name in the innermost scope.
    fn bind(&mut self, name: &Ast) -> Result<u16> {
        let Some(symbol) = name.as_symbol() else {
            return Err(syntax_error(
                name.span(),
                &format!("binding name must be a symbol, got {}", name.type_name()),
            ));
        };
        if symbol == "self" {
            return Err(syntax_error(name.span(), "cannot rebind self"));
        }
        let slot = self.next_local;
        self.next_local = self
            .next_local
            .checked_add(1)
            .ok_or_else(|| syntax_error(name.span(), "too many bindings in one rule"))?;
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(symbol.to_string(), slot);
        }
        Ok(slot)
    }
}

/// Compiles `source` with a fresh [`Compiler`].
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn compile(source: &str) -> Result<CompiledRule> {
    Compiler::new().compile(source)
}

fn position(span: Span) -> ErrorContext {
    ErrorContext::new().with_position(span.line as usize, span.column as usize)
}

fn syntax_error(span: Span, message: &str) -> Error {
    Error::new(ErrorKind::ParseError {
        message: message.to_string(),
        line: span.line,
        column: span.column,
    })
}

fn check_arity(name: &str, expected: &str, actual: usize, ok: bool, span: Span) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::arity_mismatch(name, expected, actual).with_context(position(span)))
    }
}
