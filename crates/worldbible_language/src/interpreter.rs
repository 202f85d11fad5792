//! Step-bounded interpreter for compiled rules.
//!
//! One [`Interpreter`] evaluates one rule against one element. Every
//! expression evaluated costs a step; exceeding [`EvalLimits::max_steps`]
//! aborts with `LimitExceeded`, so evaluation always terminates.

#![allow(clippy::cast_precision_loss)]

use std::cmp::Ordering;

use worldbible_foundation::{
    ElementId, ElementKind, Error, Result, SemanticLimit,
};
use worldbible_storage::WorldElement;

use crate::compiler::CompiledRule;
use crate::context::RuleContext;
use crate::expr::{Builtin, Expr, IterMode};
use crate::value::{RelationshipValue, Value};

/// Default step budget per rule and element.
pub const DEFAULT_MAX_STEPS: u64 = 100_000;

/// Default cap on reports per rule and element.
pub const DEFAULT_MAX_REPORTS: usize = 1_000;

/// Resource limits for one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalLimits {
    /// Maximum expressions evaluated.
    pub max_steps: u64,
    /// Maximum reports emitted.
    pub max_reports: usize,
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_reports: DEFAULT_MAX_REPORTS,
        }
    }
}

/// A contradiction reported by a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// The other side of the contradiction.
    pub target: ElementId,
    /// What the rule said.
    pub message: String,
}

/// Evaluates one compiled rule against one element.
pub struct Interpreter<'a, C: RuleContext + ?Sized> {
    ctx: &'a C,
    subject: ElementId,
    limits: EvalLimits,
    locals: Vec<Value>,
    reports: Vec<Report>,
    steps: u64,
}

impl<'a, C: RuleContext + ?Sized> Interpreter<'a, C> {
    /// Creates an interpreter for `subject`.
    #[must_use]
    pub fn new(ctx: &'a C, subject: ElementId, limits: EvalLimits) -> Self {
        Self {
            ctx,
            subject,
            limits,
            locals: Vec::new(),
            reports: Vec::new(),
            steps: 0,
        }
    }

    /// Steps consumed so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Runs the rule and returns its reports.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch`, `InvalidArgument` or `LimitExceeded`. Reports
    /// made before the failure are discarded.
    pub fn run(mut self, rule: &CompiledRule) -> Result<Vec<Report>> {
        self.locals = vec![Value::Nil; usize::from(rule.locals)];
        self.eval_body(&rule.body)?;
        Ok(self.reports)
    }

    fn step(&mut self) -> Result<()> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(Error::limit_exceeded(SemanticLimit::MaxSteps {
                limit: self.limits.max_steps,
            }));
        }
        Ok(())
    }

    fn eval_body(&mut self, body: &[Expr]) -> Result<Value> {
        let mut last = Value::Nil;
        for expr in body {
            last = self.eval(expr)?;
        }
        Ok(last)
    }

    fn set_local(&mut self, slot: u16, value: Value) {
        if let Some(cell) = self.locals.get_mut(usize::from(slot)) {
            *cell = value;
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value> {
        self.step()?;
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Subject => Ok(Value::Element(self.subject)),
            Expr::Local(slot) => Ok(self
                .locals
                .get(usize::from(*slot))
                .cloned()
                .unwrap_or(Value::Nil)),
            Expr::Vector(items) => {
                let values = items
                    .iter()
                    .map(|e| self.eval(e))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(values))
            }
            Expr::If(cond, then, otherwise) => {
                if self.eval(cond)?.is_truthy() {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::When(cond, body) => {
                if self.eval(cond)?.is_truthy() {
                    self.eval_body(body)
                } else {
                    Ok(Value::Nil)
                }
            }
            Expr::And(items) => {
                let mut last = Value::Bool(true);
                for item in items {
                    last = self.eval(item)?;
                    if !last.is_truthy() {
                        break;
                    }
                }
                Ok(last)
            }
            Expr::Or(items) => {
                for item in items {
                    let v = self.eval(item)?;
                    if v.is_truthy() {
                        return Ok(v);
                    }
                }
                Ok(Value::Nil)
            }
            Expr::Not(inner) => Ok(Value::Bool(!self.eval(inner)?.is_truthy())),
            Expr::Let(bindings, body) => {
                for (slot, value) in bindings {
                    let v = self.eval(value)?;
                    self.set_local(*slot, v);
                }
                self.eval_body(body)
            }
            Expr::Do(body) => self.eval_body(body),
            Expr::Iterate {
                mode,
                slot,
                collection,
                body,
            } => self.eval_iterate(*mode, *slot, collection, body),
            Expr::Report { target, message } => {
                let target = match target {
                    None => self.subject,
                    Some(e) => match self.eval(e)? {
                        Value::Element(id) => id,
                        other => {
                            return Err(push_frame(
                                Error::type_mismatch("element", other.type_name()),
                                "report",
                            ));
                        }
                    },
                };
                let message = self.eval(message)?.to_string();
                if self.reports.len() >= self.limits.max_reports {
                    return Err(Error::limit_exceeded(SemanticLimit::MaxReports {
                        limit: self.limits.max_reports,
                    }));
                }
                self.reports.push(Report { target, message });
                Ok(Value::Nil)
            }
            Expr::Call(builtin, args) => {
                let values = args
                    .iter()
                    .map(|e| self.eval(e))
                    .collect::<Result<Vec<_>>>()?;
                self.call(*builtin, &values)
                    .map_err(|e| push_frame(e, builtin.name()))
            }
        }
    }

    fn eval_iterate(
        &mut self,
        mode: IterMode,
        slot: u16,
        collection: &Expr,
        body: &[Expr],
    ) -> Result<Value> {
        let items = match self.eval(collection)? {
            Value::List(items) => items,
            Value::Nil => Vec::new(),
            other => return Err(Error::type_mismatch("list", other.type_name())),
        };

        let mut kept = Vec::new();
        for item in items {
            self.set_local(slot, item.clone());
            let truthy = self.eval_body(body)?.is_truthy();
            match mode {
                IterMode::Each => {}
                IterMode::Filter => {
                    if truthy {
                        kept.push(item);
                    }
                }
                IterMode::Any if truthy => return Ok(Value::Bool(true)),
                IterMode::All if !truthy => return Ok(Value::Bool(false)),
                IterMode::Any | IterMode::All => {}
            }
        }

        Ok(match mode {
            IterMode::Each => Value::Nil,
            IterMode::Filter => Value::List(kept),
            IterMode::Any => Value::Bool(false),
            IterMode::All => Value::Bool(true),
        })
    }

    // =========================================================================
    // Builtins
    // =========================================================================

    fn call(&self, builtin: Builtin, args: &[Value]) -> Result<Value> {
        use Builtin as B;

        let ctx = self.ctx;
        match builtin {
            B::Eq => Ok(Value::Bool(args.windows(2).all(|w| w[0].loose_eq(&w[1])))),
            B::NotEq => Ok(Value::Bool(!args[0].loose_eq(&args[1]))),
            B::Lt | B::Gt | B::Le | B::Ge => compare(builtin, &args[0], &args[1]),
            B::Add | B::Sub | B::Mul => arithmetic(builtin, args),
            B::Count => {
                let n = match &args[0] {
                    Value::Nil => 0,
                    Value::Str(s) => s.chars().count(),
                    Value::List(items) => items.len(),
                    other => return Err(Error::type_mismatch("collection", other.type_name())),
                };
                Ok(Value::Int(i64::try_from(n).unwrap_or(i64::MAX)))
            }
            B::IsEmpty => match &args[0] {
                Value::Nil => Ok(Value::Bool(true)),
                Value::Str(s) => Ok(Value::Bool(s.is_empty())),
                Value::List(items) => Ok(Value::Bool(items.is_empty())),
                other => Err(Error::type_mismatch("collection", other.type_name())),
            },
            B::IsNil => Ok(Value::Bool(matches!(args[0], Value::Nil))),
            B::Contains => match (&args[0], &args[1]) {
                (Value::Nil, _) => Ok(Value::Bool(false)),
                (Value::List(items), needle) => {
                    Ok(Value::Bool(items.iter().any(|v| v.loose_eq(needle))))
                }
                (Value::Str(s), Value::Str(needle)) => Ok(Value::Bool(s.contains(needle.as_str()))),
                (other, _) => Err(Error::type_mismatch("collection", other.type_name())),
            },
            B::Str => Ok(Value::Str(args.iter().map(ToString::to_string).collect())),
            B::Lower => match &args[0] {
                Value::Nil => Ok(Value::Nil),
                Value::Str(s) => Ok(Value::Str(s.to_lowercase())),
                other => Err(Error::type_mismatch("string", other.type_name())),
            },
            B::Includes => {
                let Value::Str(needle) = &args[1] else {
                    return Err(Error::type_mismatch("string", args[1].type_name()));
                };
                let needle = needle.to_lowercase();
                let found = match &args[0] {
                    Value::Nil => false,
                    Value::Str(s) => s.to_lowercase().contains(&needle),
                    Value::List(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|s| s.to_lowercase().contains(&needle)),
                    other => return Err(Error::type_mismatch("string", other.type_name())),
                };
                Ok(Value::Bool(found))
            }
            B::Id => match &args[0] {
                Value::Nil => Ok(Value::Nil),
                Value::Element(id) => Ok(Value::Str(id.to_string())),
                other => Err(Error::type_mismatch("element", other.type_name())),
            },
            B::Name => element_field(ctx, &args[0], |e| Value::Str(e.name.clone())),
            B::Kind => element_field(ctx, &args[0], |e| Value::from(e.kind.as_str())),
            B::Tier => element_field(ctx, &args[0], |e| Value::from(e.canon_tier.as_str())),
            B::Description => element_field(ctx, &args[0], |e| Value::Str(e.description.clone())),
            B::Notes => element_field(ctx, &args[0], |e| Value::Str(e.notes.clone())),
            B::Attr => {
                let Value::Str(key) = &args[1] else {
                    return Err(Error::type_mismatch("string", args[1].type_name()));
                };
                element_field(ctx, &args[0], |e| e.attribute(key).map_or(Value::Nil, Value::from))
            }
            B::Tags => element_field(ctx, &args[0], |e| {
                Value::List(e.tags.iter().map(|t| Value::Str(t.clone())).collect())
            }),
            B::Appearances => element_field(ctx, &args[0], |e| {
                Value::List(e.appearances.iter().map(|c| Value::Str(c.to_string())).collect())
            }),
            B::Relationships => element_field(ctx, &args[0], |e| {
                Value::List(
                    e.relationships
                        .iter()
                        .map(|r| Value::Relationship(Box::new(RelationshipValue::from_stored(e.id, r))))
                        .collect(),
                )
            }),
            B::HasTag => {
                let Value::Str(tag) = &args[1] else {
                    return Err(Error::type_mismatch("string", args[1].type_name()));
                };
                let has = element_arg(ctx, &args[0])?.is_some_and(|e| e.tags.contains(tag));
                Ok(Value::Bool(has))
            }
            B::Target => match &args[0] {
                Value::Nil => Ok(Value::Nil),
                Value::Relationship(rel) => Ok(existing(ctx, rel.target)),
                other => Err(Error::type_mismatch("relationship", other.type_name())),
            },
            B::RelType => relationship_field(&args[0], |r| Value::Str(r.rel_type.clone())),
            B::RelDescription => {
                relationship_field(&args[0], |r| Value::Str(r.description.clone()))
            }
            B::Element => match &args[0] {
                Value::Nil => Ok(Value::Nil),
                Value::Element(id) => Ok(existing(ctx, *id)),
                Value::Str(s) => Ok(s.parse::<ElementId>().map_or(Value::Nil, |id| existing(ctx, id))),
                other => Err(Error::type_mismatch("element id", other.type_name())),
            },
            B::Elements => Ok(Value::List(
                ctx.element_ids().into_iter().map(Value::Element).collect(),
            )),
            B::ElementsOf => {
                let Value::Str(kind) = &args[0] else {
                    return Err(Error::type_mismatch("string", args[0].type_name()));
                };
                let kind: ElementKind = kind.parse()?;
                Ok(Value::List(
                    ctx.element_ids_of_kind(kind)
                        .into_iter()
                        .map(Value::Element)
                        .collect(),
                ))
            }
        }
    }
}

/// Evaluates `rule` against `subject` with the given limits.
///
/// # Errors
///
/// See [`Interpreter::run`].
pub fn evaluate<C: RuleContext + ?Sized>(
    rule: &CompiledRule,
    ctx: &C,
    subject: ElementId,
    limits: EvalLimits,
) -> Result<Vec<Report>> {
    Interpreter::new(ctx, subject, limits).run(rule)
}

/// Records `frame` on the error's evaluation stack, innermost first.
fn push_frame(mut err: Error, frame: &str) -> Error {
    let context = err.context.take().unwrap_or_default().with_frame(frame);
    err.with_context(context)
}

fn existing<C: RuleContext + ?Sized>(ctx: &C, id: ElementId) -> Value {
    if ctx.element(id).is_some() {
        Value::Element(id)
    } else {
        Value::Nil
    }
}

/// Resolves an element argument. `nil` and deleted elements resolve to `None`.
fn element_arg<'c, C: RuleContext + ?Sized>(
    ctx: &'c C,
    value: &Value,
) -> Result<Option<&'c WorldElement>> {
    match value {
        Value::Nil => Ok(None),
        Value::Element(id) => Ok(ctx.element(*id)),
        other => Err(Error::type_mismatch("element", other.type_name())),
    }
}

fn element_field<C: RuleContext + ?Sized>(
    ctx: &C,
    value: &Value,
    f: impl FnOnce(&WorldElement) -> Value,
) -> Result<Value> {
    Ok(element_arg(ctx, value)?.map_or(Value::Nil, f))
}

fn relationship_field(
    value: &Value,
    f: impl FnOnce(&RelationshipValue) -> Value,
) -> Result<Value> {
    match value {
        Value::Nil => Ok(Value::Nil),
        Value::Relationship(rel) => Ok(f(rel)),
        other => Err(Error::type_mismatch("relationship", other.type_name())),
    }
}

fn compare(op: Builtin, a: &Value, b: &Value) -> Result<Value> {
    let ordering = match (a, b) {
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        _ => {
            let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
                let bad = if a.as_f64().is_none() { a } else { b };
                return Err(Error::type_mismatch("number", bad.type_name()));
            };
            x.partial_cmp(&y)
                .ok_or_else(|| Error::invalid_argument("cannot compare NaN"))?
        }
    };
    Ok(Value::Bool(match op {
        Builtin::Lt => ordering == Ordering::Less,
        Builtin::Gt => ordering == Ordering::Greater,
        Builtin::Le => ordering != Ordering::Greater,
        Builtin::Ge => ordering != Ordering::Less,
        _ => false,
    }))
}

fn arithmetic(op: Builtin, args: &[Value]) -> Result<Value> {
    let ints: Option<Vec<i64>> = args
        .iter()
        .map(|v| match v {
            Value::Int(n) => Some(*n),
            _ => None,
        })
        .collect();

    if let Some(ints) = ints {
        let result = match (op, ints.split_first()) {
            (Builtin::Add, _) => ints.iter().try_fold(0_i64, |acc, n| acc.checked_add(*n)),
            (Builtin::Mul, _) => ints.iter().try_fold(1_i64, |acc, n| acc.checked_mul(*n)),
            (Builtin::Sub, Some((first, []))) => first.checked_neg(),
            (Builtin::Sub, Some((first, rest))) => {
                rest.iter().try_fold(*first, |acc, n| acc.checked_sub(*n))
            }
            _ => Some(0),
        };
        return result
            .map(Value::Int)
            .ok_or_else(|| Error::invalid_argument(format!("integer overflow in {}", op.name())));
    }

    let floats = args
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| Error::type_mismatch("number", v.type_name()))
        })
        .collect::<Result<Vec<f64>>>()?;
    let result = match (op, floats.split_first()) {
        (Builtin::Add, _) => floats.iter().sum(),
        (Builtin::Mul, _) => floats.iter().product(),
        (Builtin::Sub, Some((first, []))) => -first,
        (Builtin::Sub, Some((first, rest))) => rest.iter().fold(*first, |acc, n| acc - n),
        _ => 0.0,
    };
    Ok(Value::Float(result))
}
