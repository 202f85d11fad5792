//! Compiled expression tree.
//!
//! [`Expr`] is the only thing the interpreter runs. Symbols are resolved to
//! local slots or builtins at compile time, so evaluation never looks names up.

use crate::value::Value;

/// A compiled expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Constant.
    Literal(Value),
    /// The element under evaluation (`self`).
    Subject,
    /// A `let` or iteration binding.
    Local(u16),
    /// `[a b c]`
    Vector(Vec<Expr>),
    /// `(if c then else?)`
    If(Box<Expr>, Box<Expr>, Box<Expr>),
    /// `(when c body...)`
    When(Box<Expr>, Vec<Expr>),
    /// `(and ...)`, short-circuiting.
    And(Vec<Expr>),
    /// `(or ...)`, short-circuiting.
    Or(Vec<Expr>),
    /// `(not x)`
    Not(Box<Expr>),
    /// `(let [slot expr ...] body...)`
    Let(Vec<(u16, Expr)>, Vec<Expr>),
    /// `(do body...)`
    Do(Vec<Expr>),
    /// `(each|filter|any?|all? [slot coll] body...)`
    Iterate {
        /// Which iteration form.
        mode: IterMode,
        /// Slot bound to each item.
        slot: u16,
        /// Collection expression.
        collection: Box<Expr>,
        /// Body; its last value is the per-item result.
        body: Vec<Expr>,
    },
    /// `(report msg)` or `(report target msg)`
    Report {
        /// Other side of the contradiction; the subject when absent.
        target: Option<Box<Expr>>,
        /// Message expression.
        message: Box<Expr>,
    },
    /// Builtin call.
    Call(Builtin, Vec<Expr>),
}

/// Iteration flavours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterMode {
    /// Runs the body for effect, yields `nil`.
    Each,
    /// Keeps items whose body is truthy.
    Filter,
    /// True if any body is truthy; stops early.
    Any,
    /// True if every body is truthy; stops early.
    All,
}

impl IterMode {
    /// Looks up an iteration form by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "each" => Self::Each,
            "filter" => Self::Filter,
            "any?" => Self::Any,
            "all?" => Self::All,
            _ => return None,
        })
    }
}

macro_rules! builtins {
    ($($variant:ident => $name:literal, $min:expr, $max:expr;)*) => {
        /// Builtin functions available to rules.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Builtin {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl Builtin {
            /// Every builtin.
            pub const ALL: &'static [Builtin] = &[$(Self::$variant),*];

            /// Looks up a builtin by its source name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Source name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Accepted argument count as `(min, max)`; `None` means variadic.
            #[must_use]
            pub const fn arity(self) -> (usize, Option<usize>) {
                match self {
                    $(Self::$variant => ($min, $max),)*
                }
            }
        }
    };
}

builtins! {
    Eq => "=", 2, None;
    NotEq => "not=", 2, Some(2);
    Lt => "<", 2, Some(2);
    Gt => ">", 2, Some(2);
    Le => "<=", 2, Some(2);
    Ge => ">=", 2, Some(2);
    Add => "+", 0, None;
    Sub => "-", 1, None;
    Mul => "*", 0, None;
    Count => "count", 1, Some(1);
    IsEmpty => "empty?", 1, Some(1);
    IsNil => "nil?", 1, Some(1);
    Contains => "contains?", 2, Some(2);
    Str => "str", 0, None;
    Lower => "lower", 1, Some(1);
    Includes => "includes?", 2, Some(2);
    Id => "id", 1, Some(1);
    Name => "name", 1, Some(1);
    Kind => "kind", 1, Some(1);
    Tier => "tier", 1, Some(1);
    Description => "description", 1, Some(1);
    Notes => "notes", 1, Some(1);
    Attr => "attr", 2, Some(2);
    Tags => "tags", 1, Some(1);
    Appearances => "appearances", 1, Some(1);
    Relationships => "relationships", 1, Some(1);
    HasTag => "has-tag?", 2, Some(2);
    Target => "target", 1, Some(1);
    RelType => "rel-type", 1, Some(1);
    RelDescription => "rel-description", 1, Some(1);
    Element => "element", 1, Some(1);
    Elements => "elements", 0, Some(0);
    ElementsOf => "elements-of", 1, Some(1);
}

impl Builtin {
    /// Checks an argument count against [`Builtin::arity`].
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        let (min, max) = self.arity();
        count >= min
            && match max {
                Some(max) => count <= max,
                None => true,
            }
    }

    /// Arity description for error messages.
    #[must_use]
    pub fn arity_text(self) -> String {
        match self.arity() {
            (min, Some(max)) if min == max => min.to_string(),
            (min, Some(max)) => format!("{min}..{max}"),
            (min, None) => format!("at least {min}"),
        }
    }
}
