//! Error types for the worldbible system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for worldbible operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a not-found error for a referenced record.
    #[must_use]
    pub fn not_found(what: &'static str, id: impl fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound {
            what,
            id: id.to_string(),
        })
    }

    /// Creates an illegal status transition error.
    #[must_use]
    pub fn invalid_transition(
        from: impl Into<String>,
        to: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InvalidTransition {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        })
    }

    /// Creates a serialization failure error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationFailure(message.into()))
    }

    /// Creates a rule evaluation failure error.
    #[must_use]
    pub fn rule_failure(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RuleEvaluationFailure {
            rule: rule.into(),
            message: message.into(),
        })
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Creates an undefined symbol error.
    #[must_use]
    pub fn undefined_symbol(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndefinedSymbol(name.into()))
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(name: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            name: name.into(),
            expected: expected.into(),
            actual,
        })
    }

    /// Creates a schema violation error for an element attribute.
    #[must_use]
    pub fn schema_violation(
        kind: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::SchemaViolation {
            kind: kind.into(),
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A referenced element, relationship, conflict, chapter, snapshot or rule is absent.
    #[error("{what} not found: {id}")]
    NotFound {
        /// What kind of record was looked up.
        what: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Illegal conflict status change.
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },

    /// A snapshot blob or document could not be encoded or decoded.
    #[error("serialization failure: {0}")]
    SerializationFailure(String),

    /// A user rule could not be compiled or evaluated.
    #[error("rule {rule} failed: {message}")]
    RuleEvaluationFailure {
        /// Rule identifier or description.
        rule: String,
        /// Underlying failure.
        message: String,
    },

    /// Parse error in rule source.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
    },

    /// Symbol was not defined.
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    /// Wrong number of arguments to a rule function or form.
    #[error("arity mismatch for {name}: expected {expected}, got {actual}")]
    ArityMismatch {
        /// Function or form name.
        name: String,
        /// Description of expected arity.
        expected: String,
        /// Actual number of arguments.
        actual: usize,
    },

    /// Type mismatch during rule evaluation.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: String,
        /// The actual type encountered.
        actual: String,
    },

    /// Semantic limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),

    /// An attribute does not match the per-kind schema.
    #[error("attribute {field} rejected for {kind}: {reason}")]
    SchemaViolation {
        /// Element kind whose schema was consulted.
        kind: String,
        /// Offending attribute key.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Caller supplied an out-of-range or malformed argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// File system failure in a persistence collaborator.
    #[error("io error: {0}")]
    Io(String),
}

/// Semantic limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// Maximum evaluation steps for one rule against one element.
    MaxSteps {
        /// The configured limit.
        limit: u64,
    },
    /// Maximum reports a single rule evaluation may emit.
    MaxReports {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxSteps { limit } => write!(f, "max evaluation steps ({limit}) exceeded"),
            Self::MaxReports { limit } => write!(f, "max reports ({limit}) exceeded"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Rule, file or operation name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Stack of forms being evaluated.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
