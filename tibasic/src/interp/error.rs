//! Runtime errors for the interpreter

use crate::ast::Span;
use std::fmt;

/// Runtime fault. Every fault ends the current run.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Where the fault was raised, once known
    pub span: Option<Span>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Read of a name that was never seeded or assigned
    UndefinedVariable,
    /// Wrong value kind for a variable class, operator or index
    TypeMismatch,
    /// List index outside the valid band
    IndexOutOfRange,
    /// `Goto` to a label that does not exist
    UndefinedLabel,
    /// `For(` with a step of zero
    InvalidStep,
    /// A `Prompt`/`Input` line that is not an expression
    InvalidInput,
    /// Configured statement budget exhausted
    StepLimitExceeded,
    /// Console failure, or input closed while waiting for a line
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UndefinedVariable => "undefined variable",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::IndexOutOfRange => "index out of range",
            ErrorKind::UndefinedLabel => "undefined label",
            ErrorKind::InvalidStep => "invalid step",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::StepLimitExceeded => "step limit exceeded",
            ErrorKind::Io => "io",
        };
        write!(f, "{name}")
    }
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError {
            kind,
            message,
            span: None,
        }
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("undefined variable '{name}'"),
        )
    }

    pub fn type_error(context: &str, expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("{context}: expected {expected}, got {got}"),
        )
    }

    pub fn index_out_of_range(name: &str, index: f64, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfRange,
            format!("index {index:?} is out of range for {name} (length {len})"),
        )
    }

    pub fn undefined_label(label: &str, hint: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedLabel,
            format!("undefined label '{label}'{hint}"),
        )
    }

    pub fn invalid_step() -> Self {
        Self::new(
            ErrorKind::InvalidStep,
            "For( step must not be zero".to_string(),
        )
    }

    pub fn invalid_input(line: &str, reason: &str) -> Self {
        Self::new(
            ErrorKind::InvalidInput,
            format!("cannot evaluate input {line:?}: {reason}"),
        )
    }

    pub fn step_limit_exceeded(limit: u64) -> Self {
        Self::new(
            ErrorKind::StepLimitExceeded,
            format!("program exceeded the limit of {limit} statements"),
        )
    }

    pub fn io_error(msg: &str) -> Self {
        Self::new(ErrorKind::Io, format!("IO error: {msg}"))
    }

    /// Attach `span` unless a more precise one is already set
    pub fn at(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }

    /// Replace any span, for faults whose origin lies outside the program text
    pub fn relocated(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
