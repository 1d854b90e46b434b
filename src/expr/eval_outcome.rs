use std::fmt;

use serde_json::Value;

/// An evaluation failure for one row. This is data: it is counted by facets,
/// never raised to their callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvalError: {}", self.message)
    }
}

/// Classified result of evaluating an expression on one row.
/// Exactly one of the three holds.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    Error(EvalError),
    /// null, or an empty string
    Blank,
    Value(Value),
}

impl EvalOutcome {
    /// Sort a raw value into `Blank` or `Value`.
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Null => EvalOutcome::Blank,
            Value::String(s) if s.is_empty() => EvalOutcome::Blank,
            other => EvalOutcome::Value(other),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        EvalOutcome::Error(EvalError::new(message))
    }

    pub fn is_error(&self) -> bool { matches!(self, EvalOutcome::Error(_)) }

    pub fn is_blank(&self) -> bool { matches!(self, EvalOutcome::Blank) }

    pub fn is_non_blank_data(&self) -> bool { matches!(self, EvalOutcome::Value(_)) }
}
