use thiserror::Error;

use crate::expr::ExpressionParser;

/// Failure to parse an expression, with the offending span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ParseError: {message}\n  at [{start}:{end}] -> '{text}'")]
pub struct ParseError {
    pub message: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl ParseError {
    pub fn new(message: &str, pivot: usize, parser: &ExpressionParser) -> Self {
        Self {
            message: message.to_string(),
            text: parser.text_from_range(pivot, parser.position + 1),
            start: pivot,
            end: parser.position,
        }
    }

    pub fn err<T>(self) -> Result<T, ParseError> {
        Err(self)
    }
}
