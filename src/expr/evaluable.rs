use std::fmt;

use crate::expr::{Bindings, Eval, EvalOutcome, Expr, ExpressionParser, ParseError};

/// Anything that can be evaluated against a row's bindings.
///
/// Facets only need the classified outcome and a stable source text to tell
/// two evaluables apart.
pub trait Evaluable: Send + Sync + fmt::Debug {
    fn evaluate(&self, bindings: &Bindings<'_>) -> EvalOutcome;

    fn source(&self) -> &str;
}

/// A parsed expression together with the text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let root = ExpressionParser::parse(source)?;
        Ok(Self { source: source.to_string(), root })
    }
}

impl Evaluable for Expression {
    fn evaluate(&self, bindings: &Bindings<'_>) -> EvalOutcome {
        Eval::eval(&self.root, bindings)
    }

    fn source(&self) -> &str { &self.source }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
