//! Errors raised by facet states on structural misuse.
//!
//! Per-row evaluation failures and blanks never show up here: they are
//! counted inside the states.

use thiserror::Error;

use crate::expr::ParseError;

pub type FacetResult<T> = Result<T, FacetStateError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacetStateError {
    /// Two states of different kinds (or owned by different facets) were summed.
    #[error("Summing two incompatible facet states: expected {expected}, found {found}")]
    IncompatibleState { expected: String, found: String },

    /// The requested aggregation mode does not exist for this state.
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    /// A facet config pointing at a missing column or holding a bad expression.
    #[error("Invalid facet configuration: {0}")]
    InvalidConfiguration(String),

    /// A partition fold did not complete (e.g. its worker panicked).
    #[error("Partition aggregation failed: {0}")]
    PartitionFailed(String),
}

impl FacetStateError {
    pub fn incompatible(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::IncompatibleState { expected: expected.into(), found: found.into() }
    }

    pub fn unsupported_mode(msg: impl Into<String>) -> Self {
        Self::UnsupportedMode(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Caller passed an argument that can never work (bad merge partner, bad config).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::IncompatibleState { .. } | Self::InvalidConfiguration(_))
    }

    /// The state cannot perform the operation at all in its current form.
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::UnsupportedMode(_))
    }
}

impl From<ParseError> for FacetStateError {
    fn from(err: ParseError) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}
