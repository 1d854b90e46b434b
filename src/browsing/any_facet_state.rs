use std::sync::Arc;

use tracing::warn;

use crate::{
    browsing::{AggregationState, Facet, FacetKind, FacetResult, FacetState, FacetStateError, NumericFacetState, StringValuesFacetState},
    model::{Row, RowId},
};

/// Any concrete facet state, so states of different facets can travel
/// through the same reduction code. `sum` only combines matching variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyFacetState {
    StringValues(StringValuesFacetState),
    Numeric(NumericFacetState),
}

impl AnyFacetState {
    pub fn as_string_values(&self) -> Option<&StringValuesFacetState> {
        match self {
            AnyFacetState::StringValues(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericFacetState> {
        match self {
            AnyFacetState::Numeric(s) => Some(s),
            _ => None,
        }
    }
}

impl AggregationState for AnyFacetState {
    fn sum(&self, other: &Self) -> FacetResult<Self> {
        match (self, other) {
            (AnyFacetState::StringValues(a), AnyFacetState::StringValues(b)) => a.sum(b).map(AnyFacetState::StringValues),
            (AnyFacetState::Numeric(a), AnyFacetState::Numeric(b)) => a.sum(b).map(AnyFacetState::Numeric),
            _ => {
                warn!(expected = %self.kind(), found = %other.kind(), "summing facet states of different kinds");
                Err(FacetStateError::incompatible(self.kind().to_string(), other.kind().to_string()))
            }
        }
    }

    fn with_row(self, row_id: RowId, row: &Row) -> Self {
        match self {
            AnyFacetState::StringValues(s) => AnyFacetState::StringValues(s.with_row(row_id, row)),
            AnyFacetState::Numeric(s) => AnyFacetState::Numeric(s.with_row(row_id, row)),
        }
    }
}

impl FacetState for AnyFacetState {
    fn facet(&self) -> &Arc<Facet> {
        match self {
            AnyFacetState::StringValues(s) => s.facet(),
            AnyFacetState::Numeric(s) => s.facet(),
        }
    }

    fn kind(&self) -> FacetKind {
        match self {
            AnyFacetState::StringValues(_) => FacetKind::StringValues,
            AnyFacetState::Numeric(_) => FacetKind::Numeric,
        }
    }
}

impl From<StringValuesFacetState> for AnyFacetState {
    fn from(state: StringValuesFacetState) -> Self { AnyFacetState::StringValues(state) }
}

impl From<NumericFacetState> for AnyFacetState {
    fn from(state: NumericFacetState) -> Self { AnyFacetState::Numeric(state) }
}
