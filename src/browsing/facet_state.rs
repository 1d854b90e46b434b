use std::{fmt::Debug, sync::Arc};

use tracing::warn;

use crate::{
    browsing::{Facet, FacetKind, FacetResult, FacetStateError},
    model::{Record, Row, RowId},
};

/// An immutable aggregation state that can absorb rows one at a time and be
/// merged with another state of the same kind.
///
/// The reduction framework relies on the algebra:
///   - `sum` is associative and commutative,
///   - the empty state of a facet is the identity of `sum`,
///   - folding rows in any order yields the same state.
///
/// This lets a grid be split into partitions that are folded independently
/// (possibly on different threads) and then reduced in any shape.
pub trait AggregationState: Clone + Debug + PartialEq + Send + Sync + Sized {
    /// Combine two states into a new one. Neither input is modified.
    ///
    /// Fails with [`FacetStateError::IncompatibleState`] when `other` is not
    /// the same kind of state.
    ///
    /// Facet states go further than a kind check: they also reject a state
    /// owned by a different facet. Two facets are the same when they share
    /// the descriptor or have equal name, kind, column, column model and
    /// expression source text. The source is compared verbatim, so `value`
    /// and ` value` count as different facets.
    fn sum(&self, other: &Self) -> FacetResult<Self>;

    /// Account for one more row.
    ///
    /// Takes the state by value and returns its successor, so no holder of a
    /// previous state ever sees it change. Never fails: evaluation errors are
    /// counted, not raised.
    fn with_row(self, row_id: RowId, row: &Row) -> Self;

    /// Account for one record (a row group).
    ///
    /// Records mode is not supported by any state yet; this always fails
    /// with [`FacetStateError::UnsupportedMode`] rather than undercounting.
    fn with_record(&self, record: &Record, rows: &[Row]) -> FacetResult<Self> {
        warn!(start = record.start_row_id, rows = rows.len(), "records mode requested on a facet state");
        Err(FacetStateError::unsupported_mode("records mode not implemented"))
    }
}

/// An aggregation state owned by a single facet.
pub trait FacetState: AggregationState {
    fn facet(&self) -> &Arc<Facet>;

    fn kind(&self) -> FacetKind;
}

/// Fail unless both states come from the same facet.
pub(crate) fn ensure_same_facet(kind: FacetKind, ours: &Arc<Facet>, theirs: &Arc<Facet>) -> FacetResult<()> {
    if ours.same_as(theirs) {
        return Ok(());
    }
    warn!(kind = %kind, expected = ours.name(), found = theirs.name(), "summing states of different facets");
    Err(FacetStateError::incompatible(
        format!("{kind} of facet '{}'", ours.name()),
        format!("{kind} of facet '{}'", theirs.name()),
    ))
}
