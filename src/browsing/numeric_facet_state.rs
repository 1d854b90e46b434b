use std::sync::Arc;

use tracing::trace;

use crate::{
    browsing::{ensure_same_facet, AggregationState, Facet, FacetKind, FacetResult, FacetState},
    expr::{as_number, Bindings, EvalOutcome},
    model::{Row, RowId},
};

/// Numeric profile of a facet's expression: how many rows produced a number,
/// something else, nothing, or an error, and the bounds of the numbers seen.
#[derive(Debug, Clone)]
pub struct NumericFacetState {
    facet: Arc<Facet>,
    numeric_count: u64,
    non_numeric_count: u64,
    blank_count: u64,
    error_count: u64,
    min: Option<f64>,
    max: Option<f64>,
}

fn merge_bound(a: Option<f64>, b: Option<f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(pick(x, y)),
        (x, None) => x,
        (None, y) => y,
    }
}

impl NumericFacetState {
    pub fn new(facet: Arc<Facet>) -> Self {
        Self {
            facet,
            numeric_count: 0,
            non_numeric_count: 0,
            blank_count: 0,
            error_count: 0,
            min: None,
            max: None,
        }
    }

    pub fn numeric_count(&self) -> u64 { self.numeric_count }
    pub fn non_numeric_count(&self) -> u64 { self.non_numeric_count }
    pub fn blank_count(&self) -> u64 { self.blank_count }
    pub fn error_count(&self) -> u64 { self.error_count }
    pub fn min(&self) -> Option<f64> { self.min }
    pub fn max(&self) -> Option<f64> { self.max }

    pub fn total_count(&self) -> u64 {
        self.numeric_count + self.non_numeric_count + self.blank_count + self.error_count
    }
}

impl AggregationState for NumericFacetState {
    fn sum(&self, other: &Self) -> FacetResult<Self> {
        ensure_same_facet(FacetKind::Numeric, &self.facet, &other.facet)?;

        Ok(Self {
            facet: Arc::clone(&self.facet),
            numeric_count: self.numeric_count + other.numeric_count,
            non_numeric_count: self.non_numeric_count + other.non_numeric_count,
            blank_count: self.blank_count + other.blank_count,
            error_count: self.error_count + other.error_count,
            min: merge_bound(self.min, other.min, f64::min),
            max: merge_bound(self.max, other.max, f64::max),
        })
    }

    fn with_row(mut self, row_id: RowId, row: &Row) -> Self {
        let bindings = Bindings::bind(self.facet.column_model(), row, row_id, self.facet.cell_index());
        match self.facet.expression().evaluate(&bindings) {
            EvalOutcome::Error(err) => {
                trace!(row_id, error = %err, "facet expression failed");
                self.error_count += 1;
            }
            EvalOutcome::Blank => self.blank_count += 1,
            EvalOutcome::Value(value) => match as_number(&value) {
                Some(n) => {
                    self.numeric_count += 1;
                    self.min = merge_bound(self.min, Some(n), f64::min);
                    self.max = merge_bound(self.max, Some(n), f64::max);
                }
                None => self.non_numeric_count += 1,
            },
        }
        self
    }
}

impl FacetState for NumericFacetState {
    fn facet(&self) -> &Arc<Facet> { &self.facet }

    fn kind(&self) -> FacetKind { FacetKind::Numeric }
}

impl PartialEq for NumericFacetState {
    fn eq(&self, other: &Self) -> bool {
        self.facet.same_as(&other.facet)
            && self.numeric_count == other.numeric_count
            && self.non_numeric_count == other.non_numeric_count
            && self.blank_count == other.blank_count
            && self.error_count == other.error_count
            && self.min == other.min
            && self.max == other.max
    }
}
