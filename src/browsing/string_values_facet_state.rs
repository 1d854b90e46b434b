use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use crate::{
    browsing::{ensure_same_facet, AggregationState, Facet, FacetKind, FacetResult, FacetState},
    expr::{to_canonical_string, Bindings, EvalOutcome},
    model::{Row, RowId},
};

/// Gathers how often each distinct string representation of the facet's
/// expression shows up, plus how many rows errored or were blank.
///
/// Every row lands in exactly one of three buckets, so
/// `counts.values().sum() + error_count + blank_count` is the number of rows
/// folded in.
#[derive(Debug, Clone)]
pub struct StringValuesFacetState {
    facet: Arc<Facet>,
    counts: IndexMap<String, u64>,
    errors: u64,
    blanks: u64,
}

impl StringValuesFacetState {
    /// Empty state for `facet`.
    pub fn new(facet: Arc<Facet>) -> Self {
        Self::from_parts(facet, IndexMap::new(), 0, 0)
    }

    pub fn from_parts(facet: Arc<Facet>, counts: IndexMap<String, u64>, errors: u64, blanks: u64) -> Self {
        Self { facet, counts, errors, blanks }
    }

    pub fn counts(&self) -> &IndexMap<String, u64> { &self.counts }

    pub fn count_of(&self, value: &str) -> u64 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn error_count(&self) -> u64 { self.errors }

    pub fn blank_count(&self) -> u64 { self.blanks }

    /// Rows accounted for so far, across all three buckets.
    pub fn total_count(&self) -> u64 {
        self.counts.values().sum::<u64>() + self.errors + self.blanks
    }

    /// Distinct values with their counts, most frequent first; ties are
    /// ordered by value.
    pub fn choices(&self) -> Vec<(String, u64)> {
        let mut choices: Vec<(String, u64)> = self.counts.iter()
            .map(|(value, count)| (value.clone(), *count))
            .collect();
        choices.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        choices
    }

    /// The `n` most frequent values.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut choices = self.choices();
        choices.truncate(n);
        choices
    }
}

impl AggregationState for StringValuesFacetState {
    fn sum(&self, other: &Self) -> FacetResult<Self> {
        ensure_same_facet(FacetKind::StringValues, &self.facet, &other.facet)?;

        let mut counts = self.counts.clone();
        for (value, count) in &other.counts {
            *counts.entry(value.clone()).or_insert(0) += count;
        }

        Ok(Self::from_parts(
            Arc::clone(&self.facet),
            counts,
            self.errors + other.errors,
            self.blanks + other.blanks,
        ))
    }

    fn with_row(mut self, row_id: RowId, row: &Row) -> Self {
        let bindings = Bindings::bind(self.facet.column_model(), row, row_id, self.facet.cell_index());
        match self.facet.expression().evaluate(&bindings) {
            EvalOutcome::Error(err) => {
                trace!(row_id, error = %err, "facet expression failed");
                self.errors += 1;
            }
            EvalOutcome::Blank => self.blanks += 1,
            EvalOutcome::Value(value) => {
                *self.counts.entry(to_canonical_string(&value)).or_insert(0) += 1;
            }
        }
        self
    }
}

impl FacetState for StringValuesFacetState {
    fn facet(&self) -> &Arc<Facet> { &self.facet }

    fn kind(&self) -> FacetKind { FacetKind::StringValues }
}

impl PartialEq for StringValuesFacetState {
    fn eq(&self, other: &Self) -> bool {
        self.facet.same_as(&other.facet)
            && self.errors == other.errors
            && self.blanks == other.blanks
            && self.counts == other.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        browsing::{FacetStateError, RowAggregator},
        model::{Cell, ColumnModel, Record},
    };
    use serde_json::{json, Value};

    fn facet_on(expression: &str) -> Arc<Facet> {
        let model = Arc::new(ColumnModel::from_names(["label", "score"]));
        Arc::new(Facet::list(model, "label", expression).unwrap())
    }

    fn rows(values: &[Value]) -> Vec<Row> {
        values.iter().map(|v| Row::from_values([v.clone()])).collect()
    }

    fn fold(state: StringValuesFacetState, rows: &[Row]) -> StringValuesFacetState {
        RowAggregator::fold_rows(state, rows.iter().enumerate().map(|(i, r)| (i as RowId, r)))
    }

    fn counts(pairs: &[(&str, u64)]) -> IndexMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn counts_repeated_values() {
        let state = fold(StringValuesFacetState::new(facet_on("value")), &rows(&[json!("a"), json!("b"), json!("a")]));
        assert_eq!(state.counts(), &counts(&[("a", 2), ("b", 1)]));
        assert_eq!(state.error_count(), 0);
        assert_eq!(state.blank_count(), 0);
    }

    #[test]
    fn separates_values_blanks_and_errors() {
        let mut data = rows(&[json!("a"), json!(null)]);
        data.push(Row::new(vec![Some(Cell::error("boom"))]));

        let state = fold(StringValuesFacetState::new(facet_on("value")), &data);
        assert_eq!(state.counts(), &counts(&[("a", 1)]));
        assert_eq!(state.blank_count(), 1);
        assert_eq!(state.error_count(), 1);
        assert_eq!(state.total_count(), 3);
    }

    #[test]
    fn expression_errors_are_counted_not_raised() {
        let data = rows(&[json!("12"), json!("twelve"), json!(""), json!("12.0")]);
        let state = fold(StringValuesFacetState::new(facet_on("toNumber(value)")), &data);
        assert_eq!(state.counts(), &counts(&[("12", 2)]));
        assert_eq!(state.error_count(), 1);
        assert_eq!(state.blank_count(), 1);
    }

    #[test]
    fn non_string_values_use_canonical_strings() {
        let data = rows(&[json!(1), json!(1.0), json!(true), json!([1, 2])]);
        let state = fold(StringValuesFacetState::new(facet_on("value")), &data);
        assert_eq!(state.count_of("1"), 2);
        assert_eq!(state.count_of("true"), 1);
        assert_eq!(state.count_of("[1,2]"), 1);
    }

    #[test]
    fn large_integral_floats_share_the_integer_bucket() {
        let data = rows(&[json!(2e15), json!(2000000000000000i64)]);
        let state = fold(StringValuesFacetState::new(facet_on("value")), &data);
        assert_eq!(state.counts(), &counts(&[("2000000000000000", 2)]));
    }

    #[test]
    fn with_row_leaves_earlier_states_alone() {
        let empty = StringValuesFacetState::new(facet_on("value"));
        let one = empty.clone().with_row(0, &Row::from_values([json!("x")]));
        assert_eq!(empty.total_count(), 0);
        assert_eq!(one.count_of("x"), 1);

        let two = one.clone().with_row(1, &Row::from_values([json!("x")]));
        assert_eq!(one.count_of("x"), 1);
        assert_eq!(two.count_of("x"), 2);
    }

    #[test]
    fn sum_merges_partitions() {
        let facet = facet_on("value");
        let p1 = fold(StringValuesFacetState::new(Arc::clone(&facet)), &rows(&[json!("x"), json!("y")]));
        let p2 = fold(StringValuesFacetState::new(Arc::clone(&facet)), &rows(&[json!("x")]));

        let merged = p1.sum(&p2).unwrap();
        assert_eq!(merged.counts(), &counts(&[("x", 2), ("y", 1)]));
        // inputs untouched
        assert_eq!(p1.count_of("x"), 1);
        assert_eq!(p2.count_of("x"), 1);
    }

    #[test]
    fn sum_adds_error_and_blank_counters() {
        let facet = facet_on("value");
        let a = StringValuesFacetState::from_parts(Arc::clone(&facet), IndexMap::new(), 3, 2);
        let b = StringValuesFacetState::from_parts(Arc::clone(&facet), IndexMap::new(), 1, 0);

        let merged = a.sum(&b).unwrap();
        assert_eq!(merged.error_count(), 4);
        assert_eq!(merged.blank_count(), 2);
    }

    #[test]
    fn empty_state_is_identity() {
        let facet = facet_on("value");
        let empty = StringValuesFacetState::new(Arc::clone(&facet));
        let state = fold(StringValuesFacetState::new(Arc::clone(&facet)), &rows(&[json!("a"), json!(null)]));

        assert_eq!(empty.sum(&state).unwrap(), state);
        assert_eq!(state.sum(&empty).unwrap(), state);
    }

    #[test]
    fn sum_is_order_insensitive() {
        let facet = facet_on("value");
        let a = fold(StringValuesFacetState::new(Arc::clone(&facet)), &rows(&[json!("a"), json!("b")]));
        let b = fold(StringValuesFacetState::new(Arc::clone(&facet)), &rows(&[json!("b"), json!("c")]));
        assert_eq!(a.sum(&b).unwrap(), b.sum(&a).unwrap());
    }

    #[test]
    fn sum_rejects_other_facets() {
        let a = StringValuesFacetState::new(facet_on("value"));
        let b = StringValuesFacetState::new(facet_on("upper(value)"));

        let err = a.sum(&b).unwrap_err();
        assert!(matches!(err, FacetStateError::IncompatibleState { .. }));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn sum_accepts_equal_facets_built_apart() {
        let a = fold(StringValuesFacetState::new(facet_on("value")), &rows(&[json!("x")]));
        let b = fold(StringValuesFacetState::new(facet_on("value")), &rows(&[json!("x")]));
        assert_eq!(a.sum(&b).unwrap().count_of("x"), 2);
    }

    #[test]
    fn sum_compares_expression_source_verbatim() {
        let a = StringValuesFacetState::new(facet_on("value"));
        let b = StringValuesFacetState::new(facet_on(" value"));
        assert!(a.sum(&b).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn records_mode_is_rejected() {
        let state = fold(StringValuesFacetState::new(facet_on("value")), &rows(&[json!("a")]));
        let data = rows(&[json!("a"), json!("b")]);

        let err = state.with_record(&Record::new(0, 2), &data).unwrap_err();
        assert!(matches!(err, FacetStateError::UnsupportedMode(_)));
        assert!(err.is_illegal_state());
    }

    #[test]
    fn choices_sorted_by_count_then_value() {
        let data = rows(&[json!("b"), json!("a"), json!("c"), json!("c"), json!("b"), json!("c")]);
        let state = fold(StringValuesFacetState::new(facet_on("value")), &data);
        assert_eq!(
            state.choices(),
            vec![("c".to_string(), 3), ("b".to_string(), 2), ("a".to_string(), 1)]
        );
        assert_eq!(state.top(1), vec![("c".to_string(), 3)]);
        assert_eq!(state.top(10).len(), 3);
    }
}
