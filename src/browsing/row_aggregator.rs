use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::{
    browsing::{AggregationConfig, AggregationState, FacetResult, FacetStateError, ReduceStrategy},
    model::{Grid, Partition, Row, RowId},
};

/// Drives aggregation states over a grid: partition, fold each partition
/// from a fresh initial state, then reduce the partition results with `sum`.
pub struct RowAggregator;

impl RowAggregator {
    pub fn fold_rows<'a, S, I>(initial: S, rows: I) -> S
    where
        S: AggregationState,
        I: IntoIterator<Item = (RowId, &'a Row)>,
    {
        rows.into_iter().fold(initial, |state, (row_id, row)| state.with_row(row_id, row))
    }

    pub fn fold_partition<S: AggregationState>(initial: S, partition: &Partition<'_>) -> S {
        Self::fold_rows(initial, partition.rows_with_ids())
    }

    /// Combine states with `sum`. `None` when there is nothing to combine.
    pub fn reduce<S: AggregationState>(states: Vec<S>, strategy: ReduceStrategy) -> FacetResult<Option<S>> {
        match strategy {
            ReduceStrategy::Linear => Self::reduce_linear(states),
            ReduceStrategy::Tree => Self::reduce_tree(states),
        }
    }

    fn reduce_linear<S: AggregationState>(states: Vec<S>) -> FacetResult<Option<S>> {
        let mut iter = states.into_iter();
        let Some(first) = iter.next() else { return Ok(None) };
        iter.try_fold(first, |acc, s| acc.sum(&s)).map(Some)
    }

    fn reduce_tree<S: AggregationState>(mut states: Vec<S>) -> FacetResult<Option<S>> {
        while states.len() > 1 {
            let mut next = Vec::with_capacity(states.len().div_ceil(2));
            let mut iter = states.into_iter();
            while let Some(left) = iter.next() {
                match iter.next() {
                    Some(right) => next.push(left.sum(&right)?),
                    None => next.push(left),
                }
            }
            states = next;
        }
        Ok(states.pop())
    }

    /// Aggregate the whole grid on the current thread.
    #[instrument(skip_all, fields(rows = grid.row_count(), partitions = config.effective_partition_count()))]
    pub fn aggregate<S: AggregationState>(grid: &Grid, initial: &S, config: &AggregationConfig) -> FacetResult<S> {
        let states = grid.partitions(config.effective_partition_count())
            .iter()
            .map(|p| Self::fold_partition(initial.clone(), p))
            .collect::<Vec<_>>();

        debug!(states = states.len(), strategy = ?config.reduce, "reducing partition states");
        Ok(Self::reduce(states, config.reduce)?.unwrap_or_else(|| initial.clone()))
    }

    /// Aggregate the grid folding each partition on tokio's blocking pool.
    /// Workers share the grid and read their own row range. Every worker is
    /// awaited before a failure is reported; partition results are reduced in
    /// partition order.
    #[instrument(skip_all, fields(rows = grid.row_count(), partitions = config.effective_partition_count()))]
    pub async fn aggregate_parallel<S>(grid: Arc<Grid>, initial: &S, config: &AggregationConfig) -> FacetResult<S>
    where
        S: AggregationState + 'static,
    {
        let ranges = grid.partition_ranges(config.effective_partition_count());
        let mut workers = JoinSet::new();
        for (index, range) in ranges.into_iter().enumerate() {
            let grid = Arc::clone(&grid);
            let state = initial.clone();
            workers.spawn_blocking(move || (index, Self::fold_partition(state, &grid.partition(range))));
        }

        let mut states = Vec::with_capacity(workers.len());
        let mut failure = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(indexed) => states.push(indexed),
                Err(e) => {
                    warn!(error = %e, "partition worker failed");
                    failure.get_or_insert_with(|| FacetStateError::PartitionFailed(e.to_string()));
                }
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }

        states.sort_by_key(|(index, _)| *index);
        let states = states.into_iter().map(|(_, state)| state).collect::<Vec<_>>();

        debug!(states = states.len(), strategy = ?config.reduce, "reducing partition states");
        Ok(Self::reduce(states, config.reduce)?.unwrap_or_else(|| initial.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        browsing::{AllFacetsState, AnyFacetState, FacetConfig, FacetState, StringValuesFacetState},
        model::ColumnModel,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn people() -> Grid {
        Grid::from_objects(&[
            json!({"name": "Alice",  "city": "Porto",  "age": 29}),
            json!({"name": "Bruno",  "city": "Lisboa", "age": 34}),
            json!({"name": "Carla",  "city": "Braga",  "age": "n/a"}),
            json!({"name": "David",  "city": "Porto",  "age": 25}),
            json!({"name": "Elisa",  "city": null,     "age": 38}),
            json!({"name": "Fernando", "city": "Porto", "age": 47}),
            json!({"name": "Gabriela", "city": "Lisboa", "age": null}),
        ])
    }

    fn city_state(grid: &Grid) -> AnyFacetState {
        FacetConfig::list("city").apply(&grid.column_model).unwrap().initial_state()
    }

    #[test]
    fn reduce_of_nothing_is_none() {
        let states: Vec<AnyFacetState> = vec![];
        assert!(RowAggregator::reduce(states.clone(), ReduceStrategy::Linear).unwrap().is_none());
        assert!(RowAggregator::reduce(states, ReduceStrategy::Tree).unwrap().is_none());
    }

    #[test]
    fn partitioning_does_not_change_the_result() {
        let grid = people();
        let initial = city_state(&grid);
        let whole = RowAggregator::aggregate(&grid, &initial, &AggregationConfig::single()).unwrap();

        for n in 1..=9 {
            for config in [AggregationConfig::linear(n), AggregationConfig::tree(n)] {
                let split = RowAggregator::aggregate(&grid, &initial, &config).unwrap();
                assert_eq!(split, whole, "{config:?}");
            }
        }

        let city = whole.as_string_values().unwrap();
        assert_eq!(city.count_of("Porto"), 3);
        assert_eq!(city.count_of("Lisboa"), 2);
        assert_eq!(city.count_of("Braga"), 1);
        assert_eq!(city.blank_count(), 1);
        assert_eq!(city.total_count(), grid.row_count() as u64);
    }

    #[test]
    fn aggregates_all_facets_in_one_pass() {
        let grid = people();
        let facets = vec![
            FacetConfig::list("city").apply(&grid.column_model).unwrap(),
            FacetConfig::range("age").apply(&grid.column_model).unwrap(),
        ];
        let state = RowAggregator::aggregate(&grid, &AllFacetsState::new(&facets), &AggregationConfig::tree(3)).unwrap();

        let age = state.by_name("age").unwrap().as_numeric().unwrap();
        assert_eq!(age.numeric_count(), 5);
        assert_eq!(age.non_numeric_count(), 1);
        assert_eq!(age.blank_count(), 1);
        assert_eq!(age.min(), Some(25.0));
        assert_eq!(age.max(), Some(47.0));
    }

    #[test]
    fn empty_grid_yields_initial_state() {
        let grid = Grid::new(ColumnModel::from_names(["city"]), vec![]);
        let initial = city_state(&grid);
        let state = RowAggregator::aggregate(&grid, &initial, &AggregationConfig::default()).unwrap();
        assert_eq!(state, initial);
    }

    #[test]
    fn reduce_surfaces_incompatible_states() {
        let grid = people();
        let list = FacetConfig::list("city").apply(&grid.column_model).unwrap();
        let range = FacetConfig::range("age").apply(&grid.column_model).unwrap();
        let states = vec![list.initial_state(), list.initial_state(), range.initial_state()];

        let err = RowAggregator::reduce(states, ReduceStrategy::Tree).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn parallel_matches_sequential() {
        let grid = people();
        let facet = FacetConfig::list("city").with_expression("upper(value)").apply(&grid.column_model).unwrap();
        let initial = StringValuesFacetState::new(Arc::clone(&facet));

        let sequential = RowAggregator::aggregate(&grid, &initial, &AggregationConfig::single()).unwrap();
        let parallel = RowAggregator::aggregate_parallel(Arc::new(grid.clone()), &initial, &AggregationConfig::tree(4)).await.unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.count_of("PORTO"), 3);
        assert!(Arc::ptr_eq(parallel.facet(), &facet));
    }

    static FOLDED: AtomicU64 = AtomicU64::new(0);

    /// Counts rows and blows up on row 0.
    #[derive(Debug, Clone, PartialEq)]
    struct Tally(u64);

    impl AggregationState for Tally {
        fn sum(&self, other: &Self) -> FacetResult<Self> { Ok(Tally(self.0 + other.0)) }

        fn with_row(self, row_id: RowId, _row: &Row) -> Self {
            assert_ne!(row_id, 0, "row 0 is poisoned");
            FOLDED.fetch_add(1, Ordering::SeqCst);
            Tally(self.0 + 1)
        }
    }

    #[tokio::test]
    async fn failed_worker_is_reported_after_the_others_finish() {
        let rows = (0..8).map(|i| Row::from_values([json!(i)])).collect();
        let grid = Arc::new(Grid::new(ColumnModel::from_names(["n"]), rows));

        let err = RowAggregator::aggregate_parallel(grid, &Tally(0), &AggregationConfig::linear(4)).await.unwrap_err();
        assert!(matches!(err, FacetStateError::PartitionFailed(_)));
        // partitions 1..4 hold rows 2..8 and all of them were folded
        assert_eq!(FOLDED.load(Ordering::SeqCst), 6);
    }
}
