use serde::{Deserialize, Serialize};

/// How partition results are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReduceStrategy {
    /// `((p0 + p1) + p2) + ...`
    #[default]
    Linear,
    /// Pairwise rounds: `(p0 + p1) + (p2 + p3)` ...
    Tree,
}

/// Controls how a grid is split and reduced when aggregating facet states.
///
/// - `partition_count` is the number of contiguous row ranges folded
///   independently (values below 1 are treated as 1).
/// - `reduce` picks the shape of the merge of the partition results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationConfig {
    pub partition_count: usize,
    pub reduce: ReduceStrategy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { partition_count: 4, reduce: ReduceStrategy::Linear }
    }
}

impl AggregationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(partition_count: usize, reduce: ReduceStrategy) -> Self {
        Self { partition_count: partition_count.max(1), reduce }
    }

    /// Whole grid as a single partition.
    pub fn single() -> Self {
        Self::with(1, ReduceStrategy::Linear)
    }

    pub fn linear(partition_count: usize) -> Self {
        Self::with(partition_count, ReduceStrategy::Linear)
    }

    pub fn tree(partition_count: usize) -> Self {
        Self::with(partition_count, ReduceStrategy::Tree)
    }

    pub fn effective_partition_count(&self) -> usize {
        self.partition_count.max(1)
    }
}
