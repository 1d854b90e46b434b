//! Mergeable facet states for faceted browsing.
//!
//! A facet evaluates an expression on every row of a [`Grid`] and summarizes
//! the results. The summaries are immutable values that can be computed on
//! disjoint row ranges and then combined with `sum`, so a grid can be split
//! into partitions, folded in parallel and reduced in any order.
//!
//! ```
//! use facet_stats::{AggregationConfig, FacetConfig, Grid, RowAggregator};
//! use serde_json::json;
//!
//! let grid = Grid::from_objects(&[json!({"city": "Porto"}), json!({"city": "Braga"}), json!({"city": "Porto"})]);
//! let facet = FacetConfig::list("city").apply(&grid.column_model).unwrap();
//! let state = RowAggregator::aggregate(&grid, &facet.initial_state(), &AggregationConfig::tree(2)).unwrap();
//! assert_eq!(state.as_string_values().unwrap().count_of("Porto"), 2);
//! ```

pub mod model;
pub use model::{Cell, ColumnMetadata, ColumnModel, Grid, JsonPrimitive, Partition, Record, Row, RowId};

pub mod expr;
pub use expr::{Bindings, EvalError, EvalOutcome, Evaluable, Expression, ParseError};

pub mod browsing;
pub use browsing::{
    AggregationConfig, AggregationState, AllFacetsState, AnyFacetState, Facet, FacetConfig, FacetKind,
    FacetResult, FacetState, FacetStateError, NumericFacetState, ReduceStrategy, RowAggregator,
    StringValuesFacetState,
};
