use std::{ops::Range, sync::Arc};

use indexmap::IndexSet;
use serde_json::Value;

use crate::model::{Cell, ColumnModel, Row, RowId};

/// The tabular dataset: a column model plus its rows, addressed by position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    pub column_model: Arc<ColumnModel>,
    pub rows: Vec<Row>,
}

/// A contiguous, disjoint slice of a grid's rows, borrowed from the grid.
/// Row ids keep their position in the full grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition<'a> {
    pub first_row_id: RowId,
    pub rows: &'a [Row],
}

impl<'a> Partition<'a> {
    pub fn rows_with_ids(&self) -> impl Iterator<Item = (RowId, &'a Row)> + use<'a> {
        let first_row_id = self.first_row_id;
        self.rows.iter().enumerate().map(move |(i, r)| (first_row_id + i as RowId, r))
    }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

impl Grid {
    pub fn new(column_model: ColumnModel, rows: Vec<Row>) -> Self {
        Self { column_model: Arc::new(column_model), rows }
    }

    /// Build a grid out of a list of JSON objects. Columns are ordered by
    /// first appearance; keys missing from an object become absent cells.
    pub fn from_objects(objects: &[Value]) -> Self {
        let mut names: IndexSet<String> = IndexSet::new();
        for obj in objects.iter().filter_map(Value::as_object) {
            for key in obj.keys() {
                names.insert(key.clone());
            }
        }

        let rows = objects.iter()
            .map(|v| {
                let cells = names.iter()
                    .map(|name| match v.get(name) {
                        None | Some(Value::Null) => None,
                        Some(value) => Some(Cell::new(value.clone())),
                    })
                    .collect();
                Row::new(cells)
            })
            .collect::<Vec<_>>();

        let mut column_model = ColumnModel::from_names(names);
        column_model.infer_types(&rows);
        Self::new(column_model, rows)
    }

    pub fn row_count(&self) -> usize { self.rows.len() }

    /// Split the row indices into `count` contiguous ranges (at least one).
    /// Sizes differ by at most one row; trailing ranges may be empty when
    /// there are fewer rows than ranges.
    pub fn partition_ranges(&self, count: usize) -> Vec<Range<usize>> {
        let count = count.max(1);
        let total = self.rows.len();
        let base = total / count;
        let extra = total % count;

        let mut out = Vec::with_capacity(count);
        let mut start = 0usize;
        for i in 0..count {
            let size = base + usize::from(i < extra);
            out.push(start..start + size);
            start += size;
        }
        out
    }

    /// The rows in `range`, clipped to the grid.
    pub fn partition(&self, range: Range<usize>) -> Partition<'_> {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        Partition { first_row_id: start as RowId, rows: &self.rows[start..end] }
    }

    /// Borrowing view of [`Grid::partition_ranges`].
    pub fn partitions(&self, count: usize) -> Vec<Partition<'_>> {
        self.partition_ranges(count).into_iter().map(|range| self.partition(range)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid_of(n: usize) -> Grid {
        let rows = (0..n).map(|i| Row::from_values([json!(i)])).collect();
        Grid::new(ColumnModel::from_names(["n"]), rows)
    }

    #[test]
    fn partitions_cover_all_rows_once() {
        let grid = grid_of(10);
        let parts = grid.partitions(3);
        assert_eq!(parts.iter().map(Partition::len).collect::<Vec<_>>(), vec![4, 3, 3]);

        let ids: Vec<RowId> = parts.iter().flat_map(|p| p.rows_with_ids().map(|(id, _)| id)).collect();
        assert_eq!(ids, (0..10).collect::<Vec<RowId>>());
    }

    #[test]
    fn partitions_borrow_the_grid_rows() {
        let grid = grid_of(5);
        let parts = grid.partitions(2);
        assert!(std::ptr::eq(parts[0].rows.as_ptr(), grid.rows.as_ptr()));
        assert!(std::ptr::eq(parts[1].rows.as_ptr(), grid.rows[3..].as_ptr()));
        assert_eq!(grid.partition_ranges(2), vec![0..3, 3..5]);
    }

    #[test]
    fn partition_clips_out_of_range() {
        let grid = grid_of(3);
        assert_eq!(grid.partition(2..10).len(), 1);
        assert_eq!(grid.partition(2..10).first_row_id, 2);
        assert!(grid.partition(7..9).is_empty());
    }

    #[test]
    fn more_partitions_than_rows_leaves_empty_tail() {
        let grid = grid_of(2);
        let parts = grid.partitions(4);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts.iter().filter(|p| p.is_empty()).count(), 2);
    }

    #[test]
    fn zero_partitions_means_one() {
        let grid = grid_of(5);
        let parts = grid.partitions(0);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].len(), 5);
    }

    #[test]
    fn from_objects_orders_columns_by_first_appearance() {
        let grid = Grid::from_objects(&[
            json!({"city": "Porto", "age": 29}),
            json!({"city": "Braga", "vip": true}),
        ]);
        assert_eq!(grid.column_model.column_names(), vec!["city", "age", "vip"]);
        assert!(grid.rows[0].get_cell(2).is_none());
        assert_eq!(grid.rows[1].get_cell(2).unwrap().value, json!(true));
        assert!(grid.column_model.columns[1].nullable);
    }
}
