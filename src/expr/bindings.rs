use crate::model::{Cell, ColumnModel, Row, RowId};

/// Per-row environment handed to an expression.
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    pub column_model: &'a ColumnModel,
    pub row: &'a Row,
    pub row_id: RowId,
    /// Cell at the facet's column, `None` when absent.
    pub cell: Option<&'a Cell>,
}

impl<'a> Bindings<'a> {
    pub fn bind(column_model: &'a ColumnModel, row: &'a Row, row_id: RowId, cell_index: usize) -> Self {
        Self {
            column_model,
            row,
            row_id,
            cell: row.get_cell(cell_index),
        }
    }
}
