use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::Cell;

/// Positional id of a row inside its grid.
pub type RowId = u64;

/// A row is a positional list of optional cells; the column model gives the
/// positions their names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Option<Cell>>,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub starred: bool,
}

impl Row {
    pub fn new(cells: Vec<Option<Cell>>) -> Self {
        Self { cells, flagged: false, starred: false }
    }

    /// Build a row from plain values. `null` becomes an absent cell.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let cells = values.into_iter()
            .map(|v| match v.into() {
                Value::Null => None,
                other => Some(Cell::new(other)),
            })
            .collect();
        Self::new(cells)
    }

    pub fn with_flags(mut self, flagged: bool, starred: bool) -> Self {
        self.flagged = flagged;
        self.starred = starred;
        self
    }

    pub fn get_cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize { self.cells.len() }

    pub fn is_empty(&self) -> bool { self.cells.is_empty() }
}
