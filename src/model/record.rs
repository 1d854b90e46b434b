use serde::{Deserialize, Serialize};

use crate::model::RowId;

/// A record groups consecutive rows: the first row starts it and the
/// following rows (up to `end_row_id`, exclusive) belong to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub start_row_id: RowId,
    pub end_row_id: RowId,
}

impl Record {
    pub fn new(start_row_id: RowId, end_row_id: RowId) -> Self {
        Self { start_row_id, end_row_id }
    }

    pub fn len(&self) -> usize {
        self.end_row_id.saturating_sub(self.start_row_id) as usize
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}
