use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{JsonPrimitive, Row};

/// Metadata for one column: its name plus what the data in it looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(default)]
    pub ty: JsonPrimitive,
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ty: JsonPrimitive::Null, nullable: false }
    }

    fn observe(&mut self, value: &Value) {
        let seen = JsonPrimitive::of_value(value);
        if seen == JsonPrimitive::Null {
            self.nullable = true;
        }
        self.ty = JsonPrimitive::promote(self.ty, seen);
    }
}

/// Ordered list of columns. A column's position is the cell index used by
/// rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnModel {
    pub columns: Vec<ColumnMetadata>,
}

impl ColumnModel {
    pub fn new(columns: Vec<ColumnMetadata>) -> Self { Self { columns } }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(ColumnMetadata::new).collect())
    }

    pub fn get_column_index_by_name(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize { self.columns.len() }

    pub fn is_empty(&self) -> bool { self.columns.is_empty() }

    /// Refresh column types and nullability from the given rows.
    /// A cell that is absent counts as null.
    pub fn infer_types(&mut self, rows: &[Row]) {
        for row in rows {
            for (index, column) in self.columns.iter_mut().enumerate() {
                match row.get_cell(index) {
                    Some(cell) if !cell.is_error() => column.observe(&cell.value),
                    Some(_) => {}
                    None => column.nullable = true,
                }
            }
        }
    }
}
