use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse classification of the values stored in a column.
///
/// Used by [`ColumnModel::infer_types`](crate::model::ColumnModel::infer_types)
/// to describe what a column mostly holds: Null, Bool, Int, Float, String,
/// Object (map) or Array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JsonPrimitive {
    /// No value seen yet (or only nulls)
    #[default]
    Null,
    Bool,
    Int,
    Float,
    String,
    Object,
    Array,
}

impl JsonPrimitive {
    /// Classify a cell value.
    pub fn of_value(v: &Value) -> JsonPrimitive {
        match v {
            Value::Null => JsonPrimitive::Null,
            Value::Bool(_) => JsonPrimitive::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => JsonPrimitive::Int,
            Value::Number(_) => JsonPrimitive::Float,
            Value::String(_) => JsonPrimitive::String,
            Value::Array(_) => JsonPrimitive::Array,
            Value::Object(_) => JsonPrimitive::Object,
        }
    }

    /// Widen two column types to a common one.
    ///
    /// `Int` + `Float` -> `Float`. `Null` yields to the other side; any other
    /// disagreement keeps the first type seen.
    pub fn promote(a: JsonPrimitive, b: JsonPrimitive) -> JsonPrimitive {
        use JsonPrimitive::*;
        match (a, b) {
            (x, y) if x == y => x,
            (Int, Float) | (Float, Int) => Float,
            (Null, y) => y,
            (x, _) => x,
        }
    }
}
