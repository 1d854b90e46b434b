use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One cell of a row. A cell either carries a value or records an error that
/// happened when the value was produced (e.g. by a failed transform).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Cell {
    pub fn new(value: impl Into<Value>) -> Self {
        Self { value: value.into(), error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { value: Value::Null, error: Some(message.into()) }
    }

    pub fn is_error(&self) -> bool { self.error.is_some() }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self { Cell::new(value) }
}
