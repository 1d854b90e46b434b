use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    browsing::{AnyFacetState, FacetResult, FacetStateError, NumericFacetState, StringValuesFacetState},
    expr::{Evaluable, Expression},
    model::ColumnModel,
};

/// Which accumulator a facet uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetKind {
    /// Distribution of distinct string values (list facets)
    StringValues,
    /// Numeric bounds and counts (range facets)
    Numeric,
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetKind::StringValues => write!(f, "StringValuesFacetState"),
            FacetKind::Numeric => write!(f, "NumericFacetState"),
        }
    }
}

/// Describes one facet: which column it looks at and the expression it
/// evaluates there. Shared by every state computed for it.
#[derive(Debug, Clone)]
pub struct Facet {
    name: String,
    kind: FacetKind,
    column_name: String,
    cell_index: usize,
    column_model: Arc<ColumnModel>,
    expression: Arc<dyn Evaluable>,
}

impl Facet {
    pub fn new(
        name: impl Into<String>,
        kind: FacetKind,
        column_model: Arc<ColumnModel>,
        column_name: &str,
        expression: Arc<dyn Evaluable>,
    ) -> FacetResult<Self> {
        let cell_index = column_model.get_column_index_by_name(column_name)
            .ok_or_else(|| FacetStateError::invalid_config(format!(
                "No column named {column_name}, available: {}",
                column_model.column_names().join(", ")
            )))?;

        Ok(Self {
            name: name.into(),
            kind,
            column_name: column_name.to_string(),
            cell_index,
            column_model,
            expression,
        })
    }

    /// List facet over `column_name` evaluating `expression`.
    pub fn list(column_model: Arc<ColumnModel>, column_name: &str, expression: &str) -> FacetResult<Self> {
        let expression = Expression::parse(expression)?;
        Self::new(column_name, FacetKind::StringValues, column_model, column_name, Arc::new(expression))
    }

    /// Range facet over `column_name` evaluating `expression`.
    pub fn range(column_model: Arc<ColumnModel>, column_name: &str, expression: &str) -> FacetResult<Self> {
        let expression = Expression::parse(expression)?;
        Self::new(column_name, FacetKind::Numeric, column_model, column_name, Arc::new(expression))
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn kind(&self) -> FacetKind { self.kind }
    pub fn cell_index(&self) -> usize { self.cell_index }
    pub fn column_model(&self) -> &ColumnModel { &self.column_model }
    pub fn expression(&self) -> &dyn Evaluable { self.expression.as_ref() }

    /// Fresh state with nothing counted, one per partition.
    pub fn initial_state(self: &Arc<Self>) -> AnyFacetState {
        match self.kind {
            FacetKind::StringValues => StringValuesFacetState::new(Arc::clone(self)).into(),
            FacetKind::Numeric => NumericFacetState::new(Arc::clone(self)).into(),
        }
    }

    /// Same facet: either the very same descriptor or an identical one.
    pub fn same_as(self: &Arc<Self>, other: &Arc<Self>) -> bool {
        Arc::ptr_eq(self, other) || **self == **other
    }
}

impl PartialEq for Facet {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.column_name == other.column_name
            && self.cell_index == other.cell_index
            && self.column_model == other.column_model
            && self.expression.source() == other.expression.source()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetType {
    List,
    Range,
}

impl FacetType {
    pub fn kind(&self) -> FacetKind {
        match self {
            FacetType::List => FacetKind::StringValues,
            FacetType::Range => FacetKind::Numeric,
        }
    }
}

fn default_expression() -> String { "value".to_string() }

/// Serializable facet description, as sent by a client:
///
/// ```json
/// {"type": "list", "name": "City", "columnName": "city", "expression": "trim(value)"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetConfig {
    #[serde(rename = "type")]
    pub facet_type: FacetType,
    /// Display name, defaults to the column name
    #[serde(default)]
    pub name: String,
    pub column_name: String,
    #[serde(default = "default_expression")]
    pub expression: String,
}

impl FacetConfig {
    pub fn list(column_name: &str) -> Self {
        Self {
            facet_type: FacetType::List,
            name: column_name.to_string(),
            column_name: column_name.to_string(),
            expression: default_expression(),
        }
    }

    pub fn range(column_name: &str) -> Self {
        Self { facet_type: FacetType::Range, ..Self::list(column_name) }
    }

    pub fn with_expression(mut self, expression: &str) -> Self {
        self.expression = expression.to_string();
        self
    }

    /// Resolve the column and parse the expression against a column model.
    pub fn apply(&self, column_model: &Arc<ColumnModel>) -> FacetResult<Arc<Facet>> {
        let expression = Expression::parse(&self.expression)?;
        let name = if self.name.is_empty() { self.column_name.as_str() } else { self.name.as_str() };
        let facet = Facet::new(
            name,
            self.facet_type.kind(),
            Arc::clone(column_model),
            &self.column_name,
            Arc::new(expression),
        )?;

        debug!(facet = %facet.name, kind = %facet.kind, column = %facet.column_name, expression = %self.expression, "facet configured");
        Ok(Arc::new(facet))
    }
}
