use std::sync::Arc;

use crate::{
    browsing::{AggregationState, AnyFacetState, Facet, FacetResult, FacetState, FacetStateError},
    model::{Row, RowId},
};

/// The states of several facets computed in one pass over the rows.
/// Position `i` holds the state of the `i`-th facet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllFacetsState {
    states: Vec<AnyFacetState>,
}

impl AllFacetsState {
    /// Empty states for each facet.
    pub fn new(facets: &[Arc<Facet>]) -> Self {
        Self { states: facets.iter().map(Facet::initial_state).collect() }
    }

    pub fn from_states(states: Vec<AnyFacetState>) -> Self { Self { states } }

    pub fn states(&self) -> &[AnyFacetState] { &self.states }

    pub fn get(&self, index: usize) -> Option<&AnyFacetState> { self.states.get(index) }

    /// State of the facet called `name`, if any.
    pub fn by_name(&self, name: &str) -> Option<&AnyFacetState> {
        self.states.iter().find(|s| s.facet().name() == name)
    }

    pub fn len(&self) -> usize { self.states.len() }

    pub fn is_empty(&self) -> bool { self.states.is_empty() }
}

impl AggregationState for AllFacetsState {
    fn sum(&self, other: &Self) -> FacetResult<Self> {
        if self.states.len() != other.states.len() {
            return Err(FacetStateError::incompatible(
                format!("{} facet states", self.states.len()),
                format!("{} facet states", other.states.len()),
            ));
        }

        let states = self.states.iter()
            .zip(&other.states)
            .map(|(a, b)| a.sum(b))
            .collect::<FacetResult<Vec<_>>>()?;
        Ok(Self { states })
    }

    fn with_row(self, row_id: RowId, row: &Row) -> Self {
        let states = self.states.into_iter().map(|s| s.with_row(row_id, row)).collect();
        Self { states }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{browsing::FacetConfig, model::{ColumnModel, Record}};
    use serde_json::json;

    fn facets() -> Vec<Arc<Facet>> {
        let model = Arc::new(ColumnModel::from_names(["city", "age"]));
        vec![
            FacetConfig::list("city").apply(&model).unwrap(),
            FacetConfig::range("age").apply(&model).unwrap(),
        ]
    }

    #[test]
    fn folds_each_row_into_every_facet() {
        let state = AllFacetsState::new(&facets())
            .with_row(0, &Row::from_values([json!("Porto"), json!(30)]))
            .with_row(1, &Row::from_values([json!("Porto"), json!(null)]));

        let city = state.by_name("city").unwrap().as_string_values().unwrap();
        assert_eq!(city.count_of("Porto"), 2);

        let age = state.get(1).unwrap().as_numeric().unwrap();
        assert_eq!(age.numeric_count(), 1);
        assert_eq!(age.blank_count(), 1);
    }

    #[test]
    fn sum_is_element_wise() {
        let facets = facets();
        let a = AllFacetsState::new(&facets).with_row(0, &Row::from_values([json!("Porto"), json!(30)]));
        let b = AllFacetsState::new(&facets).with_row(1, &Row::from_values([json!("Braga"), json!(40)]));

        let merged = a.sum(&b).unwrap();
        let city = merged.get(0).unwrap().as_string_values().unwrap();
        assert_eq!(city.total_count(), 2);
        assert_eq!(merged.get(1).unwrap().as_numeric().unwrap().max(), Some(40.0));
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let facets = facets();
        let full = AllFacetsState::new(&facets);
        let short = AllFacetsState::new(&facets[..1]);
        assert!(full.sum(&short).unwrap_err().is_invalid_argument());

        let swapped = AllFacetsState::from_states(vec![facets[1].initial_state(), facets[0].initial_state()]);
        assert!(full.sum(&swapped).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn records_mode_is_rejected() {
        let state = AllFacetsState::new(&facets());
        assert!(state.with_record(&Record::new(0, 0), &[]).unwrap_err().is_illegal_state());
    }
}
