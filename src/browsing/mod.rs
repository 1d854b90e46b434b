pub mod errors;
pub use errors::*;

pub mod config;
pub use config::*;

pub mod facet;
pub use facet::*;

pub mod facet_state;
pub use facet_state::*;

pub mod string_values_facet_state;
pub use string_values_facet_state::*;

pub mod numeric_facet_state;
pub use numeric_facet_state::*;

pub mod any_facet_state;
pub use any_facet_state::*;

pub mod all_facets_state;
pub use all_facets_state::*;

pub mod row_aggregator;
pub use row_aggregator::*;
