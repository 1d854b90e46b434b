pub mod json_primitive;
pub use json_primitive::*;

pub mod cell;
pub use cell::*;

pub mod row;
pub use row::*;

pub mod record;
pub use record::*;

pub mod column_model;
pub use column_model::*;

pub mod grid;
pub use grid::*;
