pub mod parse_error;
pub use parse_error::*;

pub mod eval_outcome;
pub use eval_outcome::*;

pub mod coercion;
pub use coercion::*;

pub mod ast;
pub use ast::*;

pub mod parser;
pub use parser::*;

pub mod functions;
pub use functions::*;

pub mod bindings;
pub use bindings::*;

pub mod eval;
pub use eval::*;

pub mod evaluable;
pub use evaluable::*;
