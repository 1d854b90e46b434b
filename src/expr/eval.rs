use serde_json::{Number, Value};

use crate::{
    expr::{Bindings, EvalOutcome, Expr, Function, FunctionRegistry, RowField},
    model::Cell,
};

pub struct Eval;

impl Eval {
    pub fn eval(expr: &Expr, bindings: &Bindings<'_>) -> EvalOutcome {
        match expr {
            Expr::Literal(l) => EvalOutcome::classify(l.to_value()),
            Expr::CellValue => Self::cell_outcome(bindings.cell),
            Expr::Cell(name) => match bindings.column_model.get_column_index_by_name(name) {
                Some(index) => Self::cell_outcome(bindings.row.get_cell(index)),
                None => EvalOutcome::error(format!("No column named {name}")),
            },
            Expr::Row(field) => EvalOutcome::Value(match field {
                RowField::Index => Value::Number(Number::from(bindings.row_id)),
                RowField::Flagged => Value::Bool(bindings.row.flagged),
                RowField::Starred => Value::Bool(bindings.row.starred),
            }),
            Expr::Call(f) => Self::eval_call(f, bindings),
        }
    }

    fn cell_outcome(cell: Option<&Cell>) -> EvalOutcome {
        match cell {
            None => EvalOutcome::Blank,
            Some(Cell { error: Some(message), .. }) => EvalOutcome::error(message.clone()),
            Some(cell) => EvalOutcome::classify(cell.value.clone()),
        }
    }

    fn eval_call(f: &Function, bindings: &Bindings<'_>) -> EvalOutcome {
        let mut args = Vec::with_capacity(f.args.len());
        for arg in &f.args {
            let outcome = Self::eval(arg, bindings);
            // first failing argument wins
            if outcome.is_error() {
                return outcome;
            }
            args.push(outcome);
        }

        match FunctionRegistry::global().get(&f.name) {
            Some(function) => function.call(&args),
            None => EvalOutcome::error(format!("Unknown function {}", f.name)),
        }
    }
}
