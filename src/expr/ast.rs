use std::fmt;

use ordered_float::NotNan;
use serde_json::{Number, Value};

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(NotNan<f64>),
    Bool(bool),
    Null,
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Int(i) => Value::Number(Number::from(*i)),
            Literal::Float(f) => Number::from_f64(f.into_inner()).map(Value::Number).unwrap_or(Value::Null),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(n) => write!(f, "{}", n.into_inner()),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(_) => write!(f, "String({})", self),
            Literal::Int(_) => write!(f, "Int({})", self),
            Literal::Float(_) => write!(f, "Float({})", self),
            Literal::Bool(_) => write!(f, "Bool({})", self),
            Literal::Null => write!(f, "Null"),
        }
    }
}

/// Row-level properties reachable through `row.<field>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowField {
    Index,
    Flagged,
    Starred,
}

impl RowField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "index" => Some(RowField::Index),
            "flagged" => Some(RowField::Flagged),
            "starred" => Some(RowField::Starred),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RowField::Index => "index",
            RowField::Flagged => "flagged",
            RowField::Starred => "starred",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Function {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    /// `value`: the cell bound for the current row
    CellValue,
    /// `cells.name` or `cells["name"]`
    Cell(String),
    Row(RowField),
    Call(Function),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(l) => write!(f, "{}", l),
            Expr::CellValue => write!(f, "value"),
            Expr::Cell(name) => write!(f, "cells[\"{}\"].value", name),
            Expr::Row(field) => write!(f, "row.{}", field.name()),
            Expr::Call(fun) => {
                write!(f, "{}(", fun.name)?;
                for (i, arg) in fun.args.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(l) => write!(f, "Literal({:?})", l),
            Expr::CellValue => write!(f, "CellValue"),
            Expr::Cell(_) => write!(f, "Cell({})", self),
            Expr::Row(_) => write!(f, "Row({})", self),
            Expr::Call(_) => write!(f, "Call({})", self),
        }
    }
}
