use serde_json::{Number, Value};

/// Canonical string form of a non-blank value, used as the counting key.
///
/// Strings are kept verbatim, integral floats drop the fractional part
/// (`2.0` -> `"2"`), other scalars use their display form and containers
/// are rendered as compact JSON.
pub fn to_canonical_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_string(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Numeric reading of a value: numbers as-is, strings when they parse as a
/// finite number.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Largest magnitude below which every integral `f64` is exact.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Wrap an `f64` back into a JSON number, preferring the integer form.
pub fn number_value(f: f64) -> Option<Value> {
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::Number(Number::from(f as i64)));
    }
    Number::from_f64(f).map(Value::Number)
}
