use std::{collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;
use serde_json::{Number, Value};

use crate::expr::{as_number, number_value, to_canonical_string, EvalOutcome};

/// A scalar function callable from expressions.
/// Implementations are stateless and shared by every evaluation.
///
/// The evaluator short-circuits on errors, so `call` only ever sees `Blank`
/// or `Value` arguments.
pub trait ScalarFunction: Send + Sync {
    /// Canonical name ("upper", "toNumber", ...). Lookup ignores case.
    fn name(&self) -> &'static str;

    fn min_args(&self) -> usize { 1 }

    /// `None` means variadic.
    fn max_args(&self) -> Option<usize> { Some(self.min_args()) }

    fn accepts_arity(&self, n: usize) -> bool {
        n >= self.min_args() && self.max_args().is_none_or(|max| n <= max)
    }

    fn call(&self, args: &[EvalOutcome]) -> EvalOutcome;
}

/// Case-insensitive registry of scalar functions.
#[derive(Default)]
pub struct FunctionRegistry {
    by_name: HashMap<String, Arc<dyn ScalarFunction>>,
}

static GLOBAL_REGISTRY: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::default_function_registry);

impl FunctionRegistry {
    pub fn new() -> Self { Self { by_name: HashMap::new() } }

    /// The shared registry with every built-in function.
    pub fn global() -> &'static FunctionRegistry { &GLOBAL_REGISTRY }

    pub fn register<F: ScalarFunction + 'static>(&mut self, function: F) {
        self.by_name.insert(function.name().to_ascii_lowercase(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ScalarFunction>> {
        self.by_name.get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn list(&self) -> Vec<String> {
        let mut v: Vec<_> = self.by_name.values().map(|f| f.name().to_string()).collect();
        v.sort();
        v
    }

    pub fn default_function_registry() -> Self {
        let mut registry = Self::new();
        registry.register(StringMapFn { name: "upper", map: str::to_uppercase });
        registry.register(StringMapFn { name: "lower", map: str::to_lowercase });
        registry.register(StringMapFn { name: "trim", map: |s| s.trim().to_string() });
        registry.register(LengthFn);
        registry.register(ToStringFn);
        registry.register(ToNumberFn);
        registry.register(IsBlankFn);
        registry.register(CoalesceFn);
        registry
    }
}

static BLANK: EvalOutcome = EvalOutcome::Blank;

fn single(args: &[EvalOutcome]) -> &EvalOutcome {
    args.first().unwrap_or(&BLANK)
}

struct StringMapFn {
    name: &'static str,
    map: fn(&str) -> String,
}

impl ScalarFunction for StringMapFn {
    fn name(&self) -> &'static str { self.name }

    fn call(&self, args: &[EvalOutcome]) -> EvalOutcome {
        match single(args) {
            EvalOutcome::Value(Value::String(s)) => EvalOutcome::classify(Value::String((self.map)(s))),
            EvalOutcome::Value(other) => EvalOutcome::error(format!("{} expects a string, got {}", self.name, other)),
            outcome => outcome.clone(),
        }
    }
}

struct LengthFn;
impl ScalarFunction for LengthFn {
    fn name(&self) -> &'static str { "length" }

    fn call(&self, args: &[EvalOutcome]) -> EvalOutcome {
        let len = match single(args) {
            EvalOutcome::Value(Value::String(s)) => s.chars().count(),
            EvalOutcome::Value(Value::Array(a)) => a.len(),
            EvalOutcome::Value(other) => return EvalOutcome::error(format!("length expects a string or array, got {other}")),
            outcome => return outcome.clone(),
        };
        EvalOutcome::Value(Value::Number(Number::from(len as u64)))
    }
}

struct ToStringFn;
impl ScalarFunction for ToStringFn {
    fn name(&self) -> &'static str { "toString" }

    fn call(&self, args: &[EvalOutcome]) -> EvalOutcome {
        match single(args) {
            EvalOutcome::Value(v) => EvalOutcome::Value(Value::String(to_canonical_string(v))),
            outcome => outcome.clone(),
        }
    }
}

struct ToNumberFn;
impl ScalarFunction for ToNumberFn {
    fn name(&self) -> &'static str { "toNumber" }

    fn call(&self, args: &[EvalOutcome]) -> EvalOutcome {
        match single(args) {
            EvalOutcome::Value(v) => as_number(v)
                .and_then(number_value)
                .map(EvalOutcome::Value)
                .unwrap_or_else(|| EvalOutcome::error(format!("Cannot parse {} as number", v))),
            outcome => outcome.clone(),
        }
    }
}

struct IsBlankFn;
impl ScalarFunction for IsBlankFn {
    fn name(&self) -> &'static str { "isBlank" }

    fn call(&self, args: &[EvalOutcome]) -> EvalOutcome {
        EvalOutcome::Value(Value::Bool(single(args).is_blank()))
    }
}

/// First non-blank argument.
struct CoalesceFn;
impl ScalarFunction for CoalesceFn {
    fn name(&self) -> &'static str { "coalesce" }
    fn max_args(&self) -> Option<usize> { None }

    fn call(&self, args: &[EvalOutcome]) -> EvalOutcome {
        args.iter()
            .find(|a| !a.is_blank())
            .cloned()
            .unwrap_or(EvalOutcome::Blank)
    }
}
