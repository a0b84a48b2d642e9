//! The scalar function registry.
//!
//! One process-wide, case-insensitive name-to-function map. Built-ins
//! register once at first use; dynamic registration stays possible behind
//! a reader/writer lock, and lookups only ever take the read side.

mod conditional;
mod convert;
mod datetime;
mod math;
mod string;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::{EngineError, Result};
use crate::value::Value;

/// The evaluation body of a scalar function.
pub type FunctionHandler = fn(&[Value]) -> Result<Value>;

/// A named, arity-checked scalar function.
pub struct ScalarFunction {
    /// Canonical name, as registered.
    pub name: &'static str,
    /// Minimum number of arguments.
    pub min_args: usize,
    /// Maximum number of arguments; `None` means variadic.
    pub max_args: Option<usize>,
    handler: FunctionHandler,
}

impl ScalarFunction {
    /// Creates a function with a fixed argument count.
    #[must_use]
    pub const fn fixed(name: &'static str, args: usize, handler: FunctionHandler) -> Self {
        Self {
            name,
            min_args: args,
            max_args: Some(args),
            handler,
        }
    }

    /// Creates a function with an argument range.
    #[must_use]
    pub const fn ranged(
        name: &'static str,
        min_args: usize,
        max_args: usize,
        handler: FunctionHandler,
    ) -> Self {
        Self {
            name,
            min_args,
            max_args: Some(max_args),
            handler,
        }
    }

    /// Creates a variadic function with a lower bound only.
    #[must_use]
    pub const fn variadic(name: &'static str, min_args: usize, handler: FunctionHandler) -> Self {
        Self {
            name,
            min_args,
            max_args: None,
            handler,
        }
    }

    /// Checks arity and evaluates.
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        let ok = args.len() >= self.min_args
            && self.max_args.is_none_or(|max| args.len() <= max);
        if !ok {
            let expected = match self.max_args {
                Some(max) if max == self.min_args => self.min_args.to_string(),
                Some(max) => format!("{}..={max}", self.min_args),
                None => format!("at least {}", self.min_args),
            };
            return Err(EngineError::Arity {
                function: String::from(self.name),
                expected,
                found: args.len(),
            });
        }
        (self.handler)(args)
    }
}

/// A case-insensitive registry of scalar functions.
pub struct FunctionRegistry {
    functions: RwLock<HashMap<String, Arc<ScalarFunction>>>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            functions: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry holding every built-in.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        string::register(&registry);
        math::register(&registry);
        datetime::register(&registry);
        convert::register(&registry);
        conditional::register(&registry);
        registry
    }

    /// Registers a function, replacing any previous one of the same name.
    pub fn register(&self, function: ScalarFunction) {
        let mut functions = self
            .functions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        functions.insert(function.name.to_ascii_lowercase(), Arc::new(function));
    }

    /// Returns true if a function of this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains_key(&name.to_ascii_lowercase())
    }

    /// Looks up and invokes a function.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let function = {
            let functions = self
                .functions
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            functions
                .get(&name.to_ascii_lowercase())
                .cloned()
                .ok_or_else(|| EngineError::UnknownFunction(String::from(name)))?
        };
        function.invoke(args)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// The process-wide registry, initialized on first use.
pub fn global() -> &'static FunctionRegistry {
    static REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();
    REGISTRY.get_or_init(FunctionRegistry::with_builtins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = global();
        for name in ["upper", "UPPER", "Upper"] {
            let out = registry
                .call(name, &[Value::Str(String::from("abc"))])
                .unwrap();
            assert_eq!(out, Value::Str(String::from("ABC")));
        }
    }

    #[test]
    fn test_unknown_function() {
        assert!(matches!(
            global().call("frobnicate", &[]),
            Err(EngineError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_arity_violations() {
        let err = global().call("upper", &[]).unwrap_err();
        assert!(matches!(err, EngineError::Arity { .. }));

        let err = global()
            .call("round", &[Value::Int(1), Value::Int(2), Value::Int(3)])
            .unwrap_err();
        assert!(matches!(err, EngineError::Arity { .. }));
    }

    #[test]
    fn test_dynamic_registration() {
        let registry = FunctionRegistry::new();
        registry.register(ScalarFunction::fixed("answer", 0, |_| Ok(Value::Int(42))));
        assert_eq!(registry.call("ANSWER", &[]).unwrap(), Value::Int(42));
        assert!(!registry.contains("upper"));
    }
}
