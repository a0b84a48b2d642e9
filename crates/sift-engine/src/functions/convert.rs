//! Type-conversion functions.

use crate::error::{EngineError, Result};
use crate::value::Value;

use super::{FunctionRegistry, ScalarFunction};

pub(crate) fn register(registry: &FunctionRegistry) {
    registry.register(ScalarFunction::fixed("cast", 2, cast));
    registry.register(ScalarFunction::fixed("try_cast", 2, try_cast));
    registry.register(ScalarFunction::fixed("to_string", 1, to_string));
    registry.register(ScalarFunction::fixed("to_number", 1, to_number));
    registry.register(ScalarFunction::fixed("to_date", 1, to_date));
}

/// CAST(value, 'string' | 'number' | 'date').
fn cast(args: &[Value]) -> Result<Value> {
    let target = args[1].render().to_lowercase();
    match target.as_str() {
        "string" => Ok(Value::Str(args[0].render())),
        "number" => cast_number(&args[0]),
        "date" => Ok(Value::Timestamp(args[0].to_timestamp()?)),
        other => Err(EngineError::InvalidArgument(format!(
            "unknown cast type: {other}"
        ))),
    }
}

/// CAST with every error mapped to null.
fn try_cast(args: &[Value]) -> Result<Value> {
    Ok(cast(args).unwrap_or(Value::Null))
}

fn to_string(args: &[Value]) -> Result<Value> {
    Ok(Value::Str(args[0].render()))
}

fn to_number(args: &[Value]) -> Result<Value> {
    cast_number(&args[0])
}

fn to_date(args: &[Value]) -> Result<Value> {
    Ok(Value::Timestamp(args[0].to_timestamp()?))
}

/// Numeric conversion that keeps integers integral: already-numeric values
/// pass through, strings parse as integers first.
fn cast_number(value: &Value) -> Result<Value> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Str(s) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(Value::Int(n));
            }
            trimmed
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| EngineError::InvalidNumber(s.clone()))
        }
        other => Err(EngineError::InvalidNumber(format!(
            "{} value cannot be converted to a number",
            other.type_tag()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::global;

    fn call(name: &str, args: &[Value]) -> Value {
        global()
            .call(name, args)
            .unwrap_or_else(|e| panic!("{name} failed: {e}"))
    }

    fn s(text: &str) -> Value {
        Value::Str(String::from(text))
    }

    #[test]
    fn test_cast_to_string() {
        assert_eq!(call("cast", &[Value::Int(42), s("string")]), s("42"));
        assert_eq!(call("cast", &[Value::Bool(true), s("STRING")]), s("true"));
    }

    #[test]
    fn test_cast_to_number_keeps_integers() {
        assert_eq!(call("cast", &[s("42"), s("number")]), Value::Int(42));
        assert_eq!(call("cast", &[s("2.5"), s("number")]), Value::Float(2.5));
        assert_eq!(call("to_number", &[s(" 7 ")]), Value::Int(7));
    }

    #[test]
    fn test_cast_to_date() {
        assert!(matches!(
            call("cast", &[s("2024-06-01"), s("date")]),
            Value::Timestamp(_)
        ));
        assert!(matches!(call("to_date", &[s("2024-06-01")]), Value::Timestamp(_)));
    }

    #[test]
    fn test_cast_unknown_type_is_error() {
        assert!(matches!(
            global().call("cast", &[Value::Int(1), s("blob")]),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_try_cast_maps_errors_to_null() {
        assert_eq!(call("try_cast", &[s("abc"), s("number")]), Value::Null);
        assert_eq!(call("try_cast", &[s("abc"), s("blob")]), Value::Null);
        assert_eq!(call("try_cast", &[s("42"), s("number")]), Value::Int(42));
    }

    #[test]
    fn test_boolean_to_number_is_error() {
        assert!(global()
            .call("to_number", &[Value::Bool(false)])
            .is_err());
    }
}
