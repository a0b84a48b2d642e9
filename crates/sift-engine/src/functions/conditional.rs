//! Conditional functions.

use sift_sql_core::ast::CompareOp;

use crate::error::Result;
use crate::eval::compare_values;
use crate::value::Value;

use super::{FunctionRegistry, ScalarFunction};

pub(crate) fn register(registry: &FunctionRegistry) {
    registry.register(ScalarFunction::variadic("coalesce", 1, coalesce));
    registry.register(ScalarFunction::fixed("nullif", 2, nullif));
}

/// First non-null argument, else null.
fn coalesce(args: &[Value]) -> Result<Value> {
    Ok(args
        .iter()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null))
}

/// Null when both arguments compare equal, else the first argument.
/// A comparison error counts as "not equal".
fn nullif(args: &[Value]) -> Result<Value> {
    let equal = compare_values(&args[0], CompareOp::Eq, &args[1]).unwrap_or(false);
    if equal {
        Ok(Value::Null)
    } else {
        Ok(args[0].clone())
    }
}
