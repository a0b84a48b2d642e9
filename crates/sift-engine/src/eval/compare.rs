//! The single comparison dispatch every stage shares.

use std::cmp::Ordering;

use sift_sql_core::ast::CompareOp;

use crate::error::{EngineError, Result};
use crate::value::Value;

/// Compares two values under the dialect's rules.
///
/// - `null op null` is true only for `=`;
/// - `null` against anything else is false for every operator;
/// - ints and floats compare as 64-bit floats;
/// - strings compare lexicographically;
/// - booleans admit only `=` and `!=`;
/// - timestamps compare chronologically;
/// - anything across families is a type mismatch error.
pub fn compare_values(left: &Value, op: CompareOp, right: &Value) -> Result<bool> {
    use CompareOp::{Eq, NotEq};

    match (left, right) {
        (Value::Null, Value::Null) => Ok(op == Eq),
        (Value::Null, _) | (_, Value::Null) => Ok(false),
        (l, r) if is_numeric(l) && is_numeric(r) => {
            let (a, b) = (l.to_f64()?, r.to_f64()?);
            Ok(apply_ordering(a.partial_cmp(&b), op))
        }
        (Value::Str(a), Value::Str(b)) => Ok(apply_ordering(Some(a.cmp(b)), op)),
        (Value::Bool(a), Value::Bool(b)) => match op {
            Eq => Ok(a == b),
            NotEq => Ok(a != b),
            _ => Err(EngineError::TypeMismatch(String::from(
                "booleans cannot be ordered",
            ))),
        },
        (Value::Timestamp(a), Value::Timestamp(b)) => Ok(apply_ordering(Some(a.cmp(b)), op)),
        (l, r) => Err(EngineError::TypeMismatch(format!(
            "cannot compare {} and {}",
            l.type_tag(),
            r.type_tag()
        ))),
    }
}

/// Tests equality under the comparison rules, mapping errors to "not
/// equal". Used by IN-style membership and rank tie detection.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    compare_values(left, CompareOp::Eq, right).unwrap_or(false)
}

/// Orders two values for sorting. Pairs the dispatch cannot order (nulls,
/// cross-family mismatches, unordered booleans) collapse to `Equal`, so a
/// stable sort leaves them in input order.
#[must_use]
pub fn sort_ordering(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (l, r) if is_numeric(l) && is_numeric(r) => {
            match (l.to_f64(), r.to_f64()) {
                (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn is_numeric(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Float(_))
}

fn apply_ordering(ordering: Option<Ordering>, op: CompareOp) -> bool {
    let Some(ordering) = ordering else {
        // NaN against anything: no ordering holds, equality fails.
        return op == CompareOp::NotEq;
    };
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::NotEq => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::LtEq => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::GtEq => ordering != Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_rules() {
        assert!(compare_values(&Value::Null, CompareOp::Eq, &Value::Null).unwrap());
        assert!(!compare_values(&Value::Null, CompareOp::NotEq, &Value::Null).unwrap());
        assert!(!compare_values(&Value::Null, CompareOp::Lt, &Value::Null).unwrap());
        assert!(!compare_values(&Value::Null, CompareOp::Eq, &Value::Int(1)).unwrap());
        assert!(!compare_values(&Value::Int(1), CompareOp::NotEq, &Value::Null).unwrap());
    }

    #[test]
    fn test_int_float_coercion() {
        assert!(compare_values(&Value::Int(2), CompareOp::Eq, &Value::Float(2.0)).unwrap());
        assert!(compare_values(&Value::Int(2), CompareOp::Lt, &Value::Float(2.5)).unwrap());
    }

    #[test]
    fn test_string_lexicographic() {
        assert!(compare_values(
            &Value::Str(String::from("apple")),
            CompareOp::Lt,
            &Value::Str(String::from("banana"))
        )
        .unwrap());
    }

    #[test]
    fn test_bool_ordering_is_error() {
        assert!(compare_values(&Value::Bool(true), CompareOp::Eq, &Value::Bool(true)).unwrap());
        assert!(
            compare_values(&Value::Bool(true), CompareOp::Lt, &Value::Bool(false)).is_err()
        );
    }

    #[test]
    fn test_cross_family_is_error() {
        assert!(compare_values(
            &Value::Int(30),
            CompareOp::Eq,
            &Value::Str(String::from("30"))
        )
        .is_err());
    }

    #[test]
    fn test_values_equal_swallows_errors() {
        assert!(!values_equal(&Value::Int(30), &Value::Str(String::from("30"))));
        assert!(values_equal(&Value::Null, &Value::Null));
    }

    #[test]
    fn test_sort_ordering_collapses_incomparables() {
        assert_eq!(
            sort_ordering(&Value::Null, &Value::Int(1)),
            Ordering::Equal
        );
        assert_eq!(
            sort_ordering(&Value::Int(1), &Value::Int(2)),
            Ordering::Less
        );
    }
}
