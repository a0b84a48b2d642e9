//! Boolean predicate evaluation over a single row.

use sift_sql_core::ast::{CompareOp, Predicate};

use crate::error::{EngineError, Result};
use crate::exec::{execute, ExecContext};
use crate::row::Row;
use crate::value::Value;

use super::compare::{compare_values, values_equal};
use super::like::like_match;

/// Evaluates a predicate against a row.
///
/// AND/OR evaluate both sides strictly: an error on either side fails the
/// whole predicate, matching the "errors always surface" contract.
/// Subquery forms (`EXISTS`, `IN (SELECT ...)`) run against the context's
/// CTE bindings and producer; they never see the outer row.
pub fn eval_predicate(pred: &Predicate, row: &Row, ctx: &ExecContext<'_>) -> Result<bool> {
    match pred {
        Predicate::And(left, right) => {
            let l = eval_predicate(left, row, ctx)?;
            let r = eval_predicate(right, row, ctx)?;
            Ok(l && r)
        }
        Predicate::Or(left, right) => {
            let l = eval_predicate(left, row, ctx)?;
            let r = eval_predicate(right, row, ctx)?;
            Ok(l || r)
        }
        Predicate::Compare { column, op, value } => {
            let left = column_value(row, column)?;
            compare_values(left, *op, &Value::from(value))
        }
        Predicate::CompareColumns { left, op, right } => {
            let l = column_value(row, left)?;
            let r = column_value(row, right)?;
            compare_values(l, *op, r)
        }
        Predicate::InList {
            column,
            values,
            negated,
        } => {
            let left = column_value(row, column)?;
            let found = values
                .iter()
                .any(|candidate| values_equal(left, &Value::from(candidate)));
            Ok(found != *negated)
        }
        Predicate::InSubquery {
            column,
            query,
            negated,
        } => {
            let left = column_value(row, column)?;
            let rows = execute(query, ctx)?;
            let found = rows
                .iter()
                .filter_map(|r| r.values().next())
                .any(|candidate| values_equal(left, candidate));
            Ok(found != *negated)
        }
        Predicate::Like {
            column,
            pattern,
            negated,
        } => {
            let matched = match column_value(row, column)? {
                Value::Str(text) => like_match(text, pattern)?,
                // Null never matches, negated or not.
                Value::Null => return Ok(false),
                other => {
                    return Err(EngineError::TypeMismatch(format!(
                        "LIKE requires a string column, {column} is {}",
                        other.type_tag()
                    )));
                }
            };
            Ok(matched != *negated)
        }
        Predicate::Between {
            column,
            low,
            high,
            negated,
        } => {
            let value = column_value(row, column)?;
            let above = compare_values(value, CompareOp::GtEq, &Value::from(low))?;
            let below = compare_values(value, CompareOp::LtEq, &Value::from(high))?;
            Ok((above && below) != *negated)
        }
        Predicate::IsNull { column, negated } => {
            let is_null = match row.get(column) {
                None => true,
                Some(value) => value.is_null(),
            };
            Ok(is_null != *negated)
        }
        Predicate::Exists { query, negated } => {
            let rows = execute(query, ctx)?;
            Ok(!rows.is_empty() != *negated)
        }
    }
}

fn column_value<'r>(row: &'r Row, column: &str) -> Result<&'r Value> {
    row.get(column)
        .ok_or_else(|| EngineError::MissingColumn(String::from(column)))
}
