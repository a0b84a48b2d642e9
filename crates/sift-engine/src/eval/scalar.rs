//! Scalar expression evaluation over a single row.

use sift_sql_core::ast::ScalarExpr;

use crate::error::{EngineError, Result};
use crate::exec::{execute, ExecContext};
use crate::functions;
use crate::row::Row;
use crate::value::Value;

use super::predicate::eval_predicate;

/// Evaluates a scalar expression against a row.
///
/// Aggregate and window calls are consumed by their own stages; hitting
/// one here is a contract violation surfaced as an error. The bare `*`
/// only has meaning in projection and is rejected the same way.
pub fn eval_scalar(expr: &ScalarExpr, row: &Row, ctx: &ExecContext<'_>) -> Result<Value> {
    match expr {
        ScalarExpr::Column(name) => {
            if name == "*" {
                return Err(EngineError::InvalidArgument(String::from(
                    "* is only valid as a select item",
                )));
            }
            row.get(name)
                .cloned()
                .ok_or_else(|| EngineError::MissingColumn(name.clone()))
        }
        ScalarExpr::Literal(literal) => Ok(Value::from(literal)),
        ScalarExpr::Function { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_scalar(arg, row, ctx)?);
            }
            functions::global().call(name, &values)
        }
        ScalarExpr::Case { whens, else_ } => {
            for arm in whens {
                if eval_predicate(&arm.when, row, ctx)? {
                    return eval_scalar(&arm.then, row, ctx);
                }
            }
            match else_ {
                Some(e) => eval_scalar(e, row, ctx),
                None => Ok(Value::Null),
            }
        }
        ScalarExpr::Subquery(query) => {
            let rows = execute(query, ctx)?;
            match rows.len() {
                0 => Ok(Value::Null),
                1 => Ok(rows[0].values().next().cloned().unwrap_or(Value::Null)),
                n => Err(EngineError::ScalarSubqueryCardinality(n)),
            }
        }
        ScalarExpr::Aggregate { func, .. } => Err(EngineError::InvalidArgument(format!(
            "aggregate {} outside the grouping stage",
            func.output_name().to_uppercase()
        ))),
        ScalarExpr::Window { func, .. } => Err(EngineError::InvalidArgument(format!(
            "window function {} outside the window stage",
            func.output_name().to_uppercase()
        ))),
    }
}
