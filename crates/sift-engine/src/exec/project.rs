//! SELECT-list projection and DISTINCT.

use std::collections::HashSet;

use sift_sql_core::ast::{Query, ScalarExpr, SelectItem};

use crate::error::{EngineError, Result};
use crate::eval::eval_scalar;
use crate::row::Row;

use super::ExecContext;

/// Builds the output rows named by the select list.
///
/// By the time projection runs, the grouping stage has already turned
/// aggregate items into plain columns of the aggregated rows, and the
/// window stage has attached its outputs; both kinds resolve here as
/// column lookups under their output names.
pub(crate) fn apply_select_list(
    rows: Vec<Row>,
    query: &Query,
    ctx: &ExecContext<'_>,
) -> Result<Vec<Row>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(project_row(&row, &query.select, ctx)?);
    }
    Ok(out)
}

fn project_row(row: &Row, select: &[SelectItem], ctx: &ExecContext<'_>) -> Result<Row> {
    let mut projected = Row::new();
    for (position, item) in select.iter().enumerate() {
        match &item.expr {
            expr if expr.is_wildcard() => {
                for (name, value) in row.iter() {
                    projected.insert(name.clone(), value.clone());
                }
            }
            ScalarExpr::Column(name) => {
                let value = row
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EngineError::MissingColumn(name.clone()))?;
                let output = item.alias.as_deref().unwrap_or(name);
                projected.insert(output, value);
            }
            ScalarExpr::Aggregate { func, .. } => {
                let output = item.alias.as_deref().unwrap_or(func.output_name());
                let value = row
                    .get(output)
                    .cloned()
                    .ok_or_else(|| EngineError::MissingColumn(String::from(output)))?;
                projected.insert(output, value);
            }
            ScalarExpr::Window { func, .. } => {
                let output = item.alias.as_deref().unwrap_or(func.output_name());
                let value = row
                    .get(output)
                    .cloned()
                    .ok_or_else(|| EngineError::MissingColumn(String::from(output)))?;
                projected.insert(output, value);
            }
            expr => {
                let value = eval_scalar(expr, row, ctx)?;
                let output = match &item.alias {
                    Some(alias) => alias.clone(),
                    None => default_name(expr, position),
                };
                projected.insert(output, value);
            }
        }
    }
    Ok(projected)
}

/// Fallback output name for an unaliased computed item: the function name
/// for calls, a positional name for everything else.
fn default_name(expr: &ScalarExpr, position: usize) -> String {
    match expr {
        ScalarExpr::Function { name, .. } => name.clone(),
        _ => format!("col_{}", position + 1),
    }
}

/// Removes duplicate rows, keeping first occurrences in order.
pub(crate) fn apply_distinct(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(row.canonical_key()) {
            out.push(row);
        }
    }
    out
}
