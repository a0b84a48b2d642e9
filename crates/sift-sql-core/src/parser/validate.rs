//! Parse-time semantic validation.
//!
//! Runs on every query node the parser builds, including CTE bodies and
//! subqueries, so malformed trees never reach the executor.

use crate::ast::{CaseWhen, Predicate, Query, ScalarExpr, SelectItem};
use crate::lexer::Span;

use super::error::ParseError;

/// Checks the aggregate/GROUP BY contract and window placement for a query.
///
/// Rules enforced:
/// - window functions cannot be combined with GROUP BY or aggregates;
/// - aggregate and window calls are only legal as top-level select items;
/// - in a grouped query (GROUP BY present or any aggregate in the select
///   list), `*` is rejected and every plain column reference must appear in
///   the GROUP BY list.
pub(crate) fn check_query(query: &Query, span: Span) -> Result<(), ParseError> {
    let mut has_aggregate = false;
    let mut has_window = false;
    let mut has_star = false;
    let mut plain_columns: Vec<&str> = Vec::new();

    for item in &query.select {
        match &item.expr {
            ScalarExpr::Aggregate { arg, .. } => {
                has_aggregate = true;
                if let Some(arg) = arg {
                    reject_nested(arg, span)?;
                }
            }
            ScalarExpr::Window { args, .. } => {
                has_window = true;
                for arg in args {
                    reject_nested(arg, span)?;
                }
            }
            expr => {
                if expr.is_wildcard() {
                    has_star = true;
                } else {
                    collect_item(item, &mut plain_columns, span)?;
                }
            }
        }
    }

    if has_window && (has_aggregate || !query.group_by.is_empty()) {
        return Err(ParseError::new(
            "window functions cannot be combined with GROUP BY or aggregates",
            span,
        ));
    }

    let grouped = has_aggregate || !query.group_by.is_empty();
    if grouped {
        if has_star {
            return Err(ParseError::new(
                "SELECT * cannot be combined with GROUP BY or aggregates",
                span,
            ));
        }
        for column in plain_columns {
            if !query.group_by.iter().any(|g| g == column) {
                return Err(ParseError::new(
                    format!("column {column} must appear in GROUP BY or inside an aggregate"),
                    span,
                ));
            }
        }
    }

    Ok(())
}

/// Checks the single-column contract for scalar and IN subqueries.
pub(crate) fn check_single_column(query: &Query, span: Span) -> Result<(), ParseError> {
    if query.select.len() != 1 {
        return Err(ParseError::new(
            format!(
                "subquery must select exactly one column, found {}",
                query.select.len()
            ),
            span,
        ));
    }
    if query.select[0].expr.is_wildcard() {
        return Err(ParseError::new(
            "SELECT * is not allowed in a scalar or IN subquery",
            span,
        ));
    }
    Ok(())
}

/// Collects plain column references from a non-aggregate select item and
/// rejects aggregate or window calls nested inside it.
fn collect_item<'a>(
    item: &'a SelectItem,
    columns: &mut Vec<&'a str>,
    span: Span,
) -> Result<(), ParseError> {
    collect_scalar(&item.expr, columns, span)
}

fn collect_scalar<'a>(
    expr: &'a ScalarExpr,
    columns: &mut Vec<&'a str>,
    span: Span,
) -> Result<(), ParseError> {
    match expr {
        ScalarExpr::Column(name) => {
            columns.push(name);
            Ok(())
        }
        ScalarExpr::Literal(_) | ScalarExpr::Subquery(_) => Ok(()),
        ScalarExpr::Function { args, .. } => {
            for arg in args {
                collect_scalar(arg, columns, span)?;
            }
            Ok(())
        }
        ScalarExpr::Case { whens, else_ } => {
            for CaseWhen { when, then } in whens {
                collect_predicate(when, columns);
                collect_scalar(then, columns, span)?;
            }
            if let Some(e) = else_ {
                collect_scalar(e, columns, span)?;
            }
            Ok(())
        }
        ScalarExpr::Aggregate { .. } => Err(ParseError::new(
            "aggregate calls are only allowed as top-level select items",
            span,
        )),
        ScalarExpr::Window { .. } => Err(ParseError::new(
            "window function calls are only allowed as top-level select items",
            span,
        )),
    }
}

/// Rejects aggregate/window calls nested inside aggregate or window args.
fn reject_nested(expr: &ScalarExpr, span: Span) -> Result<(), ParseError> {
    match expr {
        ScalarExpr::Aggregate { .. } => Err(ParseError::new(
            "aggregate calls cannot be nested",
            span,
        )),
        ScalarExpr::Window { .. } => Err(ParseError::new(
            "window function calls cannot be nested",
            span,
        )),
        ScalarExpr::Function { args, .. } => {
            for arg in args {
                reject_nested(arg, span)?;
            }
            Ok(())
        }
        ScalarExpr::Case { whens, else_ } => {
            for arm in whens {
                reject_nested(&arm.then, span)?;
            }
            if let Some(e) = else_ {
                reject_nested(e, span)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Collects column references from a predicate in a select-list CASE arm.
fn collect_predicate<'a>(pred: &'a Predicate, columns: &mut Vec<&'a str>) {
    match pred {
        Predicate::And(l, r) | Predicate::Or(l, r) => {
            collect_predicate(l, columns);
            collect_predicate(r, columns);
        }
        Predicate::Compare { column, .. }
        | Predicate::InList { column, .. }
        | Predicate::InSubquery { column, .. }
        | Predicate::Like { column, .. }
        | Predicate::Between { column, .. }
        | Predicate::IsNull { column, .. } => columns.push(column),
        Predicate::CompareColumns { left, right, .. } => {
            columns.push(left);
            columns.push(right);
        }
        Predicate::Exists { .. } => {}
    }
}
