//! Hash grouping and aggregation.

use std::collections::HashSet;

use indexmap::IndexMap;

use sift_sql_core::ast::{AggregateFunc, Query, ScalarExpr, SelectItem};

use crate::error::Result;
use crate::eval::eval_scalar;
use crate::row::{column_key, Row};
use crate::value::Value;

use super::ExecContext;

/// One aggregate to compute per group, with its output column name.
struct AggSpec<'a> {
    func: AggregateFunc,
    arg: Option<&'a ScalarExpr>,
    distinct: bool,
    output: &'a str,
}

/// Groups rows and computes aggregates.
///
/// Output rows carry the group-by columns plus one column per aggregate
/// under its alias (or the lowercased function name). With no GROUP BY the
/// whole input forms a single group that always emits one row, even on
/// empty input; with GROUP BY, empty input yields empty output. Input
/// order is preserved within each group; group order is unspecified.
pub(crate) fn apply_grouping(
    rows: Vec<Row>,
    query: &Query,
    ctx: &ExecContext<'_>,
) -> Result<Vec<Row>> {
    let specs = aggregate_specs(&query.select);

    if query.group_by.is_empty() {
        let row = aggregate_group(&rows, &query.group_by, &specs, ctx)?;
        return Ok(vec![row]);
    }

    let mut groups: IndexMap<String, Vec<Row>> = IndexMap::new();
    for row in rows {
        let key = column_key(&row, &query.group_by);
        groups.entry(key).or_default().push(row);
    }

    let mut out = Vec::with_capacity(groups.len());
    for group in groups.values() {
        out.push(aggregate_group(group, &query.group_by, &specs, ctx)?);
    }
    Ok(out)
}

fn aggregate_specs(select: &[SelectItem]) -> Vec<AggSpec<'_>> {
    select
        .iter()
        .filter_map(|item| match &item.expr {
            ScalarExpr::Aggregate {
                func,
                arg,
                distinct,
            } => Some(AggSpec {
                func: *func,
                arg: arg.as_deref(),
                distinct: *distinct,
                output: item.alias.as_deref().unwrap_or(func.output_name()),
            }),
            _ => None,
        })
        .collect()
}

fn aggregate_group(
    rows: &[Row],
    group_by: &[String],
    specs: &[AggSpec<'_>],
    ctx: &ExecContext<'_>,
) -> Result<Row> {
    let mut out = Row::new();

    for column in group_by {
        let value = rows
            .first()
            .and_then(|row| row.get(column))
            .cloned()
            .unwrap_or(Value::Null);
        out.insert(column.clone(), value);
    }

    for spec in specs {
        let value = compute_aggregate(spec, rows, ctx)?;
        out.insert(spec.output, value);
    }
    Ok(out)
}

fn compute_aggregate(spec: &AggSpec<'_>, rows: &[Row], ctx: &ExecContext<'_>) -> Result<Value> {
    // COUNT(*) counts rows; everything else folds over evaluated values,
    // skipping nulls and per-row evaluation errors alike.
    let Some(arg) = spec.arg else {
        return Ok(Value::Int(rows.len() as i64));
    };

    let mut values = Vec::new();
    for row in rows {
        match eval_scalar(arg, row, ctx) {
            Ok(value) if !value.is_null() => values.push(value),
            Ok(_) | Err(_) => {}
        }
    }

    if spec.distinct {
        let mut seen = HashSet::new();
        values.retain(|value| seen.insert(format!("{}\u{1}{}", value.type_tag(), value.render())));
    }

    match spec.func {
        AggregateFunc::Count => Ok(Value::Int(values.len() as i64)),
        AggregateFunc::Sum => fold_sum(&values, false),
        AggregateFunc::Avg => fold_sum(&values, true),
        AggregateFunc::Min => Ok(fold_extreme(&values, |a, b| a < b)),
        AggregateFunc::Max => Ok(fold_extreme(&values, |a, b| a > b)),
    }
}

/// Sums numeric values, skipping those that do not coerce. Integer inputs
/// keep an integer sum. Empty input yields null.
fn fold_sum(values: &[Value], average: bool) -> Result<Value> {
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut all_int = true;

    for value in values {
        let Ok(x) = value.to_f64() else { continue };
        sum += x;
        count += 1;
        if !matches!(value, Value::Int(_)) {
            all_int = false;
        }
    }

    if count == 0 {
        return Ok(Value::Null);
    }
    if average {
        return Ok(Value::Float(sum / count as f64));
    }
    if all_int {
        Ok(Value::Int(sum as i64))
    } else {
        Ok(Value::Float(sum))
    }
}

/// Minimum or maximum under numeric coercion, returning the original
/// value of the winning row. Empty input yields null.
fn fold_extreme(values: &[Value], wins: fn(f64, f64) -> bool) -> Value {
    let mut best: Option<(f64, &Value)> = None;
    for value in values {
        let Ok(x) = value.to_f64() else { continue };
        match best {
            Some((current, _)) if !wins(x, current) => {}
            _ => best = Some((x, value)),
        }
    }
    best.map_or(Value::Null, |(_, value)| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_sum_keeps_integer_sums() {
        let values = [Value::Int(1), Value::Int(2)];
        assert_eq!(fold_sum(&values, false).unwrap(), Value::Int(3));

        let values = [Value::Int(1), Value::Float(0.5)];
        assert_eq!(fold_sum(&values, false).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn test_fold_sum_empty_is_null() {
        assert_eq!(fold_sum(&[], false).unwrap(), Value::Null);
        assert_eq!(fold_sum(&[], true).unwrap(), Value::Null);
    }

    #[test]
    fn test_fold_sum_skips_non_numeric() {
        let values = [Value::Int(1), Value::Str(String::from("nope")), Value::Int(2)];
        assert_eq!(fold_sum(&values, false).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_fold_extreme_returns_original_values() {
        let values = [Value::Int(3), Value::Float(2.5), Value::Int(7)];
        assert_eq!(fold_extreme(&values, |a, b| a < b), Value::Float(2.5));
        assert_eq!(fold_extreme(&values, |a, b| a > b), Value::Int(7));
    }

    #[test]
    fn test_fold_extreme_empty_is_null() {
        assert_eq!(fold_extreme(&[], |a, b| a < b), Value::Null);
    }
}
