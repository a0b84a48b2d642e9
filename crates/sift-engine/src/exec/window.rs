//! The window-function engine.
//!
//! Each window item partitions the input, stable-sorts every partition by
//! the OVER order keys, computes the function along the sorted order, and
//! attaches the result to each row under the item's output name. Row
//! positions in the output stream stay exactly as they arrived.

use indexmap::IndexMap;

use sift_sql_core::ast::{OrderKey, ScalarExpr, SelectItem, WindowFunc, WindowSpec};

use crate::error::{EngineError, Result};
use crate::eval::{eval_scalar, sort_ordering, values_equal};
use crate::row::{column_key, Row};
use crate::value::Value;

use super::ExecContext;

/// Computes every window item of the select list and attaches the
/// results.
pub(crate) fn apply_windows(
    mut rows: Vec<Row>,
    select: &[SelectItem],
    ctx: &ExecContext<'_>,
) -> Result<Vec<Row>> {
    for item in select {
        let ScalarExpr::Window { func, args, spec } = &item.expr else {
            continue;
        };
        let output = item.alias.as_deref().unwrap_or(func.output_name());
        let results = compute_window(&rows, *func, args, spec, ctx)?;
        for (row, value) in rows.iter_mut().zip(results) {
            row.insert(output, value);
        }
    }
    Ok(rows)
}

/// Computes one window function over all rows; the result vector is
/// indexed by original row position.
fn compute_window(
    rows: &[Row],
    func: WindowFunc,
    args: &[ScalarExpr],
    spec: &WindowSpec,
    ctx: &ExecContext<'_>,
) -> Result<Vec<Value>> {
    let mut results = vec![Value::Null; rows.len()];

    // Partition while preserving input order within each partition.
    let mut partitions: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (index, row) in rows.iter().enumerate() {
        let key = column_key(row, &spec.partition_by);
        partitions.entry(key).or_default().push(index);
    }

    for indices in partitions.values() {
        let sorted = sort_partition(rows, indices, &spec.order_by);
        fill_partition(rows, &sorted, func, args, spec, ctx, &mut results)?;
    }
    Ok(results)
}

/// Stable-sorts a partition's row indices by the OVER order keys.
fn sort_partition(rows: &[Row], indices: &[usize], order_by: &[OrderKey]) -> Vec<usize> {
    let mut sorted: Vec<usize> = indices.to_vec();
    if order_by.is_empty() {
        return sorted;
    }
    sorted.sort_by(|&a, &b| {
        for key in order_by {
            let left = rows[a].get(&key.column).unwrap_or(&Value::Null);
            let right = rows[b].get(&key.column).unwrap_or(&Value::Null);
            let mut ordering = sort_ordering(left, right);
            if key.descending {
                ordering = ordering.reverse();
            }
            if !ordering.is_eq() {
                return ordering;
            }
        }
        std::cmp::Ordering::Equal
    });
    sorted
}

/// True when two rows tie on every order key.
fn order_keys_equal(a: &Row, b: &Row, order_by: &[OrderKey]) -> bool {
    order_by.iter().all(|key| {
        let left = a.get(&key.column).unwrap_or(&Value::Null);
        let right = b.get(&key.column).unwrap_or(&Value::Null);
        values_equal(left, right)
    })
}

#[allow(clippy::too_many_arguments)]
fn fill_partition(
    rows: &[Row],
    sorted: &[usize],
    func: WindowFunc,
    args: &[ScalarExpr],
    spec: &WindowSpec,
    ctx: &ExecContext<'_>,
    results: &mut [Value],
) -> Result<()> {
    let size = sorted.len();

    match func {
        WindowFunc::RowNumber => {
            for (position, &index) in sorted.iter().enumerate() {
                results[index] = Value::Int(position as i64 + 1);
            }
        }
        WindowFunc::Rank | WindowFunc::DenseRank => {
            let mut rank = 0i64;
            let mut dense = 0i64;
            for (position, &index) in sorted.iter().enumerate() {
                let tied = position > 0
                    && order_keys_equal(
                        &rows[sorted[position - 1]],
                        &rows[index],
                        &spec.order_by,
                    );
                if !tied {
                    rank = position as i64 + 1;
                    dense += 1;
                }
                results[index] = Value::Int(if func == WindowFunc::Rank { rank } else { dense });
            }
        }
        WindowFunc::Ntile => {
            let buckets = eval_arg(&args[0], rows, sorted[0], ctx)?.to_i64()?;
            if buckets <= 0 {
                return Err(EngineError::InvalidArgument(format!(
                    "NTILE bucket count must be positive, got {buckets}"
                )));
            }
            let buckets = buckets as usize;
            let base = size / buckets;
            let remainder = size % buckets;
            for (position, &index) in sorted.iter().enumerate() {
                let bucket = if base == 0 {
                    // Fewer rows than buckets: one row per bucket.
                    position + 1
                } else if position < remainder * (base + 1) {
                    position / (base + 1) + 1
                } else {
                    remainder + (position - remainder * (base + 1)) / base + 1
                };
                results[index] = Value::Int(bucket as i64);
            }
        }
        WindowFunc::FirstValue => {
            let value = eval_arg(&args[0], rows, sorted[0], ctx)?;
            for &index in sorted {
                results[index] = value.clone();
            }
        }
        WindowFunc::LastValue => {
            let value = eval_arg(&args[0], rows, sorted[size - 1], ctx)?;
            for &index in sorted {
                results[index] = value.clone();
            }
        }
        WindowFunc::NthValue => {
            let n = eval_arg(&args[1], rows, sorted[0], ctx)?.to_i64()?;
            let value = if n >= 1 && (n as usize) <= size {
                eval_arg(&args[0], rows, sorted[n as usize - 1], ctx)?
            } else {
                Value::Null
            };
            for &index in sorted {
                results[index] = value.clone();
            }
        }
        WindowFunc::Lag | WindowFunc::Lead => {
            for (position, &index) in sorted.iter().enumerate() {
                let offset = match args.get(1) {
                    Some(arg) => eval_arg(arg, rows, index, ctx)?.to_i64()?,
                    None => 1,
                };
                if offset < 0 {
                    return Err(EngineError::InvalidArgument(format!(
                        "window offset must be non-negative, got {offset}"
                    )));
                }
                let target = if func == WindowFunc::Lag {
                    (position as i64) - offset
                } else {
                    (position as i64) + offset
                };
                results[index] = if target >= 0 && (target as usize) < size {
                    eval_arg(&args[0], rows, sorted[target as usize], ctx)?
                } else {
                    match args.get(2) {
                        Some(default) => eval_arg(default, rows, index, ctx)?,
                        None => Value::Null,
                    }
                };
            }
        }
    }
    Ok(())
}

fn eval_arg(
    arg: &ScalarExpr,
    rows: &[Row],
    index: usize,
    ctx: &ExecContext<'_>,
) -> Result<Value> {
    eval_scalar(arg, &rows[index], ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(scores: &[i64]) -> Vec<Row> {
        scores
            .iter()
            .map(|n| {
                [(String::from("score"), Value::Int(*n))]
                    .into_iter()
                    .collect()
            })
            .collect()
    }

    fn spec_order_desc(column: &str) -> WindowSpec {
        WindowSpec {
            partition_by: vec![],
            order_by: vec![OrderKey::desc(column)],
            frame: None,
        }
    }

    fn producer() -> crate::source::MemoryTables {
        crate::source::MemoryTables::new()
    }

    #[test]
    fn test_rank_with_ties() {
        let tables = producer();
        let ctx = ExecContext::new(&tables);
        let rows = rows_of(&[90, 90, 85, 95]);
        let ranks =
            compute_window(&rows, WindowFunc::Rank, &[], &spec_order_desc("score"), &ctx).unwrap();
        assert_eq!(
            ranks,
            vec![Value::Int(2), Value::Int(2), Value::Int(4), Value::Int(1)]
        );
    }

    #[test]
    fn test_dense_rank_never_skips() {
        let tables = producer();
        let ctx = ExecContext::new(&tables);
        let rows = rows_of(&[90, 90, 85, 95]);
        let ranks = compute_window(
            &rows,
            WindowFunc::DenseRank,
            &[],
            &spec_order_desc("score"),
            &ctx,
        )
        .unwrap();
        assert_eq!(
            ranks,
            vec![Value::Int(2), Value::Int(2), Value::Int(3), Value::Int(1)]
        );
    }

    #[test]
    fn test_row_number_is_a_permutation() {
        let tables = producer();
        let ctx = ExecContext::new(&tables);
        let rows = rows_of(&[5, 3, 9, 1]);
        let numbers = compute_window(
            &rows,
            WindowFunc::RowNumber,
            &[],
            &spec_order_desc("score"),
            &ctx,
        )
        .unwrap();
        let mut values: Vec<i64> = numbers
            .iter()
            .map(|v| match v {
                Value::Int(n) => *n,
                other => panic!("expected int, got {other:?}"),
            })
            .collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ntile_bucket_sizes_differ_by_at_most_one() {
        let tables = producer();
        let ctx = ExecContext::new(&tables);
        let rows = rows_of(&[1, 2, 3, 4, 5, 6, 7]);
        let args = [ScalarExpr::Literal(sift_sql_core::ast::Literal::Integer(3))];
        let buckets = compute_window(
            &rows,
            WindowFunc::Ntile,
            &args,
            &WindowSpec::default(),
            &ctx,
        )
        .unwrap();

        let mut sizes = [0usize; 3];
        for value in &buckets {
            match value {
                Value::Int(b) => sizes[*b as usize - 1] += 1,
                other => panic!("expected int, got {other:?}"),
            }
        }
        assert_eq!(sizes.iter().sum::<usize>(), 7);
        assert!(sizes.iter().all(|&s| s == 2 || s == 3));
        assert_eq!(sizes[0], 3); // the leftover row lands in the first bucket
    }

    #[test]
    fn test_ntile_more_buckets_than_rows() {
        let tables = producer();
        let ctx = ExecContext::new(&tables);
        let rows = rows_of(&[1, 2]);
        let args = [ScalarExpr::Literal(sift_sql_core::ast::Literal::Integer(5))];
        let buckets = compute_window(
            &rows,
            WindowFunc::Ntile,
            &args,
            &WindowSpec::default(),
            &ctx,
        )
        .unwrap();
        assert_eq!(buckets, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_lag_lead_duality() {
        let tables = producer();
        let ctx = ExecContext::new(&tables);
        let rows = rows_of(&[10, 20, 30, 40, 50]);
        let spec = WindowSpec {
            partition_by: vec![],
            order_by: vec![OrderKey::asc("score")],
            frame: None,
        };
        let arg = [ScalarExpr::Column(String::from("score"))];

        let lag = compute_window(&rows, WindowFunc::Lag, &arg, &spec, &ctx).unwrap();
        let lead = compute_window(&rows, WindowFunc::Lead, &arg, &spec, &ctx).unwrap();

        // LAG(col, 1) at row i equals LEAD(col, 1) at row i - 2.
        for i in 2..rows.len() {
            assert_eq!(lag[i], lead[i - 2]);
        }
        assert_eq!(lag[0], Value::Null);
        assert_eq!(lead[4], Value::Null);
    }
}
