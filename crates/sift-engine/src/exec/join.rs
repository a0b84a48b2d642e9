//! Nested-loop join engine.
//!
//! Joins apply pairwise against the running left stream. A side with an
//! alias contributes `alias.column` keys; a side without one keeps its
//! original names. On an unqualified name collision the left side wins.

use indexmap::IndexSet;

use sift_sql_core::ast::{Join, JoinKind, Predicate, Source};

use crate::error::Result;
use crate::eval::eval_predicate;
use crate::row::Row;
use crate::value::Value;

use super::{open_source, ExecContext};

/// Applies every JOIN clause in declaration order.
pub(crate) fn apply_joins(
    rows: Vec<Row>,
    main_source: &Source,
    joins: &[Join],
    ctx: &ExecContext<'_>,
) -> Result<Vec<Row>> {
    let mut left = prefix_rows(rows, main_source.alias.as_deref());

    for join in joins {
        let right = open_source(&join.source, ctx)?;
        let right = prefix_rows(right, join.source.alias.as_deref());
        left = join_pair(left, right, join.kind, join.on.as_ref(), ctx)?;
    }
    Ok(left)
}

/// Rewrites row keys to `alias.column` when the source has an alias.
fn prefix_rows(rows: Vec<Row>, alias: Option<&str>) -> Vec<Row> {
    let Some(alias) = alias else {
        return rows;
    };
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(name, value)| (format!("{alias}.{name}"), value))
                .collect()
        })
        .collect()
}

fn join_pair(
    left: Vec<Row>,
    right: Vec<Row>,
    kind: JoinKind,
    on: Option<&Predicate>,
    ctx: &ExecContext<'_>,
) -> Result<Vec<Row>> {
    match kind {
        JoinKind::Cross => {
            let mut out = Vec::with_capacity(left.len() * right.len());
            for l in &left {
                for r in &right {
                    out.push(combine(l, r));
                }
            }
            Ok(out)
        }
        JoinKind::Inner => {
            let on = on.expect("non-cross join has a predicate");
            let mut out = Vec::new();
            for l in &left {
                for r in &right {
                    let combined = combine(l, r);
                    if eval_predicate(on, &combined, ctx)? {
                        out.push(combined);
                    }
                }
            }
            Ok(out)
        }
        JoinKind::Left => {
            let on = on.expect("non-cross join has a predicate");
            let right_columns = column_union(&right);
            let mut out = Vec::new();
            for l in &left {
                let mut matched = false;
                for r in &right {
                    let combined = combine(l, r);
                    if eval_predicate(on, &combined, ctx)? {
                        out.push(combined);
                        matched = true;
                    }
                }
                if !matched {
                    out.push(null_extend(l, &right_columns));
                }
            }
            Ok(out)
        }
        JoinKind::Right => {
            let on = on.expect("non-cross join has a predicate");
            let left_columns = column_union(&left);
            let mut out = Vec::new();
            for r in &right {
                let mut matched = false;
                for l in &left {
                    let combined = combine(l, r);
                    if eval_predicate(on, &combined, ctx)? {
                        out.push(combined);
                        matched = true;
                    }
                }
                if !matched {
                    out.push(null_extend_left(r, &left_columns));
                }
            }
            Ok(out)
        }
        JoinKind::Full => {
            let on = on.expect("non-cross join has a predicate");
            let left_columns = column_union(&left);
            let right_columns = column_union(&right);
            let mut matched_right = vec![false; right.len()];
            let mut out = Vec::new();

            for l in &left {
                let mut matched = false;
                for (j, r) in right.iter().enumerate() {
                    let combined = combine(l, r);
                    if eval_predicate(on, &combined, ctx)? {
                        out.push(combined);
                        matched = true;
                        matched_right[j] = true;
                    }
                }
                if !matched {
                    out.push(null_extend(l, &right_columns));
                }
            }
            for (j, r) in right.iter().enumerate() {
                if !matched_right[j] {
                    out.push(null_extend_left(r, &left_columns));
                }
            }
            Ok(out)
        }
    }
}

/// Merges two rows; on a key collision the left side wins.
fn combine(left: &Row, right: &Row) -> Row {
    let mut out = left.clone();
    for (name, value) in right.iter() {
        if !out.contains(name) {
            out.insert(name.clone(), value.clone());
        }
    }
    out
}

/// Left row plus explicit nulls for every right-side column.
fn null_extend(left: &Row, right_columns: &IndexSet<String>) -> Row {
    let mut out = left.clone();
    for name in right_columns {
        if !out.contains(name) {
            out.insert(name.clone(), Value::Null);
        }
    }
    out
}

/// Nulls for every left-side column, then the right row. Left columns come
/// first so the combined shape matches the matched pairs.
fn null_extend_left(right: &Row, left_columns: &IndexSet<String>) -> Row {
    let mut out = Row::new();
    for name in left_columns {
        out.insert(name.clone(), Value::Null);
    }
    for (name, value) in right.iter() {
        out.insert(name.clone(), value.clone());
    }
    out
}

/// Union of column names across rows, in first-seen order.
fn column_union(rows: &[Row]) -> IndexSet<String> {
    let mut columns = IndexSet::new();
    for row in rows {
        for name in row.names() {
            columns.insert(name.clone());
        }
    }
    columns
}
