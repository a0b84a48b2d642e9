//! ORDER BY and pagination.

use sift_sql_core::ast::OrderKey;

use crate::eval::sort_ordering;
use crate::row::Row;
use crate::value::Value;

/// Stable multi-key sort. Keys the dispatch cannot order (nulls or
/// mismatched families) compare equal, so such rows keep input order.
/// A key absent from a row sorts as null.
pub(crate) fn apply_order_by(mut rows: Vec<Row>, keys: &[OrderKey]) -> Vec<Row> {
    rows.sort_by(|a, b| {
        for key in keys {
            let left = a.get(&key.column).unwrap_or(&Value::Null);
            let right = b.get(&key.column).unwrap_or(&Value::Null);
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
    rows
}

/// OFFSET skips, then LIMIT caps.
pub(crate) fn apply_pagination(
    rows: Vec<Row>,
    offset: Option<u64>,
    limit: Option<u64>,
) -> Vec<Row> {
    let skip = offset.unwrap_or(0) as usize;
    let take = limit.map_or(usize::MAX, |n| n as usize);
    rows.into_iter().skip(skip).take(take).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(values: &[i64]) -> Vec<Row> {
        values
            .iter()
            .map(|n| [(String::from("v"), Value::Int(*n))].into_iter().collect())
            .collect()
    }

    fn values_of(rows: &[Row]) -> Vec<i64> {
        rows.iter()
            .map(|r| match r.get("v") {
                Some(Value::Int(n)) => *n,
                other => panic!("expected int, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let rows = rows_of(&[3, 1, 2]);
        assert_eq!(
            values_of(&apply_order_by(rows.clone(), &[OrderKey::asc("v")])),
            vec![1, 2, 3]
        );
        assert_eq!(
            values_of(&apply_order_by(rows, &[OrderKey::desc("v")])),
            vec![3, 2, 1]
        );
    }

    #[test]
    fn test_multi_key_sort() {
        let rows: Vec<Row> = [(1, 9), (2, 1), (1, 3)]
            .iter()
            .map(|(a, b)| {
                [
                    (String::from("a"), Value::Int(*a)),
                    (String::from("b"), Value::Int(*b)),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        let sorted = apply_order_by(rows, &[OrderKey::asc("a"), OrderKey::desc("b")]);
        let pairs: Vec<(i64, i64)> = sorted
            .iter()
            .map(|r| match (r.get("a"), r.get("b")) {
                (Some(Value::Int(a)), Some(Value::Int(b))) => (*a, *b),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(pairs, vec![(1, 9), (1, 3), (2, 1)]);
    }

    #[test]
    fn test_pagination_is_a_contiguous_slice() {
        let rows = rows_of(&[0, 1, 2, 3, 4, 5]);
        assert_eq!(
            values_of(&apply_pagination(rows.clone(), Some(2), Some(3))),
            vec![2, 3, 4]
        );
        assert_eq!(values_of(&apply_pagination(rows.clone(), None, Some(2))), vec![0, 1]);
        assert_eq!(values_of(&apply_pagination(rows.clone(), Some(4), None)), vec![4, 5]);
        assert!(apply_pagination(rows, Some(10), Some(5)).is_empty());
    }
}
