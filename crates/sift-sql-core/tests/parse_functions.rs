//! Parser integration tests: function, aggregate, and CASE forms in the
//! select list.

use sift_sql_core::ast::{AggregateFunc, Literal, ScalarExpr};

mod common;
use common::{parse, parse_err};

fn first_expr(sql: &str) -> ScalarExpr {
    parse(sql).select.into_iter().next().unwrap().expr
}

// ===================================================================
// Ordinary function calls
// ===================================================================

#[test]
fn zero_argument_call() {
    let expr = first_expr("SELECT NOW() FROM t");
    assert!(matches!(
        expr,
        ScalarExpr::Function { ref name, ref args } if name == "NOW" && args.is_empty()
    ));
}

#[test]
fn call_names_keep_their_spelling() {
    let expr = first_expr("SELECT upper(name) FROM t");
    assert!(matches!(
        expr,
        ScalarExpr::Function { ref name, .. } if name == "upper"
    ));
}

#[test]
fn literal_and_column_arguments() {
    let expr = first_expr("SELECT SUBSTRING(name, 1, 3) FROM t");
    match expr {
        ScalarExpr::Function { name, args } => {
            assert_eq!(name, "SUBSTRING");
            assert!(matches!(&args[0], ScalarExpr::Column(c) if c == "name"));
            assert!(matches!(args[1], ScalarExpr::Literal(Literal::Integer(1))));
            assert!(matches!(args[2], ScalarExpr::Literal(Literal::Integer(3))));
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn calls_nest() {
    let expr = first_expr("SELECT COALESCE(NULLIF(a, ''), 'fallback') FROM t");
    match expr {
        ScalarExpr::Function { name, args } => {
            assert_eq!(name, "COALESCE");
            assert!(matches!(
                &args[0],
                ScalarExpr::Function { name, .. } if name == "NULLIF"
            ));
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn case_is_a_valid_argument() {
    let expr = first_expr("SELECT UPPER(CASE WHEN a = 1 THEN 'x' ELSE 'y' END) FROM t");
    match expr {
        ScalarExpr::Function { args, .. } => {
            assert!(matches!(args[0], ScalarExpr::Case { .. }));
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn star_argument_outside_count_is_rejected() {
    let err = parse_err("SELECT UPPER(*) FROM t");
    assert!(err.message.contains("*"));
}

#[test]
fn distinct_outside_aggregates_is_rejected() {
    let err = parse_err("SELECT UPPER(DISTINCT name) FROM t");
    assert!(err.message.contains("DISTINCT"));
}

// ===================================================================
// Aggregates
// ===================================================================

#[test]
fn count_star() {
    let expr = first_expr("SELECT COUNT(*) FROM t");
    assert!(matches!(
        expr,
        ScalarExpr::Aggregate {
            func: AggregateFunc::Count,
            arg: None,
            distinct: false,
        }
    ));
}

#[test]
fn count_distinct_column() {
    let expr = first_expr("SELECT COUNT(DISTINCT city) FROM t");
    match expr {
        ScalarExpr::Aggregate {
            func,
            arg,
            distinct,
        } => {
            assert_eq!(func, AggregateFunc::Count);
            assert!(distinct);
            assert!(matches!(
                arg.as_deref(),
                Some(ScalarExpr::Column(c)) if c == "city"
            ));
        }
        other => panic!("expected aggregate, got {other:?}"),
    }
}

#[test]
fn aggregate_names_are_case_insensitive() {
    let expr = first_expr("SELECT sum(amount) FROM t");
    assert!(matches!(
        expr,
        ScalarExpr::Aggregate {
            func: AggregateFunc::Sum,
            ..
        }
    ));
}

#[test]
fn aggregate_argument_may_be_a_call() {
    let expr = first_expr("SELECT MAX(LENGTH(name)) FROM t");
    match expr {
        ScalarExpr::Aggregate { func, arg, .. } => {
            assert_eq!(func, AggregateFunc::Max);
            assert!(matches!(
                arg.as_deref(),
                Some(ScalarExpr::Function { name, .. }) if name == "LENGTH"
            ));
        }
        other => panic!("expected aggregate, got {other:?}"),
    }
}

#[test]
fn star_in_sum_is_rejected() {
    let err = parse_err("SELECT SUM(*) FROM t");
    assert!(err.message.contains("COUNT"));
}

#[test]
fn count_with_two_arguments_is_rejected() {
    let err = parse_err("SELECT COUNT(a, b) FROM t");
    assert!(err.message.contains("exactly one argument"));
}

#[test]
fn count_with_no_arguments_is_rejected() {
    let err = parse_err("SELECT COUNT() FROM t");
    assert!(err.message.contains("exactly one argument"));
}

// ===================================================================
// Scalar MIN/MAX vs aggregate MIN/MAX
// ===================================================================

#[test]
fn min_max_split_on_argument_count() {
    assert!(matches!(
        first_expr("SELECT MIN(a) FROM t"),
        ScalarExpr::Aggregate {
            func: AggregateFunc::Min,
            ..
        }
    ));
    assert!(matches!(
        first_expr("SELECT MIN(a, b) FROM t"),
        ScalarExpr::Function { ref name, .. } if name == "MIN"
    ));
}

#[test]
fn min_with_three_arguments_is_rejected() {
    // Only the two-argument form escapes to the scalar registry.
    let err = parse_err("SELECT MIN(a, b, c) FROM t");
    assert!(err.message.contains("exactly one argument"));
}
