//! End-to-end tests: GROUP BY, aggregates, HAVING.

use sift_engine::{run, EngineError, MemoryTables, Value};

mod common;
use common::{fetch, fixture, ints, row, strings};

// ===================================================================
// No GROUP BY: one global group
// ===================================================================

#[test]
fn count_star_on_empty_input() {
    let rows = fetch("SELECT COUNT(*) AS c FROM empty", &fixture());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("c"), Some(&Value::Int(0)));
}

#[test]
fn aggregates_on_empty_input_are_null() {
    let rows = fetch(
        "SELECT COUNT(age) AS c, SUM(age) AS s, AVG(age) AS a, MIN(age) AS lo, MAX(age) AS hi \
         FROM empty",
        &fixture(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("c"), Some(&Value::Int(0)));
    assert_eq!(rows[0].get("s"), Some(&Value::Null));
    assert_eq!(rows[0].get("a"), Some(&Value::Null));
    assert_eq!(rows[0].get("lo"), Some(&Value::Null));
    assert_eq!(rows[0].get("hi"), Some(&Value::Null));
}

#[test]
fn global_aggregates() {
    let rows = fetch(
        "SELECT COUNT(*) AS n, SUM(age) AS total, MIN(age) AS lo, MAX(age) AS hi FROM people",
        &fixture(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("n"), Some(&Value::Int(5)));
    assert_eq!(rows[0].get("total"), Some(&Value::Int(142)));
    assert_eq!(rows[0].get("lo"), Some(&Value::Int(17)));
    assert_eq!(rows[0].get("hi"), Some(&Value::Int(41)));
}

#[test]
fn avg_is_a_float() {
    let rows = fetch("SELECT AVG(age) AS a FROM people", &fixture());
    assert_eq!(rows[0].get("a"), Some(&Value::Float(142.0 / 5.0)));
}

#[test]
fn default_output_name_is_lowercased_function() {
    let rows = fetch("SELECT COUNT(*) FROM people", &fixture());
    assert_eq!(rows[0].get("count"), Some(&Value::Int(5)));
}

// ===================================================================
// Null and error skipping
// ===================================================================

#[test]
fn count_column_skips_nulls_and_missing() {
    let tables = MemoryTables::new().with_table(
        "t",
        vec![
            row(&[("v", Value::Int(1))]),
            row(&[("v", Value::Null)]),
            row(&[("other", Value::Int(9))]), // v missing entirely
            row(&[("v", Value::Int(2))]),
        ],
    );
    let rows = fetch("SELECT COUNT(*) AS all_rows, COUNT(v) AS with_v FROM t", &tables);
    assert_eq!(rows[0].get("all_rows"), Some(&Value::Int(4)));
    assert_eq!(rows[0].get("with_v"), Some(&Value::Int(2)));
}

#[test]
fn sum_skips_unconvertible_values() {
    let tables = MemoryTables::new().with_table(
        "t",
        vec![
            row(&[("v", Value::Int(1))]),
            row(&[("v", Value::from("not a number"))]),
            row(&[("v", Value::Int(2))]),
        ],
    );
    let rows = fetch("SELECT SUM(v) AS s FROM t", &tables);
    assert_eq!(rows[0].get("s"), Some(&Value::Int(3)));
}

#[test]
fn count_distinct() {
    let rows = fetch("SELECT COUNT(DISTINCT city) AS cities FROM people", &fixture());
    assert_eq!(rows[0].get("cities"), Some(&Value::Int(3)));
}

// ===================================================================
// GROUP BY
// ===================================================================

#[test]
fn group_by_with_having() {
    let tables = MemoryTables::new().with_table(
        "t",
        vec![
            row(&[("status", Value::from("a"))]),
            row(&[("status", Value::from("b"))]),
            row(&[("status", Value::from("a"))]),
            row(&[("status", Value::from("a"))]),
        ],
    );
    let rows = fetch(
        "SELECT status, COUNT(*) AS total FROM t GROUP BY status HAVING total > 1",
        &tables,
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("status"), Some(&Value::from("a")));
    assert_eq!(rows[0].get("total"), Some(&Value::Int(3)));
}

#[test]
fn group_by_on_empty_input_is_empty() {
    let rows = fetch(
        "SELECT city, COUNT(*) AS n FROM empty GROUP BY city",
        &fixture(),
    );
    assert!(rows.is_empty());
}

#[test]
fn groups_partition_the_input() {
    let rows = fetch(
        "SELECT city, COUNT(*) AS n FROM people GROUP BY city ORDER BY city",
        &fixture(),
    );
    assert_eq!(strings(&rows, "city"), vec!["berlin", "lisbon", "oslo"]);
    assert_eq!(ints(&rows, "n"), vec![2, 1, 2]);
    // Multiset union of the groups is the whole input.
    assert_eq!(ints(&rows, "n").iter().sum::<i64>(), 5);
}

#[test]
fn group_keys_distinguish_types() {
    let tables = MemoryTables::new().with_table(
        "t",
        vec![
            row(&[("k", Value::Int(30))]),
            row(&[("k", Value::from("30"))]),
            row(&[("k", Value::Int(30))]),
        ],
    );
    let rows = fetch("SELECT k, COUNT(*) AS n FROM t GROUP BY k", &tables);
    assert_eq!(rows.len(), 2);
    let mut counts = ints(&rows, "n");
    counts.sort_unstable();
    assert_eq!(counts, vec![1, 2]);
}

#[test]
fn multiple_aggregates_per_group() {
    let rows = fetch(
        "SELECT city, COUNT(*) AS n, AVG(age) AS avg_age, MAX(age) AS oldest \
         FROM people GROUP BY city ORDER BY city",
        &fixture(),
    );
    assert_eq!(ints(&rows, "oldest"), vec![25, 25, 41]);
    assert_eq!(rows[0].get("avg_age"), Some(&Value::Float(21.0)));
}

#[test]
fn having_can_use_group_columns() {
    let rows = fetch(
        "SELECT city, COUNT(*) AS n FROM people GROUP BY city HAVING city != 'oslo' \
         ORDER BY city",
        &fixture(),
    );
    assert_eq!(strings(&rows, "city"), vec!["berlin", "lisbon"]);
}

#[test]
fn aggregate_arg_can_be_an_expression() {
    let rows = fetch(
        "SELECT MAX(LENGTH(name)) AS longest FROM people",
        &fixture(),
    );
    assert_eq!(rows[0].get("longest"), Some(&Value::Int(5)));
}

#[test]
fn grouped_query_rejects_stray_columns_at_parse_time() {
    let err = run("SELECT name, COUNT(*) AS n FROM people GROUP BY city", &fixture()).unwrap_err();
    assert!(matches!(err, EngineError::Parse(_)));
}
