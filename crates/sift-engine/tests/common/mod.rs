#![allow(dead_code)]

use sift_engine::{run, MemoryTables, Row, Value};

/// Builds a row from (name, value) pairs.
pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(name, value)| (String::from(*name), value.clone()))
        .collect()
}

/// Runs a query against the tables, panicking with context on error.
pub fn fetch(sql: &str, tables: &MemoryTables) -> Vec<Row> {
    run(sql, tables).unwrap_or_else(|e| panic!("query failed: {sql}\nerror: {e}"))
}

/// Extracts an integer column from every row.
pub fn ints(rows: &[Row], column: &str) -> Vec<i64> {
    rows.iter()
        .map(|r| match r.get(column) {
            Some(Value::Int(n)) => *n,
            other => panic!("expected int in {column}, got {other:?}"),
        })
        .collect()
}

/// Extracts a string column from every row.
pub fn strings(rows: &[Row], column: &str) -> Vec<String> {
    rows.iter()
        .map(|r| match r.get(column) {
            Some(Value::Str(s)) => s.clone(),
            other => panic!("expected string in {column}, got {other:?}"),
        })
        .collect()
}

/// A small people table: name, age, city.
pub fn people() -> Vec<Row> {
    [
        ("alice", 34, "oslo"),
        ("bob", 17, "berlin"),
        ("carol", 41, "oslo"),
        ("dave", 25, "berlin"),
        ("erin", 25, "lisbon"),
    ]
    .iter()
    .map(|(name, age, city)| {
        row(&[
            ("name", Value::from(*name)),
            ("age", Value::Int(*age)),
            ("city", Value::from(*city)),
        ])
    })
    .collect()
}

/// Standard fixture: people plus an empty table.
pub fn fixture() -> MemoryTables {
    MemoryTables::new()
        .with_table("people", people())
        .with_table("empty", vec![])
}
