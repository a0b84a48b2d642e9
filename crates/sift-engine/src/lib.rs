//! # sift-engine
//!
//! An in-memory SQL execution engine over row streams. Parsing comes from
//! [`sift_sql_core`]; this crate owns the dynamic value/row model, the
//! scalar function registry, expression evaluation, and the staged
//! executor (filter, join, group/aggregate, window, project, sort).
//!
//! The engine never reads files. Anything that can produce rows
//! implements [`RowProducer`]; [`MemoryTables`] is the built-in in-memory
//! producer.
//!
//! ```rust
//! use sift_engine::{run, MemoryTables, Row, Value};
//!
//! let people: Vec<Row> = [("ada", 36), ("bob", 17)]
//!     .into_iter()
//!     .map(|(name, age)| {
//!         [
//!             (String::from("name"), Value::from(name)),
//!             (String::from("age"), Value::Int(age)),
//!         ]
//!         .into_iter()
//!         .collect()
//!     })
//!     .collect();
//! let tables = MemoryTables::new().with_table("people", people);
//!
//! let rows = run("SELECT name FROM people WHERE age >= 18", &tables).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].get("name"), Some(&Value::from("ada")));
//! ```

pub mod error;
pub mod eval;
pub mod exec;
pub mod functions;
pub mod row;
pub mod source;
pub mod value;

pub use error::{EngineError, Result};
pub use exec::{execute, ExecContext};
pub use row::Row;
pub use source::{MemoryTables, RowIterator, RowProducer};
pub use value::Value;

pub use sift_sql_core::{ParseError, Parser, ParserOptions, Query};

/// Parses and executes a single query with default parser bounds.
pub fn run(sql: &str, producer: &dyn RowProducer) -> Result<Vec<Row>> {
    run_with_options(sql, producer, ParserOptions::default())
}

/// Parses and executes a single query with explicit parser bounds.
pub fn run_with_options(
    sql: &str,
    producer: &dyn RowProducer,
    options: ParserOptions,
) -> Result<Vec<Row>> {
    let query = Parser::with_options(sql, options).parse()?;
    let ctx = ExecContext::new(producer);
    execute(&query, &ctx)
}
