//! The row-producer seam.
//!
//! The engine never decodes files itself. Whatever materializes rows —
//! a columnar file reader, a network client, a fixture — implements
//! [`RowProducer`] and hands the engine an iterator of rows.

use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::row::Row;

/// Opens named row sources.
///
/// The source string is whatever the query's FROM clause named: a file
/// path (glob characters included), a quoted path, or a bare table name.
/// CTE names never reach the producer; the executor resolves them first.
pub trait RowProducer {
    /// Opens a source and returns an iterator over its rows.
    fn open(&self, source: &str) -> Result<Box<dyn RowIterator + '_>>;
}

/// A pull-based stream of rows.
pub trait RowIterator {
    /// Returns the next row, or `None` at end of stream.
    fn next_row(&mut self) -> Result<Option<Row>>;

    /// Releases any resources held by the iterator.
    fn close(&mut self) {}
}

/// Drains an iterator into a materialized vector, closing it afterwards.
pub fn collect_rows(mut iter: Box<dyn RowIterator + '_>) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    loop {
        match iter.next_row() {
            Ok(Some(row)) => rows.push(row),
            Ok(None) => break,
            Err(e) => {
                iter.close();
                return Err(e);
            }
        }
    }
    iter.close();
    Ok(rows)
}

/// An in-memory producer over named tables.
///
/// Backs the engine's own tests and serves embedders that already hold
/// rows. Lookup strips one level of surrounding quotes, so quoted FROM
/// sources resolve to the same table as bare ones.
#[derive(Debug, Default)]
pub struct MemoryTables {
    tables: HashMap<String, Vec<Row>>,
}

impl MemoryTables {
    /// Creates an empty table set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a named table.
    pub fn insert(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.tables.insert(name.into(), rows);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.insert(name, rows);
        self
    }
}

impl RowProducer for MemoryTables {
    fn open(&self, source: &str) -> Result<Box<dyn RowIterator + '_>> {
        let name = source
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .unwrap_or(source);
        let rows = self
            .tables
            .get(name)
            .ok_or_else(|| EngineError::UnknownTable(String::from(name)))?;
        Ok(Box::new(MemoryRows {
            rows: rows.clone().into_iter(),
        }))
    }
}

struct MemoryRows {
    rows: std::vec::IntoIter<Row>,
}

impl RowIterator for MemoryRows {
    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.next())
    }
}
