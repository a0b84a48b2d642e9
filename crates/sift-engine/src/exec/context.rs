//! Execution context: the row producer plus the CTE namespace.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::row::Row;
use crate::source::{collect_rows, RowProducer};

/// Everything a (sub)query needs to resolve its sources.
///
/// CTE bindings are `Arc`-shared, so child scopes for subqueries are cheap
/// to create and later bindings never leak back into the parent.
pub struct ExecContext<'a> {
    producer: &'a dyn RowProducer,
    tables: HashMap<String, Arc<Vec<Row>>>,
}

impl<'a> ExecContext<'a> {
    /// Creates a context with no CTE bindings.
    #[must_use]
    pub fn new(producer: &'a dyn RowProducer) -> Self {
        Self {
            producer,
            tables: HashMap::new(),
        }
    }

    /// A child scope seeing the same producer and current bindings.
    #[must_use]
    pub(crate) fn child(&self) -> ExecContext<'a> {
        ExecContext {
            producer: self.producer,
            tables: self.tables.clone(),
        }
    }

    /// Binds a materialized CTE under its name.
    pub(crate) fn bind(&mut self, name: String, rows: Vec<Row>) {
        self.tables.insert(name, Arc::new(rows));
    }

    /// Resolves a table reference: the CTE namespace first, then the
    /// producer.
    pub(crate) fn resolve(&self, name: &str) -> Result<Vec<Row>> {
        if let Some(rows) = self.tables.get(name) {
            return Ok(rows.as_ref().clone());
        }
        collect_rows(self.producer.open(name)?)
    }
}
