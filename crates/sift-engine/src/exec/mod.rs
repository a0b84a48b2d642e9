//! Query execution.
//!
//! Stages run in the canonical SQL evaluation order, each materializing
//! its output: CTEs, source, joins, WHERE, grouping (or windows),
//! projection, DISTINCT, ORDER BY, OFFSET/LIMIT.

mod context;
mod filter;
mod group;
mod join;
mod project;
mod sort;
mod window;

use tracing::debug;

use sift_sql_core::ast::{Query, Source, SourceKind};

use crate::error::Result;
use crate::row::Row;

pub use context::ExecContext;

/// Executes a parsed query against a context.
pub fn execute(query: &Query, ctx: &ExecContext<'_>) -> Result<Vec<Row>> {
    let mut scope = ctx.child();
    for cte in &query.ctes {
        let rows = execute(&cte.query, &scope)?;
        debug!(name = %cte.name, rows = rows.len(), "materialized CTE");
        scope.bind(cte.name.clone(), rows);
    }

    let mut rows = open_source(&query.source, &scope)?;
    debug!(rows = rows.len(), "opened source");

    if !query.joins.is_empty() {
        rows = join::apply_joins(rows, &query.source, &query.joins, &scope)?;
        debug!(rows = rows.len(), joins = query.joins.len(), "applied joins");
    }

    if let Some(predicate) = &query.filter {
        let before = rows.len();
        rows = filter::apply_filter(rows, predicate, &scope)?;
        debug!(before, after = rows.len(), "applied WHERE");
    }

    if query.is_grouped() {
        rows = group::apply_grouping(rows, query, &scope)?;
        debug!(groups = rows.len(), "applied grouping");
        if let Some(predicate) = &query.having {
            rows = filter::apply_filter(rows, predicate, &scope)?;
            debug!(rows = rows.len(), "applied HAVING");
        }
    } else if query.has_windows() {
        rows = window::apply_windows(rows, &query.select, &scope)?;
        debug!(rows = rows.len(), "applied window functions");
    }

    rows = project::apply_select_list(rows, query, &scope)?;

    if query.distinct {
        let before = rows.len();
        rows = project::apply_distinct(rows);
        debug!(before, after = rows.len(), "applied DISTINCT");
    }

    if !query.order_by.is_empty() {
        rows = sort::apply_order_by(rows, &query.order_by);
    }

    if query.offset.is_some() || query.limit.is_some() {
        rows = sort::apply_pagination(rows, query.offset, query.limit);
    }

    Ok(rows)
}

/// Opens a FROM or JOIN source: a table reference resolves against the CTE
/// namespace first and the producer second; inline subqueries recurse.
pub(crate) fn open_source(source: &Source, ctx: &ExecContext<'_>) -> Result<Vec<Row>> {
    match &source.kind {
        SourceKind::Table(name) => ctx.resolve(name),
        SourceKind::Subquery(query) => execute(query, ctx),
    }
}
