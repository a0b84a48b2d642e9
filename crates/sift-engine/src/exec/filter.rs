//! WHERE and HAVING filtering.

use sift_sql_core::ast::Predicate;

use crate::error::Result;
use crate::eval::eval_predicate;
use crate::row::Row;

use super::ExecContext;

/// Keeps the rows for which the predicate holds. Evaluation errors abort
/// the query; there is no silent skipping at this stage.
pub(crate) fn apply_filter(
    rows: Vec<Row>,
    predicate: &Predicate,
    ctx: &ExecContext<'_>,
) -> Result<Vec<Row>> {
    let mut kept = Vec::new();
    for row in rows {
        if eval_predicate(predicate, &row, ctx)? {
            kept.push(row);
        }
    }
    Ok(kept)
}
