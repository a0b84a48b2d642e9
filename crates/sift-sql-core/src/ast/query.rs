//! Query tree types.

use super::{OrderKey, Predicate, ScalarExpr};

/// The kinds of join the dialect supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    /// Returns the SQL spelling of the join kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// What a FROM (or JOIN) clause names.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// A table reference: a producer source string or a CTE name.
    /// The executor resolves the CTE namespace first, then the producer.
    Table(String),
    /// An inline subquery.
    Subquery(Box<Query>),
}

/// A row source with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub kind: SourceKind,
    pub alias: Option<String>,
}

impl Source {
    /// Creates an unaliased table source.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Table(name.into()),
            alias: None,
        }
    }
}

/// One JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub source: Source,
    /// The ON predicate; `None` exactly for CROSS joins.
    pub on: Option<Predicate>,
}

/// One item of the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: ScalarExpr,
    pub alias: Option<String>,
}

/// A common table expression binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    pub name: String,
    pub query: Query,
}

/// A parsed query, immutable once built.
///
/// Field order follows the canonical evaluation order the executor walks:
/// CTEs, source, joins, filter, grouping, windows live in the select list,
/// then ordering and pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// CTE bindings, in declaration order; later CTEs may reference earlier.
    pub ctes: Vec<Cte>,
    /// The main FROM source.
    pub source: Source,
    /// JOIN clauses, in declaration order.
    pub joins: Vec<Join>,
    /// The select list, in declaration order.
    pub select: Vec<SelectItem>,
    /// True for SELECT DISTINCT.
    pub distinct: bool,
    /// The WHERE predicate.
    pub filter: Option<Predicate>,
    /// GROUP BY column names.
    pub group_by: Vec<String>,
    /// The HAVING predicate, evaluated over aggregated rows.
    pub having: Option<Predicate>,
    /// ORDER BY keys.
    pub order_by: Vec<OrderKey>,
    /// LIMIT row cap.
    pub limit: Option<u64>,
    /// OFFSET row skip.
    pub offset: Option<u64>,
}

impl Query {
    /// Returns true if any select item is an aggregate call.
    #[must_use]
    pub fn has_aggregates(&self) -> bool {
        self.select
            .iter()
            .any(|item| matches!(item.expr, ScalarExpr::Aggregate { .. }))
    }

    /// Returns true if any select item is a window function call.
    #[must_use]
    pub fn has_windows(&self) -> bool {
        self.select
            .iter()
            .any(|item| matches!(item.expr, ScalarExpr::Window { .. }))
    }

    /// Returns true if the aggregation stage runs for this query.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty() || self.has_aggregates()
    }
}
