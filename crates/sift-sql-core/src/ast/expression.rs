//! Expression AST types.
//!
//! The dialect keeps boolean predicates (WHERE/HAVING/ON) and scalar
//! expressions (select list, CASE arms, function arguments) as two distinct
//! trees, so each evaluation site only admits the expression family that is
//! legal there.

use core::fmt;

use super::Query;

/// A literal value as written in the query text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// NULL literal.
    Null,
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// Boolean literal.
    Boolean(bool),
    /// String literal.
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    /// Returns the source representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boolean predicate, as used in WHERE, HAVING, and JOIN ... ON.
///
/// Comparisons are column-anchored: the left side is always a column
/// reference, the right side a literal or a second column.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Conjunction; binds tighter than `Or`.
    And(Box<Predicate>, Box<Predicate>),
    /// Disjunction.
    Or(Box<Predicate>, Box<Predicate>),
    /// `column op literal`
    Compare {
        column: String,
        op: CompareOp,
        value: Literal,
    },
    /// `column op column`
    CompareColumns {
        left: String,
        op: CompareOp,
        right: String,
    },
    /// `column [NOT] IN (v1, v2, ...)`
    InList {
        column: String,
        values: Vec<Literal>,
        negated: bool,
    },
    /// `column [NOT] IN (SELECT ...)`
    InSubquery {
        column: String,
        query: Box<Query>,
        negated: bool,
    },
    /// `column [NOT] LIKE 'pattern'`
    Like {
        column: String,
        pattern: String,
        negated: bool,
    },
    /// `column [NOT] BETWEEN low AND high`
    Between {
        column: String,
        low: Literal,
        high: Literal,
        negated: bool,
    },
    /// `column IS [NOT] NULL`
    IsNull { column: String, negated: bool },
    /// `[NOT] EXISTS (SELECT ...)`
    Exists { query: Box<Query>, negated: bool },
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(l, r) => write!(f, "{l} AND {r}"),
            Self::Or(l, r) => write!(f, "{l} OR {r}"),
            Self::Compare { column, op, value } => write!(f, "{column} {op} {value}"),
            Self::CompareColumns { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::InList {
                column,
                values,
                negated,
            } => {
                let not = if *negated { " NOT" } else { "" };
                write!(f, "{column}{not} IN (")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str(")")
            }
            Self::InSubquery {
                column, negated, ..
            } => {
                let not = if *negated { " NOT" } else { "" };
                write!(f, "{column}{not} IN (SELECT ...)")
            }
            Self::Like {
                column,
                pattern,
                negated,
            } => {
                let not = if *negated { " NOT" } else { "" };
                write!(f, "{column}{not} LIKE '{pattern}'")
            }
            Self::Between {
                column,
                low,
                high,
                negated,
            } => {
                let not = if *negated { " NOT" } else { "" };
                write!(f, "{column}{not} BETWEEN {low} AND {high}")
            }
            Self::IsNull { column, negated } => {
                let not = if *negated { " NOT" } else { "" };
                write!(f, "{column} IS{not} NULL")
            }
            Self::Exists { negated, .. } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{not}EXISTS (SELECT ...)")
            }
        }
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    /// Looks up an aggregate by name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "COUNT" => Some(Self::Count),
            "SUM" => Some(Self::Sum),
            "AVG" => Some(Self::Avg),
            "MIN" => Some(Self::Min),
            "MAX" => Some(Self::Max),
            _ => None,
        }
    }

    /// Default output column name (lowercased function name).
    #[must_use]
    pub const fn output_name(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// Window functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowFunc {
    RowNumber,
    Rank,
    DenseRank,
    Ntile,
    FirstValue,
    LastValue,
    NthValue,
    Lag,
    Lead,
}

impl WindowFunc {
    /// Looks up a window function by name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "ROW_NUMBER" => Some(Self::RowNumber),
            "RANK" => Some(Self::Rank),
            "DENSE_RANK" => Some(Self::DenseRank),
            "NTILE" => Some(Self::Ntile),
            "FIRST_VALUE" => Some(Self::FirstValue),
            "LAST_VALUE" => Some(Self::LastValue),
            "NTH_VALUE" => Some(Self::NthValue),
            "LAG" => Some(Self::Lag),
            "LEAD" => Some(Self::Lead),
            _ => None,
        }
    }

    /// Default output column name (lowercased function name).
    #[must_use]
    pub const fn output_name(&self) -> &'static str {
        match self {
            Self::RowNumber => "row_number",
            Self::Rank => "rank",
            Self::DenseRank => "dense_rank",
            Self::Ntile => "ntile",
            Self::FirstValue => "first_value",
            Self::LastValue => "last_value",
            Self::NthValue => "nth_value",
            Self::Lag => "lag",
            Self::Lead => "lead",
        }
    }

    /// The number of arguments the function accepts (min, max).
    #[must_use]
    pub const fn arity(&self) -> (usize, usize) {
        match self {
            Self::RowNumber | Self::Rank | Self::DenseRank => (0, 0),
            Self::Ntile | Self::FirstValue | Self::LastValue => (1, 1),
            Self::NthValue => (2, 2),
            Self::Lag | Self::Lead => (1, 3),
        }
    }
}

/// One WHEN/THEN arm of a CASE expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseWhen {
    /// The boolean condition.
    pub when: Predicate,
    /// The result when the condition holds.
    pub then: ScalarExpr,
}

/// The unit of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnit {
    Rows,
    Range,
}

/// One bound of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(u64),
    CurrentRow,
    Following(u64),
    UnboundedFollowing,
}

/// A window frame clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFrame {
    pub unit: FrameUnit,
    pub start: FrameBound,
    pub end: FrameBound,
}

/// One key of an ORDER BY (or window ORDER BY) list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    /// Column name or select-list alias.
    pub column: String,
    /// True for DESC.
    pub descending: bool,
}

impl OrderKey {
    /// Creates an ascending key.
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    /// Creates a descending key.
    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// The OVER (...) clause of a window function call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSpec {
    /// PARTITION BY columns.
    pub partition_by: Vec<String>,
    /// ORDER BY keys within each partition.
    pub order_by: Vec<OrderKey>,
    /// Optional frame. Parsed in full; execution honors it implicitly.
    pub frame: Option<WindowFrame>,
}

/// A scalar expression, as used in the select list and function arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarExpr {
    /// A column reference; `*` selects the whole row.
    Column(String),
    /// A literal value.
    Literal(Literal),
    /// A scalar function call, resolved against the registry at runtime.
    Function { name: String, args: Vec<ScalarExpr> },
    /// An aggregate call. `arg` is `None` for `COUNT(*)`.
    Aggregate {
        func: AggregateFunc,
        arg: Option<Box<ScalarExpr>>,
        distinct: bool,
    },
    /// A searched CASE expression.
    Case {
        whens: Vec<CaseWhen>,
        else_: Option<Box<ScalarExpr>>,
    },
    /// A window function call with its OVER clause.
    Window {
        func: WindowFunc,
        args: Vec<ScalarExpr>,
        spec: WindowSpec,
    },
    /// A scalar subquery (one column, at most one row).
    Subquery(Box<Query>),
}

impl ScalarExpr {
    /// Returns true if the expression is the bare `*` wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Column(name) if name == "*")
    }
}

impl fmt::Display for ScalarExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => f.write_str(name),
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
            Self::Aggregate {
                func,
                arg,
                distinct,
            } => {
                let name = func.output_name().to_uppercase();
                let inner = match arg {
                    Some(a) => a.to_string(),
                    None => String::from("*"),
                };
                if *distinct {
                    write!(f, "{name}(DISTINCT {inner})")
                } else {
                    write!(f, "{name}({inner})")
                }
            }
            Self::Case { whens, else_ } => {
                f.write_str("CASE")?;
                for arm in whens {
                    write!(f, " WHEN {} THEN {}", arm.when, arm.then)?;
                }
                if let Some(e) = else_ {
                    write!(f, " ELSE {e}")?;
                }
                f.write_str(" END")
            }
            Self::Window { func, .. } => {
                write!(f, "{}() OVER (...)", func.output_name().to_uppercase())
            }
            Self::Subquery(_) => f.write_str("(SELECT ...)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_display_escapes_quotes() {
        assert_eq!(Literal::String(String::from("it's")).to_string(), "'it''s'");
        assert_eq!(Literal::Null.to_string(), "NULL");
    }

    #[test]
    fn test_predicate_display() {
        let p = Predicate::And(
            Box::new(Predicate::Compare {
                column: String::from("age"),
                op: CompareOp::GtEq,
                value: Literal::Integer(21),
            }),
            Box::new(Predicate::IsNull {
                column: String::from("deleted_at"),
                negated: false,
            }),
        );
        assert_eq!(p.to_string(), "age >= 21 AND deleted_at IS NULL");
    }

    #[test]
    fn test_aggregate_names() {
        assert_eq!(AggregateFunc::from_name("count"), Some(AggregateFunc::Count));
        assert_eq!(AggregateFunc::Avg.output_name(), "avg");
        assert_eq!(AggregateFunc::from_name("median"), None);
    }

    #[test]
    fn test_window_func_arity() {
        assert_eq!(WindowFunc::RowNumber.arity(), (0, 0));
        assert_eq!(WindowFunc::Lag.arity(), (1, 3));
        assert_eq!(WindowFunc::NthValue.arity(), (2, 2));
    }

    #[test]
    fn test_wildcard_detection() {
        assert!(ScalarExpr::Column(String::from("*")).is_wildcard());
        assert!(!ScalarExpr::Column(String::from("a")).is_wildcard());
    }
}
