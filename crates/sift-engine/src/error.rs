//! Error types for the engine.

use thiserror::Error;

use sift_sql_core::ParseError;

/// Engine-level errors.
///
/// Every stage propagates the first error it hits; the only sanctioned
/// swallowing happens inside aggregates (per-row errors count as nulls),
/// `TRY_CAST`, and `NULLIF`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The query text did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A referenced column is absent from the row.
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// Values of incompatible families were compared or combined.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// No scalar function registered under this name.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A function was called with the wrong number of arguments.
    #[error("{function} expects {expected} arguments, found {found}")]
    Arity {
        function: String,
        expected: String,
        found: usize,
    },

    /// A value could not be coerced to a number.
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// A value could not be parsed as a date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Zero divisor in MOD.
    #[error("division by zero in {0}")]
    DivisionByZero(String),

    /// A function argument was out of its domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A scalar subquery produced more than one row.
    #[error("scalar subquery returned {0} rows, expected at most one")]
    ScalarSubqueryCardinality(usize),

    /// The row producer does not know the requested source.
    #[error("table not found: {0}")]
    UnknownTable(String),

    /// The row producer failed while opening or reading a source.
    #[error("source error: {0}")]
    Source(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
