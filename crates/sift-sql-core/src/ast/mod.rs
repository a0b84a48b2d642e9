//! Typed AST for the query dialect.

mod expression;
mod query;

pub use expression::{
    AggregateFunc, CaseWhen, CompareOp, FrameBound, FrameUnit, Literal, OrderKey, Predicate,
    ScalarExpr, WindowFrame, WindowFunc, WindowSpec,
};
pub use query::{Cte, Join, JoinKind, Query, SelectItem, Source, SourceKind};
