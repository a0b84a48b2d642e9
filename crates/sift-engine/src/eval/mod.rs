//! Row-scoped expression evaluation.
//!
//! One comparison dispatch shared by every stage, a cached LIKE pattern
//! translator, and the predicate/scalar evaluators that walk the two AST
//! families with an explicit executor context for subqueries.

mod compare;
mod like;
mod predicate;
mod scalar;

pub use compare::{compare_values, sort_ordering, values_equal};
pub use like::like_match;
pub use predicate::eval_predicate;
pub use scalar::eval_scalar;
