//! Parser error type.

use thiserror::Error;

use crate::lexer::{Span, TokenKind};

/// A parse error with its location in the query text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at bytes {}..{}", .span.start, .span.end)]
pub struct ParseError {
    /// Human-readable description, including the offending token or value.
    pub message: String,
    /// Byte range of the offending token.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: &str, found: &TokenKind, span: Span) -> Self {
        Self::new(format!("expected {expected}, found {found}"), span)
    }

    /// Creates a depth-overflow error.
    #[must_use]
    pub fn depth_exceeded(limit: usize, span: Span) -> Self {
        Self::new(
            format!("query nesting exceeds the maximum depth of {limit}"),
            span,
        )
    }
}
