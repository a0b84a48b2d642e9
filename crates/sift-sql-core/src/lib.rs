//! # sift-sql-core
//!
//! Tokenizer, typed AST, and recursive-descent parser for the sift query
//! dialect: a SQL-flavored language with SELECT/WHERE/JOIN/GROUP BY/HAVING,
//! window functions, subqueries, and common table expressions.
//!
//! This crate knows nothing about rows or values at runtime; it turns text
//! into an immutable [`ast::Query`] tree for an executor to walk.
//!
//! ```rust
//! use sift_sql_core::Parser;
//!
//! let query = Parser::new("SELECT name FROM users WHERE age >= 21")
//!     .parse()
//!     .unwrap();
//! assert_eq!(query.select.len(), 1);
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::Query;
pub use lexer::{Keyword, Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, Parser, ParserOptions};
