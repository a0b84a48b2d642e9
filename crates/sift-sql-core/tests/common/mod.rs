#![allow(dead_code)]

use sift_sql_core::ast::Query;
use sift_sql_core::{ParseError, Parser};

pub fn parse(sql: &str) -> Query {
    Parser::new(sql)
        .parse()
        .unwrap_or_else(|e| panic!("failed to parse: {sql}\nerror: {e}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::new(sql)
        .parse()
        .expect_err(&format!("expected parse error for: {sql}"))
}
