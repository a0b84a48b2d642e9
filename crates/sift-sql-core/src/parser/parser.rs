//! Recursive-descent parser for the query dialect.

use crate::ast::{
    AggregateFunc, CaseWhen, CompareOp, Cte, FrameBound, FrameUnit, Join, JoinKind, Literal,
    OrderKey, Predicate, Query, ScalarExpr, SelectItem, Source, SourceKind, WindowFrame,
    WindowFunc, WindowSpec,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

use super::depth::DepthTracker;
use super::error::ParseError;
use super::validate;

/// Tunable parser bounds.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Maximum recursion depth across OR/AND chains, scalar expressions,
    /// and subquery nesting.
    pub max_depth: usize,
    /// Maximum byte length of a column, table, or alias name.
    pub max_identifier_len: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: 200,
            max_identifier_len: 256,
        }
    }
}

/// Query parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: DepthTracker,
    opts: ParserOptions,
}

impl<'a> Parser<'a> {
    /// Creates a parser with default options.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    /// Creates a parser with explicit bounds.
    #[must_use]
    pub fn with_options(input: &'a str, opts: ParserOptions) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            depth: DepthTracker::new(opts.max_depth),
            opts,
        }
    }

    /// Parses a single query and requires the input to end afterwards.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the input is not a valid query.
    pub fn parse(&mut self) -> Result<Query, ParseError> {
        let query = self.parse_query()?;
        if !self.current.is_eof() {
            return Err(ParseError::unexpected(
                "end of input",
                &self.current.kind,
                self.current.span,
            ));
        }
        Ok(query)
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current.kind == *kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.as_keyword() == Some(keyword)
    }

    /// Consumes the keyword if present.
    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        self.fail_on_lex_error()?;
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                &kind.to_string(),
                &self.current.kind,
                self.current.span,
            ))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        self.fail_on_lex_error()?;
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                keyword.as_str(),
                &self.current.kind,
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        self.fail_on_lex_error()?;
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                if name.len() > self.opts.max_identifier_len {
                    return Err(ParseError::new(
                        format!(
                            "identifier exceeds the maximum length of {} bytes",
                            self.opts.max_identifier_len
                        ),
                        self.current.span,
                    ));
                }
                self.advance();
                Ok(name)
            }
            kind => Err(ParseError::unexpected(
                "an identifier",
                kind,
                self.current.span,
            )),
        }
    }

    /// Surfaces lexer error tokens as parse errors.
    fn fail_on_lex_error(&self) -> Result<(), ParseError> {
        if let TokenKind::Error(msg) = &self.current.kind {
            return Err(ParseError::new(msg.clone(), self.current.span));
        }
        Ok(())
    }

    fn descend(&self) -> Result<super::depth::DepthGuard, ParseError> {
        self.depth
            .enter()
            .ok_or_else(|| ParseError::depth_exceeded(self.depth.limit(), self.current.span))
    }

    // ------------------------------------------------------------------
    // Query structure
    // ------------------------------------------------------------------

    fn parse_query(&mut self) -> Result<Query, ParseError> {
        let _guard = self.descend()?;
        let start = self.current.span;

        let ctes = self.parse_with_clause()?;

        self.expect_keyword(Keyword::Select)?;
        let distinct = self.eat_keyword(Keyword::Distinct);
        let select = self.parse_select_list()?;

        self.expect_keyword(Keyword::From)?;
        let source = self.parse_source()?;

        let mut joins = Vec::new();
        while self.at_join_keyword() {
            joins.push(self.parse_join()?);
        }

        let filter = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_or()?)
        } else {
            None
        };

        let (group_by, having) = if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            let columns = self.parse_column_list()?;
            let having = if self.eat_keyword(Keyword::Having) {
                Some(self.parse_or()?)
            } else {
                None
            };
            (columns, having)
        } else {
            (Vec::new(), None)
        };

        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_list()?
        } else {
            Vec::new()
        };

        let limit = if self.eat_keyword(Keyword::Limit) {
            Some(self.parse_row_count("LIMIT")?)
        } else {
            None
        };
        let offset = if self.eat_keyword(Keyword::Offset) {
            Some(self.parse_row_count("OFFSET")?)
        } else {
            None
        };

        let query = Query {
            ctes,
            source,
            joins,
            select,
            distinct,
            filter,
            group_by,
            having,
            order_by,
            limit,
            offset,
        };
        validate::check_query(&query, start)?;
        Ok(query)
    }

    fn parse_with_clause(&mut self) -> Result<Vec<Cte>, ParseError> {
        if !self.eat_keyword(Keyword::With) {
            return Ok(Vec::new());
        }
        if self.check_keyword(Keyword::Recursive) {
            return Err(ParseError::new(
                "RECURSIVE common table expressions are not supported",
                self.current.span,
            ));
        }

        let mut ctes = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen)?;
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            ctes.push(Cte { name, query });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(ctes)
    }

    fn parse_select_list(&mut self) -> Result<Vec<SelectItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.check(&TokenKind::Star) {
                self.advance();
                items.push(SelectItem {
                    expr: ScalarExpr::Column(String::from("*")),
                    alias: None,
                });
            } else {
                let expr = self.parse_scalar_expr()?;
                let alias = self.parse_optional_alias()?;
                items.push(SelectItem { expr, alias });
            }

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(items)
    }

    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_keyword(Keyword::As) {
            return Ok(Some(self.expect_identifier()?));
        }
        if matches!(self.current.kind, TokenKind::Identifier(_)) {
            return Ok(Some(self.expect_identifier()?));
        }
        Ok(None)
    }

    fn parse_source(&mut self) -> Result<Source, ParseError> {
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            let alias = self.parse_optional_alias()?;
            return Ok(Source {
                kind: SourceKind::Subquery(Box::new(query)),
                alias,
            });
        }

        // A table reference: an identifier, or a quoted path destined for
        // the row producer (globs and all).
        let name = match &self.current.kind {
            TokenKind::String(path) => {
                let path = path.clone();
                self.advance();
                path
            }
            _ => self.expect_identifier()?,
        };
        let alias = self.parse_optional_alias()?;
        Ok(Source {
            kind: SourceKind::Table(name),
            alias,
        })
    }

    fn at_join_keyword(&self) -> bool {
        matches!(
            self.current.as_keyword(),
            Some(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Cross
            )
        )
    }

    fn parse_join(&mut self) -> Result<Join, ParseError> {
        let kind = self.parse_join_kind()?;
        let source = self.parse_source()?;

        let on = if kind == JoinKind::Cross {
            if self.check_keyword(Keyword::On) {
                return Err(ParseError::new(
                    "CROSS JOIN cannot take an ON predicate",
                    self.current.span,
                ));
            }
            None
        } else {
            self.expect_keyword(Keyword::On)?;
            Some(self.parse_or()?)
        };

        Ok(Join { kind, source, on })
    }

    fn parse_join_kind(&mut self) -> Result<JoinKind, ParseError> {
        let kind = match self.current.as_keyword() {
            Some(Keyword::Join) => {
                self.advance();
                JoinKind::Inner
            }
            Some(Keyword::Inner) => {
                self.advance();
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Inner
            }
            Some(Keyword::Left) => {
                self.advance();
                self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Left
            }
            Some(Keyword::Right) => {
                self.advance();
                self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Right
            }
            Some(Keyword::Full) => {
                self.advance();
                self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Full
            }
            Some(Keyword::Cross) => {
                self.advance();
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Cross
            }
            _ => {
                return Err(ParseError::unexpected(
                    "a JOIN clause",
                    &self.current.kind,
                    self.current.span,
                ));
            }
        };
        Ok(kind)
    }

    fn parse_column_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut columns = vec![self.expect_identifier()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            columns.push(self.expect_identifier()?);
        }
        Ok(columns)
    }

    fn parse_order_list(&mut self) -> Result<Vec<OrderKey>, ParseError> {
        let mut keys = Vec::new();
        loop {
            let column = self.expect_identifier()?;
            let descending = if self.eat_keyword(Keyword::Desc) {
                true
            } else {
                self.eat_keyword(Keyword::Asc);
                false
            };
            keys.push(OrderKey { column, descending });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(keys)
    }

    fn parse_row_count(&mut self, clause: &str) -> Result<u64, ParseError> {
        self.fail_on_lex_error()?;
        match self.current.kind {
            TokenKind::Integer(n) => {
                if n < 0 {
                    return Err(ParseError::new(
                        format!("{clause} must be non-negative, got {n}"),
                        self.current.span,
                    ));
                }
                self.advance();
                Ok(n.unsigned_abs())
            }
            ref kind => Err(ParseError::unexpected(
                &format!("an integer after {clause}"),
                kind,
                self.current.span,
            )),
        }
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    fn parse_or(&mut self) -> Result<Predicate, ParseError> {
        let _guard = self.descend()?;
        let mut lhs = self.parse_and()?;
        while self.eat_keyword(Keyword::Or) {
            let rhs = self.parse_and()?;
            lhs = Predicate::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Predicate, ParseError> {
        let _guard = self.descend()?;
        let mut lhs = self.parse_comparison()?;
        while self.eat_keyword(Keyword::And) {
            let rhs = self.parse_comparison()?;
            lhs = Predicate::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Predicate, ParseError> {
        if self.check_keyword(Keyword::Exists) {
            return self.parse_exists(false);
        }
        if self.check_keyword(Keyword::Not) {
            self.advance();
            if self.check_keyword(Keyword::Exists) {
                return self.parse_exists(true);
            }
            return Err(ParseError::unexpected(
                "EXISTS after NOT",
                &self.current.kind,
                self.current.span,
            ));
        }

        let column = self.expect_identifier()?;

        match self.current.as_keyword() {
            Some(Keyword::Is) => {
                self.advance();
                let negated = self.eat_keyword(Keyword::Not);
                self.expect_keyword(Keyword::Null)?;
                return Ok(Predicate::IsNull { column, negated });
            }
            Some(Keyword::In) => {
                self.advance();
                return self.parse_in_rhs(column, false);
            }
            Some(Keyword::Like) => {
                self.advance();
                return self.parse_like_rhs(column, false);
            }
            Some(Keyword::Between) => {
                self.advance();
                return self.parse_between_rhs(column, false);
            }
            Some(Keyword::Not) => {
                self.advance();
                return match self.current.as_keyword() {
                    Some(Keyword::In) => {
                        self.advance();
                        self.parse_in_rhs(column, true)
                    }
                    Some(Keyword::Like) => {
                        self.advance();
                        self.parse_like_rhs(column, true)
                    }
                    Some(Keyword::Between) => {
                        self.advance();
                        self.parse_between_rhs(column, true)
                    }
                    _ => Err(ParseError::unexpected(
                        "IN, LIKE, or BETWEEN after NOT",
                        &self.current.kind,
                        self.current.span,
                    )),
                };
            }
            _ => {}
        }

        let op = self.parse_compare_op()?;

        // RHS: a literal or a second column.
        if let TokenKind::Identifier(_) = self.current.kind {
            let right = self.expect_identifier()?;
            return Ok(Predicate::CompareColumns {
                left: column,
                op,
                right,
            });
        }
        let value = self.parse_literal()?;
        Ok(Predicate::Compare { column, op, value })
    }

    fn parse_exists(&mut self, negated: bool) -> Result<Predicate, ParseError> {
        self.expect_keyword(Keyword::Exists)?;
        self.expect(&TokenKind::LeftParen)?;
        let query = self.parse_query()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Predicate::Exists {
            query: Box::new(query),
            negated,
        })
    }

    fn parse_in_rhs(&mut self, column: String, negated: bool) -> Result<Predicate, ParseError> {
        self.expect(&TokenKind::LeftParen)?;

        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            let span = self.current.span;
            let query = self.parse_query()?;
            validate::check_single_column(&query, span)?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(Predicate::InSubquery {
                column,
                query: Box::new(query),
                negated,
            });
        }

        let mut values = vec![self.parse_literal()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            values.push(self.parse_literal()?);
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(Predicate::InList {
            column,
            values,
            negated,
        })
    }

    fn parse_like_rhs(&mut self, column: String, negated: bool) -> Result<Predicate, ParseError> {
        self.fail_on_lex_error()?;
        match &self.current.kind {
            TokenKind::String(pattern) => {
                let pattern = pattern.clone();
                self.advance();
                Ok(Predicate::Like {
                    column,
                    pattern,
                    negated,
                })
            }
            kind => Err(ParseError::unexpected(
                "a string pattern after LIKE",
                kind,
                self.current.span,
            )),
        }
    }

    fn parse_between_rhs(
        &mut self,
        column: String,
        negated: bool,
    ) -> Result<Predicate, ParseError> {
        let low = self.parse_literal()?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_literal()?;
        Ok(Predicate::Between {
            column,
            low,
            high,
            negated,
        })
    }

    fn parse_compare_op(&mut self) -> Result<CompareOp, ParseError> {
        self.fail_on_lex_error()?;
        let op = match self.current.kind {
            TokenKind::Eq => CompareOp::Eq,
            TokenKind::NotEq => CompareOp::NotEq,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::LtEq => CompareOp::LtEq,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::GtEq => CompareOp::GtEq,
            ref kind => {
                return Err(ParseError::unexpected(
                    "a comparison operator",
                    kind,
                    self.current.span,
                ));
            }
        };
        self.advance();
        Ok(op)
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        self.fail_on_lex_error()?;
        let literal = match &self.current.kind {
            TokenKind::Integer(n) => Literal::Integer(*n),
            TokenKind::Float(x) => Literal::Float(*x),
            TokenKind::String(s) => Literal::String(s.clone()),
            TokenKind::Boolean(b) => Literal::Boolean(*b),
            TokenKind::Keyword(Keyword::Null) => Literal::Null,
            kind => {
                return Err(ParseError::unexpected(
                    "a literal value",
                    kind,
                    self.current.span,
                ));
            }
        };
        self.advance();
        Ok(literal)
    }

    // ------------------------------------------------------------------
    // Scalar expressions
    // ------------------------------------------------------------------

    fn parse_scalar_expr(&mut self) -> Result<ScalarExpr, ParseError> {
        let _guard = self.descend()?;
        self.fail_on_lex_error()?;

        match &self.current.kind {
            TokenKind::Keyword(Keyword::Case) => self.parse_case(),
            TokenKind::LeftParen => {
                let span = self.current.span;
                self.advance();
                if !(self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With)) {
                    return Err(ParseError::unexpected(
                        "a subquery",
                        &self.current.kind,
                        self.current.span,
                    ));
                }
                let query = self.parse_query()?;
                validate::check_single_column(&query, span)?;
                self.expect(&TokenKind::RightParen)?;
                Ok(ScalarExpr::Subquery(Box::new(query)))
            }
            TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::String(_)
            | TokenKind::Boolean(_)
            | TokenKind::Keyword(Keyword::Null) => Ok(ScalarExpr::Literal(self.parse_literal()?)),
            TokenKind::Identifier(_) => {
                let name = self.expect_identifier()?;
                if self.check(&TokenKind::LeftParen) {
                    self.parse_call(name)
                } else {
                    Ok(ScalarExpr::Column(name))
                }
            }
            kind => Err(ParseError::unexpected(
                "an expression",
                kind,
                self.current.span,
            )),
        }
    }

    fn parse_case(&mut self) -> Result<ScalarExpr, ParseError> {
        self.expect_keyword(Keyword::Case)?;

        let mut whens = Vec::new();
        while self.eat_keyword(Keyword::When) {
            let when = self.parse_or()?;
            self.expect_keyword(Keyword::Then)?;
            let then = self.parse_scalar_expr()?;
            whens.push(CaseWhen { when, then });
        }
        if whens.is_empty() {
            return Err(ParseError::new(
                "CASE requires at least one WHEN arm",
                self.current.span,
            ));
        }

        let else_ = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_scalar_expr()?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;
        Ok(ScalarExpr::Case { whens, else_ })
    }

    /// Parses a call after the name. The fixed aggregate and window name
    /// sets decide what kind of call this is; everything else resolves
    /// against the scalar function registry at runtime.
    fn parse_call(&mut self, name: String) -> Result<ScalarExpr, ParseError> {
        let call_span = self.current.span;
        self.expect(&TokenKind::LeftParen)?;

        let distinct = self.eat_keyword(Keyword::Distinct);

        let mut star = false;
        let mut args = Vec::new();
        if self.check(&TokenKind::Star) {
            self.advance();
            star = true;
        } else if !self.check(&TokenKind::RightParen) {
            args.push(self.parse_scalar_expr()?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                args.push(self.parse_scalar_expr()?);
            }
        }
        self.expect(&TokenKind::RightParen)?;

        if let Some(func) = WindowFunc::from_name(&name) {
            return self.finish_window_call(&name, func, args, distinct, star, call_span);
        }

        let aggregate = AggregateFunc::from_name(&name).filter(|func| {
            // MIN/MAX with two arguments are the binary scalar functions.
            !(matches!(func, AggregateFunc::Min | AggregateFunc::Max) && args.len() == 2)
        });
        if let Some(func) = aggregate {
            return self.finish_aggregate_call(&name, func, args, distinct, star, call_span);
        }

        if self.check_keyword(Keyword::Over) {
            return Err(ParseError::new(
                format!("{name} is not a window function"),
                self.current.span,
            ));
        }
        if distinct {
            return Err(ParseError::new(
                "DISTINCT is only valid inside an aggregate call",
                call_span,
            ));
        }
        if star {
            return Err(ParseError::new(
                format!("(*) is not a valid argument for {name}"),
                call_span,
            ));
        }
        Ok(ScalarExpr::Function { name, args })
    }

    fn finish_window_call(
        &mut self,
        name: &str,
        func: WindowFunc,
        args: Vec<ScalarExpr>,
        distinct: bool,
        star: bool,
        span: Span,
    ) -> Result<ScalarExpr, ParseError> {
        if distinct || star {
            return Err(ParseError::new(
                format!("invalid argument list for window function {name}"),
                span,
            ));
        }
        let (min, max) = func.arity();
        if args.len() < min || args.len() > max {
            return Err(ParseError::new(
                format!(
                    "{name} takes {min}..={max} arguments, found {}",
                    args.len()
                ),
                span,
            ));
        }
        if !self.check_keyword(Keyword::Over) {
            return Err(ParseError::new(
                format!("window function {name} requires an OVER clause"),
                self.current.span,
            ));
        }
        self.advance();
        let spec = self.parse_window_spec()?;
        Ok(ScalarExpr::Window { func, args, spec })
    }

    fn finish_aggregate_call(
        &mut self,
        name: &str,
        func: AggregateFunc,
        args: Vec<ScalarExpr>,
        distinct: bool,
        star: bool,
        span: Span,
    ) -> Result<ScalarExpr, ParseError> {
        if self.check_keyword(Keyword::Over) {
            return Err(ParseError::new(
                format!("aggregate {name} cannot be used as a window function"),
                self.current.span,
            ));
        }
        if star && func != AggregateFunc::Count {
            return Err(ParseError::new(
                format!("(*) is only valid in COUNT, not {name}"),
                span,
            ));
        }
        if star && distinct {
            return Err(ParseError::new("COUNT(DISTINCT *) is not supported", span));
        }

        let mut args = args;
        let arg = if star {
            None
        } else {
            match (args.pop(), args.is_empty()) {
                (Some(arg), true) => Some(Box::new(arg)),
                (popped, _) => {
                    let found = args.len() + usize::from(popped.is_some());
                    return Err(ParseError::new(
                        format!("{name} takes exactly one argument, found {found}"),
                        span,
                    ));
                }
            }
        };

        Ok(ScalarExpr::Aggregate {
            func,
            arg,
            distinct,
        })
    }

    fn parse_window_spec(&mut self) -> Result<WindowSpec, ParseError> {
        self.expect(&TokenKind::LeftParen)?;

        let partition_by = if self.eat_keyword(Keyword::Partition) {
            self.expect_keyword(Keyword::By)?;
            self.parse_column_list()?
        } else {
            Vec::new()
        };

        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_list()?
        } else {
            Vec::new()
        };

        let frame = if self.check_keyword(Keyword::Rows) || self.check_keyword(Keyword::Range) {
            Some(self.parse_frame()?)
        } else {
            None
        };

        self.expect(&TokenKind::RightParen)?;
        Ok(WindowSpec {
            partition_by,
            order_by,
            frame,
        })
    }

    fn parse_frame(&mut self) -> Result<WindowFrame, ParseError> {
        let unit = if self.eat_keyword(Keyword::Rows) {
            FrameUnit::Rows
        } else {
            self.expect_keyword(Keyword::Range)?;
            FrameUnit::Range
        };

        if self.eat_keyword(Keyword::Between) {
            let start = self.parse_frame_bound()?;
            self.expect_keyword(Keyword::And)?;
            let end = self.parse_frame_bound()?;
            Ok(WindowFrame { unit, start, end })
        } else {
            let start = self.parse_frame_bound()?;
            Ok(WindowFrame {
                unit,
                start,
                end: FrameBound::CurrentRow,
            })
        }
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        self.fail_on_lex_error()?;
        if self.eat_keyword(Keyword::Unbounded) {
            if self.eat_keyword(Keyword::Preceding) {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::Following)?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.eat_keyword(Keyword::Current) {
            self.expect_keyword(Keyword::Row)?;
            return Ok(FrameBound::CurrentRow);
        }
        match self.current.kind {
            TokenKind::Integer(n) if n >= 0 => {
                self.advance();
                let n = n.unsigned_abs();
                if self.eat_keyword(Keyword::Preceding) {
                    Ok(FrameBound::Preceding(n))
                } else {
                    self.expect_keyword(Keyword::Following)?;
                    Ok(FrameBound::Following(n))
                }
            }
            ref kind => Err(ParseError::unexpected(
                "a frame bound",
                kind,
                self.current.span,
            )),
        }
    }
}
