//! Hand-written tokenizer for the query dialect.

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes query input.
///
/// The dialect has no comments; whitespace is the only separator. Numbers
/// are scanned integer-first with a float fallback so literal integer-ness
/// survives into the AST.
pub struct Lexer<'a> {
    /// The input query text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    /// Scans an identifier, keyword, or boolean literal.
    ///
    /// Identifier characters include `.` so that dotted references such as
    /// `orders.total` arrive at the parser as a single name.
    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];

        if text.eq_ignore_ascii_case("true") {
            return self.make_token(TokenKind::Boolean(true));
        }
        if text.eq_ignore_ascii_case("false") {
            return self.make_token(TokenKind::Boolean(false));
        }
        if let Some(keyword) = Keyword::from_str(text) {
            return self.make_token(TokenKind::Keyword(keyword));
        }
        self.make_token(TokenKind::Identifier(String::from(text)))
    }

    /// Scans a quoted identifier (e.g. "column name"); `""` escapes a quote.
    fn scan_quoted_identifier(&mut self) -> Token {
        self.advance(); // consume opening quote
        let content_start = self.pos;

        loop {
            match self.peek() {
                Some('"') => {
                    if self.peek_next() == Some('"') {
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(_) => {
                    self.advance();
                }
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "unterminated quoted identifier",
                    )));
                }
            }
        }

        let content = &self.input[content_start..self.pos];
        self.advance(); // consume closing quote

        self.make_token(TokenKind::Identifier(content.replace("\"\"", "\"")))
    }

    /// Scans a single-quoted string literal; `''` escapes a quote.
    fn scan_string(&mut self) -> Token {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                Some('\'') => {
                    if self.peek_next() == Some('\'') {
                        value.push('\'');
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "unterminated string literal",
                    )));
                }
            }
        }

        self.advance(); // consume closing quote
        self.make_token(TokenKind::String(value))
    }

    /// Scans a number, integer-first. A leading `-` is part of the literal.
    fn scan_number(&mut self) -> Token {
        if self.peek() == Some('-') {
            self.advance();
        }

        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance(); // consume .
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_float = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[self.start..self.pos];

        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return self.make_token(TokenKind::Integer(n));
            }
        }
        match text.parse::<f64>() {
            Ok(x) => self.make_token(TokenKind::Float(x)),
            Err(_) => self.make_token(TokenKind::Error(format!("invalid number: {text}"))),
        }
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.pos;

        let c = match self.peek() {
            Some(c) => c,
            None => return self.make_token(TokenKind::Eof),
        };

        match c {
            '(' => {
                self.advance();
                self.make_token(TokenKind::LeftParen)
            }
            ')' => {
                self.advance();
                self.make_token(TokenKind::RightParen)
            }
            ',' => {
                self.advance();
                self.make_token(TokenKind::Comma)
            }
            '*' => {
                self.advance();
                self.make_token(TokenKind::Star)
            }
            '=' => {
                self.advance();
                self.make_token(TokenKind::Eq)
            }
            '!' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Error(String::from("unexpected character: !")))
                }
            }
            '<' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '\'' => self.scan_string(),
            '"' => self.scan_quoted_identifier(),
            '-' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),
            c => {
                self.advance();
                self.make_token(TokenKind::Error(format!("unexpected character: {c}")))
            }
        }
    }

    /// Tokenizes the entire input, ending with an EOF token.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
