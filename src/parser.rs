// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A recursive-descent, precedence-climbing parser that turns a token
//! stream into a closed-sum, position-annotated AST.
//!
//! The expression parser uses precedence climbing (`parse_expression_bp`):
//! each binary operator has a binding power from
//! [`crate::ast::operator::precedence`], and the right-hand side of a
//! left-associative operator is parsed at `bp + 1` so it stops before
//! swallowing an operator of the same precedence. `BETWEEN`/`IN`/the `LIKE`
//! family share a band with the comparison operators but aren't plain
//! `BinaryOperator`s, so they get their own dispatch inside the same loop.
//!
//! A syntax error does not abort the whole parse: [`Parser::parse`] catches
//! the error, records it, and calls [`Parser::synchronize`] to skip ahead to
//! the next token that plausibly starts a statement, the same panic-mode
//! recovery a linter or IDE server needs to keep reporting errors across an
//! entire file instead of stopping at the first one.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::trace;

use crate::ast::ddl::{
    AlterTableAction, AlterTableStatement, ColumnConstraint, ColumnConstraintKind, ColumnDef,
    ConflictResolution, CreateIndexStatement, CreateTableSource, CreateTableStatement,
    CreateTriggerStatement, CreateViewStatement, CreateVirtualTableStatement, Deferrable,
    DefaultValue, DropIndexStatement, DropTableStatement, DropTriggerStatement, DropViewStatement,
    ForeignKeyAction, ForeignKeyClause, IndexedColumn, InitiallyWhen, TableConstraint,
    TableConstraintKind, TriggerEvent, TriggerTiming,
};
use crate::ast::dml::{
    Assignment, ConflictTarget, Delete, Insert, InsertSource, Update, UpsertAction, UpsertClause,
};
use crate::ast::expr::{
    Expr, ExprKind, FrameBoundary, FrameExclude, FrameSpec, FrameUnit, FunctionArgs, InSource,
    LikeOperator, RaiseExpr, TypeName, WindowDefinition, WindowSpec,
};
use crate::ast::operator::{
    precedence, BinaryOperator, UnaryOperator, BETWEEN_IN_PRECEDENCE, FRAME_BOUNDARY_PRECEDENCE,
    NOT_PRECEDENCE,
};
use crate::ast::query::{
    CompoundOperator, Cte, Distinct, FromClause, JoinClause, JoinConstraint, JoinOperator, Limit,
    NamedWindowDefinition, NullsOrder, OrderDirection, OrderingTerm, ResultColumn, Select,
    SelectCore, SetExpr, TableRef, With,
};
use crate::ast::stmt::{
    AttachStatement, BeginStatement, ExplainStatement, PragmaStatement, PragmaValue, Statement,
    StatementKind, TransactionType, VacuumStatement,
};
use crate::ast::value::{parse_numeric_text, Literal};
use crate::ast::{Ident, QualifiedName};
use crate::error::{ParserError, ParserErrorKind};
use crate::keywords::Keyword;
use crate::position::{Position, Span};
use crate::tokenizer::{tokenize, Token, TokenKind};

/// A recursive-descent parser over a flat token stream.
///
/// `source` is kept so errors can be rendered with the offending source
/// line; `depth` guards against stack overflow on deeply nested
/// expressions (`((((((...))))))`) via [`Parser::MAX_EXPR_DEPTH`].
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'a str,
    errors: Vec<ParserError>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Maximum expression nesting depth before a parse is abandoned with
    /// [`ParserErrorKind::RecursionLimitExceeded`] instead of overflowing
    /// the call stack.
    pub const MAX_EXPR_DEPTH: usize = 1024;

    /// Tokenize and parse `text`, recovering from syntax errors in panic
    /// mode: every statement that parsed cleanly is returned alongside
    /// every error encountered along the way.
    pub fn parse(text: &'a str) -> (Vec<Statement>, Vec<ParserError>) {
        let tokens = match tokenize(text) {
            Ok(tokens) => tokens,
            Err(err) => return (Vec::new(), alloc::vec![err.with_source(text)]),
        };
        trace!("tokenized {} tokens", tokens.len());
        let mut parser = Parser {
            tokens,
            pos: 0,
            source: text,
            errors: Vec::new(),
            depth: 0,
        };
        let statements = parser.parse_program();
        (statements, parser.errors)
    }

    fn parse_program(&mut self) -> Vec<Statement> {
        let mut statements = Vec::new();
        while self.eat(TokenKind::Semicolon) {}
        while !self.is_eof() {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    trace!("syntax error, resynchronizing: {}", err.kind());
                    self.errors.push(err.with_source(self.source));
                    self.synchronize();
                }
            }
            while self.eat(TokenKind::Semicolon) {}
        }
        statements
    }

    /// Skip tokens until one that plausibly starts the next statement, or a
    /// `;` (consumed), or end of input. Keeps a single syntax error from
    /// swallowing the rest of the program.
    fn synchronize(&mut self) {
        while !self.is_eof() {
            if self.check(TokenKind::Semicolon) {
                self.advance();
                return;
            }
            if self.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    fn starts_statement(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Keyword(Keyword::SELECT)
                | TokenKind::Keyword(Keyword::INSERT)
                | TokenKind::Keyword(Keyword::REPLACE)
                | TokenKind::Keyword(Keyword::UPDATE)
                | TokenKind::Keyword(Keyword::DELETE)
                | TokenKind::Keyword(Keyword::CREATE)
                | TokenKind::Keyword(Keyword::ALTER)
                | TokenKind::Keyword(Keyword::DROP)
                | TokenKind::Keyword(Keyword::BEGIN)
                | TokenKind::Keyword(Keyword::COMMIT)
                | TokenKind::Keyword(Keyword::END)
                | TokenKind::Keyword(Keyword::ROLLBACK)
                | TokenKind::Keyword(Keyword::SAVEPOINT)
                | TokenKind::Keyword(Keyword::RELEASE)
                | TokenKind::Keyword(Keyword::ATTACH)
                | TokenKind::Keyword(Keyword::DETACH)
                | TokenKind::Keyword(Keyword::ANALYZE)
                | TokenKind::Keyword(Keyword::VACUUM)
                | TokenKind::Keyword(Keyword::REINDEX)
                | TokenKind::Keyword(Keyword::EXPLAIN)
                | TokenKind::Keyword(Keyword::PRAGMA)
                | TokenKind::Keyword(Keyword::WITH)
        )
    }

    // ---- token-stream primitives -----------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos - 1]
    }

    fn is_eof(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn current_position(&self) -> Position {
        self.current().position
    }

    fn previous_end(&self) -> Position {
        self.previous().span.end
    }

    fn span_since(&self, start: Position) -> Span {
        Span::new(start, self.previous_end())
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if !matches!(tok.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(self.current().kind, TokenKind::Keyword(k) if k == kw)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn found_description(&self) -> String {
        if self.is_eof() {
            "end of input".to_string()
        } else {
            format!("'{}'", self.current().text)
        }
    }

    fn error(&self, kind: ParserErrorKind) -> ParserError {
        ParserError::new(kind, Some(self.current_position()))
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParserError> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.is_eof() {
            Err(self.error(ParserErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            }))
        } else {
            Err(self.error(ParserErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: self.found_description(),
            }))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<Token, ParserError> {
        if self.check_keyword(kw) {
            Ok(self.advance())
        } else if self.is_eof() {
            Err(self.error(ParserErrorKind::UnexpectedEof {
                expected: kw.as_str().to_string(),
            }))
        } else {
            Err(self.error(ParserErrorKind::UnexpectedToken {
                expected: kw.as_str().to_string(),
                found: self.found_description(),
            }))
        }
    }

    fn expect_identifier(&mut self) -> Result<Ident, ParserError> {
        if self.check(TokenKind::Identifier) {
            let tok = self.advance();
            Ok(match tok.quote {
                Some(q) => Ident::with_quote(q, tok.text),
                None => Ident::new(tok.text),
            })
        } else if self.is_eof() {
            Err(self.error(ParserErrorKind::UnexpectedEof {
                expected: "an identifier".to_string(),
            }))
        } else {
            Err(self.error(ParserErrorKind::UnexpectedToken {
                expected: "an identifier".to_string(),
                found: self.found_description(),
            }))
        }
    }

    /// Like [`Parser::expect_identifier`], but also accepts a keyword token
    /// used where a keyword name is unambiguous (column/type/collation
    /// names in a `CREATE TABLE`, a `CAST` type name): SQLite's own grammar
    /// allows this only in those narrow contexts, not generally in
    /// expression position.
    fn expect_identifier_or_keyword(&mut self) -> Result<Ident, ParserError> {
        match self.current().kind {
            TokenKind::Identifier => self.expect_identifier(),
            TokenKind::Keyword(_) => {
                let tok = self.advance();
                Ok(Ident::new(tok.text))
            }
            _ if self.is_eof() => Err(self.error(ParserErrorKind::UnexpectedEof {
                expected: "an identifier".to_string(),
            })),
            _ => Err(self.error(ParserErrorKind::UnexpectedToken {
                expected: "an identifier".to_string(),
                found: self.found_description(),
            })),
        }
    }

    /// A possibly schema-qualified name of 1 to 3 dot-separated parts. A
    /// fourth part is a syntax error rather than silently accepted or
    /// truncated.
    fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParserError> {
        let mut parts = alloc::vec![self.expect_identifier()?];
        while self.eat(TokenKind::Dot) {
            if parts.len() >= 3 {
                return Err(self.error(ParserErrorKind::UnexpectedToken {
                    expected: "at most 3 dot-separated parts in a qualified name".to_string(),
                    found: self.found_description(),
                }));
            }
            parts.push(self.expect_identifier()?);
        }
        Ok(QualifiedName::new(parts))
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParserError> {
        if self.eat_keyword(Keyword::IF) {
            self.expect_keyword(Keyword::NOT)?;
            self.expect_keyword(Keyword::EXISTS)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_if_exists(&mut self) -> Result<bool, ParserError> {
        if self.eat_keyword(Keyword::IF) {
            self.expect_keyword(Keyword::EXISTS)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ---- recursion guard --------------------------------------------

    fn parse_expression(&mut self) -> Result<Expr, ParserError> {
        self.parse_expression_bp(0)
    }

    fn parse_expression_bp(&mut self, min_bp: u8) -> Result<Expr, ParserError> {
        self.depth += 1;
        if self.depth > Self::MAX_EXPR_DEPTH {
            self.depth -= 1;
            return Err(self.error(ParserErrorKind::RecursionLimitExceeded));
        }
        let result = self.parse_expression_bp_inner(min_bp);
        self.depth -= 1;
        result
    }

    // ---- expressions --------------------------------------------------

    fn simple_binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
        use BinaryOperator::*;
        match kind {
            TokenKind::Plus => Some(Plus),
            TokenKind::Minus => Some(Minus),
            TokenKind::Star => Some(Multiply),
            TokenKind::Slash => Some(Divide),
            TokenKind::Percent => Some(Modulo),
            TokenKind::Concat => Some(StringConcat),
            TokenKind::Eq | TokenKind::EqEq => Some(Eq),
            TokenKind::NotEq | TokenKind::LtGt => Some(NotEq),
            TokenKind::Lt => Some(Lt),
            TokenKind::Gt => Some(Gt),
            TokenKind::LtEq => Some(LtEq),
            TokenKind::GtEq => Some(GtEq),
            TokenKind::Shl => Some(BitwiseShiftLeft),
            TokenKind::Shr => Some(BitwiseShiftRight),
            TokenKind::Amp => Some(BitwiseAnd),
            TokenKind::Pipe => Some(BitwiseOr),
            TokenKind::Arrow => Some(JsonExtract),
            TokenKind::ArrowArrow => Some(JsonExtractText),
            TokenKind::Keyword(Keyword::AND) => Some(And),
            TokenKind::Keyword(Keyword::OR) => Some(Or),
            _ => None,
        }
    }

    fn current_like_operator(&self) -> Option<LikeOperator> {
        match self.current().kind {
            TokenKind::Keyword(Keyword::LIKE) => Some(LikeOperator::Like),
            TokenKind::Keyword(Keyword::GLOB) => Some(LikeOperator::Glob),
            TokenKind::Keyword(Keyword::MATCH) => Some(LikeOperator::Match),
            TokenKind::Keyword(Keyword::REGEXP) => Some(LikeOperator::Regexp),
            _ => None,
        }
    }

    fn peek_is_between_in_or_like(&self, offset: usize) -> bool {
        matches!(
            self.peek_kind(offset),
            TokenKind::Keyword(Keyword::BETWEEN)
                | TokenKind::Keyword(Keyword::IN)
                | TokenKind::Keyword(Keyword::LIKE)
                | TokenKind::Keyword(Keyword::GLOB)
                | TokenKind::Keyword(Keyword::MATCH)
                | TokenKind::Keyword(Keyword::REGEXP)
        )
    }

    fn parse_expression_bp_inner(&mut self, min_bp: u8) -> Result<Expr, ParserError> {
        let start = self.current_position();
        let mut left = self.parse_unary_expr()?;

        loop {
            if self.check_keyword(Keyword::NOT) && self.peek_is_between_in_or_like(1) {
                if BETWEEN_IN_PRECEDENCE < min_bp {
                    break;
                }
                self.advance();
                left = match self.current().kind {
                    TokenKind::Keyword(Keyword::BETWEEN) => self.parse_between(left, true, start)?,
                    TokenKind::Keyword(Keyword::IN) => self.parse_in(left, true, start)?,
                    _ => self.parse_like(left, true, start)?,
                };
                continue;
            }
            if self.check_keyword(Keyword::BETWEEN) {
                if BETWEEN_IN_PRECEDENCE < min_bp {
                    break;
                }
                left = self.parse_between(left, false, start)?;
                continue;
            }
            if self.check_keyword(Keyword::IN) {
                if BETWEEN_IN_PRECEDENCE < min_bp {
                    break;
                }
                left = self.parse_in(left, false, start)?;
                continue;
            }
            if self.current_like_operator().is_some() {
                if BETWEEN_IN_PRECEDENCE < min_bp {
                    break;
                }
                left = self.parse_like(left, false, start)?;
                continue;
            }
            if self.check_keyword(Keyword::ISNULL) {
                if BETWEEN_IN_PRECEDENCE < min_bp {
                    break;
                }
                self.advance();
                let end = self.previous_end();
                let null = Expr::new(ExprKind::Literal(Literal::Null), Span::new(end, end));
                left = Expr::new(
                    ExprKind::Binary {
                        left: Box::new(left),
                        op: BinaryOperator::Is,
                        right: Box::new(null),
                    },
                    Span::new(start, end),
                );
                continue;
            }
            if self.check_keyword(Keyword::NOTNULL) {
                if BETWEEN_IN_PRECEDENCE < min_bp {
                    break;
                }
                self.advance();
                let end = self.previous_end();
                let null = Expr::new(ExprKind::Literal(Literal::Null), Span::new(end, end));
                left = Expr::new(
                    ExprKind::Binary {
                        left: Box::new(left),
                        op: BinaryOperator::IsNot,
                        right: Box::new(null),
                    },
                    Span::new(start, end),
                );
                continue;
            }
            if self.check_keyword(Keyword::IS) {
                if BETWEEN_IN_PRECEDENCE < min_bp {
                    break;
                }
                self.advance();
                let negated = self.eat_keyword(Keyword::NOT);
                let op = if negated {
                    BinaryOperator::IsNot
                } else {
                    BinaryOperator::Is
                };
                let right = self.parse_expression_bp(BETWEEN_IN_PRECEDENCE + 1)?;
                let end = right.span.end;
                left = Expr::new(
                    ExprKind::Binary {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                    Span::new(start, end),
                );
                continue;
            }
            if self.check_keyword(Keyword::COLLATE) {
                self.advance();
                let collation = self.expect_identifier_or_keyword()?;
                let end = self.previous_end();
                left = Expr::new(
                    ExprKind::Collate {
                        expr: Box::new(left),
                        collation,
                    },
                    Span::new(start, end),
                );
                continue;
            }
            if let Some(op) = Self::simple_binary_operator(self.current().kind) {
                let bp = precedence(op);
                if bp < min_bp {
                    break;
                }
                self.advance();
                let right = self.parse_expression_bp(bp + 1)?;
                let end = right.span.end;
                left = Expr::new(
                    ExprKind::Binary {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                    Span::new(start, end),
                );
                continue;
            }
            break;
        }
        Ok(left)
    }

    fn parse_between(
        &mut self,
        expr: Expr,
        negated: bool,
        start: Position,
    ) -> Result<Expr, ParserError> {
        self.expect_keyword(Keyword::BETWEEN)?;
        let low = self.parse_expression_bp(BETWEEN_IN_PRECEDENCE + 1)?;
        self.expect_keyword(Keyword::AND)?;
        let high = self.parse_expression_bp(BETWEEN_IN_PRECEDENCE + 1)?;
        let end = high.span.end;
        Ok(Expr::new(
            ExprKind::Between {
                negated,
                expr: Box::new(expr),
                low: Box::new(low),
                high: Box::new(high),
            },
            Span::new(start, end),
        ))
    }

    fn parse_in(
        &mut self,
        expr: Expr,
        negated: bool,
        start: Position,
    ) -> Result<Expr, ParserError> {
        self.expect_keyword(Keyword::IN)?;
        let source = if self.eat(TokenKind::LParen) {
            if self.check_keyword(Keyword::SELECT) || self.check_keyword(Keyword::WITH) {
                let select = self.parse_select()?;
                self.expect(TokenKind::RParen, "')'")?;
                InSource::Subquery(Box::new(select))
            } else {
                let mut exprs = Vec::new();
                if !self.check(TokenKind::RParen) {
                    loop {
                        exprs.push(self.parse_expression()?);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen, "')'")?;
                InSource::List(exprs)
            }
        } else {
            InSource::Table(self.parse_qualified_name()?)
        };
        let end = self.previous_end();
        Ok(Expr::new(
            ExprKind::In {
                negated,
                expr: Box::new(expr),
                source,
            },
            Span::new(start, end),
        ))
    }

    fn parse_like(
        &mut self,
        expr: Expr,
        negated: bool,
        start: Position,
    ) -> Result<Expr, ParserError> {
        let op = self
            .current_like_operator()
            .expect("caller only calls this when a LIKE-family keyword is current");
        self.advance();
        let pattern = self.parse_expression_bp(BETWEEN_IN_PRECEDENCE + 1)?;
        let escape = if self.eat_keyword(Keyword::ESCAPE) {
            Some(Box::new(self.parse_expression_bp(BETWEEN_IN_PRECEDENCE + 1)?))
        } else {
            None
        };
        let end = escape
            .as_ref()
            .map(|e| e.span.end)
            .unwrap_or(pattern.span.end);
        Ok(Expr::new(
            ExprKind::Like {
                negated,
                op,
                expr: Box::new(expr),
                pattern: Box::new(pattern),
                escape,
            },
            Span::new(start, end),
        ))
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, ParserError> {
        let start = self.current_position();
        if self.check_keyword(Keyword::NOT) {
            self.advance();
            let expr = self.parse_expression_bp(NOT_PRECEDENCE + 1)?;
            let end = expr.span.end;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOperator::Not,
                    expr: Box::new(expr),
                },
                Span::new(start, end),
            ));
        }
        let op = match self.current().kind {
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Minus => Some(UnaryOperator::Minus),
            TokenKind::Tilde => Some(UnaryOperator::BitwiseNot),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let expr = self.parse_unary_expr()?;
            let end = expr.span.end;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    expr: Box::new(expr),
                },
                Span::new(start, end),
            ));
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, ParserError> {
        let start = self.current_position();
        match self.current().kind {
            TokenKind::Number => {
                let tok = self.advance();
                let value = parse_numeric_text(&tok.text);
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Number { text: tok.text, value }),
                    self.span_since(start),
                ))
            }
            TokenKind::String => {
                let tok = self.advance();
                let quote = tok.quote.unwrap_or('\'');
                Ok(Expr::new(
                    ExprKind::Literal(Literal::String { value: tok.text, quote }),
                    self.span_since(start),
                ))
            }
            TokenKind::Blob => {
                let tok = self.advance();
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Blob(tok.text)),
                    self.span_since(start),
                ))
            }
            TokenKind::Parameter => {
                let tok = self.advance();
                Ok(Expr::new(
                    ExprKind::Parameter(tok.text),
                    self.span_since(start),
                ))
            }
            TokenKind::Keyword(Keyword::NULL) => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Null),
                    self.span_since(start),
                ))
            }
            TokenKind::Keyword(Keyword::TRUE) => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Boolean(true)),
                    self.span_since(start),
                ))
            }
            TokenKind::Keyword(Keyword::FALSE) => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Boolean(false)),
                    self.span_since(start),
                ))
            }
            TokenKind::Keyword(Keyword::CURRENT_DATE) => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::Literal(Literal::CurrentDate),
                    self.span_since(start),
                ))
            }
            TokenKind::Keyword(Keyword::CURRENT_TIME) => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::Literal(Literal::CurrentTime),
                    self.span_since(start),
                ))
            }
            TokenKind::Keyword(Keyword::CURRENT_TIMESTAMP) => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::Literal(Literal::CurrentTimestamp),
                    self.span_since(start),
                ))
            }
            TokenKind::Keyword(Keyword::CASE) => self.parse_case_expr(start),
            TokenKind::Keyword(Keyword::CAST) => self.parse_cast_expr(start),
            TokenKind::Keyword(Keyword::RAISE) => self.parse_raise_expr(start),
            TokenKind::Keyword(Keyword::EXISTS) => self.parse_exists_expr(start, false),
            TokenKind::Keyword(Keyword::NOT) if self.peek_kind(1) == TokenKind::Keyword(Keyword::EXISTS) => {
                self.advance();
                self.parse_exists_expr(start, true)
            }
            TokenKind::LParen => self.parse_parenthesized_expr(start),
            TokenKind::Identifier => self.parse_identifier_or_call_expr(start),
            _ => Err(self.error(ParserErrorKind::ExpectedExpression {
                found: self.found_description(),
            })),
        }
    }

    fn parse_identifier_or_call_expr(&mut self, start: Position) -> Result<Expr, ParserError> {
        let first = self.expect_identifier()?;
        if self.check(TokenKind::LParen) {
            return self.parse_function_call_expr(first, start);
        }
        let mut parts = alloc::vec![first];
        while self.eat(TokenKind::Dot) {
            if parts.len() >= 3 {
                return Err(self.error(ParserErrorKind::UnexpectedToken {
                    expected: "at most 3 dot-separated parts in a qualified name".to_string(),
                    found: self.found_description(),
                }));
            }
            parts.push(self.expect_identifier()?);
        }
        let end = self.previous_end();
        if parts.len() == 1 {
            Ok(Expr::new(
                ExprKind::Identifier(parts.into_iter().next().expect("len checked above")),
                Span::new(start, end),
            ))
        } else {
            Ok(Expr::new(
                ExprKind::QualifiedIdentifier(QualifiedName::new(parts)),
                Span::new(start, end),
            ))
        }
    }

    fn parse_function_call_expr(&mut self, name: Ident, start: Position) -> Result<Expr, ParserError> {
        self.expect(TokenKind::LParen, "'('")?;
        let (distinct, args) = if self.eat(TokenKind::Star) {
            (false, FunctionArgs::Wildcard)
        } else {
            let distinct = self.eat_keyword(Keyword::DISTINCT);
            let mut exprs = Vec::new();
            if !self.check(TokenKind::RParen) {
                loop {
                    exprs.push(self.parse_expression()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            (distinct, FunctionArgs::List(exprs))
        };
        self.expect(TokenKind::RParen, "')'")?;
        let filter = if self.eat_keyword(Keyword::FILTER) {
            self.expect(TokenKind::LParen, "'('")?;
            self.expect_keyword(Keyword::WHERE)?;
            let expr = self.parse_expression()?;
            self.expect(TokenKind::RParen, "')'")?;
            Some(Box::new(expr))
        } else {
            None
        };
        let over = if self.eat_keyword(Keyword::OVER) {
            Some(self.parse_window_spec()?)
        } else {
            None
        };
        let end = self.previous_end();
        Ok(Expr::new(
            ExprKind::FunctionCall {
                name,
                distinct,
                args,
                filter,
                over,
            },
            Span::new(start, end),
        ))
    }

    fn parse_window_spec(&mut self) -> Result<WindowSpec, ParserError> {
        if !self.check(TokenKind::LParen) {
            return Ok(WindowSpec::Named(self.expect_identifier()?));
        }
        self.advance();
        let def = self.parse_window_definition_body()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(WindowSpec::Inline(def))
    }

    fn parse_window_definition_body(&mut self) -> Result<WindowDefinition, ParserError> {
        let mut def = WindowDefinition::default();
        if self.check(TokenKind::Identifier) {
            def.base_window_name = Some(self.expect_identifier()?);
        }
        if self.eat_keyword(Keyword::PARTITION) {
            self.expect_keyword(Keyword::BY)?;
            loop {
                def.partition_by.push(self.parse_expression()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        if self.eat_keyword(Keyword::ORDER) {
            self.expect_keyword(Keyword::BY)?;
            def.order_by = self.parse_ordering_terms()?;
        }
        if self.check_keyword(Keyword::RANGE)
            || self.check_keyword(Keyword::ROWS)
            || self.check_keyword(Keyword::GROUPS)
        {
            def.frame = Some(self.parse_frame_spec()?);
        }
        Ok(def)
    }

    fn parse_frame_spec(&mut self) -> Result<FrameSpec, ParserError> {
        let unit = match self.advance().kind {
            TokenKind::Keyword(Keyword::RANGE) => FrameUnit::Range,
            TokenKind::Keyword(Keyword::ROWS) => FrameUnit::Rows,
            TokenKind::Keyword(Keyword::GROUPS) => FrameUnit::Groups,
            _ => unreachable!("caller only calls this when RANGE/ROWS/GROUPS is current"),
        };
        let (start, end) = if self.eat_keyword(Keyword::BETWEEN) {
            let start = self.parse_frame_boundary()?;
            self.expect_keyword(Keyword::AND)?;
            let end = self.parse_frame_boundary()?;
            (start, Some(end))
        } else {
            (self.parse_frame_boundary()?, None)
        };
        let exclude = if self.eat_keyword(Keyword::EXCLUDE) {
            Some(self.parse_frame_exclude()?)
        } else {
            None
        };
        Ok(FrameSpec {
            unit,
            start,
            end,
            exclude,
        })
    }

    fn parse_frame_boundary(&mut self) -> Result<FrameBoundary, ParserError> {
        if self.eat_keyword(Keyword::UNBOUNDED) {
            if self.eat_keyword(Keyword::PRECEDING) {
                return Ok(FrameBoundary::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::FOLLOWING)?;
            return Ok(FrameBoundary::UnboundedFollowing);
        }
        if self.eat_keyword(Keyword::CURRENT) {
            self.expect_keyword(Keyword::ROW)?;
            return Ok(FrameBoundary::CurrentRow);
        }
        let expr = self.parse_expression_bp(FRAME_BOUNDARY_PRECEDENCE)?;
        if self.eat_keyword(Keyword::PRECEDING) {
            Ok(FrameBoundary::Preceding(Box::new(expr)))
        } else if self.eat_keyword(Keyword::FOLLOWING) {
            Ok(FrameBoundary::Following(Box::new(expr)))
        } else {
            Err(self.error(ParserErrorKind::ExpectedFrameBoundary {
                found: self.found_description(),
            }))
        }
    }

    fn parse_frame_exclude(&mut self) -> Result<FrameExclude, ParserError> {
        if self.eat_keyword(Keyword::NO) {
            self.expect_keyword(Keyword::OTHERS)?;
            return Ok(FrameExclude::NoOthers);
        }
        if self.eat_keyword(Keyword::CURRENT) {
            self.expect_keyword(Keyword::ROW)?;
            return Ok(FrameExclude::CurrentRow);
        }
        if self.eat_keyword(Keyword::GROUP) {
            return Ok(FrameExclude::Group);
        }
        if self.eat_keyword(Keyword::TIES) {
            return Ok(FrameExclude::Ties);
        }
        Err(self.error(ParserErrorKind::UnexpectedToken {
            expected: "NO OTHERS, CURRENT ROW, GROUP, or TIES".to_string(),
            found: self.found_description(),
        }))
    }

    fn parse_case_expr(&mut self, start: Position) -> Result<Expr, ParserError> {
        self.advance(); // CASE
        let operand = if !self.check_keyword(Keyword::WHEN) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        let mut when_then = Vec::new();
        self.expect_keyword(Keyword::WHEN)?;
        loop {
            let when = self.parse_expression()?;
            self.expect_keyword(Keyword::THEN)?;
            let then = self.parse_expression()?;
            when_then.push((when, then));
            if !self.eat_keyword(Keyword::WHEN) {
                break;
            }
        }
        let else_expr = if self.eat_keyword(Keyword::ELSE) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::END)?;
        Ok(Expr::new(
            ExprKind::Case {
                operand,
                when_then,
                else_expr,
            },
            self.span_since(start),
        ))
    }

    fn parse_cast_expr(&mut self, start: Position) -> Result<Expr, ParserError> {
        self.advance(); // CAST
        self.expect(TokenKind::LParen, "'('")?;
        let expr = self.parse_expression()?;
        self.expect_keyword(Keyword::AS)?;
        let type_name = self.parse_cast_type_name()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Expr::new(
            ExprKind::Cast {
                expr: Box::new(expr),
                type_name,
            },
            self.span_since(start),
        ))
    }

    /// `CAST`'s target type is a single identifier-or-keyword token; unlike
    /// a column definition's type name, it takes no arguments and is never
    /// more than one word.
    fn parse_cast_type_name(&mut self) -> Result<TypeName, ParserError> {
        let name = self.expect_identifier_or_keyword()?;
        Ok(TypeName {
            name,
            args: Vec::new(),
        })
    }

    /// A column definition's type name: possibly multiple bare words
    /// (`UNSIGNED BIG INT`, `DOUBLE PRECISION`) followed by an optional
    /// parenthesized argument list (`VARCHAR(255)`, `DECIMAL(10, 5)`).
    fn parse_column_type_name(&mut self) -> Result<TypeName, ParserError> {
        let mut name = self.expect_identifier_or_keyword()?.value;
        while self.check(TokenKind::Identifier) {
            let next = self.expect_identifier()?;
            name.push(' ');
            name.push_str(&next.value);
        }
        let mut args = Vec::new();
        if self.eat(TokenKind::LParen) {
            loop {
                args.push(self.parse_type_arg()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
        }
        Ok(TypeName {
            name: Ident::new(name),
            args,
        })
    }

    fn parse_type_arg(&mut self) -> Result<String, ParserError> {
        let mut text = String::new();
        if self.eat(TokenKind::Minus) {
            text.push('-');
        } else {
            self.eat(TokenKind::Plus);
        }
        let tok = self.expect(TokenKind::Number, "a number")?;
        text.push_str(&tok.text);
        Ok(text)
    }

    fn parse_raise_expr(&mut self, start: Position) -> Result<Expr, ParserError> {
        self.advance(); // RAISE
        self.expect(TokenKind::LParen, "'('")?;
        let raise = if self.eat_keyword(Keyword::IGNORE) {
            RaiseExpr::Ignore
        } else if self.eat_keyword(Keyword::ROLLBACK) {
            self.expect(TokenKind::Comma, "','")?;
            RaiseExpr::Rollback(self.expect_string_literal_text()?)
        } else if self.eat_keyword(Keyword::ABORT) {
            self.expect(TokenKind::Comma, "','")?;
            RaiseExpr::Abort(self.expect_string_literal_text()?)
        } else if self.eat_keyword(Keyword::FAIL) {
            self.expect(TokenKind::Comma, "','")?;
            RaiseExpr::Fail(self.expect_string_literal_text()?)
        } else {
            return Err(self.error(ParserErrorKind::ExpectedRaiseType {
                found: self.found_description(),
            }));
        };
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Expr::new(ExprKind::Raise(raise), self.span_since(start)))
    }

    fn expect_string_literal_text(&mut self) -> Result<String, ParserError> {
        let tok = self.expect(TokenKind::String, "a string literal")?;
        Ok(tok.text)
    }

    fn parse_exists_expr(&mut self, start: Position, negated: bool) -> Result<Expr, ParserError> {
        self.expect_keyword(Keyword::EXISTS)?;
        self.expect(TokenKind::LParen, "'('")?;
        let select = self.parse_select()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Expr::new(
            ExprKind::Exists {
                negated,
                subquery: Box::new(select),
            },
            self.span_since(start),
        ))
    }

    fn parse_parenthesized_expr(&mut self, start: Position) -> Result<Expr, ParserError> {
        self.advance(); // (
        if self.check_keyword(Keyword::SELECT) || self.check_keyword(Keyword::WITH) {
            let select = self.parse_select()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(Expr::new(
                ExprKind::Subquery(Box::new(select)),
                self.span_since(start),
            ));
        }
        let first = self.parse_expression()?;
        if self.eat(TokenKind::Comma) {
            let mut exprs = alloc::vec![first];
            loop {
                exprs.push(self.parse_expression()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(Expr::new(ExprKind::RowValue(exprs), self.span_since(start)));
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Expr::new(
            ExprKind::Parenthesized(Box::new(first)),
            self.span_since(start),
        ))
    }

    // ---- SELECT ---------------------------------------------------------

    fn parse_select(&mut self) -> Result<Select, ParserError> {
        let start = self.current_position();
        let with = if self.check_keyword(Keyword::WITH) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };
        self.parse_select_body(with, start)
    }

    fn parse_select_body(&mut self, with: Option<With>, start: Position) -> Result<Select, ParserError> {
        let body = self.parse_set_expr()?;
        let order_by = if self.eat_keyword(Keyword::ORDER) {
            self.expect_keyword(Keyword::BY)?;
            self.parse_ordering_terms()?
        } else {
            Vec::new()
        };
        let limit = if self.check_keyword(Keyword::LIMIT) {
            Some(self.parse_limit_clause()?)
        } else {
            None
        };
        Ok(Select {
            with,
            body,
            order_by,
            limit,
            span: self.span_since(start),
        })
    }

    fn parse_with_clause(&mut self) -> Result<With, ParserError> {
        self.advance(); // WITH
        let recursive = self.eat_keyword(Keyword::RECURSIVE);
        let mut ctes = alloc::vec![self.parse_cte()?];
        while self.eat(TokenKind::Comma) {
            ctes.push(self.parse_cte()?);
        }
        Ok(With { recursive, ctes })
    }

    fn parse_cte(&mut self) -> Result<Cte, ParserError> {
        let name = self.expect_identifier()?;
        let mut columns = Vec::new();
        if self.eat(TokenKind::LParen) {
            loop {
                columns.push(self.expect_identifier()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
        }
        self.expect_keyword(Keyword::AS)?;
        let materialized = if self.eat_keyword(Keyword::MATERIALIZED) {
            Some(true)
        } else if self.check_keyword(Keyword::NOT) && self.peek_kind(1) == TokenKind::Keyword(Keyword::MATERIALIZED) {
            self.advance();
            self.advance();
            Some(false)
        } else {
            None
        };
        self.expect(TokenKind::LParen, "'('")?;
        let select = self.parse_select()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Cte {
            name,
            columns,
            materialized,
            select: Box::new(select),
        })
    }

    fn parse_set_expr(&mut self) -> Result<SetExpr, ParserError> {
        let start = self.current_position();
        let mut left = SetExpr::Select(Box::new(self.parse_select_core()?));
        loop {
            let op = if self.eat_keyword(Keyword::UNION) {
                if self.eat_keyword(Keyword::ALL) {
                    CompoundOperator::UnionAll
                } else {
                    CompoundOperator::Union
                }
            } else if self.eat_keyword(Keyword::INTERSECT) {
                CompoundOperator::Intersect
            } else if self.eat_keyword(Keyword::EXCEPT) {
                CompoundOperator::Except
            } else {
                break;
            };
            let right = self.parse_select_core()?;
            left = SetExpr::Compound {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span: self.span_since(start),
            };
        }
        Ok(left)
    }

    fn parse_select_core(&mut self) -> Result<SelectCore, ParserError> {
        let start = self.current_position();
        self.expect_keyword(Keyword::SELECT)?;
        let distinct = if self.eat_keyword(Keyword::DISTINCT) {
            Distinct::Distinct
        } else {
            self.eat_keyword(Keyword::ALL);
            Distinct::All
        };
        let columns = self.parse_result_columns()?;
        let from = if self.eat_keyword(Keyword::FROM) {
            Some(self.parse_from_clause()?)
        } else {
            None
        };
        let where_clause = if self.eat_keyword(Keyword::WHERE) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let mut group_by = Vec::new();
        let mut having = None;
        if self.eat_keyword(Keyword::GROUP) {
            self.expect_keyword(Keyword::BY)?;
            loop {
                group_by.push(self.parse_expression()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            if self.eat_keyword(Keyword::HAVING) {
                having = Some(self.parse_expression()?);
            }
        }
        let windows = if self.eat_keyword(Keyword::WINDOW) {
            self.parse_named_windows()?
        } else {
            Vec::new()
        };
        Ok(SelectCore {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            windows,
            span: self.span_since(start),
        })
    }

    fn parse_named_windows(&mut self) -> Result<Vec<NamedWindowDefinition>, ParserError> {
        let mut windows = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            self.expect_keyword(Keyword::AS)?;
            self.expect(TokenKind::LParen, "'('")?;
            let definition = self.parse_window_definition_body()?;
            self.expect(TokenKind::RParen, "')'")?;
            windows.push(NamedWindowDefinition { name, definition });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(windows)
    }

    fn parse_result_columns(&mut self) -> Result<Vec<ResultColumn>, ParserError> {
        let mut columns = alloc::vec![self.parse_result_column()?];
        while self.eat(TokenKind::Comma) {
            columns.push(self.parse_result_column()?);
        }
        Ok(columns)
    }

    fn parse_result_column(&mut self) -> Result<ResultColumn, ParserError> {
        if self.check(TokenKind::Star) {
            self.advance();
            return Ok(ResultColumn::Wildcard);
        }
        if self.check(TokenKind::Identifier)
            && self.peek_kind(1) == TokenKind::Dot
            && self.peek_kind(2) == TokenKind::Star
        {
            let table = self.expect_identifier()?;
            self.advance(); // .
            self.advance(); // *
            return Ok(ResultColumn::QualifiedWildcard(QualifiedName::single(table)));
        }
        let expr = self.parse_expression()?;
        let alias = self.parse_optional_alias()?;
        Ok(ResultColumn::Expr { expr, alias })
    }

    fn parse_optional_alias(&mut self) -> Result<Option<Ident>, ParserError> {
        if self.eat_keyword(Keyword::AS) {
            return Ok(Some(self.expect_identifier()?));
        }
        if self.check(TokenKind::Identifier) {
            return Ok(Some(self.expect_identifier()?));
        }
        Ok(None)
    }

    fn parse_from_clause(&mut self) -> Result<FromClause, ParserError> {
        let first = self.parse_table_ref()?;
        let mut joins = Vec::new();
        loop {
            if self.eat(TokenKind::Comma) {
                let table = self.parse_table_ref()?;
                joins.push(JoinClause {
                    natural: false,
                    outer: false,
                    operator: JoinOperator::Comma,
                    table,
                    constraint: None,
                });
                continue;
            }
            let natural = self.eat_keyword(Keyword::NATURAL);
            let operator = if self.eat_keyword(Keyword::CROSS) {
                Some((JoinOperator::Cross, false))
            } else if self.eat_keyword(Keyword::INNER) {
                Some((JoinOperator::Inner, false))
            } else if self.eat_keyword(Keyword::LEFT) {
                let outer = self.eat_keyword(Keyword::OUTER);
                Some((JoinOperator::Left, outer))
            } else if self.eat_keyword(Keyword::RIGHT) {
                let outer = self.eat_keyword(Keyword::OUTER);
                Some((JoinOperator::Right, outer))
            } else if self.eat_keyword(Keyword::FULL) {
                let outer = self.eat_keyword(Keyword::OUTER);
                Some((JoinOperator::Full, outer))
            } else if self.check_keyword(Keyword::JOIN) {
                Some((JoinOperator::Inner, false))
            } else {
                None
            };
            let Some((operator, outer)) = operator else {
                if natural {
                    return Err(self.error(ParserErrorKind::UnexpectedToken {
                        expected: "JOIN".to_string(),
                        found: self.found_description(),
                    }));
                }
                break;
            };
            self.expect_keyword(Keyword::JOIN)?;
            let table = self.parse_table_ref()?;
            let constraint = if self.eat_keyword(Keyword::ON) {
                Some(JoinConstraint::On(self.parse_expression()?))
            } else if self.eat_keyword(Keyword::USING) {
                self.expect(TokenKind::LParen, "'('")?;
                let mut cols = alloc::vec![self.expect_identifier()?];
                while self.eat(TokenKind::Comma) {
                    cols.push(self.expect_identifier()?);
                }
                self.expect(TokenKind::RParen, "')'")?;
                Some(JoinConstraint::Using(cols))
            } else {
                None
            };
            joins.push(JoinClause {
                natural,
                outer,
                operator,
                table,
                constraint,
            });
        }
        Ok(FromClause { first, joins })
    }

    fn parse_table_ref(&mut self) -> Result<TableRef, ParserError> {
        if self.eat(TokenKind::LParen) {
            if self.check_keyword(Keyword::SELECT) || self.check_keyword(Keyword::WITH) {
                let select = self.parse_select()?;
                self.expect(TokenKind::RParen, "')'")?;
                let alias = self.parse_optional_alias()?;
                return Ok(TableRef::Subquery {
                    select: Box::new(select),
                    alias,
                });
            }
            let from = self.parse_from_clause()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(TableRef::Nested(Box::new(from)));
        }
        let name = self.parse_qualified_name()?;
        if self.check(TokenKind::LParen) {
            self.advance();
            let mut args = Vec::new();
            if !self.check(TokenKind::RParen) {
                loop {
                    args.push(self.parse_expression()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
            let alias = self.parse_optional_alias()?;
            return Ok(TableRef::TableFunction { name, args, alias });
        }
        let alias = self.parse_optional_alias()?;
        let (indexed_by, not_indexed) = self.parse_indexed_by()?;
        Ok(TableRef::Table {
            name,
            alias,
            indexed_by,
            not_indexed,
        })
    }

    fn parse_indexed_by(&mut self) -> Result<(Option<Ident>, bool), ParserError> {
        if self.eat_keyword(Keyword::INDEXED) {
            self.expect_keyword(Keyword::BY)?;
            return Ok((Some(self.expect_identifier()?), false));
        }
        if self.eat_keyword(Keyword::NOT) {
            self.expect_keyword(Keyword::INDEXED)?;
            return Ok((None, true));
        }
        Ok((None, false))
    }

    fn parse_ordering_terms(&mut self) -> Result<Vec<OrderingTerm>, ParserError> {
        let mut terms = alloc::vec![self.parse_ordering_term()?];
        while self.eat(TokenKind::Comma) {
            terms.push(self.parse_ordering_term()?);
        }
        Ok(terms)
    }

    fn parse_ordering_term(&mut self) -> Result<OrderingTerm, ParserError> {
        let expr = self.parse_expression()?;
        let collate = if self.eat_keyword(Keyword::COLLATE) {
            Some(self.expect_identifier_or_keyword()?)
        } else {
            None
        };
        let direction = if self.eat_keyword(Keyword::ASC) {
            Some(OrderDirection::Asc)
        } else if self.eat_keyword(Keyword::DESC) {
            Some(OrderDirection::Desc)
        } else {
            None
        };
        let nulls = if self.eat_keyword(Keyword::NULLS) {
            if self.eat_keyword(Keyword::FIRST) {
                Some(NullsOrder::First)
            } else {
                self.expect_keyword(Keyword::LAST)?;
                Some(NullsOrder::Last)
            }
        } else {
            None
        };
        Ok(OrderingTerm {
            expr,
            collate,
            direction,
            nulls,
        })
    }

    /// `LIMIT <limit> [OFFSET <offset>]`, or SQLite's comma form
    /// `LIMIT <offset>, <limit>`, whose argument order is swapped relative
    /// to the keyword form.
    fn parse_limit_clause(&mut self) -> Result<Limit, ParserError> {
        self.advance(); // LIMIT
        let first = self.parse_expression()?;
        if self.eat(TokenKind::Comma) {
            let second = self.parse_expression()?;
            return Ok(Limit {
                limit: second,
                offset: Some(first),
            });
        }
        if self.eat_keyword(Keyword::OFFSET) {
            let offset = self.parse_expression()?;
            return Ok(Limit {
                limit: first,
                offset: Some(offset),
            });
        }
        Ok(Limit {
            limit: first,
            offset: None,
        })
    }

    // ---- DML --------------------------------------------------------

    fn parse_insert(&mut self, with: Option<With>, _start: Position) -> Result<Insert, ParserError> {
        let or_conflict = if self.eat_keyword(Keyword::REPLACE) {
            Some(ConflictResolution::Replace)
        } else {
            self.expect_keyword(Keyword::INSERT)?;
            if self.eat_keyword(Keyword::OR) {
                Some(self.parse_conflict_resolution()?)
            } else {
                None
            }
        };
        self.expect_keyword(Keyword::INTO)?;
        let table = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        let mut columns = Vec::new();
        if self.eat(TokenKind::LParen) {
            loop {
                columns.push(self.expect_identifier()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
        }
        let source = if self.eat_keyword(Keyword::DEFAULT) {
            self.expect_keyword(Keyword::VALUES)?;
            InsertSource::DefaultValues
        } else if self.check_keyword(Keyword::VALUES) {
            self.advance();
            InsertSource::Values(self.parse_values_rows()?)
        } else {
            InsertSource::Select(Box::new(self.parse_select()?))
        };
        let mut upserts = Vec::new();
        while self.eat_keyword(Keyword::ON) {
            self.expect_keyword(Keyword::CONFLICT)?;
            upserts.push(self.parse_upsert_clause()?);
        }
        let returning = if self.eat_keyword(Keyword::RETURNING) {
            self.parse_result_columns()?
        } else {
            Vec::new()
        };
        Ok(Insert {
            with,
            or_conflict,
            table,
            alias,
            columns,
            source,
            upserts,
            returning,
        })
    }

    fn parse_values_rows(&mut self) -> Result<Vec<Vec<Expr>>, ParserError> {
        let mut rows = alloc::vec![self.parse_value_row()?];
        while self.eat(TokenKind::Comma) {
            rows.push(self.parse_value_row()?);
        }
        Ok(rows)
    }

    fn parse_value_row(&mut self) -> Result<Vec<Expr>, ParserError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut exprs = alloc::vec![self.parse_expression()?];
        while self.eat(TokenKind::Comma) {
            exprs.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(exprs)
    }

    fn parse_upsert_clause(&mut self) -> Result<UpsertClause, ParserError> {
        let target = if self.check(TokenKind::LParen) {
            Some(self.parse_conflict_target()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::DO)?;
        let action = if self.eat_keyword(Keyword::NOTHING) {
            UpsertAction::DoNothing
        } else {
            self.expect_keyword(Keyword::UPDATE)?;
            self.expect_keyword(Keyword::SET)?;
            let mut assignments = alloc::vec![self.parse_assignment()?];
            while self.eat(TokenKind::Comma) {
                assignments.push(self.parse_assignment()?);
            }
            let where_clause = if self.eat_keyword(Keyword::WHERE) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            UpsertAction::DoUpdate {
                assignments,
                where_clause,
            }
        };
        Ok(UpsertClause { target, action })
    }

    fn parse_conflict_target(&mut self) -> Result<ConflictTarget, ParserError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut columns = alloc::vec![self.parse_indexed_column()?];
        while self.eat(TokenKind::Comma) {
            columns.push(self.parse_indexed_column()?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        let where_clause = if self.eat_keyword(Keyword::WHERE) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(ConflictTarget {
            columns,
            where_clause,
        })
    }

    fn parse_indexed_column(&mut self) -> Result<IndexedColumn, ParserError> {
        let expr = self.parse_expression()?;
        let collate = if self.eat_keyword(Keyword::COLLATE) {
            Some(self.expect_identifier_or_keyword()?)
        } else {
            None
        };
        let direction = if self.eat_keyword(Keyword::ASC) {
            Some(OrderDirection::Asc)
        } else if self.eat_keyword(Keyword::DESC) {
            Some(OrderDirection::Desc)
        } else {
            None
        };
        Ok(IndexedColumn {
            expr,
            collate,
            direction,
        })
    }

    /// Supports both `col = expr` and the multi-column `(a, b) = (x, y)`
    /// form in a `SET` list.
    fn parse_assignment(&mut self) -> Result<Assignment, ParserError> {
        let columns = if self.eat(TokenKind::LParen) {
            let mut cols = alloc::vec![self.expect_identifier()?];
            while self.eat(TokenKind::Comma) {
                cols.push(self.expect_identifier()?);
            }
            self.expect(TokenKind::RParen, "')'")?;
            cols
        } else {
            alloc::vec![self.expect_identifier()?]
        };
        self.expect(TokenKind::Eq, "'='")?;
        let value = self.parse_expression()?;
        Ok(Assignment { columns, value })
    }

    fn parse_conflict_resolution(&mut self) -> Result<ConflictResolution, ParserError> {
        if self.eat_keyword(Keyword::ROLLBACK) {
            return Ok(ConflictResolution::Rollback);
        }
        if self.eat_keyword(Keyword::ABORT) {
            return Ok(ConflictResolution::Abort);
        }
        if self.eat_keyword(Keyword::FAIL) {
            return Ok(ConflictResolution::Fail);
        }
        if self.eat_keyword(Keyword::IGNORE) {
            return Ok(ConflictResolution::Ignore);
        }
        if self.eat_keyword(Keyword::REPLACE) {
            return Ok(ConflictResolution::Replace);
        }
        Err(self.error(ParserErrorKind::ExpectedConflictResolution {
            found: self.found_description(),
        }))
    }

    fn parse_update(&mut self, with: Option<With>, _start: Position) -> Result<Update, ParserError> {
        self.expect_keyword(Keyword::UPDATE)?;
        let or_conflict = if self.eat_keyword(Keyword::OR) {
            Some(self.parse_conflict_resolution()?)
        } else {
            None
        };
        let table = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        let (indexed_by, not_indexed) = self.parse_indexed_by()?;
        self.expect_keyword(Keyword::SET)?;
        let mut assignments = alloc::vec![self.parse_assignment()?];
        while self.eat(TokenKind::Comma) {
            assignments.push(self.parse_assignment()?);
        }
        let from = if self.eat_keyword(Keyword::FROM) {
            Some(self.parse_from_clause()?)
        } else {
            None
        };
        let where_clause = if self.eat_keyword(Keyword::WHERE) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let order_by = if self.eat_keyword(Keyword::ORDER) {
            self.expect_keyword(Keyword::BY)?;
            self.parse_ordering_terms()?
        } else {
            Vec::new()
        };
        let limit = if self.check_keyword(Keyword::LIMIT) {
            Some(self.parse_limit_clause()?)
        } else {
            None
        };
        let returning = if self.eat_keyword(Keyword::RETURNING) {
            self.parse_result_columns()?
        } else {
            Vec::new()
        };
        Ok(Update {
            with,
            or_conflict,
            table,
            alias,
            indexed_by,
            not_indexed,
            assignments,
            from,
            where_clause,
            order_by,
            limit,
            returning,
        })
    }

    fn parse_delete(&mut self, with: Option<With>, _start: Position) -> Result<Delete, ParserError> {
        self.expect_keyword(Keyword::DELETE)?;
        self.expect_keyword(Keyword::FROM)?;
        let table = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        let (indexed_by, not_indexed) = self.parse_indexed_by()?;
        let where_clause = if self.eat_keyword(Keyword::WHERE) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let order_by = if self.eat_keyword(Keyword::ORDER) {
            self.expect_keyword(Keyword::BY)?;
            self.parse_ordering_terms()?
        } else {
            Vec::new()
        };
        let limit = if self.check_keyword(Keyword::LIMIT) {
            Some(self.parse_limit_clause()?)
        } else {
            None
        };
        let returning = if self.eat_keyword(Keyword::RETURNING) {
            self.parse_result_columns()?
        } else {
            Vec::new()
        };
        Ok(Delete {
            with,
            table,
            alias,
            indexed_by,
            not_indexed,
            where_clause,
            order_by,
            limit,
            returning,
        })
    }

    // ---- DDL --------------------------------------------------------

    fn parse_create(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // CREATE
        let temporary = self.eat_keyword(Keyword::TEMP) || self.eat_keyword(Keyword::TEMPORARY);
        if self.eat_keyword(Keyword::UNIQUE) {
            return Ok(StatementKind::CreateIndex(Box::new(self.parse_create_index(true)?)));
        }
        if self.check_keyword(Keyword::TABLE) {
            return Ok(StatementKind::CreateTable(Box::new(self.parse_create_table(temporary)?)));
        }
        if self.check_keyword(Keyword::INDEX) {
            return Ok(StatementKind::CreateIndex(Box::new(self.parse_create_index(false)?)));
        }
        if self.check_keyword(Keyword::VIEW) {
            return Ok(StatementKind::CreateView(Box::new(self.parse_create_view(temporary)?)));
        }
        if self.check_keyword(Keyword::TRIGGER) {
            return Ok(StatementKind::CreateTrigger(Box::new(
                self.parse_create_trigger(temporary)?,
            )));
        }
        if self.eat_keyword(Keyword::VIRTUAL) {
            return Ok(StatementKind::CreateVirtualTable(Box::new(
                self.parse_create_virtual_table()?,
            )));
        }
        Err(self.error(ParserErrorKind::UnexpectedToken {
            expected: "TABLE, INDEX, VIEW, TRIGGER, or VIRTUAL TABLE".to_string(),
            found: self.found_description(),
        }))
    }

    fn starts_table_constraint(&self) -> bool {
        self.check_keyword(Keyword::CONSTRAINT)
            || self.check_keyword(Keyword::PRIMARY)
            || self.check_keyword(Keyword::UNIQUE)
            || self.check_keyword(Keyword::CHECK)
            || self.check_keyword(Keyword::FOREIGN)
    }

    fn parse_create_table(&mut self, temporary: bool) -> Result<CreateTableStatement, ParserError> {
        self.expect_keyword(Keyword::TABLE)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        let source = if self.eat_keyword(Keyword::AS) {
            CreateTableSource::As(Box::new(self.parse_select()?))
        } else {
            self.expect(TokenKind::LParen, "'('")?;
            let mut columns = Vec::new();
            let mut constraints = Vec::new();
            loop {
                if self.starts_table_constraint() {
                    constraints.push(self.parse_table_constraint()?);
                } else {
                    columns.push(self.parse_column_def()?);
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
            CreateTableSource::Columns { columns, constraints }
        };
        let mut without_rowid = false;
        let mut strict = false;
        loop {
            if self.eat_keyword(Keyword::WITHOUT) {
                self.expect_keyword(Keyword::ROWID)?;
                without_rowid = true;
            } else if self.eat_keyword(Keyword::STRICT) {
                strict = true;
            } else {
                break;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(CreateTableStatement {
            temporary,
            if_not_exists,
            name,
            source,
            without_rowid,
            strict,
        })
    }

    fn starts_column_constraint(&self) -> bool {
        self.check_keyword(Keyword::CONSTRAINT)
            || self.check_keyword(Keyword::PRIMARY)
            || self.check_keyword(Keyword::NOT)
            || self.check_keyword(Keyword::UNIQUE)
            || self.check_keyword(Keyword::CHECK)
            || self.check_keyword(Keyword::DEFAULT)
            || self.check_keyword(Keyword::COLLATE)
            || self.check_keyword(Keyword::REFERENCES)
            || self.check_keyword(Keyword::GENERATED)
            || self.check_keyword(Keyword::AS)
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParserError> {
        let name = self.expect_identifier_or_keyword()?;
        let type_name = if self.check(TokenKind::Identifier) {
            Some(self.parse_column_type_name()?)
        } else {
            None
        };
        let mut constraints = Vec::new();
        while self.starts_column_constraint() {
            constraints.push(self.parse_column_constraint()?);
        }
        Ok(ColumnDef {
            name,
            type_name,
            constraints,
        })
    }

    fn parse_column_constraint(&mut self) -> Result<ColumnConstraint, ParserError> {
        let name = if self.eat_keyword(Keyword::CONSTRAINT) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let kind = if self.eat_keyword(Keyword::PRIMARY) {
            self.expect_keyword(Keyword::KEY)?;
            let direction = if self.eat_keyword(Keyword::ASC) {
                Some(OrderDirection::Asc)
            } else if self.eat_keyword(Keyword::DESC) {
                Some(OrderDirection::Desc)
            } else {
                None
            };
            let conflict = self.parse_optional_on_conflict()?;
            let autoincrement = self.eat_keyword(Keyword::AUTOINCREMENT);
            ColumnConstraintKind::PrimaryKey {
                direction,
                conflict,
                autoincrement,
            }
        } else if self.eat_keyword(Keyword::NOT) {
            self.expect_keyword(Keyword::NULL)?;
            ColumnConstraintKind::NotNull {
                conflict: self.parse_optional_on_conflict()?,
            }
        } else if self.eat_keyword(Keyword::UNIQUE) {
            ColumnConstraintKind::Unique {
                conflict: self.parse_optional_on_conflict()?,
            }
        } else if self.eat_keyword(Keyword::CHECK) {
            self.expect(TokenKind::LParen, "'('")?;
            let expr = self.parse_expression()?;
            self.expect(TokenKind::RParen, "')'")?;
            ColumnConstraintKind::Check(expr)
        } else if self.eat_keyword(Keyword::DEFAULT) {
            ColumnConstraintKind::Default(self.parse_default_value()?)
        } else if self.eat_keyword(Keyword::COLLATE) {
            ColumnConstraintKind::Collate(self.expect_identifier_or_keyword()?)
        } else if self.eat_keyword(Keyword::REFERENCES) {
            ColumnConstraintKind::ForeignKey(self.parse_foreign_key_clause()?)
        } else if self.eat_keyword(Keyword::GENERATED) {
            self.expect_keyword(Keyword::ALWAYS)?;
            self.expect_keyword(Keyword::AS)?;
            self.expect(TokenKind::LParen, "'('")?;
            let expr = self.parse_expression()?;
            self.expect(TokenKind::RParen, "')'")?;
            let stored = self.parse_generated_storage()?;
            ColumnConstraintKind::Generated { expr, stored }
        } else if self.eat_keyword(Keyword::AS) {
            self.expect(TokenKind::LParen, "'('")?;
            let expr = self.parse_expression()?;
            self.expect(TokenKind::RParen, "')'")?;
            let stored = self.parse_generated_storage()?;
            ColumnConstraintKind::Generated { expr, stored }
        } else {
            return Err(self.error(ParserErrorKind::UnexpectedToken {
                expected: "a column constraint".to_string(),
                found: self.found_description(),
            }));
        };
        Ok(ColumnConstraint { name, kind })
    }

    fn parse_generated_storage(&mut self) -> Result<bool, ParserError> {
        if self.eat_keyword(Keyword::STORED) {
            Ok(true)
        } else {
            self.eat_keyword(Keyword::VIRTUAL);
            Ok(false)
        }
    }

    fn parse_optional_on_conflict(&mut self) -> Result<Option<ConflictResolution>, ParserError> {
        if self.eat_keyword(Keyword::ON) {
            self.expect_keyword(Keyword::CONFLICT)?;
            Ok(Some(self.parse_conflict_resolution()?))
        } else {
            Ok(None)
        }
    }

    fn parse_default_value(&mut self) -> Result<DefaultValue, ParserError> {
        if self.eat(TokenKind::LParen) {
            let expr = self.parse_expression()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(DefaultValue::Expr(expr));
        }
        match self.current().kind {
            TokenKind::Keyword(Keyword::NULL) => {
                self.advance();
                Ok(DefaultValue::Literal(Literal::Null))
            }
            TokenKind::Keyword(Keyword::TRUE) => {
                self.advance();
                Ok(DefaultValue::Literal(Literal::Boolean(true)))
            }
            TokenKind::Keyword(Keyword::FALSE) => {
                self.advance();
                Ok(DefaultValue::Literal(Literal::Boolean(false)))
            }
            TokenKind::Keyword(Keyword::CURRENT_DATE) => {
                self.advance();
                Ok(DefaultValue::Literal(Literal::CurrentDate))
            }
            TokenKind::Keyword(Keyword::CURRENT_TIME) => {
                self.advance();
                Ok(DefaultValue::Literal(Literal::CurrentTime))
            }
            TokenKind::Keyword(Keyword::CURRENT_TIMESTAMP) => {
                self.advance();
                Ok(DefaultValue::Literal(Literal::CurrentTimestamp))
            }
            TokenKind::String => {
                let tok = self.advance();
                Ok(DefaultValue::Literal(Literal::String {
                    value: tok.text,
                    quote: tok.quote.unwrap_or('\''),
                }))
            }
            TokenKind::Number => {
                let tok = self.advance();
                let value = parse_numeric_text(&tok.text);
                Ok(DefaultValue::Literal(Literal::Number { text: tok.text, value }))
            }
            TokenKind::Minus | TokenKind::Plus => Ok(DefaultValue::Expr(self.parse_unary_expr()?)),
            _ => Err(self.error(ParserErrorKind::ExpectedExpression {
                found: self.found_description(),
            })),
        }
    }

    fn parse_foreign_key_clause(&mut self) -> Result<ForeignKeyClause, ParserError> {
        let table = self.parse_qualified_name()?;
        let mut columns = Vec::new();
        if self.eat(TokenKind::LParen) {
            loop {
                columns.push(self.expect_identifier()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
        }
        let mut on_delete = None;
        let mut on_update = None;
        let mut match_name = None;
        loop {
            if self.eat_keyword(Keyword::ON) {
                if self.eat_keyword(Keyword::DELETE) {
                    on_delete = Some(self.parse_foreign_key_action()?);
                } else {
                    self.expect_keyword(Keyword::UPDATE)?;
                    on_update = Some(self.parse_foreign_key_action()?);
                }
            } else if self.eat_keyword(Keyword::MATCH) {
                match_name = Some(self.expect_identifier_or_keyword()?);
            } else {
                break;
            }
        }
        let deferrable = self.parse_deferrable()?;
        Ok(ForeignKeyClause {
            table,
            columns,
            on_delete,
            on_update,
            match_name,
            deferrable,
        })
    }

    fn parse_foreign_key_action(&mut self) -> Result<ForeignKeyAction, ParserError> {
        if self.eat_keyword(Keyword::SET) {
            if self.eat_keyword(Keyword::NULL) {
                return Ok(ForeignKeyAction::SetNull);
            }
            self.expect_keyword(Keyword::DEFAULT)?;
            return Ok(ForeignKeyAction::SetDefault);
        }
        if self.eat_keyword(Keyword::CASCADE) {
            return Ok(ForeignKeyAction::Cascade);
        }
        if self.eat_keyword(Keyword::RESTRICT) {
            return Ok(ForeignKeyAction::Restrict);
        }
        if self.eat_keyword(Keyword::NO) {
            self.expect_keyword(Keyword::ACTION)?;
            return Ok(ForeignKeyAction::NoAction);
        }
        Err(self.error(ParserErrorKind::ExpectedForeignKeyAction {
            found: self.found_description(),
        }))
    }

    fn parse_deferrable(&mut self) -> Result<Option<Deferrable>, ParserError> {
        let not = self.eat_keyword(Keyword::NOT);
        if !self.eat_keyword(Keyword::DEFERRABLE) {
            if not {
                return Err(self.error(ParserErrorKind::UnexpectedToken {
                    expected: "DEFERRABLE".to_string(),
                    found: self.found_description(),
                }));
            }
            return Ok(None);
        }
        let initially = if self.eat_keyword(Keyword::INITIALLY) {
            if self.eat_keyword(Keyword::DEFERRED) {
                Some(InitiallyWhen::Deferred)
            } else {
                self.expect_keyword(Keyword::IMMEDIATE)?;
                Some(InitiallyWhen::Immediate)
            }
        } else {
            None
        };
        Ok(Some(Deferrable { not, initially }))
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraint, ParserError> {
        let name = if self.eat_keyword(Keyword::CONSTRAINT) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let kind = if self.eat_keyword(Keyword::PRIMARY) {
            self.expect_keyword(Keyword::KEY)?;
            self.expect(TokenKind::LParen, "'('")?;
            let mut columns = alloc::vec![self.parse_indexed_column()?];
            while self.eat(TokenKind::Comma) {
                columns.push(self.parse_indexed_column()?);
            }
            self.expect(TokenKind::RParen, "')'")?;
            let conflict = self.parse_optional_on_conflict()?;
            TableConstraintKind::PrimaryKey { columns, conflict }
        } else if self.eat_keyword(Keyword::UNIQUE) {
            self.expect(TokenKind::LParen, "'('")?;
            let mut columns = alloc::vec![self.parse_indexed_column()?];
            while self.eat(TokenKind::Comma) {
                columns.push(self.parse_indexed_column()?);
            }
            self.expect(TokenKind::RParen, "')'")?;
            let conflict = self.parse_optional_on_conflict()?;
            TableConstraintKind::Unique { columns, conflict }
        } else if self.eat_keyword(Keyword::CHECK) {
            self.expect(TokenKind::LParen, "'('")?;
            let expr = self.parse_expression()?;
            self.expect(TokenKind::RParen, "')'")?;
            TableConstraintKind::Check(expr)
        } else if self.eat_keyword(Keyword::FOREIGN) {
            self.expect_keyword(Keyword::KEY)?;
            self.expect(TokenKind::LParen, "'('")?;
            let mut columns = alloc::vec![self.expect_identifier()?];
            while self.eat(TokenKind::Comma) {
                columns.push(self.expect_identifier()?);
            }
            self.expect(TokenKind::RParen, "')'")?;
            self.expect_keyword(Keyword::REFERENCES)?;
            let clause = self.parse_foreign_key_clause()?;
            TableConstraintKind::ForeignKey { columns, clause }
        } else {
            return Err(self.error(ParserErrorKind::UnexpectedToken {
                expected: "a table constraint".to_string(),
                found: self.found_description(),
            }));
        };
        Ok(TableConstraint { name, kind })
    }

    fn parse_create_index(&mut self, unique: bool) -> Result<CreateIndexStatement, ParserError> {
        self.expect_keyword(Keyword::INDEX)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        self.expect_keyword(Keyword::ON)?;
        let table = self.expect_identifier()?;
        self.expect(TokenKind::LParen, "'('")?;
        let mut columns = alloc::vec![self.parse_indexed_column()?];
        while self.eat(TokenKind::Comma) {
            columns.push(self.parse_indexed_column()?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        let where_clause = if self.eat_keyword(Keyword::WHERE) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(CreateIndexStatement {
            unique,
            if_not_exists,
            name,
            table,
            columns,
            where_clause,
        })
    }

    fn parse_create_view(&mut self, temporary: bool) -> Result<CreateViewStatement, ParserError> {
        self.expect_keyword(Keyword::VIEW)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        let mut columns = Vec::new();
        if self.eat(TokenKind::LParen) {
            loop {
                columns.push(self.expect_identifier()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
        }
        self.expect_keyword(Keyword::AS)?;
        let select = self.parse_select()?;
        Ok(CreateViewStatement {
            temporary,
            if_not_exists,
            name,
            columns,
            select: Box::new(select),
        })
    }

    fn parse_create_trigger(&mut self, temporary: bool) -> Result<CreateTriggerStatement, ParserError> {
        self.expect_keyword(Keyword::TRIGGER)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        let timing = if self.eat_keyword(Keyword::BEFORE) {
            Some(TriggerTiming::Before)
        } else if self.eat_keyword(Keyword::AFTER) {
            Some(TriggerTiming::After)
        } else if self.eat_keyword(Keyword::INSTEAD) {
            self.expect_keyword(Keyword::OF)?;
            Some(TriggerTiming::InsteadOf)
        } else {
            None
        };
        let event = if self.eat_keyword(Keyword::INSERT) {
            TriggerEvent::Insert
        } else if self.eat_keyword(Keyword::DELETE) {
            TriggerEvent::Delete
        } else {
            self.expect_keyword(Keyword::UPDATE)?;
            let mut columns = Vec::new();
            if self.eat_keyword(Keyword::OF) {
                columns.push(self.expect_identifier()?);
                while self.eat(TokenKind::Comma) {
                    columns.push(self.expect_identifier()?);
                }
            }
            TriggerEvent::Update(columns)
        };
        self.expect_keyword(Keyword::ON)?;
        let table = self.parse_qualified_name()?;
        let for_each_row = if self.eat_keyword(Keyword::FOR) {
            self.expect_keyword(Keyword::EACH)?;
            self.expect_keyword(Keyword::ROW)?;
            true
        } else {
            false
        };
        let when = if self.eat_keyword(Keyword::WHEN) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::BEGIN)?;
        let mut body = Vec::new();
        while !self.check_keyword(Keyword::END) {
            if self.is_eof() {
                return Err(self.error(ParserErrorKind::UnexpectedEof {
                    expected: "END".to_string(),
                }));
            }
            body.push(self.parse_statement()?);
            self.eat(TokenKind::Semicolon);
        }
        self.expect_keyword(Keyword::END)?;
        Ok(CreateTriggerStatement {
            temporary,
            if_not_exists,
            name,
            timing,
            event,
            table,
            for_each_row,
            when,
            body,
        })
    }

    fn parse_create_virtual_table(&mut self) -> Result<CreateVirtualTableStatement, ParserError> {
        self.expect_keyword(Keyword::TABLE)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        self.expect_keyword(Keyword::USING)?;
        let module_name = self.expect_identifier_or_keyword()?;
        let mut module_args = Vec::new();
        if self.eat(TokenKind::LParen) {
            if !self.check(TokenKind::RParen) {
                loop {
                    module_args.push(self.parse_module_argument()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
        }
        Ok(CreateVirtualTableStatement {
            if_not_exists,
            name,
            module_name,
            module_args,
        })
    }

    /// Each module argument is captured as the raw text of a single token,
    /// not parsed as an expression: `USING fts5(content=a.b, tokenize=ascii)`
    /// arguments aren't SQL expressions in general.
    fn parse_module_argument(&mut self) -> Result<String, ParserError> {
        if self.is_eof() {
            return Err(self.error(ParserErrorKind::UnexpectedEof {
                expected: "a module argument".to_string(),
            }));
        }
        Ok(self.advance().text)
    }

    fn parse_alter_table(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // ALTER
        self.expect_keyword(Keyword::TABLE)?;
        let name = self.parse_qualified_name()?;
        let action = if self.eat_keyword(Keyword::RENAME) {
            if self.eat_keyword(Keyword::TO) {
                AlterTableAction::RenameTo(self.parse_qualified_name()?)
            } else {
                self.eat_keyword(Keyword::COLUMN);
                let old = self.expect_identifier()?;
                self.expect_keyword(Keyword::TO)?;
                let new = self.expect_identifier()?;
                AlterTableAction::RenameColumn { old, new }
            }
        } else if self.eat_keyword(Keyword::ADD) {
            self.eat_keyword(Keyword::COLUMN);
            AlterTableAction::AddColumn(self.parse_column_def()?)
        } else if self.eat_keyword(Keyword::DROP) {
            self.eat_keyword(Keyword::COLUMN);
            AlterTableAction::DropColumn(self.expect_identifier()?)
        } else {
            return Err(self.error(ParserErrorKind::UnexpectedToken {
                expected: "RENAME, ADD COLUMN, or DROP COLUMN".to_string(),
                found: self.found_description(),
            }));
        };
        Ok(StatementKind::AlterTable(Box::new(AlterTableStatement { name, action })))
    }

    fn parse_drop(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // DROP
        if self.eat_keyword(Keyword::TABLE) {
            let if_exists = self.parse_if_exists()?;
            let name = self.parse_qualified_name()?;
            return Ok(StatementKind::DropTable(DropTableStatement { if_exists, name }));
        }
        if self.eat_keyword(Keyword::INDEX) {
            let if_exists = self.parse_if_exists()?;
            let name = self.parse_qualified_name()?;
            return Ok(StatementKind::DropIndex(DropIndexStatement { if_exists, name }));
        }
        if self.eat_keyword(Keyword::VIEW) {
            let if_exists = self.parse_if_exists()?;
            let name = self.parse_qualified_name()?;
            return Ok(StatementKind::DropView(DropViewStatement { if_exists, name }));
        }
        if self.eat_keyword(Keyword::TRIGGER) {
            let if_exists = self.parse_if_exists()?;
            let name = self.parse_qualified_name()?;
            return Ok(StatementKind::DropTrigger(DropTriggerStatement { if_exists, name }));
        }
        Err(self.error(ParserErrorKind::UnexpectedToken {
            expected: "TABLE, INDEX, VIEW, or TRIGGER".to_string(),
            found: self.found_description(),
        }))
    }

    // ---- transaction control & utility statements --------------------

    fn parse_begin(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // BEGIN
        let transaction_type = if self.eat_keyword(Keyword::DEFERRED) {
            Some(TransactionType::Deferred)
        } else if self.eat_keyword(Keyword::IMMEDIATE) {
            Some(TransactionType::Immediate)
        } else if self.eat_keyword(Keyword::EXCLUSIVE) {
            Some(TransactionType::Exclusive)
        } else {
            None
        };
        self.eat_keyword(Keyword::TRANSACTION);
        Ok(StatementKind::Begin(BeginStatement { transaction_type }))
    }

    fn parse_rollback(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // ROLLBACK
        self.eat_keyword(Keyword::TRANSACTION);
        let to = if self.eat_keyword(Keyword::TO) {
            self.eat_keyword(Keyword::SAVEPOINT);
            Some(self.expect_identifier()?)
        } else {
            None
        };
        Ok(StatementKind::Rollback(to))
    }

    fn parse_savepoint(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // SAVEPOINT
        Ok(StatementKind::Savepoint(self.expect_identifier()?))
    }

    fn parse_release(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // RELEASE
        self.eat_keyword(Keyword::SAVEPOINT);
        Ok(StatementKind::Release(self.expect_identifier()?))
    }

    fn parse_attach(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // ATTACH
        self.eat_keyword(Keyword::DATABASE);
        let expr = self.parse_expression()?;
        self.expect_keyword(Keyword::AS)?;
        let schema_name = self.expect_identifier()?;
        Ok(StatementKind::Attach(AttachStatement { expr, schema_name }))
    }

    fn parse_detach(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // DETACH
        self.eat_keyword(Keyword::DATABASE);
        Ok(StatementKind::Detach(self.expect_identifier()?))
    }

    fn parse_analyze(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // ANALYZE
        let name = if self.check(TokenKind::Identifier) {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };
        Ok(StatementKind::Analyze(name))
    }

    fn parse_vacuum(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // VACUUM
        let schema_name = if self.check(TokenKind::Identifier) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let into = if self.eat_keyword(Keyword::INTO) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(StatementKind::Vacuum(VacuumStatement { schema_name, into }))
    }

    fn parse_reindex(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // REINDEX
        let name = if self.check(TokenKind::Identifier) {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };
        Ok(StatementKind::Reindex(name))
    }

    fn parse_explain(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // EXPLAIN
        let query_plan = if self.eat_keyword(Keyword::QUERY) {
            self.expect_keyword(Keyword::PLAN)?;
            true
        } else {
            false
        };
        let statement = Box::new(self.parse_statement()?);
        Ok(StatementKind::Explain(ExplainStatement { query_plan, statement }))
    }

    /// `PRAGMA` value parsing is deliberately lenient: SQLite accepts a
    /// number, a bare word, or a quoted string as a pragma value and leaves
    /// it to the pragma's own semantics to reject anything nonsensical. Only
    /// a parenthesized or operator-bearing value falls through to a full
    /// expression parse.
    fn parse_pragma(&mut self) -> Result<StatementKind, ParserError> {
        self.advance(); // PRAGMA
        let name = self.parse_qualified_name()?;
        let value = if self.eat(TokenKind::Eq) {
            Some(self.parse_pragma_value()?)
        } else if self.eat(TokenKind::LParen) {
            let value = self.parse_pragma_value()?;
            self.expect(TokenKind::RParen, "')'")?;
            Some(value)
        } else {
            None
        };
        Ok(StatementKind::Pragma(PragmaStatement { name, value }))
    }

    fn parse_pragma_value(&mut self) -> Result<PragmaValue, ParserError> {
        if self.check(TokenKind::Number) {
            return Ok(PragmaValue::Number(self.advance().text));
        }
        if self.check(TokenKind::Minus) || self.check(TokenKind::Plus) {
            let mut text = String::new();
            if self.eat(TokenKind::Minus) {
                text.push('-');
            } else {
                self.advance();
            }
            let tok = self.expect(TokenKind::Number, "a number")?;
            text.push_str(&tok.text);
            return Ok(PragmaValue::Number(text));
        }
        if self.check(TokenKind::Identifier)
            || self.check(TokenKind::String)
            || matches!(self.current().kind, TokenKind::Keyword(_))
        {
            return Ok(PragmaValue::Keyword(self.advance().text));
        }
        Ok(PragmaValue::Expr(Box::new(self.parse_expression()?)))
    }

    // ---- statement dispatch ------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        let start = self.current_position();
        let kind = self.parse_statement_kind()?;
        Ok(Statement::new(kind, self.span_since(start)))
    }

    fn parse_statement_kind(&mut self) -> Result<StatementKind, ParserError> {
        let start = self.current_position();
        let with = if self.check_keyword(Keyword::WITH) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };
        if with.is_some() {
            return match self.current().kind {
                TokenKind::Keyword(Keyword::SELECT) => Ok(StatementKind::Select(Box::new(
                    self.parse_select_body(with, start)?,
                ))),
                TokenKind::Keyword(Keyword::INSERT) | TokenKind::Keyword(Keyword::REPLACE) => {
                    Ok(StatementKind::Insert(Box::new(self.parse_insert(with, start)?)))
                }
                TokenKind::Keyword(Keyword::UPDATE) => {
                    Ok(StatementKind::Update(Box::new(self.parse_update(with, start)?)))
                }
                TokenKind::Keyword(Keyword::DELETE) => {
                    Ok(StatementKind::Delete(Box::new(self.parse_delete(with, start)?)))
                }
                _ if self.is_eof() => Err(self.error(ParserErrorKind::UnexpectedEof {
                    expected: "SELECT, INSERT, UPDATE, or DELETE".to_string(),
                })),
                _ => Err(self.error(ParserErrorKind::UnexpectedToken {
                    expected: "SELECT, INSERT, UPDATE, or DELETE".to_string(),
                    found: self.found_description(),
                })),
            };
        }
        match self.current().kind {
            TokenKind::Keyword(Keyword::SELECT) => {
                Ok(StatementKind::Select(Box::new(self.parse_select_body(None, start)?)))
            }
            TokenKind::Keyword(Keyword::INSERT) | TokenKind::Keyword(Keyword::REPLACE) => {
                Ok(StatementKind::Insert(Box::new(self.parse_insert(None, start)?)))
            }
            TokenKind::Keyword(Keyword::UPDATE) => {
                Ok(StatementKind::Update(Box::new(self.parse_update(None, start)?)))
            }
            TokenKind::Keyword(Keyword::DELETE) => {
                Ok(StatementKind::Delete(Box::new(self.parse_delete(None, start)?)))
            }
            TokenKind::Keyword(Keyword::CREATE) => self.parse_create(),
            TokenKind::Keyword(Keyword::ALTER) => self.parse_alter_table(),
            TokenKind::Keyword(Keyword::DROP) => self.parse_drop(),
            TokenKind::Keyword(Keyword::BEGIN) => self.parse_begin(),
            TokenKind::Keyword(Keyword::COMMIT) | TokenKind::Keyword(Keyword::END) => {
                self.advance();
                Ok(StatementKind::Commit)
            }
            TokenKind::Keyword(Keyword::ROLLBACK) => self.parse_rollback(),
            TokenKind::Keyword(Keyword::SAVEPOINT) => self.parse_savepoint(),
            TokenKind::Keyword(Keyword::RELEASE) => self.parse_release(),
            TokenKind::Keyword(Keyword::ATTACH) => self.parse_attach(),
            TokenKind::Keyword(Keyword::DETACH) => self.parse_detach(),
            TokenKind::Keyword(Keyword::ANALYZE) => self.parse_analyze(),
            TokenKind::Keyword(Keyword::VACUUM) => self.parse_vacuum(),
            TokenKind::Keyword(Keyword::REINDEX) => self.parse_reindex(),
            TokenKind::Keyword(Keyword::EXPLAIN) => self.parse_explain(),
            TokenKind::Keyword(Keyword::PRAGMA) => self.parse_pragma(),
            _ if self.is_eof() => Err(self.error(ParserErrorKind::UnexpectedEof {
                expected: "a statement".to_string(),
            })),
            _ => Err(self.error(ParserErrorKind::InvalidStatementStart {
                found: self.found_description(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn parse_ok(text: &str) -> Vec<Statement> {
        let (statements, errors) = Parser::parse(text);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        statements
    }

    #[test]
    fn parses_select_with_where_and_limit() {
        let statements = parse_ok("SELECT a, b FROM t WHERE a = 1 LIMIT 10 OFFSET 5;");
        assert_eq!(statements.len(), 1);
        let StatementKind::Select(select) = &statements[0].kind else {
            panic!("expected a SELECT statement");
        };
        let SetExpr::Select(core) = &select.body else {
            panic!("expected a simple select core");
        };
        assert_eq!(core.columns.len(), 2);
        assert!(core.where_clause.is_some());
        let limit = select.limit.as_ref().expect("LIMIT clause");
        assert_matches!(limit.offset, Some(_));
    }

    #[test]
    fn limit_comma_form_swaps_offset_and_limit() {
        let statements = parse_ok("SELECT * FROM t LIMIT 5, 10;");
        let StatementKind::Select(select) = &statements[0].kind else {
            panic!("expected a SELECT statement");
        };
        let limit = select.limit.as_ref().expect("LIMIT clause");
        let ExprKind::Literal(Literal::Number { text: offset_text, .. }) = &limit.offset.as_ref().unwrap().kind else {
            panic!("expected a numeric offset");
        };
        let ExprKind::Literal(Literal::Number { text: limit_text, .. }) = &limit.limit.kind else {
            panic!("expected a numeric limit");
        };
        assert_eq!(offset_text, "5");
        assert_eq!(limit_text, "10");
    }

    #[test]
    fn qualified_name_with_four_parts_is_a_syntax_error() {
        let (_, errors) = Parser::parse("SELECT a.b.c.d FROM t;");
        assert_eq!(errors.len(), 1);
        assert_matches!(errors[0].kind(), ParserErrorKind::UnexpectedToken { .. });
    }

    #[test]
    fn between_and_in_expressions_parse() {
        let statements =
            parse_ok("SELECT * FROM t WHERE a BETWEEN 1 AND 10 AND b NOT IN (1, 2, 3);");
        let StatementKind::Select(select) = &statements[0].kind else {
            panic!("expected a SELECT statement");
        };
        let SetExpr::Select(core) = &select.body else {
            panic!("expected a simple select core");
        };
        assert!(core.where_clause.is_some());
    }

    #[test]
    fn create_table_with_constraints_parses() {
        let statements = parse_ok(
            "CREATE TABLE t (\
               id INTEGER PRIMARY KEY AUTOINCREMENT, \
               name TEXT NOT NULL DEFAULT 'x', \
               parent_id INTEGER REFERENCES t(id) ON DELETE CASCADE\
             );",
        );
        let StatementKind::CreateTable(create) = &statements[0].kind else {
            panic!("expected a CREATE TABLE statement");
        };
        let CreateTableSource::Columns { columns, .. } = &create.source else {
            panic!("expected a column list");
        };
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn insert_with_on_conflict_do_update_parses() {
        let statements = parse_ok(
            "INSERT INTO t (id, name) VALUES (1, 'a') \
             ON CONFLICT (id) DO UPDATE SET name = excluded.name WHERE t.id = 1;",
        );
        let StatementKind::Insert(insert) = &statements[0].kind else {
            panic!("expected an INSERT statement");
        };
        assert_eq!(insert.upserts.len(), 1);
        assert_matches!(insert.upserts[0].action, UpsertAction::DoUpdate { .. });
    }

    #[test]
    fn window_function_with_frame_parses() {
        let statements = parse_ok(
            "SELECT sum(x) OVER (PARTITION BY y ORDER BY z \
             ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) FROM t;",
        );
        let StatementKind::Select(select) = &statements[0].kind else {
            panic!("expected a SELECT statement");
        };
        let SetExpr::Select(core) = &select.body else {
            panic!("expected a simple select core");
        };
        let ResultColumn::Expr { expr, .. } = &core.columns[0] else {
            panic!("expected a single expression column");
        };
        let ExprKind::FunctionCall { over: Some(WindowSpec::Inline(def)), .. } = &expr.kind else {
            panic!("expected an inline window spec");
        };
        assert!(def.frame.is_some());
    }

    #[test]
    fn raise_requires_message_for_rollback_abort_fail() {
        let (_, errors) = Parser::parse(
            "CREATE TRIGGER t BEFORE INSERT ON x BEGIN SELECT RAISE(ROLLBACK); END;",
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn trigger_body_with_multiple_statements_parses() {
        let statements = parse_ok(
            "CREATE TRIGGER t AFTER INSERT ON x BEGIN \
               UPDATE y SET a = 1 WHERE y.id = NEW.id; \
               DELETE FROM z WHERE z.id = NEW.id; \
             END;",
        );
        let StatementKind::CreateTrigger(trigger) = &statements[0].kind else {
            panic!("expected a CREATE TRIGGER statement");
        };
        assert_eq!(trigger.body.len(), 2);
    }

    #[test]
    fn synchronize_recovers_after_a_syntax_error() {
        let (statements, errors) = Parser::parse("SELECT FROM; SELECT 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn pragma_accepts_a_bare_word_value() {
        let statements = parse_ok("PRAGMA journal_mode = WAL;");
        let StatementKind::Pragma(pragma) = &statements[0].kind else {
            panic!("expected a PRAGMA statement");
        };
        assert_matches!(pragma.value, Some(PragmaValue::Keyword(_)));
    }

    #[test]
    fn compound_select_is_left_associative() {
        let statements = parse_ok("SELECT 1 UNION SELECT 2 EXCEPT SELECT 3;");
        let StatementKind::Select(select) = &statements[0].kind else {
            panic!("expected a SELECT statement");
        };
        let SetExpr::Compound { op, left, .. } = &select.body else {
            panic!("expected a compound select");
        };
        assert_eq!(*op, CompoundOperator::Except);
        assert_matches!(**left, SetExpr::Compound { op: CompoundOperator::Union, .. });
    }

    #[test]
    fn recursion_limit_is_enforced() {
        let mut text = String::new();
        for _ in 0..(Parser::MAX_EXPR_DEPTH + 10) {
            text.push('(');
        }
        text.push('1');
        for _ in 0..(Parser::MAX_EXPR_DEPTH + 10) {
            text.push(')');
        }
        let sql = format!("SELECT {text};");
        let (_, errors) = Parser::parse(&sql);
        assert!(!errors.is_empty());
        assert_matches!(errors[0].kind(), ParserErrorKind::RecursionLimitExceeded);
    }
}
