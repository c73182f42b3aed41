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

//! A mode-stack lexical scanner for SQLite's token grammar.
//!
//! The scanner is a small state machine: most of the time it runs in
//! `Mode::Normal`, but string literals, quoted identifiers, and comments
//! push a dedicated mode onto `mode_stack` for the duration of the
//! construct and pop back to `Normal` on their closing delimiter. This
//! mirrors the `LexerMode` stack in the system this crate's grammar was
//! distilled from, rather than handling each construct with ad hoc
//! lookahead inside a single `next_token`.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParserError, ParserErrorKind};
use crate::keywords::{keyword_from_str, Keyword};
use crate::position::{Position, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    StringSingle,
    StringDouble,
    BlockComment,
    LineComment,
    BracketIdentifier,
    BacktickIdentifier,
}

/// The closed set of token kinds produced by the scanner.
///
/// Keywords are represented by a single `Keyword(Keyword)` variant rather
/// than one `TokenKind` variant per keyword: `Keyword` already enumerates
/// every SQLite keyword one-for-one, and folding all ~150 of them directly
/// into `TokenKind` would just duplicate that enum under a different name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    Number,
    String,
    Blob,
    Parameter,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Concat, // ||

    Eq,     // =
    EqEq,   // ==
    NotEq,  // !=
    LtGt,   // <>
    Lt,
    Gt,
    LtEq,
    GtEq,

    Shl, // <<
    Shr, // >>
    Amp,
    Pipe,
    Tilde,

    Arrow,      // ->
    ArrowArrow, // ->>

    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "{}", kw.as_str()),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Blob => write!(f, "blob"),
            TokenKind::Parameter => write!(f, "parameter"),
            TokenKind::Eof => write!(f, "end of input"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A single lexeme: its kind, raw text (quotes/delimiters already stripped
/// and escapes resolved), and its location in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
    pub span: Span,
    /// The delimiter an `IDENTIFIER` token was quoted with (`"`, `` ` ``, or
    /// `[`), or `None` for a bare identifier/keyword. Irrelevant for every
    /// other token kind.
    pub quote: Option<char>,
}

impl Token {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Scans SQLite source text into a flat token stream.
pub struct Tokenizer {
    chars: Vec<char>,
    byte_offsets: Vec<usize>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    buffer: String,
    buffer_start: Position,
    mode_stack: Vec<Mode>,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        let mut chars = Vec::new();
        let mut byte_offsets = Vec::new();
        for (offset, ch) in source.char_indices() {
            byte_offsets.push(offset);
            chars.push(ch);
        }
        byte_offsets.push(source.len());

        Tokenizer {
            chars,
            byte_offsets,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            buffer: String::new(),
            buffer_start: Position::start(),
            mode_stack: alloc::vec![Mode::Normal],
        }
    }

    fn current_mode(&self) -> Mode {
        *self.mode_stack.last().expect("mode stack never empty")
    }

    fn push_mode(&mut self, mode: Mode) {
        log::trace!("tokenizer: push mode {:?}", mode);
        self.mode_stack.push(mode);
    }

    fn pop_mode(&mut self) {
        if self.mode_stack.len() > 1 {
            let mode = self.mode_stack.pop();
            log::trace!("tokenizer: pop mode {:?}", mode);
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.byte_offsets[self.pos])
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip(&mut self) {
        self.advance();
    }

    /// Reset the buffer to empty, anchored at the current position. Call
    /// this before accumulating the text of a new token.
    fn start_buffer(&mut self) {
        self.buffer.clear();
        self.buffer_start = self.current_position();
    }

    fn emit(&mut self, kind: TokenKind) {
        let end = self.current_position();
        let text = core::mem::take(&mut self.buffer);
        self.tokens.push(Token {
            kind,
            text,
            position: self.buffer_start,
            span: Span::new(self.buffer_start, end),
            quote: None,
        });
    }

    /// Like `emit`, but records the delimiter a quoted identifier was
    /// closed with so the parser can preserve it on the `Ident` node.
    fn emit_quoted_identifier(&mut self, quote: char) {
        let end = self.current_position();
        let text = core::mem::take(&mut self.buffer);
        self.tokens.push(Token {
            kind: TokenKind::Identifier,
            text,
            position: self.buffer_start,
            span: Span::new(self.buffer_start, end),
            quote: Some(quote),
        });
    }

    fn emit_text(&mut self, kind: TokenKind, text: String, start: Position, end: Position) {
        self.tokens.push(Token {
            kind,
            text,
            position: start,
            span: Span::new(start, end),
            quote: None,
        });
    }

    fn error(&self, kind: ParserErrorKind, position: Position) -> ParserError {
        ParserError::new(kind, Some(position))
    }

    /// Tokenize the full input, returning every token including a trailing
    /// `Eof`. Stops at the first lexical error.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParserError> {
        while !self.at_end() {
            match self.current_mode() {
                Mode::Normal => self.lex_normal()?,
                Mode::StringSingle => self.lex_string_single()?,
                Mode::StringDouble => self.lex_string_double()?,
                Mode::BlockComment => self.lex_block_comment()?,
                Mode::LineComment => self.lex_line_comment(),
                Mode::BracketIdentifier => self.lex_bracket_identifier()?,
                Mode::BacktickIdentifier => self.lex_backtick_identifier()?,
            }
        }

        match self.current_mode() {
            Mode::StringSingle | Mode::StringDouble => {
                return Err(self.error(ParserErrorKind::UnterminatedString, self.buffer_start));
            }
            Mode::BracketIdentifier | Mode::BacktickIdentifier => {
                return Err(self.error(ParserErrorKind::UnterminatedIdentifier, self.buffer_start));
            }
            Mode::BlockComment => {
                return Err(self.error(
                    ParserErrorKind::UnterminatedBlockComment,
                    self.buffer_start,
                ));
            }
            Mode::Normal | Mode::LineComment => {}
        }

        let eof_pos = self.current_position();
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            position: eof_pos,
            span: Span::new(eof_pos, eof_pos),
            quote: None,
        });
        Ok(self.tokens)
    }

    fn lex_normal(&mut self) -> Result<(), ParserError> {
        let ch = match self.peek() {
            Some(c) => c,
            None => return Ok(()),
        };

        if ch.is_whitespace() {
            self.skip();
            return Ok(());
        }

        if ch == '-' && self.peek_at(1) == Some('-') {
            self.push_mode(Mode::LineComment);
            self.skip();
            self.skip();
            return Ok(());
        }
        if ch == '/' && self.peek_at(1) == Some('*') {
            self.push_mode(Mode::BlockComment);
            self.skip();
            self.skip();
            return Ok(());
        }

        if ch == '\'' {
            self.start_buffer();
            self.skip();
            self.push_mode(Mode::StringSingle);
            return Ok(());
        }
        if ch == '"' {
            self.start_buffer();
            self.skip();
            self.push_mode(Mode::StringDouble);
            return Ok(());
        }
        if ch == '[' {
            self.start_buffer();
            self.skip();
            self.push_mode(Mode::BracketIdentifier);
            return Ok(());
        }
        if ch == '`' {
            self.start_buffer();
            self.skip();
            self.push_mode(Mode::BacktickIdentifier);
            return Ok(());
        }

        if ch == 'x' || ch == 'X' {
            if self.peek_at(1) == Some('\'') {
                return self.lex_blob();
            }
        }

        if ch.is_ascii_digit() || (ch == '.' && matches!(self.peek_at(1), Some(d) if d.is_ascii_digit()))
        {
            return self.lex_number();
        }

        if is_identifier_start(ch) {
            return self.lex_identifier_or_keyword();
        }

        if ch == '?' || ch == ':' || ch == '@' || ch == '$' {
            return self.lex_parameter();
        }

        self.lex_operator()
    }

    fn lex_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.skip();
        }
        self.pop_mode();
    }

    fn lex_block_comment(&mut self) -> Result<(), ParserError> {
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(ParserErrorKind::UnterminatedBlockComment, self.current_position()));
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.skip();
                    self.skip();
                    self.pop_mode();
                    return Ok(());
                }
                Some(_) => {
                    self.skip();
                }
            }
        }
    }

    fn lex_string_single(&mut self) -> Result<(), ParserError> {
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(ParserErrorKind::UnterminatedString, self.buffer_start));
                }
                Some('\'') if self.peek_at(1) == Some('\'') => {
                    // A doubled quote inside a string literal is an escaped
                    // single quote; collapse it to one `'` in the token text
                    // rather than keeping both source characters.
                    self.skip();
                    self.skip();
                    self.buffer.push('\'');
                }
                Some('\'') => {
                    self.skip();
                    self.pop_mode();
                    self.emit(TokenKind::String);
                    return Ok(());
                }
                Some(c) => {
                    self.skip();
                    self.buffer.push(c);
                }
            }
        }
    }

    fn lex_string_double(&mut self) -> Result<(), ParserError> {
        // Double-quoted strings behave like bracket/backtick identifiers in
        // SQLite (they name a column/table unless no such name resolves),
        // but at the lexical level they are just a quoted identifier whose
        // doubled-quote escape mirrors the single-quote string's.
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(ParserErrorKind::UnterminatedIdentifier, self.buffer_start));
                }
                Some('"') if self.peek_at(1) == Some('"') => {
                    self.skip();
                    self.skip();
                    self.buffer.push('"');
                }
                Some('"') => {
                    self.skip();
                    self.pop_mode();
                    self.emit_quoted_identifier('"');
                    return Ok(());
                }
                Some(c) => {
                    self.skip();
                    self.buffer.push(c);
                }
            }
        }
    }

    fn lex_bracket_identifier(&mut self) -> Result<(), ParserError> {
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(ParserErrorKind::UnterminatedIdentifier, self.buffer_start));
                }
                Some(']') => {
                    self.skip();
                    self.pop_mode();
                    self.emit_quoted_identifier('[');
                    return Ok(());
                }
                Some(c) => {
                    self.skip();
                    self.buffer.push(c);
                }
            }
        }
    }

    fn lex_backtick_identifier(&mut self) -> Result<(), ParserError> {
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(ParserErrorKind::UnterminatedIdentifier, self.buffer_start));
                }
                Some('`') if self.peek_at(1) == Some('`') => {
                    self.skip();
                    self.skip();
                    self.buffer.push('`');
                }
                Some('`') => {
                    self.skip();
                    self.pop_mode();
                    self.emit_quoted_identifier('`');
                    return Ok(());
                }
                Some(c) => {
                    self.skip();
                    self.buffer.push(c);
                }
            }
        }
    }

    fn lex_number(&mut self) -> Result<(), ParserError> {
        self.start_buffer();

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x') | Some('X')) {
            self.buffer.push(self.advance().unwrap());
            self.buffer.push(self.advance().unwrap());
            while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                self.buffer.push(self.advance().unwrap());
            }
            self.emit(TokenKind::Number);
            return Ok(());
        }

        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.buffer.push(self.advance().unwrap());
        }
        if self.peek() == Some('.') {
            self.buffer.push(self.advance().unwrap());
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.buffer.push(self.advance().unwrap());
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut lookahead = 1;
            if matches!(self.peek_at(1), Some('+') | Some('-')) {
                lookahead = 2;
            }
            if matches!(self.peek_at(lookahead), Some(c) if c.is_ascii_digit()) {
                self.buffer.push(self.advance().unwrap());
                if lookahead == 2 {
                    self.buffer.push(self.advance().unwrap());
                }
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.buffer.push(self.advance().unwrap());
                }
            }
        }

        self.emit(TokenKind::Number);
        Ok(())
    }

    fn lex_blob(&mut self) -> Result<(), ParserError> {
        self.start_buffer();
        self.advance(); // x/X
        self.advance(); // opening '
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(ParserErrorKind::UnterminatedString, self.buffer_start));
                }
                Some('\'') => {
                    self.skip();
                    self.emit(TokenKind::Blob);
                    return Ok(());
                }
                Some(c) if c.is_ascii_hexdigit() => {
                    self.buffer.push(c);
                    self.skip();
                }
                Some(_) => {
                    let pos = self.current_position();
                    return Err(self.error(ParserErrorKind::InvalidBlobCharacter, pos));
                }
            }
        }
    }

    fn lex_identifier_or_keyword(&mut self) -> Result<(), ParserError> {
        self.start_buffer();
        while matches!(self.peek(), Some(c) if is_identifier_part(c)) {
            self.buffer.push(self.advance().unwrap());
        }
        match keyword_from_str(&self.buffer) {
            Some(keyword) => self.emit(TokenKind::Keyword(keyword)),
            None => self.emit(TokenKind::Identifier),
        }
        Ok(())
    }

    fn lex_parameter(&mut self) -> Result<(), ParserError> {
        let start = self.current_position();
        let mut text = String::new();
        let marker = self.advance().unwrap();
        text.push(marker);

        match marker {
            '?' => {
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    text.push(self.advance().unwrap());
                }
            }
            ':' | '@' | '$' => {
                while matches!(self.peek(), Some(c) if is_identifier_part(c)) {
                    text.push(self.advance().unwrap());
                }
            }
            _ => unreachable!("lex_parameter called on non-parameter marker"),
        }

        let end = self.current_position();
        self.emit_text(TokenKind::Parameter, text, start, end);
        Ok(())
    }

    fn lex_operator(&mut self) -> Result<(), ParserError> {
        let start = self.current_position();
        let two = (self.peek(), self.peek_at(1));
        let three = self.peek_at(2);

        let (kind, len): (TokenKind, usize) = match two {
            (Some('|'), Some('|')) => (TokenKind::Concat, 2),
            (Some('='), Some('=')) => (TokenKind::EqEq, 2),
            (Some('!'), Some('=')) => (TokenKind::NotEq, 2),
            (Some('<'), Some('>')) => (TokenKind::LtGt, 2),
            (Some('<'), Some('=')) => (TokenKind::LtEq, 2),
            (Some('>'), Some('=')) => (TokenKind::GtEq, 2),
            (Some('<'), Some('<')) => (TokenKind::Shl, 2),
            (Some('>'), Some('>')) => (TokenKind::Shr, 2),
            (Some('-'), Some('>')) => {
                if three == Some('>') {
                    (TokenKind::ArrowArrow, 3)
                } else {
                    (TokenKind::Arrow, 2)
                }
            }
            (Some('+'), _) => (TokenKind::Plus, 1),
            (Some('-'), _) => (TokenKind::Minus, 1),
            (Some('*'), _) => (TokenKind::Star, 1),
            (Some('/'), _) => (TokenKind::Slash, 1),
            (Some('%'), _) => (TokenKind::Percent, 1),
            (Some('='), _) => (TokenKind::Eq, 1),
            (Some('<'), _) => (TokenKind::Lt, 1),
            (Some('>'), _) => (TokenKind::Gt, 1),
            (Some('&'), _) => (TokenKind::Amp, 1),
            (Some('|'), _) => (TokenKind::Pipe, 1),
            (Some('~'), _) => (TokenKind::Tilde, 1),
            (Some('('), _) => (TokenKind::LParen, 1),
            (Some(')'), _) => (TokenKind::RParen, 1),
            (Some(','), _) => (TokenKind::Comma, 1),
            (Some(';'), _) => (TokenKind::Semicolon, 1),
            (Some('.'), _) => (TokenKind::Dot, 1),
            (Some(c), _) => {
                return Err(self.error(ParserErrorKind::UnexpectedCharacter(c), start));
            }
            (None, _) => return Ok(()),
        };

        let mut text = String::new();
        for _ in 0..len {
            text.push(self.advance().unwrap());
        }
        let end = self.current_position();
        self.emit_text(kind, text, start, end);
        Ok(())
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Tokenize `text`, stopping at the first lexical error.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ParserError> {
    Tokenizer::new(text).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_a_simple_select() {
        let kinds = kinds("SELECT 1, 'x' FROM t;");
        assert_eq!(
            kinds,
            alloc::vec![
                TokenKind::Keyword(Keyword::SELECT),
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::String,
                TokenKind::Keyword(Keyword::FROM),
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn collapses_doubled_single_quotes() {
        let tokens = tokenize("'it''s'").unwrap();
        assert_eq!(tokens[0].text, "it's");
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let tokens = tokenize("select").unwrap();
        assert!(tokens[0].is_keyword(Keyword::SELECT));
    }

    #[test]
    fn bracket_identifier_strips_delimiters() {
        let tokens = tokenize("[my col]").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "my col");
    }

    #[test]
    fn line_comment_is_skipped() {
        let kinds = kinds("SELECT 1 -- a trailing comment\n");
        assert_eq!(
            kinds,
            alloc::vec![TokenKind::Keyword(Keyword::SELECT), TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn block_comment_is_skipped() {
        let kinds = kinds("SELECT /* inline */ 1");
        assert_eq!(
            kinds,
            alloc::vec![TokenKind::Keyword(Keyword::SELECT), TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("'abc").unwrap_err();
        matches::assert_matches!(err.kind(), ParserErrorKind::UnterminatedString);
    }

    #[test]
    fn arrow_operators_prefer_longest_match() {
        let kinds = kinds("a -> b ->> c");
        assert_eq!(
            kinds,
            alloc::vec![
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::ArrowArrow,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbered_and_named_parameters() {
        let tokens = tokenize("?1 :name @tag $var").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, alloc::vec!["?1", ":name", "@tag", "$var", ""]);
    }

    #[test]
    fn blob_literal() {
        let tokens = tokenize("x'ABCD'").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Blob);
        assert_eq!(tokens[0].text, "ABCD");
    }

    #[test]
    fn invalid_blob_character_is_an_error() {
        let err = tokenize("x'ZZ'").unwrap_err();
        matches::assert_matches!(err.kind(), ParserErrorKind::InvalidBlobCharacter);
    }
}
