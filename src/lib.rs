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

//! A lexer and recursive-descent parser for the SQLite SQL dialect that
//! produces a position-annotated abstract syntax tree.
//!
//! ```
//! use sqlite_ast::parse_sql_strict;
//!
//! let statements = parse_sql_strict("SELECT 1 WHERE 1 = 1;").unwrap();
//! assert_eq!(statements.len(), 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

pub mod ast;
pub mod error;
pub mod keywords;
pub mod parser;
pub mod position;
pub mod tokenizer;

pub use ast::Statement;
pub use error::{ParserError, ParserErrorKind};
pub use parser::Parser;
pub use position::{Position, Span};
pub use tokenizer::{tokenize, Token, TokenKind};

/// Tokenize and parse `text`, recovering from errors in panic mode and
/// returning every statement that parsed successfully alongside every
/// error encountered along the way.
///
/// Prefer this entry point for tooling (linters, formatters, IDE servers)
/// that want to keep going after a syntax error instead of stopping at the
/// first one.
pub fn parse_sql(text: &str) -> (Vec<Statement>, Vec<ParserError>) {
    Parser::parse(text)
}

/// Tokenize and parse `text`, returning the first error encountered (if
/// any) instead of a list. Prefer this entry point when the caller just
/// wants a single `Result`.
pub fn parse_sql_strict(text: &str) -> Result<Vec<Statement>, ParserError> {
    let (statements, errors) = parse_sql(text);
    match errors.into_iter().next() {
        Some(first) => Err(first),
        None => Ok(statements),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_trivial_select() {
        let (statements, errors) = parse_sql("SELECT 1;");
        assert!(errors.is_empty());
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn strict_entry_point_surfaces_the_first_error() {
        let err = parse_sql_strict("SELECT FROM;").unwrap_err();
        assert!(matches!(err.kind(), ParserErrorKind::ExpectedExpression { .. }));
    }
}
