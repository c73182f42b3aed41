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

//! Errors raised while scanning or parsing, and their user-facing rendering.

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

#[cfg(feature = "std")]
use std::error::Error as StdError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::position::Position;

/// The closed set of ways a parse can fail.
///
/// `Semantic` is never constructed by this crate: it is reserved for
/// downstream consumers (type checkers, binders) that want to report their
/// own errors through the same type without inventing a parallel hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParserErrorKind {
    // Lexical errors.
    UnterminatedString,
    UnterminatedIdentifier,
    UnterminatedBlockComment,
    InvalidBlobCharacter,
    UnexpectedCharacter(char),

    // Syntactic errors.
    UnexpectedToken { expected: String, found: String },
    UnexpectedEof { expected: String },
    ExpectedExpression { found: String },
    ExpectedFrameBoundary { found: String },
    ExpectedConflictResolution { found: String },
    ExpectedForeignKeyAction { found: String },
    ExpectedRaiseType { found: String },
    InvalidStatementStart { found: String },

    // Resource guard.
    RecursionLimitExceeded,

    // Reserved for downstream use; never constructed here.
    Semantic(String),
}

impl fmt::Display for ParserErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParserErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            ParserErrorKind::UnterminatedIdentifier => write!(f, "unterminated quoted identifier"),
            ParserErrorKind::UnterminatedBlockComment => write!(f, "unterminated block comment"),
            ParserErrorKind::InvalidBlobCharacter => {
                write!(f, "invalid character in blob literal, expected a hex digit")
            }
            ParserErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character '{}'", c),
            ParserErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            ParserErrorKind::UnexpectedEof { expected } => {
                write!(f, "expected {}, found end of input", expected)
            }
            ParserErrorKind::ExpectedExpression { found } => {
                write!(f, "expected expression, found {}", found)
            }
            ParserErrorKind::ExpectedFrameBoundary { found } => {
                write!(f, "expected frame boundary, found {}", found)
            }
            ParserErrorKind::ExpectedConflictResolution { found } => {
                write!(f, "expected conflict resolution clause, found {}", found)
            }
            ParserErrorKind::ExpectedForeignKeyAction { found } => {
                write!(f, "expected foreign key action, found {}", found)
            }
            ParserErrorKind::ExpectedRaiseType { found } => {
                write!(f, "expected RAISE type, found {}", found)
            }
            ParserErrorKind::InvalidStatementStart { found } => {
                write!(f, "expected a statement, found {}", found)
            }
            ParserErrorKind::RecursionLimitExceeded => {
                write!(f, "expression nesting exceeds the recursion limit")
            }
            ParserErrorKind::Semantic(message) => write!(f, "{}", message),
        }
    }
}

/// An error produced while scanning or parsing, with enough context
/// (`position`, and optionally the offending line of `source`) to render a
/// caret-pointed diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParserError {
    kind: ParserErrorKind,
    position: Option<Position>,
    source: Option<String>,
}

impl ParserError {
    pub fn new(kind: ParserErrorKind, position: Option<Position>) -> Self {
        ParserError {
            kind,
            position,
            source: None,
        }
    }

    /// Attach the original source text, enabling the offending-line excerpt
    /// in `Display`. Parsers call this once they know the full input.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn kind(&self) -> &ParserErrorKind {
        &self.kind
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Some(position) = self.position else {
            return write!(f, "{}", self.kind);
        };

        writeln!(f, "Line {}, Column {}: {}", position.line, position.column, self.kind)?;

        if let Some(source) = &self.source {
            if let Some(line) = source.lines().nth(position.line.saturating_sub(1)) {
                writeln!(f, "{}", line)?;
                let caret_offset = position.column.saturating_sub(1);
                write!(f, "{}^", " ".repeat(caret_offset))?;
            }
        }

        Ok(())
    }
}

#[cfg(feature = "std")]
impl StdError for ParserError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_caret_under_offending_column() {
        let source = "SELECT 1 FROM";
        let err = ParserError::new(
            ParserErrorKind::UnexpectedEof {
                expected: "a table name".to_string(),
            },
            Some(Position::new(1, 14, 13)),
        )
        .with_source(source);

        let rendered = format!("{}", err);
        let mut lines = rendered.lines();
        assert_eq!(lines.next().unwrap(), "Line 1, Column 14: expected a table name, found end of input");
        assert_eq!(lines.next().unwrap(), "SELECT 1 FROM");
        assert_eq!(lines.next().unwrap(), "             ^");
    }
}
