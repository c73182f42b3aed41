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

//! Literal values.

use alloc::string::String;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The numeric value of a `NUMBER` token, parsed alongside (never instead
/// of) its source text: SQLite numeric literals can exceed `i64` or lose
/// precision as `f64`, so callers that only care about the original
/// spelling still have `Literal::Number`'s `text` field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

/// Parse a `NUMBER` token's text into its integer-or-float value. The
/// scanner only ever hands this well-formed numeric text (see
/// `Tokenizer::lex_number`), so the float fallback is infallible in
/// practice; it exists to keep this a total function rather than one that
/// could panic on a pathological token.
pub fn parse_numeric_text(text: &str) -> NumericValue {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if let Ok(n) = i64::from_str_radix(hex, 16) {
            return NumericValue::Integer(n);
        }
    }
    if let Ok(n) = text.parse::<i64>() {
        return NumericValue::Integer(n);
    }
    NumericValue::Float(text.parse::<f64>().unwrap_or(0.0))
}

/// A literal value as it appeared in the source, before any numeric or
/// escape interpretation. Keeping the raw text (rather than, say, an `f64`)
/// avoids lossy conversions the parser has no business performing; that's
/// a concern for a later evaluation stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// An integer or floating point literal. `value` is derived from
    /// `text` at parse time; `text` is kept so formatters can round-trip
    /// the exact source spelling (`1.0` vs `1.`, `0x1F` vs `31`, ...).
    Number { text: String, value: NumericValue },
    /// A string literal with escapes already resolved (`''` collapsed to `'`).
    /// `quote` is the opening quote character, always `'` for the scanner's
    /// `STRING` token kind; kept on the node rather than assumed so a
    /// formatter doesn't have to hardcode it.
    String { value: String, quote: char },
    /// A `x'...'` blob literal; the string is the hex digit text between the quotes.
    Blob(String),
    Null,
    Boolean(bool),
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Number { text, .. } => write!(f, "{text}"),
            Literal::String { value, quote } => {
                write!(f, "{quote}{}{quote}", escape_single_quotes(value))
            }
            Literal::Blob(text) => write!(f, "x'{text}'"),
            Literal::Null => write!(f, "NULL"),
            Literal::Boolean(true) => write!(f, "TRUE"),
            Literal::Boolean(false) => write!(f, "FALSE"),
            Literal::CurrentDate => write!(f, "CURRENT_DATE"),
            Literal::CurrentTime => write!(f, "CURRENT_TIME"),
            Literal::CurrentTimestamp => write!(f, "CURRENT_TIMESTAMP"),
        }
    }
}

fn escape_single_quotes(text: &str) -> String {
    text.replace('\'', "''")
}
