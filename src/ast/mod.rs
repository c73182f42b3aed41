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

//! The position-annotated abstract syntax tree produced by the parser.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod ddl;
pub mod dml;
pub mod expr;
pub mod operator;
pub mod query;
pub mod stmt;
pub mod value;
pub mod visitor;

pub use ddl::*;
pub use dml::*;
pub use expr::*;
pub use operator::{BinaryOperator, UnaryOperator};
pub use query::*;
pub use stmt::*;
pub use value::Literal;
pub use visitor::{Visit, Visitor};

struct DisplaySeparated<'a, T>
where
    T: fmt::Display,
{
    slice: &'a [T],
    sep: &'static str,
}

impl<'a, T> fmt::Display for DisplaySeparated<'a, T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut delim = "";
        for t in self.slice {
            write!(f, "{delim}")?;
            delim = self.sep;
            write!(f, "{t}")?;
        }
        Ok(())
    }
}

fn display_separated<'a, T>(slice: &'a [T], sep: &'static str) -> DisplaySeparated<'a, T>
where
    T: fmt::Display,
{
    DisplaySeparated { slice, sep }
}

/// An identifier, decomposed into its text and the quote style (if any) it
/// was written with. Keeping the quote style lets a formatter round-trip
/// `"Select"` (a quoted identifier) distinctly from `Select` (a bare,
/// case-insensitive one) instead of losing that distinction at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ident {
    pub value: String,
    pub quote_style: Option<char>,
}

impl Ident {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Ident {
            value: value.into(),
            quote_style: None,
        }
    }

    /// Panics if `quote` isn't one of the delimiters the scanner can
    /// actually produce (`'`, `"`, backtick, or `[`).
    pub fn with_quote<S: Into<String>>(quote: char, value: S) -> Self {
        assert!(matches!(quote, '\'' | '"' | '`' | '['));
        Ident {
            value: value.into(),
            quote_style: Some(quote),
        }
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Ident::new(value)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.quote_style {
            Some('[') => write!(f, "[{}]", self.value),
            Some(q) => write!(f, "{q}{}{q}", self.value),
            None => f.write_str(&self.value),
        }
    }
}

/// A possibly-qualified name, e.g. `col`, `table.col`, or `schema.table.col`.
///
/// Invariant: 1 to 3 parts. The parser is responsible for rejecting a
/// fourth `.part` with a syntax error before ever constructing one of
/// these; `QualifiedName::new` only asserts the invariant in debug builds
/// so a violation is caught close to its source instead of silently
/// truncating or panicking in release.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QualifiedName(pub Vec<Ident>);

impl QualifiedName {
    pub fn new(parts: Vec<Ident>) -> Self {
        debug_assert!(
            !parts.is_empty() && parts.len() <= 3,
            "qualified name must have 1 to 3 parts"
        );
        QualifiedName(parts)
    }

    pub fn single(ident: Ident) -> Self {
        QualifiedName(alloc::vec![ident])
    }

    pub fn parts(&self) -> &[Ident] {
        &self.0
    }

    /// The final, right-most part: the column/table/object's own name,
    /// independent of how many qualifiers came before it.
    pub fn last(&self) -> &Ident {
        self.0.last().expect("qualified name is never empty")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", display_separated(&self.0, "."))
    }
}
