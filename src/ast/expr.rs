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

//! Expression nodes.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::operator::{BinaryOperator, UnaryOperator};
use crate::ast::query::Select;
use crate::ast::value::Literal;
use crate::ast::{Ident, QualifiedName};
use crate::position::Span;

/// An expression, annotated with the source span it was parsed from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LikeOperator {
    Like,
    Glob,
    Match,
    Regexp,
}

impl fmt::Display for LikeOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            LikeOperator::Like => "LIKE",
            LikeOperator::Glob => "GLOB",
            LikeOperator::Match => "MATCH",
            LikeOperator::Regexp => "REGEXP",
        };
        write!(f, "{s}")
    }
}

/// The right-hand side of an `IN` expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InSource {
    /// `expr IN (SELECT ...)`
    Subquery(Box<Select>),
    /// `expr IN (a, b, c)`
    List(Vec<Expr>),
    /// `expr IN table_name`
    Table(QualifiedName),
}

/// A parsed SQL type name, e.g. `INTEGER` or `VARCHAR(255)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeName {
    pub name: Ident,
    pub args: Vec<String>,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// The error/message behavior requested by a `RAISE(...)` expression,
/// usable only inside a trigger body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RaiseExpr {
    Ignore,
    Rollback(String),
    Abort(String),
    Fail(String),
}

/// Arguments to a function call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FunctionArgs {
    /// `count(*)`
    Wildcard,
    /// `f(a, b)`, `f()`, or (with `distinct`) `f(DISTINCT a)`
    List(Vec<Expr>),
}

/// `OVER (...)` window specification, either a named reference to a
/// `WINDOW` clause definition or an inline specification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindowSpec {
    Named(Ident),
    Inline(WindowDefinition),
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowDefinition {
    pub base_window_name: Option<Ident>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<crate::ast::query::OrderingTerm>,
    pub frame: Option<FrameSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameUnit {
    Range,
    Rows,
    Groups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameExclude {
    NoOthers,
    CurrentRow,
    Group,
    Ties,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameBoundary {
    UnboundedPreceding,
    Preceding(Box<Expr>),
    CurrentRow,
    Following(Box<Expr>),
    UnboundedFollowing,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameSpec {
    pub unit: FrameUnit,
    pub start: FrameBoundary,
    /// Absent when the short form (`ROWS <boundary>`, implying `AND CURRENT
    /// ROW`) was used.
    pub end: Option<FrameBoundary>,
    pub exclude: Option<FrameExclude>,
}

/// The closed set of expression shapes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExprKind {
    Literal(Literal),
    Identifier(Ident),
    QualifiedIdentifier(QualifiedName),
    /// `?`, `?1`, `:name`, `@name`, or `$name`, stored with its marker.
    Parameter(String),

    Unary {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    Between {
        negated: bool,
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    In {
        negated: bool,
        expr: Box<Expr>,
        source: InSource,
    },
    Like {
        negated: bool,
        op: LikeOperator,
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
    },
    Collate {
        expr: Box<Expr>,
        collation: Ident,
    },
    Cast {
        expr: Box<Expr>,
        type_name: TypeName,
    },
    FunctionCall {
        name: Ident,
        distinct: bool,
        args: FunctionArgs,
        filter: Option<Box<Expr>>,
        over: Option<WindowSpec>,
    },
    Case {
        operand: Option<Box<Expr>>,
        when_then: Vec<(Expr, Expr)>,
        else_expr: Option<Box<Expr>>,
    },
    Exists {
        negated: bool,
        subquery: Box<Select>,
    },
    Subquery(Box<Select>),
    /// A single parenthesized expression, e.g. `(1 + 2)`.
    Parenthesized(Box<Expr>),
    /// A row value, e.g. `(a, b, c)`, used in multi-column comparisons.
    RowValue(Vec<Expr>),
    Raise(RaiseExpr),
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Identifier(ident) => write!(f, "{ident}"),
            ExprKind::QualifiedIdentifier(name) => write!(f, "{name}"),
            ExprKind::Parameter(text) => write!(f, "{text}"),
            ExprKind::Unary { op, expr } => write!(f, "{op} {expr}"),
            ExprKind::Binary { left, op, right } => write!(f, "{left} {op} {right}"),
            ExprKind::Between {
                negated,
                expr,
                low,
                high,
            } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{expr} {not}BETWEEN {low} AND {high}")
            }
            ExprKind::In {
                negated,
                expr,
                source,
            } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{expr} {not}IN {source}")
            }
            ExprKind::Like {
                negated,
                op,
                expr,
                pattern,
                escape,
            } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{expr} {not}{op} {pattern}")?;
                if let Some(escape) = escape {
                    write!(f, " ESCAPE {escape}")?;
                }
                Ok(())
            }
            ExprKind::Collate { expr, collation } => write!(f, "{expr} COLLATE {collation}"),
            ExprKind::Cast { expr, type_name } => write!(f, "CAST({expr} AS {type_name})"),
            ExprKind::FunctionCall {
                name,
                distinct,
                args,
                ..
            } => {
                write!(f, "{name}(")?;
                if *distinct {
                    write!(f, "DISTINCT ")?;
                }
                match args {
                    FunctionArgs::Wildcard => write!(f, "*")?,
                    FunctionArgs::List(exprs) => {
                        let rendered: alloc::vec::Vec<String> =
                            exprs.iter().map(|e| alloc::format!("{e}")).collect();
                        write!(f, "{}", rendered.join(", "))?;
                    }
                }
                write!(f, ")")
            }
            ExprKind::Case {
                operand,
                when_then,
                else_expr,
            } => {
                write!(f, "CASE")?;
                if let Some(operand) = operand {
                    write!(f, " {operand}")?;
                }
                for (when, then) in when_then {
                    write!(f, " WHEN {when} THEN {then}")?;
                }
                if let Some(else_expr) = else_expr {
                    write!(f, " ELSE {else_expr}")?;
                }
                write!(f, " END")
            }
            ExprKind::Exists { negated, .. } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{not}EXISTS (...)")
            }
            ExprKind::Subquery(_) => write!(f, "(...)"),
            ExprKind::Parenthesized(expr) => write!(f, "({expr})"),
            ExprKind::RowValue(exprs) => {
                let rendered: alloc::vec::Vec<String> =
                    exprs.iter().map(|e| alloc::format!("{e}")).collect();
                write!(f, "({})", rendered.join(", "))
            }
            ExprKind::Raise(raise) => match raise {
                RaiseExpr::Ignore => write!(f, "RAISE(IGNORE)"),
                RaiseExpr::Rollback(msg) => write!(f, "RAISE(ROLLBACK, '{msg}')"),
                RaiseExpr::Abort(msg) => write!(f, "RAISE(ABORT, '{msg}')"),
                RaiseExpr::Fail(msg) => write!(f, "RAISE(FAIL, '{msg}')"),
            },
        }
    }
}

impl fmt::Display for InSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InSource::Subquery(_) => write!(f, "(...)"),
            InSource::List(exprs) => {
                let rendered: alloc::vec::Vec<String> =
                    exprs.iter().map(|e| alloc::format!("{e}")).collect();
                write!(f, "({})", rendered.join(", "))
            }
            InSource::Table(name) => write!(f, "{name}"),
        }
    }
}
