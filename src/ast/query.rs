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

//! `SELECT` and its clauses: FROM/JOIN, WHERE, GROUP BY, WINDOW, ORDER BY,
//! LIMIT, and common table expressions.

use alloc::boxed::Box;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::expr::{Expr, WindowDefinition};
use crate::ast::{Ident, QualifiedName};
use crate::position::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Distinct {
    All,
    Distinct,
}

/// A `SELECT` statement's query body: a single `SELECT` core, or a chain of
/// cores joined by `UNION` / `UNION ALL` / `INTERSECT` / `EXCEPT`.
///
/// Modeled as a left-leaning binary tree rather than a flat
/// `Vec<(CompoundOperator, SelectCore)>` so compound-select associativity
/// (left-to-right) falls directly out of how the parser builds it, instead
/// of needing a side note about evaluation order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SetExpr {
    Select(Box<SelectCore>),
    Compound {
        left: Box<SetExpr>,
        op: CompoundOperator,
        right: Box<SelectCore>,
        span: Span,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompoundOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Select {
    pub with: Option<With>,
    pub body: SetExpr,
    pub order_by: Vec<OrderingTerm>,
    pub limit: Option<Limit>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectCore {
    pub distinct: Distinct,
    pub columns: Vec<ResultColumn>,
    pub from: Option<FromClause>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub windows: Vec<NamedWindowDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResultColumn {
    /// `*`
    Wildcard,
    /// `table.*`
    QualifiedWildcard(QualifiedName),
    Expr { expr: Expr, alias: Option<Ident> },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedWindowDefinition {
    pub name: Ident,
    pub definition: WindowDefinition,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FromClause {
    pub first: TableRef,
    pub joins: Vec<JoinClause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JoinOperator {
    /// Plain comma join: `FROM a, b`.
    Comma,
    Cross,
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JoinConstraint {
    On(Expr),
    Using(Vec<Ident>),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JoinClause {
    pub natural: bool,
    /// `true` for `LEFT OUTER JOIN` / `RIGHT OUTER JOIN` / `FULL OUTER JOIN`.
    pub outer: bool,
    pub operator: JoinOperator,
    pub table: TableRef,
    pub constraint: Option<JoinConstraint>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TableRef {
    Table {
        name: QualifiedName,
        alias: Option<Ident>,
        indexed_by: Option<Ident>,
        not_indexed: bool,
    },
    TableFunction {
        name: QualifiedName,
        args: Vec<Expr>,
        alias: Option<Ident>,
    },
    Subquery {
        select: Box<Select>,
        alias: Option<Ident>,
    },
    /// A parenthesized join tree used to group joins explicitly, e.g.
    /// `FROM a JOIN (b JOIN c ON ...) ON ...`.
    Nested(Box<FromClause>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderingTerm {
    pub expr: Expr,
    pub collate: Option<Ident>,
    pub direction: Option<OrderDirection>,
    pub nulls: Option<NullsOrder>,
}

/// `LIMIT <limit> [OFFSET <offset>]`, or the SQLite-specific comma form
/// `LIMIT <offset>, <limit>` (note the swapped argument order relative to
/// the keyword form).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Limit {
    pub limit: Expr,
    pub offset: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cte {
    pub name: Ident,
    pub columns: Vec<Ident>,
    pub materialized: Option<bool>,
    pub select: Box<Select>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct With {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
}
