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

//! `INSERT`, `UPDATE`, and `DELETE`, including `ON CONFLICT` upserts and
//! `RETURNING`.

use alloc::boxed::Box;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::ddl::{ConflictResolution, IndexedColumn};
use crate::ast::expr::Expr;
use crate::ast::query::{FromClause, Limit, OrderingTerm, ResultColumn, Select, With};
use crate::ast::{Ident, QualifiedName};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    /// More than one column covers the `(a, b) = (x, y)` form.
    pub columns: Vec<Ident>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),
    Select(Box<Select>),
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConflictTarget {
    pub columns: Vec<IndexedColumn>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpsertAction {
    DoNothing,
    DoUpdate {
        assignments: Vec<Assignment>,
        where_clause: Option<Expr>,
    },
}

/// One `ON CONFLICT (...) DO ...` clause. `INSERT` allows more than one of
/// these in sequence (each with a distinct conflict target), so `Insert`
/// holds a `Vec<UpsertClause>` rather than a single optional clause.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UpsertClause {
    pub target: Option<ConflictTarget>,
    pub action: UpsertAction,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Insert {
    pub with: Option<With>,
    /// `None` for a plain `INSERT`; `Some(Replace)` also covers the bare
    /// `REPLACE INTO` spelling, which SQLite treats as a synonym.
    pub or_conflict: Option<ConflictResolution>,
    pub table: QualifiedName,
    pub alias: Option<Ident>,
    pub columns: Vec<Ident>,
    pub source: InsertSource,
    pub upserts: Vec<UpsertClause>,
    pub returning: Vec<ResultColumn>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Update {
    pub with: Option<With>,
    pub or_conflict: Option<ConflictResolution>,
    pub table: QualifiedName,
    pub alias: Option<Ident>,
    pub indexed_by: Option<Ident>,
    pub not_indexed: bool,
    pub assignments: Vec<Assignment>,
    pub from: Option<FromClause>,
    pub where_clause: Option<Expr>,
    /// `ORDER BY`/`LIMIT` on `UPDATE` are a SQLite extension, only valid
    /// when the library is built with `SQLITE_ENABLE_UPDATE_DELETE_LIMIT`;
    /// this crate parses them unconditionally rather than gating on a
    /// build-time feature it has no way to observe.
    pub order_by: Vec<OrderingTerm>,
    pub limit: Option<Limit>,
    pub returning: Vec<ResultColumn>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Delete {
    pub with: Option<With>,
    pub table: QualifiedName,
    pub alias: Option<Ident>,
    pub indexed_by: Option<Ident>,
    pub not_indexed: bool,
    pub where_clause: Option<Expr>,
    pub order_by: Vec<OrderingTerm>,
    pub limit: Option<Limit>,
    pub returning: Vec<ResultColumn>,
}
