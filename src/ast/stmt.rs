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

//! The top-level `Statement` closed sum, and the handful of statement
//! kinds (transaction control, `PRAGMA`, utility statements) that don't
//! belong to the query/DML/DDL families.

use alloc::boxed::Box;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::ddl::{
    AlterTableStatement, CreateIndexStatement, CreateTableStatement, CreateTriggerStatement,
    CreateViewStatement, CreateVirtualTableStatement, DropIndexStatement, DropTableStatement,
    DropTriggerStatement, DropViewStatement,
};
use crate::ast::dml::{Delete, Insert, Update};
use crate::ast::expr::Expr;
use crate::ast::query::Select;
use crate::ast::{Ident, QualifiedName};
use crate::position::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransactionType {
    Deferred,
    Immediate,
    Exclusive,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeginStatement {
    pub transaction_type: Option<TransactionType>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttachStatement {
    pub expr: Expr,
    pub schema_name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VacuumStatement {
    pub schema_name: Option<Ident>,
    pub into: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExplainStatement {
    pub query_plan: bool,
    pub statement: Box<Statement>,
}

/// The value on the right-hand side of `PRAGMA name = value` or
/// `PRAGMA name(value)`.
///
/// SQLite is deliberately lenient here: a pragma value can be a number, a
/// bare keyword-shaped word (e.g. `PRAGMA journal_mode = WAL`), a quoted
/// string, or a signed number — anything with textual content is accepted
/// syntactically and it's up to the pragma's own semantics to reject it.
/// `Keyword` covers identifiers/keywords/strings alike by keeping the raw
/// text; only a parenthesized/operator-bearing value falls through to a
/// full expression parse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PragmaValue {
    Number(alloc::string::String),
    Keyword(alloc::string::String),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PragmaStatement {
    pub name: QualifiedName,
    pub value: Option<PragmaValue>,
}

/// The closed set of statement shapes this crate parses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatementKind {
    Select(Box<Select>),
    Insert(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),

    CreateTable(Box<CreateTableStatement>),
    CreateIndex(Box<CreateIndexStatement>),
    CreateView(Box<CreateViewStatement>),
    CreateTrigger(Box<CreateTriggerStatement>),
    CreateVirtualTable(Box<CreateVirtualTableStatement>),
    AlterTable(Box<AlterTableStatement>),
    DropTable(DropTableStatement),
    DropIndex(DropIndexStatement),
    DropView(DropViewStatement),
    DropTrigger(DropTriggerStatement),

    Begin(BeginStatement),
    Commit,
    /// `ROLLBACK [TO [SAVEPOINT] name]`.
    Rollback(Option<Ident>),
    Savepoint(Ident),
    Release(Ident),
    Attach(AttachStatement),
    Detach(Ident),
    Analyze(Option<QualifiedName>),
    Vacuum(VacuumStatement),
    Reindex(Option<QualifiedName>),
    Explain(ExplainStatement),
    Pragma(PragmaStatement),
}

/// A statement, annotated with the full source span it was parsed from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Statement { kind, span }
    }
}
