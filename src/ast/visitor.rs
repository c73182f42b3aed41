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

//! A hand-written visitor over the AST, in place of a proc-macro-derived
//! one: this crate has no proc-macro dependency, so `Visit` impls are
//! written out per node type rather than generated.

use crate::ast::ddl::{
    AlterTableAction, ColumnConstraintKind, ColumnDef, CreateTableSource, DefaultValue,
};
use crate::ast::dml::{Insert, InsertSource, Update, UpsertAction};
use crate::ast::expr::{Expr, ExprKind, FunctionArgs, InSource};
use crate::ast::query::{FromClause, ResultColumn, Select, SelectCore, SetExpr, TableRef};
use crate::ast::stmt::{Statement, StatementKind};

/// Callbacks invoked as a `Visit` walk descends into and climbs back out of
/// each expression or statement. The default bodies are no-ops, so
/// implementors only override what they care about.
pub trait Visitor {
    fn pre_visit_expr(&mut self, _expr: &Expr) {}
    fn post_visit_expr(&mut self, _expr: &Expr) {}
    fn pre_visit_statement(&mut self, _stmt: &Statement) {}
    fn post_visit_statement(&mut self, _stmt: &Statement) {}
}

/// Implemented by every AST node that can walk itself and its children.
pub trait Visit {
    fn visit<V: Visitor>(&self, visitor: &mut V);
}

/// Walk a full program in source order.
pub fn walk_program<V: Visitor>(statements: &[Statement], visitor: &mut V) {
    for statement in statements {
        statement.visit(visitor);
    }
}

impl Visit for Expr {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        visitor.pre_visit_expr(self);
        match &self.kind {
            ExprKind::Literal(_)
            | ExprKind::Identifier(_)
            | ExprKind::QualifiedIdentifier(_)
            | ExprKind::Parameter(_)
            | ExprKind::Raise(_) => {}
            ExprKind::Unary { expr, .. } => expr.visit(visitor),
            ExprKind::Binary { left, right, .. } => {
                left.visit(visitor);
                right.visit(visitor);
            }
            ExprKind::Between {
                expr, low, high, ..
            } => {
                expr.visit(visitor);
                low.visit(visitor);
                high.visit(visitor);
            }
            ExprKind::In { expr, source, .. } => {
                expr.visit(visitor);
                match source {
                    InSource::Subquery(select) => select.visit(visitor),
                    InSource::List(exprs) => {
                        for e in exprs {
                            e.visit(visitor);
                        }
                    }
                    InSource::Table(_) => {}
                }
            }
            ExprKind::Like {
                expr,
                pattern,
                escape,
                ..
            } => {
                expr.visit(visitor);
                pattern.visit(visitor);
                if let Some(escape) = escape {
                    escape.visit(visitor);
                }
            }
            ExprKind::Collate { expr, .. } => expr.visit(visitor),
            ExprKind::Cast { expr, .. } => expr.visit(visitor),
            ExprKind::FunctionCall { args, filter, .. } => {
                if let FunctionArgs::List(exprs) = args {
                    for e in exprs {
                        e.visit(visitor);
                    }
                }
                if let Some(filter) = filter {
                    filter.visit(visitor);
                }
            }
            ExprKind::Case {
                operand,
                when_then,
                else_expr,
            } => {
                if let Some(operand) = operand {
                    operand.visit(visitor);
                }
                for (when, then) in when_then {
                    when.visit(visitor);
                    then.visit(visitor);
                }
                if let Some(else_expr) = else_expr {
                    else_expr.visit(visitor);
                }
            }
            ExprKind::Exists { subquery, .. } => subquery.visit(visitor),
            ExprKind::Subquery(select) => select.visit(visitor),
            ExprKind::Parenthesized(expr) => expr.visit(visitor),
            ExprKind::RowValue(exprs) => {
                for e in exprs {
                    e.visit(visitor);
                }
            }
        }
        visitor.post_visit_expr(self);
    }
}

impl Visit for Select {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        if let Some(with) = &self.with {
            for cte in &with.ctes {
                cte.select.visit(visitor);
            }
        }
        self.body.visit(visitor);
        for term in &self.order_by {
            term.expr.visit(visitor);
        }
        if let Some(limit) = &self.limit {
            limit.limit.visit(visitor);
            if let Some(offset) = &limit.offset {
                offset.visit(visitor);
            }
        }
    }
}

impl Visit for SetExpr {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        match self {
            SetExpr::Select(core) => core.visit(visitor),
            SetExpr::Compound { left, right, .. } => {
                left.visit(visitor);
                right.visit(visitor);
            }
        }
    }
}

impl Visit for SelectCore {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        for column in &self.columns {
            if let ResultColumn::Expr { expr, .. } = column {
                expr.visit(visitor);
            }
        }
        if let Some(from) = &self.from {
            from.visit(visitor);
        }
        if let Some(where_clause) = &self.where_clause {
            where_clause.visit(visitor);
        }
        for expr in &self.group_by {
            expr.visit(visitor);
        }
        if let Some(having) = &self.having {
            having.visit(visitor);
        }
    }
}

impl Visit for FromClause {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        self.first.visit(visitor);
        for join in &self.joins {
            join.table.visit(visitor);
            if let Some(crate::ast::query::JoinConstraint::On(expr)) = &join.constraint {
                expr.visit(visitor);
            }
        }
    }
}

impl Visit for TableRef {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        match self {
            TableRef::Table { .. } => {}
            TableRef::TableFunction { args, .. } => {
                for arg in args {
                    arg.visit(visitor);
                }
            }
            TableRef::Subquery { select, .. } => select.visit(visitor),
            TableRef::Nested(from) => from.visit(visitor),
        }
    }
}

impl Visit for Statement {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        visitor.pre_visit_statement(self);
        match &self.kind {
            StatementKind::Select(select) => select.visit(visitor),
            StatementKind::Insert(insert) => insert.visit(visitor),
            StatementKind::Update(update) => update.visit(visitor),
            StatementKind::Delete(delete) => {
                if let Some(where_clause) = &delete.where_clause {
                    where_clause.visit(visitor);
                }
                for term in &delete.order_by {
                    term.expr.visit(visitor);
                }
                if let Some(limit) = &delete.limit {
                    limit.limit.visit(visitor);
                    if let Some(offset) = &limit.offset {
                        offset.visit(visitor);
                    }
                }
                for column in &delete.returning {
                    if let ResultColumn::Expr { expr, .. } = column {
                        expr.visit(visitor);
                    }
                }
            }
            StatementKind::CreateTable(create) => {
                if let CreateTableSource::Columns { columns, .. } = &create.source {
                    for column in columns {
                        column.visit(visitor);
                    }
                } else if let CreateTableSource::As(select) = &create.source {
                    select.visit(visitor);
                }
            }
            StatementKind::CreateIndex(create) => {
                if let Some(where_clause) = &create.where_clause {
                    where_clause.visit(visitor);
                }
            }
            StatementKind::CreateView(create) => create.select.visit(visitor),
            StatementKind::CreateTrigger(create) => {
                if let Some(when) = &create.when {
                    when.visit(visitor);
                }
                for stmt in &create.body {
                    stmt.visit(visitor);
                }
            }
            StatementKind::CreateVirtualTable(_) => {}
            StatementKind::AlterTable(alter) => {
                if let AlterTableAction::AddColumn(column) = &alter.action {
                    column.visit(visitor);
                }
            }
            StatementKind::Explain(explain) => explain.statement.visit(visitor),
            StatementKind::Pragma(pragma) => {
                if let Some(crate::ast::stmt::PragmaValue::Expr(expr)) = &pragma.value {
                    expr.visit(visitor);
                }
            }
            StatementKind::Attach(attach) => attach.expr.visit(visitor),
            StatementKind::Vacuum(vacuum) => {
                if let Some(into) = &vacuum.into {
                    into.visit(visitor);
                }
            }
            StatementKind::DropTable(_)
            | StatementKind::DropIndex(_)
            | StatementKind::DropView(_)
            | StatementKind::DropTrigger(_)
            | StatementKind::Begin(_)
            | StatementKind::Commit
            | StatementKind::Rollback(_)
            | StatementKind::Savepoint(_)
            | StatementKind::Release(_)
            | StatementKind::Detach(_)
            | StatementKind::Analyze(_)
            | StatementKind::Reindex(_) => {}
        }
        visitor.post_visit_statement(self);
    }
}

impl Visit for ColumnDef {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        for constraint in &self.constraints {
            match &constraint.kind {
                ColumnConstraintKind::Check(expr) => expr.visit(visitor),
                ColumnConstraintKind::Default(DefaultValue::Expr(expr)) => expr.visit(visitor),
                ColumnConstraintKind::Generated { expr, .. } => expr.visit(visitor),
                _ => {}
            }
        }
    }
}

impl Visit for Insert {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        if let Some(with) = &self.with {
            for cte in &with.ctes {
                cte.select.visit(visitor);
            }
        }
        match &self.source {
            InsertSource::Values(rows) => {
                for row in rows {
                    for expr in row {
                        expr.visit(visitor);
                    }
                }
            }
            InsertSource::Select(select) => select.visit(visitor),
            InsertSource::DefaultValues => {}
        }
        for upsert in &self.upserts {
            if let UpsertAction::DoUpdate {
                assignments,
                where_clause,
            } = &upsert.action
            {
                for assignment in assignments {
                    assignment.value.visit(visitor);
                }
                if let Some(where_clause) = where_clause {
                    where_clause.visit(visitor);
                }
            }
        }
        for column in &self.returning {
            if let ResultColumn::Expr { expr, .. } = column {
                expr.visit(visitor);
            }
        }
    }
}

impl Visit for Update {
    fn visit<V: Visitor>(&self, visitor: &mut V) {
        if let Some(with) = &self.with {
            for cte in &with.ctes {
                cte.select.visit(visitor);
            }
        }
        for assignment in &self.assignments {
            assignment.value.visit(visitor);
        }
        if let Some(from) = &self.from {
            from.visit(visitor);
        }
        if let Some(where_clause) = &self.where_clause {
            where_clause.visit(visitor);
        }
        for term in &self.order_by {
            term.expr.visit(visitor);
        }
        if let Some(limit) = &self.limit {
            limit.limit.visit(visitor);
            if let Some(offset) = &limit.offset {
                offset.visit(visitor);
            }
        }
        for column in &self.returning {
            if let ResultColumn::Expr { expr, .. } = column {
                expr.visit(visitor);
            }
        }
    }
}
