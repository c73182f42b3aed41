use sqlite_ast::ast::{
    AlterTableAction, CreateTableSource, StatementKind, TableConstraintKind, TriggerEvent,
};
use sqlite_ast::parse_sql_strict;

#[test]
fn create_table_with_table_level_constraints() {
    let statements = parse_sql_strict(
        "CREATE TABLE t (a INTEGER, b INTEGER, PRIMARY KEY (a, b), \
         FOREIGN KEY (a) REFERENCES other(id)) WITHOUT ROWID;",
    )
    .unwrap();
    let StatementKind::CreateTable(create) = &statements[0].kind else {
        panic!("expected a CREATE TABLE statement");
    };
    assert!(create.without_rowid);
    let CreateTableSource::Columns { columns, constraints } = &create.source else {
        panic!("expected a column list");
    };
    assert_eq!(columns.len(), 2);
    assert_eq!(constraints.len(), 2);
    assert!(matches!(constraints[0].kind, TableConstraintKind::PrimaryKey { .. }));
}

#[test]
fn create_table_as_select() {
    let statements = parse_sql_strict("CREATE TEMP TABLE t AS SELECT 1 AS a;").unwrap();
    let StatementKind::CreateTable(create) = &statements[0].kind else {
        panic!("expected a CREATE TABLE statement");
    };
    assert!(create.temporary);
    assert!(matches!(create.source, CreateTableSource::As(_)));
}

#[test]
fn create_unique_index_with_where_clause() {
    let statements =
        parse_sql_strict("CREATE UNIQUE INDEX idx ON t (a, b DESC) WHERE a IS NOT NULL;").unwrap();
    let StatementKind::CreateIndex(create) = &statements[0].kind else {
        panic!("expected a CREATE INDEX statement");
    };
    assert!(create.unique);
    assert_eq!(create.columns.len(), 2);
    assert!(create.where_clause.is_some());
}

#[test]
fn create_trigger_update_of_columns() {
    let statements = parse_sql_strict(
        "CREATE TRIGGER trg AFTER UPDATE OF a, b ON t FOR EACH ROW BEGIN SELECT 1; END;",
    )
    .unwrap();
    let StatementKind::CreateTrigger(create) = &statements[0].kind else {
        panic!("expected a CREATE TRIGGER statement");
    };
    assert!(create.for_each_row);
    let TriggerEvent::Update(columns) = &create.event else {
        panic!("expected an UPDATE OF event");
    };
    assert_eq!(columns.len(), 2);
}

#[test]
fn create_virtual_table_captures_module_args() {
    let statements =
        parse_sql_strict("CREATE VIRTUAL TABLE t USING fts5(content, tokenize=ascii);").unwrap();
    let StatementKind::CreateVirtualTable(create) = &statements[0].kind else {
        panic!("expected a CREATE VIRTUAL TABLE statement");
    };
    assert_eq!(create.module_name.value, "fts5");
    assert_eq!(create.module_args.len(), 3);
}

#[test]
fn alter_table_rename_column() {
    let statements = parse_sql_strict("ALTER TABLE t RENAME COLUMN a TO b;").unwrap();
    let StatementKind::AlterTable(alter) = &statements[0].kind else {
        panic!("expected an ALTER TABLE statement");
    };
    assert!(matches!(alter.action, AlterTableAction::RenameColumn { .. }));
}

#[test]
fn drop_table_if_exists() {
    let statements = parse_sql_strict("DROP TABLE IF EXISTS t;").unwrap();
    let StatementKind::DropTable(drop) = &statements[0].kind else {
        panic!("expected a DROP TABLE statement");
    };
    assert!(drop.if_exists);
}
