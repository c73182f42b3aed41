use sqlite_ast::ast::{PragmaValue, StatementKind, TransactionType};
use sqlite_ast::parse_sql_strict;

#[test]
fn begin_immediate_and_commit() {
    let statements = parse_sql_strict("BEGIN IMMEDIATE TRANSACTION; COMMIT;").unwrap();
    assert_eq!(statements.len(), 2);
    let StatementKind::Begin(begin) = &statements[0].kind else {
        panic!("expected a BEGIN statement");
    };
    assert_eq!(begin.transaction_type, Some(TransactionType::Immediate));
    assert!(matches!(statements[1].kind, StatementKind::Commit));
}

#[test]
fn savepoint_and_release() {
    let statements = parse_sql_strict("SAVEPOINT sp1; RELEASE sp1;").unwrap();
    assert!(matches!(statements[0].kind, StatementKind::Savepoint(_)));
    assert!(matches!(statements[1].kind, StatementKind::Release(_)));
}

#[test]
fn rollback_to_savepoint() {
    let statements = parse_sql_strict("ROLLBACK TO SAVEPOINT sp1;").unwrap();
    let StatementKind::Rollback(Some(name)) = &statements[0].kind else {
        panic!("expected a ROLLBACK TO statement");
    };
    assert_eq!(name.value, "sp1");
}

#[test]
fn attach_and_detach_database() {
    let statements =
        parse_sql_strict("ATTACH DATABASE 'other.db' AS other; DETACH other;").unwrap();
    assert!(matches!(statements[0].kind, StatementKind::Attach(_)));
    assert!(matches!(statements[1].kind, StatementKind::Detach(_)));
}

#[test]
fn explain_query_plan_wraps_a_statement() {
    let statements = parse_sql_strict("EXPLAIN QUERY PLAN SELECT 1;").unwrap();
    let StatementKind::Explain(explain) = &statements[0].kind else {
        panic!("expected an EXPLAIN statement");
    };
    assert!(explain.query_plan);
    assert!(matches!(explain.statement.kind, StatementKind::Select(_)));
}

#[test]
fn pragma_with_parenthesized_value() {
    let statements = parse_sql_strict("PRAGMA table_info(t);").unwrap();
    let StatementKind::Pragma(pragma) = &statements[0].kind else {
        panic!("expected a PRAGMA statement");
    };
    assert!(matches!(pragma.value, Some(PragmaValue::Keyword(_))));
}

#[test]
fn vacuum_into_file() {
    let statements = parse_sql_strict("VACUUM INTO 'backup.db';").unwrap();
    let StatementKind::Vacuum(vacuum) = &statements[0].kind else {
        panic!("expected a VACUUM statement");
    };
    assert!(vacuum.into.is_some());
}
