use sqlite_ast::ast::{InsertSource, StatementKind, UpsertAction};
use sqlite_ast::parse_sql_strict;

#[test]
fn insert_default_values() {
    let statements = parse_sql_strict("INSERT INTO t DEFAULT VALUES;").unwrap();
    let StatementKind::Insert(insert) = &statements[0].kind else {
        panic!("expected an INSERT statement");
    };
    assert!(matches!(insert.source, InsertSource::DefaultValues));
}

#[test]
fn insert_or_replace_with_multiple_rows() {
    let statements =
        parse_sql_strict("INSERT OR REPLACE INTO t (a, b) VALUES (1, 2), (3, 4);").unwrap();
    let StatementKind::Insert(insert) = &statements[0].kind else {
        panic!("expected an INSERT statement");
    };
    let InsertSource::Values(rows) = &insert.source else {
        panic!("expected a VALUES source");
    };
    assert_eq!(rows.len(), 2);
}

#[test]
fn insert_do_nothing_on_conflict() {
    let statements =
        parse_sql_strict("INSERT INTO t (a) VALUES (1) ON CONFLICT DO NOTHING;").unwrap();
    let StatementKind::Insert(insert) = &statements[0].kind else {
        panic!("expected an INSERT statement");
    };
    assert_eq!(insert.upserts.len(), 1);
    assert!(matches!(insert.upserts[0].action, UpsertAction::DoNothing));
}

#[test]
fn update_with_from_and_returning() {
    let statements = parse_sql_strict(
        "UPDATE t SET a = b.a FROM b WHERE t.id = b.id RETURNING t.id;",
    )
    .unwrap();
    let StatementKind::Update(update) = &statements[0].kind else {
        panic!("expected an UPDATE statement");
    };
    assert!(update.from.is_some());
    assert_eq!(update.returning.len(), 1);
}

#[test]
fn delete_with_order_by_and_limit() {
    let statements = parse_sql_strict("DELETE FROM t WHERE a = 1 ORDER BY a LIMIT 10;").unwrap();
    let StatementKind::Delete(delete) = &statements[0].kind else {
        panic!("expected a DELETE statement");
    };
    assert_eq!(delete.order_by.len(), 1);
    assert!(delete.limit.is_some());
}
