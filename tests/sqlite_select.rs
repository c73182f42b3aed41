use sqlite_ast::ast::{ExprKind, ResultColumn, SetExpr, StatementKind};
use sqlite_ast::parse_sql_strict;

#[test]
fn select_with_join_and_group_by() {
    let statements = parse_sql_strict(
        "SELECT a.id, COUNT(*) FROM a JOIN b ON a.id = b.a_id \
         GROUP BY a.id HAVING COUNT(*) > 1 ORDER BY a.id DESC;",
    )
    .unwrap();
    let StatementKind::Select(select) = &statements[0].kind else {
        panic!("expected a SELECT statement");
    };
    let SetExpr::Select(core) = &select.body else {
        panic!("expected a simple select core");
    };
    assert_eq!(core.columns.len(), 2);
    assert_eq!(core.from.as_ref().unwrap().joins.len(), 1);
    assert!(core.having.is_some());
    assert_eq!(select.order_by.len(), 1);
}

#[test]
fn select_with_common_table_expression() {
    let statements = parse_sql_strict(
        "WITH RECURSIVE counting(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM counting WHERE n < 5) \
         SELECT n FROM counting;",
    )
    .unwrap();
    let StatementKind::Select(select) = &statements[0].kind else {
        panic!("expected a SELECT statement");
    };
    let with = select.with.as_ref().expect("WITH clause");
    assert!(with.recursive);
    assert_eq!(with.ctes.len(), 1);
    assert_eq!(with.ctes[0].name.value, "counting");
}

#[test]
fn select_wildcard_and_qualified_wildcard() {
    let statements = parse_sql_strict("SELECT *, t.* FROM t;").unwrap();
    let StatementKind::Select(select) = &statements[0].kind else {
        panic!("expected a SELECT statement");
    };
    let SetExpr::Select(core) = &select.body else {
        panic!("expected a simple select core");
    };
    assert!(matches!(core.columns[0], ResultColumn::Wildcard));
    assert!(matches!(core.columns[1], ResultColumn::QualifiedWildcard(_)));
}

#[test]
fn case_expression_with_operand() {
    let statements = parse_sql_strict(
        "SELECT CASE a WHEN 1 THEN 'one' WHEN 2 THEN 'two' ELSE 'other' END FROM t;",
    )
    .unwrap();
    let StatementKind::Select(select) = &statements[0].kind else {
        panic!("expected a SELECT statement");
    };
    let SetExpr::Select(core) = &select.body else {
        panic!("expected a simple select core");
    };
    let ResultColumn::Expr { expr, .. } = &core.columns[0] else {
        panic!("expected a single expression column");
    };
    let ExprKind::Case { operand, when_then, else_expr } = &expr.kind else {
        panic!("expected a CASE expression");
    };
    assert!(operand.is_some());
    assert_eq!(when_then.len(), 2);
    assert!(else_expr.is_some());
}
