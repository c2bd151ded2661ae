//! Statement rendering in the generic dialect.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use crate::prelude::*;

fn users() -> Model {
    Model::new("users")
}

#[test]
fn test_select_all() {
    assert_eq!(select(&users()).to_sql().unwrap(), "SELECT * FROM users");
}

#[test]
fn test_select_with_fields() {
    let model = Model::with_fields("users", ["id", "name"]);
    assert_eq!(select(&model).to_sql().unwrap(), "SELECT id, name FROM users");
}

#[test]
fn test_select_where_clause() {
    let sql = select(&users()).where_clause("id = 1").to_sql().unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE id = 1");
}

#[test]
fn test_insert_values() {
    let sql = insert(&users())
        .values(vec![Value::from(1), Value::from("John")])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO users VALUES (1, 'John')");
}

#[test]
fn test_insert_multiple_rows_with_fields() {
    let model = Model::with_fields("users", ["id", "name"]);
    let sql = insert(&model)
        .values(vec![Value::from(1), "a".into()])
        .values(vec![Value::from(2), "b".into()])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO users (id, name) VALUES (1, 'a'), (2, 'b')");
}

#[test]
fn test_insert_arity_mismatch() {
    let model = Model::with_fields("users", ["id", "name"]);
    let err = insert(&model).values([1]).to_sql().unwrap_err();
    assert!(matches!(
        err,
        OrmError::ArityMismatch { row: 1, expected: 2, found: 1 }
    ));
}

#[test]
fn test_insert_without_values() {
    let err = insert(&users()).to_sql().unwrap_err();
    assert!(matches!(err, OrmError::MissingClause { clause: "VALUES", .. }));
}

#[test]
fn test_update_set() {
    let model = Model::with_fields("users", ["name"]);
    let sql = update(&model).set([("name", "John")]).to_sql().unwrap();
    assert_eq!(sql, "UPDATE users SET name = 'John'");
}

#[test]
fn test_update_where_attached_before_set() {
    let sql = update(&users())
        .where_clause("id = 1")
        .set([("id", 2)])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "UPDATE users SET id = 2 WHERE id = 1");
}

#[test]
fn test_update_without_set() {
    let err = update(&users()).where_clause("id = 1").to_sql().unwrap_err();
    assert_eq!(err.to_string(), "UPDATE statement is missing its SET clause");
}

#[test]
fn test_update_from_sorted_map() {
    let mut changes = BTreeMap::new();
    changes.insert("name", Value::from("Ann"));
    changes.insert("age", Value::from(30));
    changes.insert("deleted_at", Value::Null);
    let sql = update(&users()).set(changes).filter("id", Operator::Eq, 5).to_sql().unwrap();
    assert_eq!(
        sql,
        "UPDATE users SET age = 30, deleted_at = NULL, name = 'Ann' WHERE id = 5"
    );
}

#[test]
fn test_delete() {
    let sql = delete(&Model::new("sessions"))
        .where_clause("expired_at < now()")
        .to_sql()
        .unwrap();
    assert_eq!(sql, "DELETE FROM sessions WHERE expired_at < now()");
}

#[test]
fn test_delete_returning() {
    let sql = delete(&users())
        .filter("id", Operator::Eq, 1)
        .returning(["id"])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "DELETE FROM users WHERE id = 1 RETURNING id");
}

#[test]
fn test_where_groups_and_or() {
    let sql = select(&users())
        .where_clause("active = true")
        .where_clause("role = 'admin' OR role = 'mod'")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE active = true AND (role = 'admin' OR role = 'mod')"
    );
}

#[test]
fn test_typed_filters() {
    let sql = select(&users())
        .filter_all(vec![is_null("deleted_at"), gte("age", 18)])
        .or_filter(vec![eq("role", "admin"), like("email", "%@corp.io")])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE deleted_at IS NULL AND age >= 18 AND (role = 'admin' OR email LIKE '%@corp.io')"
    );
}

#[test]
fn test_in_lists() {
    let sql = select(&users())
        .filter_all(vec![is_in("id", [1, 2]), not_in("status", ["banned"])])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE id IN (1, 2) AND status NOT IN ('banned')");
}

#[test]
fn test_empty_in_list() {
    let sql = select(&users())
        .filter_all(vec![is_in("id", Vec::<i64>::new())])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE 1 = 0");
}

#[test]
fn test_empty_not_in_list() {
    let sql = select(&users())
        .filter_all(vec![not_in("id", Vec::<i64>::new()), eq("active", true)])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE 1 = 1 AND active = true");
}

#[test]
fn test_null_comparison_in_text_where() {
    let sql = delete(&users())
        .where_clause("verified_at = null AND email != NULL")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "DELETE FROM users WHERE verified_at IS NULL AND email IS NOT NULL"
    );
}

#[test]
fn test_non_finite_float_rejected_inline() {
    let err = update(&users())
        .set([("score", f64::INFINITY)])
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, OrmError::InvalidValue(_)));

    let err = select(&users())
        .filter("score", Operator::Gt, f64::NAN)
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, OrmError::InvalidValue(_)));
}

#[test]
fn test_join() {
    let posts = Model::with_fields("posts", ["posts.id", "users.name"]);
    let sql = select(&posts)
        .inner_join("users", "users.id", "posts.user_id")
        .filter("users.active", Operator::Eq, true)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT posts.id, users.name FROM posts INNER JOIN users ON users.id = posts.user_id WHERE users.active = true"
    );
}

#[test]
fn test_join_multiple_pairs() {
    let join = Join::new(JoinKind::Left, "memberships")
        .on("memberships.user_id", "users.id")
        .on("memberships.org_id", "users.org_id");
    let sql = select(&users()).join(join).to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM users LEFT JOIN memberships ON memberships.user_id = users.id AND memberships.org_id = users.org_id"
    );
}

#[test]
fn test_join_without_on() {
    let err = select(&users())
        .join(Join::new(JoinKind::Inner, "posts"))
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, OrmError::MissingClause { clause: "ON", .. }));
}

#[test]
fn test_order_limit_offset() {
    let sql = select(&users())
        .order_by("created_at", SortOrder::Desc)
        .order_by("id", SortOrder::Asc)
        .offset(20)
        .limit(10)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM users ORDER BY created_at DESC, id ASC LIMIT 10 OFFSET 20"
    );
}

#[test]
fn test_column_comparison() {
    let sql = select(&users())
        .filter("updated_at", Operator::Gt, column("created_at"))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE updated_at > created_at");
}

#[test]
fn test_timestamp_literal() {
    let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    let sql = delete(&Model::new("sessions"))
        .filter("expires_at", Operator::Lt, ts)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "DELETE FROM sessions WHERE expires_at < '2024-01-02 03:04:05'");
}

#[test]
fn test_clause_not_allowed() {
    let err = select(&users()).values([1]).to_sql().unwrap_err();
    assert_eq!(err.to_string(), "Clause VALUES is not valid in a SELECT statement");

    let err = insert(&users()).values([1]).where_clause("id = 1").to_sql().unwrap_err();
    assert!(matches!(err, OrmError::InvalidClause { clause: "WHERE", statement: "INSERT" }));

    let err = update(&users()).set([("a", 1)]).limit(1).to_sql().unwrap_err();
    assert!(matches!(err, OrmError::InvalidClause { clause: "LIMIT", .. }));
}

#[test]
fn test_invalid_identifier() {
    let err = select(&Model::new("users; DROP TABLE users")).to_sql().unwrap_err();
    assert!(matches!(err, OrmError::InvalidIdentifier(_)));
}

#[test]
fn test_where_parse_error_surfaces() {
    let err = select(&users()).where_clause("id = ").to_sql().unwrap_err();
    assert!(matches!(err, OrmError::Parse { .. }));
}

#[test]
fn test_string_values_are_escaped() {
    let sql = select(&users())
        .filter("name", Operator::Eq, "O'Brien")
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE name = 'O''Brien'");
}
