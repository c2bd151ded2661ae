//! Dialect-specific rendering (Postgres, MySQL, SQLite).

use pretty_assertions::assert_eq;

use crate::prelude::*;

fn users() -> Model {
    Model::with_fields("users", ["id", "name"])
}

#[test]
fn test_postgres_dialect() {
    let sql = select(&users())
        .where_clause("active = true")
        .to_sql_with_dialect(Dialect::Postgres)
        .unwrap();
    assert_eq!(
        sql,
        "SELECT \"id\", \"name\" FROM \"users\" WHERE \"active\" = true"
    );
}

#[test]
fn test_postgres_insert_returning() {
    let sql = insert(&Model::with_fields("users", ["name"]))
        .values(["x"])
        .returning(["id"])
        .to_sql_with_dialect(Dialect::Postgres)
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO \"users\" (\"name\") VALUES ('x') RETURNING \"id\""
    );
}

#[test]
fn test_mysql_dialect() {
    let sql = select(&Model::new("users"))
        .where_clause("active = true")
        .limit(5)
        .to_sql_with_dialect(Dialect::MySQL)
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `users` WHERE `active` = 1 LIMIT 5");
}

#[test]
fn test_mysql_offset_without_limit() {
    let sql = select(&Model::new("users"))
        .offset(10)
        .to_sql_with_dialect(Dialect::MySQL)
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `users` LIMIT 18446744073709551615 OFFSET 10"
    );
}

#[test]
fn test_mysql_rejects_returning() {
    let err = delete(&Model::new("users"))
        .returning(Vec::<String>::new())
        .to_sql_with_dialect(Dialect::MySQL)
        .unwrap_err();
    assert_eq!(err.to_string(), "RETURNING is not supported by mysql");
}

#[test]
fn test_mysql_rejects_full_join() {
    let err = select(&Model::new("a"))
        .join(Join::new(JoinKind::Full, "b").on("a.id", "b.a_id"))
        .to_sql_with_dialect(Dialect::MySQL)
        .unwrap_err();
    assert!(matches!(err, OrmError::Unsupported { feature: "FULL JOIN", .. }));
}

#[test]
fn test_mysql_string_backslash() {
    let sql = select(&Model::new("files"))
        .filter("path", Operator::Eq, "C:\\tmp")
        .to_sql_with_dialect(Dialect::MySQL)
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `files` WHERE `path` = 'C:\\\\tmp'");
}

#[test]
fn test_sqlite_dialect() {
    let sql = update(&Model::new("users"))
        .set([("verified", true)])
        .where_clause("id = 3")
        .to_sql_with_dialect(Dialect::SQLite)
        .unwrap();
    assert_eq!(sql, "UPDATE \"users\" SET \"verified\" = 1 WHERE \"id\" = 3");
}

#[test]
fn test_sqlite_offset_without_limit() {
    let sql = select(&Model::new("users"))
        .offset(10)
        .to_sql_with_dialect(Dialect::SQLite)
        .unwrap();
    assert_eq!(sql, "SELECT * FROM \"users\" LIMIT -1 OFFSET 10");
}

#[test]
fn test_qualified_join_quoting() {
    let sql = select(&Model::new("posts"))
        .left_join("users", "users.id", "posts.user_id")
        .to_sql_with_dialect(Dialect::Postgres)
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"posts\" LEFT JOIN \"users\" ON \"users\".\"id\" = \"posts\".\"user_id\""
    );
}
