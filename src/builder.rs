//! Statement builders.
//!
//! ```
//! use blocksql::prelude::*;
//!
//! let users = Model::with_fields("users", ["id", "name"]);
//! let sql = select(&users)
//!     .where_clause("active = true")
//!     .order_by("name", SortOrder::Asc)
//!     .limit(10)
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(sql, "SELECT id, name FROM users WHERE active = true ORDER BY name ASC LIMIT 10");
//! ```

use crate::ast::*;
use crate::model::Model;

fn from_model(kind: StatementKind, model: &Model) -> Statement {
    Statement {
        kind,
        table: model.name.clone(),
        fields: model.fields.clone(),
        clauses: Vec::new(),
    }
}

/// `SELECT <fields|*> FROM <table>`
pub fn select(model: &Model) -> Statement {
    from_model(StatementKind::Select, model)
}

/// `INSERT INTO <table> [(<fields>)]`
pub fn insert(model: &Model) -> Statement {
    from_model(StatementKind::Insert, model)
}

/// `UPDATE <table>`; needs at least one [`Statement::set`] to render.
pub fn update(model: &Model) -> Statement {
    from_model(StatementKind::Update, model)
}

/// `DELETE FROM <table>`
pub fn delete(model: &Model) -> Statement {
    from_model(StatementKind::Delete, model)
}

impl Statement {
    fn push(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Add one row of values. Call again for multi-row inserts.
    pub fn values<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(Clause::Values(values.into_iter().map(Into::into).collect()))
    }

    /// Add column assignments, kept in iteration order.
    pub fn set<I, K, V>(self, assignments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.push(Clause::Set(
            assignments
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Add a textual predicate such as `"id = 1 AND role = 'admin'"`.
    ///
    /// The text is parsed when the statement is rendered; parse errors surface
    /// from `to_sql`/`compile`.
    pub fn where_clause(self, predicate: impl Into<String>) -> Self {
        self.push(Clause::Where(Predicate::Text(predicate.into())))
    }

    /// Add a single typed condition.
    pub fn filter(self, column: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        self.push(Clause::Where(Predicate::Typed(Filter::and(vec![
            Condition::new(column, op, value),
        ]))))
    }

    /// Add a group of conditions combined with `AND`.
    pub fn filter_all(self, conditions: Vec<Condition>) -> Self {
        self.push(Clause::Where(Predicate::Typed(Filter::and(conditions))))
    }

    /// Add a group of conditions combined with `OR`.
    pub fn or_filter(self, conditions: Vec<Condition>) -> Self {
        self.push(Clause::Where(Predicate::Typed(Filter::or(conditions))))
    }

    pub fn join(self, join: Join) -> Self {
        self.push(Clause::Join(join))
    }

    /// `INNER JOIN <table> ON <left> = <right>`
    pub fn inner_join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.join(Join::new(JoinKind::Inner, table).on(left, right))
    }

    /// `LEFT JOIN <table> ON <left> = <right>`
    pub fn left_join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.join(Join::new(JoinKind::Left, table).on(left, right))
    }

    pub fn order_by(self, column: impl Into<String>, order: SortOrder) -> Self {
        self.push(Clause::OrderBy(column.into(), order))
    }

    pub fn limit(self, n: u64) -> Self {
        self.push(Clause::Limit(n))
    }

    pub fn offset(self, n: u64) -> Self {
        self.push(Clause::Offset(n))
    }

    pub fn returning<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Clause::Returning(
            columns.into_iter().map(Into::into).collect(),
        ))
    }
}

/// Create an equality condition (column = value)
pub fn eq(column: &str, value: impl Into<Value>) -> Condition {
    Condition::new(column, Operator::Eq, value)
}

/// Create a not-equal condition (column != value)
pub fn ne(column: &str, value: impl Into<Value>) -> Condition {
    Condition::new(column, Operator::Ne, value)
}

pub fn gt(column: &str, value: impl Into<Value>) -> Condition {
    Condition::new(column, Operator::Gt, value)
}

pub fn gte(column: &str, value: impl Into<Value>) -> Condition {
    Condition::new(column, Operator::Gte, value)
}

pub fn lt(column: &str, value: impl Into<Value>) -> Condition {
    Condition::new(column, Operator::Lt, value)
}

pub fn lte(column: &str, value: impl Into<Value>) -> Condition {
    Condition::new(column, Operator::Lte, value)
}

pub fn like(column: &str, pattern: impl Into<Value>) -> Condition {
    Condition::new(column, Operator::Like, pattern)
}

/// Create an IN condition (column IN (values))
pub fn is_in<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Condition {
    let vals: Vec<Value> = values.into_iter().map(Into::into).collect();
    Condition::new(column, Operator::In, Value::List(vals))
}

/// Create a NOT IN condition (column NOT IN (values))
pub fn not_in<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Condition {
    let vals: Vec<Value> = values.into_iter().map(Into::into).collect();
    Condition::new(column, Operator::NotIn, Value::List(vals))
}

pub fn is_null(column: &str) -> Condition {
    Condition::new(column, Operator::IsNull, Value::Null)
}

pub fn is_not_null(column: &str) -> Condition {
    Condition::new(column, Operator::IsNotNull, Value::Null)
}

/// Reference another column as the right-hand side of a comparison.
pub fn column(name: &str) -> Value {
    Value::Column(name.to_string())
}

/// Emit a SQL fragment verbatim, e.g. `raw("now()")`.
pub fn raw(sql: &str) -> Value {
    Value::Raw(sql.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_copies_model() {
        let model = Model::with_fields("users", ["id", "name"]);
        let stmt = select(&model);
        assert_eq!(stmt.kind, StatementKind::Select);
        assert_eq!(stmt.table, "users");
        assert_eq!(stmt.fields, Some(vec!["id".to_string(), "name".to_string()]));
        assert!(stmt.clauses.is_empty());
    }

    #[test]
    fn test_clauses_kept_in_attach_order() {
        let model = Model::new("users");
        let stmt = update(&model)
            .where_clause("id = 1")
            .set([("id", 2)]);
        assert_eq!(stmt.clauses.len(), 2);
        assert_eq!(stmt.clauses[0].name(), "WHERE");
        assert_eq!(stmt.clauses[1], Clause::Set(vec![("id".to_string(), Value::Int(2))]));
    }

    #[test]
    fn test_values_converts_items() {
        let stmt = insert(&Model::new("users")).values(vec![Value::Int(1), "John".into()]);
        assert_eq!(
            stmt.clauses[0],
            Clause::Values(vec![Value::Int(1), Value::String("John".to_string())])
        );
    }

    #[test]
    fn test_inner_join_shorthand() {
        let stmt = select(&Model::new("posts")).inner_join("users", "users.id", "posts.user_id");
        match &stmt.clauses[0] {
            Clause::Join(join) => {
                assert_eq!(join.kind, JoinKind::Inner);
                assert_eq!(join.on, vec![("users.id".to_string(), "posts.user_id".to_string())]);
            }
            other => panic!("expected join, got {:?}", other),
        }
    }

    #[test]
    fn test_is_in_builds_list() {
        let cond = is_in("id", [1, 2, 3]);
        assert_eq!(cond.op, Operator::In);
        assert_eq!(cond.value, Value::List(vec![1.into(), 2.into(), 3.into()]));
    }
}
