//! Statement AST.
//!
//! A [`Statement`] is a statement kind, a target table and the clauses the
//! caller attached, in attachment order. Rendering (see `transpiler`) puts the
//! clauses back into SQL order, so builders may be chained in any sequence.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The kind of SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// The SQL keyword, used in error messages.
    pub fn keyword(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A value in a condition, assignment or inserted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// Timestamp without zone, rendered as an ISO-8601 string literal
    Timestamp(NaiveDateTime),
    /// Explicit parameter reference ($1, $2, etc.)
    Param(usize),
    /// Column reference (e.g. `a.id = b.owner_id`)
    Column(String),
    /// SQL fragment emitted verbatim (e.g. `now()`)
    Raw(String),
    /// List of values, for IN / NOT IN
    List(Vec<Value>),
}

impl Value {
    /// Whether this value is a literal that can travel as a bound parameter.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Bool(_)
                | Value::Int(_)
                | Value::Float(_)
                | Value::String(_)
                | Value::Timestamp(_)
        )
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Timestamp(ts) => write!(f, "'{}'", ts.format(TIMESTAMP_FORMAT)),
            Value::Param(n) => write!(f, "${}", n),
            Value::Column(s) => write!(f, "{}", s),
            Value::Raw(s) => write!(f, "{}", s),
            Value::List(values) => {
                write!(f, "(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Format used for timestamp literals and bound timestamp parameters.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// Unary operators take no right-hand value.
    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}

/// How the conditions of one filter group are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

/// A single comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub op: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.op.is_unary() {
            write!(f, "{} {}", self.column, self.op.as_sql())
        } else {
            write!(f, "{} {} {}", self.column, self.op.as_sql(), self.value)
        }
    }
}

/// A group of conditions joined by one logical operator.
///
/// Groups attached to the same statement are joined with `AND`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filter {
    pub conditions: Vec<Condition>,
    pub logical_op: LogicalOp,
}

impl Filter {
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            logical_op: LogicalOp::And,
        }
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            logical_op: LogicalOp::Or,
        }
    }
}

/// A WHERE predicate, either as text parsed at render time or already typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Text(String),
    Typed(Filter),
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }
}

/// A join definition. `on` pairs are equated and combined with `AND`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub on: Vec<(String, String)>,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            on: Vec::new(),
        }
    }

    /// Add an `left = right` pair to the ON clause.
    pub fn on(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.on.push((left.into(), right.into()));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One clause attached to a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clause {
    /// One row of inserted values
    Values(Vec<Value>),
    /// Column assignments for UPDATE
    Set(Vec<(String, Value)>),
    Where(Predicate),
    Join(Join),
    OrderBy(String, SortOrder),
    Limit(u64),
    Offset(u64),
    Returning(Vec<String>),
}

impl Clause {
    /// SQL name of the clause, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Clause::Values(_) => "VALUES",
            Clause::Set(_) => "SET",
            Clause::Where(_) => "WHERE",
            Clause::Join(_) => "JOIN",
            Clause::OrderBy(..) => "ORDER BY",
            Clause::Limit(_) => "LIMIT",
            Clause::Offset(_) => "OFFSET",
            Clause::Returning(_) => "RETURNING",
        }
    }

    /// Whether this clause may appear in a statement of the given kind.
    pub fn allowed_in(&self, kind: StatementKind) -> bool {
        use StatementKind::*;
        match self {
            Clause::Values(_) => kind == Insert,
            Clause::Set(_) => kind == Update,
            Clause::Where(_) => kind != Insert,
            Clause::Join(_) | Clause::OrderBy(..) | Clause::Limit(_) | Clause::Offset(_) => {
                kind == Select
            }
            Clause::Returning(_) => kind != Select,
        }
    }
}

/// A statement under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub table: String,
    /// Column list from the model; `None` means all columns.
    pub fields: Option<Vec<String>>,
    #[serde(default)]
    pub clauses: Vec<Clause>,
}

impl Statement {
    pub fn new(kind: StatementKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            fields: None,
            clauses: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_option() {
        let some: Value = Some(3i64).into();
        let none: Value = Option::<i64>::None.into();
        assert_eq!(some, Value::Int(3));
        assert_eq!(none, Value::Null);
    }

    #[test]
    fn test_value_display() {
        let list = Value::List(vec![1.into(), "a".into()]);
        assert_eq!(list.to_string(), "(1, 'a')");
        assert_eq!(Value::Param(2).to_string(), "$2");
    }

    #[test]
    fn test_clause_placement() {
        assert!(Clause::Values(vec![]).allowed_in(StatementKind::Insert));
        assert!(!Clause::Values(vec![]).allowed_in(StatementKind::Select));
        assert!(!Clause::Where(Predicate::Text("id = 1".into())).allowed_in(StatementKind::Insert));
        assert!(Clause::Returning(vec![]).allowed_in(StatementKind::Delete));
        assert!(!Clause::Limit(1).allowed_in(StatementKind::Update));
    }

    #[test]
    fn test_condition_display() {
        let cond = Condition::new("deleted_at", Operator::IsNull, Value::Null);
        assert_eq!(cond.to_string(), "deleted_at IS NULL");
    }
}
