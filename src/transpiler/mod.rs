//! SQL Transpiler for blocksql statements.
//!
//! Converts a [`Statement`] into SQL text for a [`Dialect`], either with
//! literals spelled inline ([`ToSql`]) or with literals lifted out into an
//! ordered parameter list ([`Statement::compile`]).

pub mod conditions;
pub mod dml;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::ast::*;
use crate::dialect::Dialect;
use crate::error::OrmResult;
pub use conditions::ParamContext;

/// Trait for converting statements to SQL.
pub trait ToSql {
    /// Convert to a SQL string using the default (generic) dialect.
    fn to_sql(&self) -> OrmResult<String> {
        self.to_sql_with_dialect(Dialect::default())
    }
    /// Convert to a SQL string for a specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> OrmResult<String>;
}

impl ToSql for Statement {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> OrmResult<String> {
        let generator = dialect.generator();
        let mut params = ParamContext::inline();
        dml::build_statement(self, generator.as_ref(), &mut params)
    }
}

/// SQL text plus the values for its placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// Render with every literal replaced by a placeholder.
    ///
    /// ```
    /// use blocksql::prelude::*;
    ///
    /// let q = select(&Model::new("users"))
    ///     .filter("id", Operator::Eq, 7)
    ///     .compile(Dialect::Postgres)
    ///     .unwrap();
    /// assert_eq!(q.sql, "SELECT * FROM \"users\" WHERE \"id\" = $1");
    /// assert_eq!(q.params, vec![Value::Int(7)]);
    /// ```
    pub fn compile(&self, dialect: Dialect) -> OrmResult<CompiledQuery> {
        let generator = dialect.generator();
        let mut params = ParamContext::parameterized();
        let sql = dml::build_statement(self, generator.as_ref(), &mut params)?;

        tracing::debug!(
            "compiled {} on {} for {} ({} params)",
            self.kind,
            self.table,
            dialect,
            params.params.len()
        );

        Ok(CompiledQuery {
            sql,
            params: params.params,
        })
    }
}
