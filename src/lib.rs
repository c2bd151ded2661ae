//! # blocksql
//!
//! Build SQL statements from Rust data, render them for the database you
//! talk to, and map the rows that come back.
//!
//! ## Quick Example
//!
//! ```rust
//! use blocksql::prelude::*;
//!
//! let users = Model::with_fields("users", ["id", "email"]);
//!
//! let sql = select(&users)
//!     .where_clause("active = true")
//!     .limit(10)
//!     .to_sql()?;
//! assert_eq!(sql, "SELECT id, email FROM users WHERE active = true LIMIT 10");
//!
//! let query = update(&users)
//!     .set([("email", "ann@example.com")])
//!     .filter("id", Operator::Eq, 7)
//!     .compile(Dialect::Postgres)?;
//! assert_eq!(query.sql, "UPDATE \"users\" SET \"email\" = $1 WHERE \"id\" = $2");
//! # Ok::<(), blocksql::error::OrmError>(())
//! ```
//!
//! ## Layers
//!
//! | Module       | Role                                             |
//! |--------------|--------------------------------------------------|
//! | `model`      | Tables, columns, typed entities                  |
//! | `builder`    | `select` / `insert` / `update` / `delete` chains |
//! | `parser`     | Textual where expressions                        |
//! | `dialect`    | Quoting, placeholders, literals per database     |
//! | `transpiler` | Statement to SQL, inline or parameterized        |
//! | `engine`     | Execution through sqlx, row mapping              |

pub mod ast;
pub mod builder;
pub mod config;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::builder::*;
    pub use crate::config::{Config, DatabaseConfig};
    pub use crate::dialect::Dialect;
    pub use crate::engine::{Database, Query, Row};
    pub use crate::error::*;
    pub use crate::model::{Entity, Model};
    pub use crate::transpiler::{CompiledQuery, ToSql};
}

/// Parse a where expression into a typed filter.
///
/// # Example
///
/// ```
/// use blocksql::parse_where;
///
/// let filter = parse_where("id = 1 AND name = 'x'").unwrap();
/// assert_eq!(filter.conditions.len(), 2);
/// ```
pub fn parse_where(input: &str) -> Result<ast::Filter, error::OrmError> {
    parser::parse_where(input)
}
