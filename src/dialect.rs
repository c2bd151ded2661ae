//! SQL dialects.
//!
//! Each dialect supplies a [`SqlGenerator`] that decides how identifiers are
//! quoted, how placeholders look and how literals are spelled.

use serde::{Deserialize, Serialize};

use crate::error::OrmError;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Unquoted identifiers, `$n` placeholders. Good for display and tests.
    #[default]
    Generic,
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    #[serde(alias = "mariadb")]
    MySQL,
    #[serde(alias = "sqlite3")]
    SQLite,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Generic,
        Dialect::Postgres,
        Dialect::MySQL,
        Dialect::SQLite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Postgres => "postgres",
            Dialect::MySQL => "mysql",
            Dialect::SQLite => "sqlite",
        }
    }

    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::Generic => Box::new(GenericGenerator),
            Dialect::Postgres => Box::new(PostgresGenerator),
            Dialect::MySQL => Box::new(MysqlGenerator),
            Dialect::SQLite => Box::new(SqliteGenerator),
        }
    }

    /// Infer the dialect from a connection URL scheme.
    ///
    /// ```
    /// use blocksql::dialect::Dialect;
    ///
    /// assert_eq!(Dialect::from_url("postgres://localhost/app"), Some(Dialect::Postgres));
    /// assert_eq!(Dialect::from_url("sqlite::memory:"), Some(Dialect::SQLite));
    /// assert_eq!(Dialect::from_url("redis://localhost"), None);
    /// ```
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?.to_ascii_lowercase();
        match scheme.as_str() {
            "postgres" | "postgresql" => Some(Dialect::Postgres),
            "mysql" | "mariadb" => Some(Dialect::MySQL),
            "sqlite" => Some(Dialect::SQLite),
            _ => None,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Dialect::Generic),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySQL),
            "sqlite" | "sqlite3" => Ok(Dialect::SQLite),
            other => Err(OrmError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}

/// Per-dialect SQL spelling.
pub trait SqlGenerator {
    fn dialect(&self) -> Dialect;

    /// Quote a single identifier part.
    fn quote_part(&self, part: &str) -> String;

    /// Quote a possibly qualified identifier (`table.column`). `*` is kept bare.
    fn quote_identifier(&self, name: &str) -> String {
        name.split('.')
            .map(|part| {
                if part == "*" {
                    part.to_string()
                } else {
                    self.quote_part(part)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Placeholder for the 1-based parameter `index`.
    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    /// Placeholder for a caller-numbered `$n`, or `None` when the dialect
    /// can only bind in textual order.
    fn numbered_placeholder(&self, n: usize) -> Option<String> {
        Some(self.placeholder(n))
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "true".to_string() } else { "false".to_string() }
    }

    fn string_literal(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// Trailing `LIMIT`/`OFFSET`, including the leading space.
    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        sql
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn supports_full_join(&self) -> bool {
        true
    }
}

pub struct GenericGenerator;

impl SqlGenerator for GenericGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    fn quote_part(&self, part: &str) -> String {
        part.to_string()
    }
}

pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn quote_part(&self, part: &str) -> String {
        format!("\"{}\"", part.replace('"', "\"\""))
    }
}

pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::MySQL
    }

    fn quote_part(&self, part: &str) -> String {
        format!("`{}`", part.replace('`', "``"))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn numbered_placeholder(&self, _n: usize) -> Option<String> {
        None
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    // Backslash is an escape character in MySQL string literals by default.
    fn string_literal(&self, s: &str) -> String {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
    }

    // OFFSET is only accepted after a LIMIT.
    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (None, Some(n)) => format!(" LIMIT {} OFFSET {}", u64::MAX, n),
            (Some(l), Some(n)) => format!(" LIMIT {} OFFSET {}", l, n),
            (Some(l), None) => format!(" LIMIT {}", l),
            (None, None) => String::new(),
        }
    }

    fn supports_returning(&self) -> bool {
        false
    }

    fn supports_full_join(&self) -> bool {
        false
    }
}

pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn quote_part(&self, part: &str) -> String {
        format!("\"{}\"", part.replace('"', "\"\""))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    // ?NNN binds the NNN-th argument regardless of position.
    fn numbered_placeholder(&self, n: usize) -> Option<String> {
        Some(format!("?{}", n))
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (None, Some(n)) => format!(" LIMIT -1 OFFSET {}", n),
            (Some(l), Some(n)) => format!(" LIMIT {} OFFSET {}", l, n),
            (Some(l), None) => format!(" LIMIT {}", l),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_identifiers() {
        let pg = Dialect::Postgres.generator();
        assert_eq!(pg.quote_identifier("users.id"), "\"users\".\"id\"");
        assert_eq!(pg.quote_identifier("users.*"), "\"users\".*");

        let my = Dialect::MySQL.generator();
        assert_eq!(my.quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_string_escaping() {
        let generic = Dialect::Generic.generator();
        assert_eq!(generic.string_literal("O'Brien"), "'O''Brien'");

        let my = Dialect::MySQL.generator();
        assert_eq!(my.string_literal("a\\b'c"), "'a\\\\b''c'");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::Postgres.generator().placeholder(3), "$3");
        assert_eq!(Dialect::SQLite.generator().placeholder(3), "?");
        assert_eq!(
            Dialect::SQLite.generator().numbered_placeholder(3).as_deref(),
            Some("?3")
        );
        assert_eq!(Dialect::MySQL.generator().numbered_placeholder(3), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mariadb".parse::<Dialect>().unwrap(), Dialect::MySQL);
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_deserialize_alias() {
        #[derive(Deserialize)]
        struct Wrapper {
            dialect: Dialect,
        }
        let w: Wrapper = toml::from_str("dialect = \"pg\"").unwrap();
        assert_eq!(w.dialect, Dialect::Postgres);
    }
}
