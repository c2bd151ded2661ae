//! Error types for blocksql.

use thiserror::Error;

/// The main error type for blocksql operations.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Failed to parse a textual where expression.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// A clause was attached to a statement kind that cannot carry it.
    #[error("Clause {clause} is not valid in a {statement} statement")]
    InvalidClause {
        clause: &'static str,
        statement: &'static str,
    },

    /// A clause the statement needs was never attached.
    #[error("{statement} statement is missing its {clause} clause")]
    MissingClause {
        clause: &'static str,
        statement: &'static str,
    },

    /// An inserted row does not have as many values as there are columns.
    #[error("Row {row} has {found} values, expected {expected}")]
    ArityMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Empty or malformed table/column name.
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Literal values and explicit `$n` parameters used together.
    #[error("Cannot mix explicit parameters (${0}) with parameterized literals")]
    MixedParameters(usize),

    /// A value that has no SQL spelling (`$0`, NaN, infinities).
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The target dialect has no equivalent for a feature.
    #[error("{feature} is not supported by {dialect}")]
    Unsupported {
        feature: &'static str,
        dialect: &'static str,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// A row could not be mapped onto the requested type.
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrmError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an invalid clause error.
    pub fn invalid_clause(clause: &'static str, statement: &'static str) -> Self {
        Self::InvalidClause { clause, statement }
    }

    /// Create a missing clause error.
    pub fn missing(clause: &'static str, statement: &'static str) -> Self {
        Self::MissingClause { clause, statement }
    }

    pub fn unsupported(feature: &'static str, dialect: &'static str) -> Self {
        Self::Unsupported { feature, dialect }
    }
}

/// Result type alias for blocksql operations.
pub type OrmResult<T> = Result<T, OrmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OrmError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_clause_errors_name_the_statement() {
        assert_eq!(
            OrmError::invalid_clause("VALUES", "SELECT").to_string(),
            "Clause VALUES is not valid in a SELECT statement"
        );
        assert_eq!(
            OrmError::missing("SET", "UPDATE").to_string(),
            "UPDATE statement is missing its SET clause"
        );
    }

    #[test]
    fn test_invalid_value_display() {
        let err = OrmError::InvalidValue("inf".to_string());
        assert_eq!(err.to_string(), "Invalid value: inf");
    }
}
