//! Table models.
//!
//! A [`Model`] is what the statement builders start from: a table name and,
//! optionally, the columns a statement should name. Types that want to be
//! read back from result rows implement [`Entity`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A table and the columns statements should address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    /// `None` addresses every column (`SELECT *`, `INSERT INTO t VALUES ...`).
    pub fields: Option<Vec<String>>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: None,
        }
    }

    pub fn with_fields<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: Some(fields.into_iter().map(Into::into).collect()),
        }
    }

    /// Append one column to the field list.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.get_or_insert_with(Vec::new).push(name.into());
        self
    }
}

/// A Rust type stored in a table.
///
/// # Example
///
/// ```
/// use blocksql::model::Entity;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl Entity for User {
///     const TABLE: &'static str = "users";
///     fn fields() -> Vec<&'static str> {
///         vec!["id", "name"]
///     }
/// }
///
/// assert_eq!(User::model().fields.unwrap(), vec!["id", "name"]);
/// ```
pub trait Entity: DeserializeOwned {
    const TABLE: &'static str;

    fn fields() -> Vec<&'static str>;

    fn model() -> Model {
        Model::with_fields(Self::TABLE, Self::fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builder() {
        let model = Model::new("users").field("id").field("name");
        assert_eq!(
            model.fields,
            Some(vec!["id".to_string(), "name".to_string()])
        );
    }

    #[test]
    fn test_new_has_no_fields() {
        assert_eq!(Model::new("users").fields, None);
    }
}
