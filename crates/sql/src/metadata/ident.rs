//! Table identifiers and identifier legality rules

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Schema unqualified names resolve into unless the session says otherwise.
pub const DEFAULT_SCHEMA_NAME: &str = "doc";

/// Schema holding blob tables.
pub const BLOB_SCHEMA_NAME: &str = "blob";

/// Characters that may not appear in schema or table names. They would
/// collide with index naming on the storage engine.
pub const INVALID_NAME_CHARACTERS: &[char] =
    &['.', '\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#'];

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('_') && !name.contains(INVALID_NAME_CHARACTERS)
}

/// Validate a table name, failing with `InvalidTableName`.
pub fn validate_table_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidTableName(name.to_string()))
    }
}

/// Validate a schema name, failing with `InvalidSchemaName`.
pub fn validate_schema_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidSchemaName(name.to_string()))
    }
}

/// Fully qualified table identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableIdent {
    schema: String,
    name: String,
}

impl TableIdent {
    /// Build an identifier without validation. Use [`TableIdent::try_new`]
    /// for names that came from a statement.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Build an identifier, checking the table name first and then the schema.
    pub fn try_new(schema: &str, name: &str) -> Result<Self> {
        validate_table_name(name)?;
        validate_schema_name(schema)?;
        Ok(Self::new(schema, name))
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `schema.name`
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Name of the backing index: the bare table name in the default schema,
    /// `schema.name` elsewhere.
    pub fn index_name(&self) -> String {
        if self.schema == DEFAULT_SCHEMA_NAME {
            self.name.clone()
        } else {
            self.fqn()
        }
    }
}

impl fmt::Display for TableIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names_round_trip() {
        for name in ["users", "t1", "my-table", "ünïcode", "a_b"] {
            let ident = TableIdent::try_new("doc", name).unwrap();
            assert_eq!(ident.schema(), "doc");
            assert_eq!(ident.name(), name);
            assert_eq!(TableIdent::new(ident.schema(), ident.name()), ident);
        }
    }

    #[test]
    fn test_every_reserved_character_rejected() {
        for c in INVALID_NAME_CHARACTERS {
            let name = format!("a{}b", c);
            assert_eq!(
                TableIdent::try_new("doc", &name),
                Err(Error::InvalidTableName(name.clone()))
            );
        }
    }

    #[test]
    fn test_leading_underscore_and_empty_rejected() {
        assert!(matches!(
            TableIdent::try_new("doc", "_hidden"),
            Err(Error::InvalidTableName(_))
        ));
        assert!(matches!(
            TableIdent::try_new("doc", ""),
            Err(Error::InvalidTableName(_))
        ));
    }

    #[test]
    fn test_table_name_checked_before_schema() {
        assert!(matches!(
            TableIdent::try_new("bad schema", "bad.table"),
            Err(Error::InvalidTableName(_))
        ));
        assert!(matches!(
            TableIdent::try_new("bad schema", "t"),
            Err(Error::InvalidSchemaName(_))
        ));
    }

    #[test]
    fn test_index_name() {
        assert_eq!(TableIdent::new("doc", "users").index_name(), "users");
        assert_eq!(TableIdent::new("custom", "users").index_name(), "custom.users");
        assert_eq!(TableIdent::new("doc", "users").fqn(), "doc.users");
    }
}
