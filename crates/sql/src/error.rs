//! Error types for statement analysis

use thiserror::Error;

use crate::semantic::statement::StatementKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // SQL errors
    #[error("SQL parse error: {0}")]
    ParseError(String),

    // Identifier errors
    #[error("table name \"{0}\" is invalid.")]
    InvalidTableName(String),

    #[error("schema name \"{0}\" is invalid.")]
    InvalidSchemaName(String),

    #[error("column name \"{0}\" is invalid: {1}")]
    InvalidColumnName(String, String),

    // Existence errors
    #[error("Schema '{0}' unknown")]
    SchemaUnknown(String),

    #[error("Table '{0}' unknown")]
    TableUnknown(String),

    #[error("The table '{0}' already exists.")]
    TableAlreadyExists(String),

    #[error("Column '{0}' unknown")]
    ColumnUnknown(String),

    #[error("No partition for table '{table}' with ident '{partition}' exists")]
    PartitionUnknown { table: String, partition: String },

    // Property errors
    #[error("Invalid property \"{property}\" passed to {statement} statement")]
    InvalidProperty {
        property: String,
        statement: StatementKind,
    },

    #[error("Invalid value for argument '{property}': {reason}")]
    InvalidPropertyValue { property: String, reason: String },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    // Parameter errors
    #[error(
        "Tried to resolve a parameter but the arguments provided don't contain a parameter at position {position}"
    )]
    ParameterOutOfRange { position: usize, provided: usize },

    #[error("Invalid bulk arguments: {0}")]
    InvalidBulkArguments(String),

    #[error("Bulk argument row {row}: {source}")]
    BulkArgumentRow { row: usize, source: Box<Error> },

    // Partition codec errors
    #[error("Invalid partition name: {0}")]
    InvalidPartitionName(String),

    // Statement errors
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Broad classification of analysis failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Identifier,
    Existence,
    Property,
    Parameter,
    PartitionCodec,
    Statement,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ParseError(_) => ErrorKind::Parse,
            Error::InvalidTableName(_)
            | Error::InvalidSchemaName(_)
            | Error::InvalidColumnName(..) => ErrorKind::Identifier,
            Error::SchemaUnknown(_)
            | Error::TableUnknown(_)
            | Error::TableAlreadyExists(_)
            | Error::ColumnUnknown(_)
            | Error::PartitionUnknown { .. } => ErrorKind::Existence,
            Error::InvalidProperty { .. }
            | Error::InvalidPropertyValue { .. }
            | Error::InvalidNumber(_) => ErrorKind::Property,
            Error::ParameterOutOfRange { .. } | Error::InvalidBulkArguments(_) => {
                ErrorKind::Parameter
            }
            // A failing bulk row keeps the class of what went wrong in it
            Error::BulkArgumentRow { source, .. } => source.kind(),
            Error::InvalidPartitionName(_) => ErrorKind::PartitionCodec,
            Error::InvalidArgument(_) | Error::UnsupportedOperation(_) => ErrorKind::Statement,
        }
    }

    /// The error with any bulk row wrapping removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::BulkArgumentRow { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn invalid_value(property: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPropertyValue {
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<strata_value::Error> for Error {
    fn from(err: strata_value::Error) -> Self {
        Error::InvalidPartitionName(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_row_keeps_inner_kind() {
        let err = Error::BulkArgumentRow {
            row: 3,
            source: Box::new(Error::InvalidNumber("foo".into())),
        };
        assert_eq!(err.kind(), ErrorKind::Property);
        assert_eq!(err.root(), &Error::InvalidNumber("foo".into()));
        assert_eq!(err.to_string(), "Bulk argument row 3: invalid number 'foo'");
    }

    #[test]
    fn test_invalid_property_message_names_statement() {
        let err = Error::InvalidProperty {
            property: "blobs_path".into(),
            statement: StatementKind::AlterBlobTable,
        };
        assert_eq!(
            err.to_string(),
            "Invalid property \"blobs_path\" passed to ALTER BLOB TABLE statement"
        );
    }
}
