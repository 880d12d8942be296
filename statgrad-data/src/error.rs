use thiserror::Error;

/// Errors raised while configuring or applying record transforms.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Column \"{column}\" not found in input schema")]
    ColumnNotFound { column: String },

    #[error("Input schema not set for {component}")]
    SchemaNotSet { component: String },

    #[error("Row length mismatch: schema has {expected} columns, row has {actual}")]
    RowLengthMismatch { expected: usize, actual: usize },

    #[error("Duplicate column \"{column}\" in schema")]
    DuplicateColumn { column: String },
}
