use std::fmt;

use crate::error::DataError;

/// Logical type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Double,
    Text,
    Boolean,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "Integer",
            ColumnType::Double => "Double",
            ColumnType::Text => "String",
            ColumnType::Boolean => "Boolean",
        };
        write!(f, "{}", name)
    }
}

/// Ordered list of named, typed columns describing a record layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<(String, ColumnType)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schema from `(name, type)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `DataError::DuplicateColumn` if a name appears twice.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, ColumnType)>,
    ) -> Result<Self, DataError> {
        let mut schema = Schema::new();
        for (name, column_type) in columns {
            schema = schema.with_column(name, column_type)?;
        }
        Ok(schema)
    }

    /// Appends a column, consuming and returning the schema.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> Result<Self, DataError> {
        let name = name.into();
        if self.index_of(&name).is_some() {
            return Err(DataError::DuplicateColumn { column: name });
        }
        self.columns.push((name, column_type));
        Ok(self)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n == name)
    }

    pub fn column_type(&self, index: usize) -> Option<ColumnType> {
        self.columns.get(index).map(|(_, t)| *t)
    }

    /// Resolves a column name to its index, failing with `ColumnNotFound`.
    pub fn require_column(&self, name: &str) -> Result<usize, DataError> {
        self.index_of(name).ok_or_else(|| DataError::ColumnNotFound {
            column: name.to_string(),
        })
    }

    /// Fails with `RowLengthMismatch` unless `width` equals the column count.
    pub(crate) fn check_row_width(&self, width: usize) -> Result<(), DataError> {
        if width != self.columns.len() {
            return Err(DataError::RowLengthMismatch {
                expected: self.columns.len(),
                actual: width,
            });
        }
        Ok(())
    }
}
