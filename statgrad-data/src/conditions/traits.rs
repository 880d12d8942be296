use std::fmt::Debug;

use crate::error::DataError;
use crate::schema::Schema;
use crate::value::Value;

/// A predicate over records, bound to an input schema before use.
///
/// A condition may inspect any column of the row, not only the column a
/// transform ends up modifying.
pub trait Condition: Debug + Send + Sync {
    /// Binds the condition to the layout of incoming rows.
    ///
    /// # Errors
    ///
    /// Returns `DataError::ColumnNotFound` if a referenced column is absent.
    fn set_input_schema(&mut self, schema: &Schema) -> Result<(), DataError>;

    /// The schema set by [`Condition::set_input_schema`], if any.
    fn input_schema(&self) -> Option<&Schema>;

    /// Evaluates the condition on a full row.
    ///
    /// # Errors
    ///
    /// Returns `DataError::SchemaNotSet` before a schema is bound and
    /// `DataError::RowLengthMismatch` if `row` does not match it.
    fn condition(&self, row: &[Value]) -> Result<bool, DataError>;

    /// Evaluates the condition on a single cell.
    fn condition_value(&self, value: &Value) -> bool;
}
