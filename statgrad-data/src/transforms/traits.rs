use std::fmt::Debug;

use crate::error::DataError;
use crate::schema::Schema;
use crate::value::Value;

/// A row-wise record transform.
///
/// Transforms must be bound to an input schema with
/// [`Transform::set_input_schema`] before any row is mapped.
pub trait Transform: Debug + Send + Sync {
    /// Returns the schema of the rows this transform produces.
    fn transform_schema(&self, input: &Schema) -> Result<Schema, DataError>;

    /// Binds the transform to the layout of incoming rows.
    fn set_input_schema(&mut self, schema: &Schema) -> Result<(), DataError>;

    fn input_schema(&self) -> Option<&Schema>;

    /// Maps a single row to a new row. The input is left untouched.
    fn map(&self, row: &[Value]) -> Result<Vec<Value>, DataError>;

    /// Maps every step of a sequence independently with [`Transform::map`].
    fn map_sequence(&self, steps: &[Vec<Value>]) -> Result<Vec<Vec<Value>>, DataError> {
        steps.iter().map(|step| self.map(step)).collect()
    }

    /// Names of the columns this transform operates on.
    fn column_names(&self) -> Vec<&str>;

    /// Names of the columns this transform writes.
    fn output_column_names(&self) -> Vec<&str> {
        self.column_names()
    }
}
