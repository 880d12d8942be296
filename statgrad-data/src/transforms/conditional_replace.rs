use std::fmt;

use log::debug;

use super::traits::Transform;
use crate::conditions::Condition;
use crate::error::DataError;
use crate::schema::Schema;
use crate::value::Value;

/// Replaces the value of one column with `new_value` when a condition holds,
/// and with `default_value` otherwise.
///
/// The condition may look at any column, not just the replaced one. For
/// sequences each step is tested and replaced on its own.
#[derive(Debug)]
pub struct ConditionalReplaceWithDefault {
    column: String,
    new_value: Value,
    default_value: Value,
    condition: Box<dyn Condition>,
    bound: Option<(Schema, usize)>,
}

impl ConditionalReplaceWithDefault {
    pub fn new(
        column: impl Into<String>,
        new_value: impl Into<Value>,
        default_value: impl Into<Value>,
        condition: Box<dyn Condition>,
    ) -> Self {
        ConditionalReplaceWithDefault {
            column: column.into(),
            new_value: new_value.into(),
            default_value: default_value.into(),
            condition,
            bound: None,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn new_value(&self) -> &Value {
        &self.new_value
    }

    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    pub fn condition(&self) -> &dyn Condition {
        self.condition.as_ref()
    }

    /// Maps one cell on its own: `new_value` if the condition holds for it,
    /// else `default_value`.
    pub fn map_value(&self, value: &Value) -> Value {
        self.choose(self.condition.condition_value(value))
    }

    fn choose(&self, holds: bool) -> Value {
        if holds {
            self.new_value.clone()
        } else {
            self.default_value.clone()
        }
    }
}

impl Transform for ConditionalReplaceWithDefault {
    fn transform_schema(&self, input: &Schema) -> Result<Schema, DataError> {
        Ok(input.clone())
    }

    fn set_input_schema(&mut self, schema: &Schema) -> Result<(), DataError> {
        let index = schema.require_column(&self.column)?;
        self.condition.set_input_schema(schema)?;
        debug!(
            "{} bound to column index {} of {} columns",
            self,
            index,
            schema.num_columns()
        );
        self.bound = Some((schema.clone(), index));
        Ok(())
    }

    fn input_schema(&self) -> Option<&Schema> {
        self.bound.as_ref().map(|(schema, _)| schema)
    }

    fn map(&self, row: &[Value]) -> Result<Vec<Value>, DataError> {
        let (schema, index) = self.bound.as_ref().ok_or_else(|| DataError::SchemaNotSet {
            component: self.to_string(),
        })?;
        schema.check_row_width(row.len())?;
        let holds = self.condition.condition(row)?;
        let mut out = row.to_vec();
        out[*index] = self.choose(holds);
        Ok(out)
    }

    fn column_names(&self) -> Vec<&str> {
        vec![self.column.as_str()]
    }
}

impl fmt::Display for ConditionalReplaceWithDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConditionalReplaceWithDefault(column=\"{}\", new_value={}, default_value={}, condition={:?})",
            self.column, self.new_value, self.default_value, self.condition
        )
    }
}

#[cfg(test)]
#[path = "conditional_replace_test.rs"]
mod tests;
