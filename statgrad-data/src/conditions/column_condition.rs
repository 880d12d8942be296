use std::cmp::Ordering;
use std::fmt;

use super::traits::Condition;
use crate::error::DataError;
use crate::schema::Schema;
use crate::value::Value;

/// Comparison applied by a [`ColumnCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    /// Ignores the reference value.
    IsNull,
}

impl ConditionOp {
    /// Applies the comparison `cell <op> reference`.
    ///
    /// Ordering comparisons against an incomparable cell are false. `NotEqual`
    /// is the negation of `Equal`.
    pub fn apply(self, cell: &Value, reference: &Value) -> bool {
        match self {
            ConditionOp::IsNull => cell.is_null(),
            ConditionOp::Equal => cell_equals(cell, reference),
            ConditionOp::NotEqual => !cell_equals(cell, reference),
            ConditionOp::LessThan => cell.compare(reference) == Some(Ordering::Less),
            ConditionOp::LessOrEqual => matches!(
                cell.compare(reference),
                Some(Ordering::Less | Ordering::Equal)
            ),
            ConditionOp::GreaterThan => cell.compare(reference) == Some(Ordering::Greater),
            ConditionOp::GreaterOrEqual => matches!(
                cell.compare(reference),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

fn cell_equals(cell: &Value, reference: &Value) -> bool {
    match (cell, reference) {
        (Value::Null, Value::Null) => true,
        _ => cell.compare(reference) == Some(Ordering::Equal),
    }
}

impl fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ConditionOp::Equal => "==",
            ConditionOp::NotEqual => "!=",
            ConditionOp::LessThan => "<",
            ConditionOp::LessOrEqual => "<=",
            ConditionOp::GreaterThan => ">",
            ConditionOp::GreaterOrEqual => ">=",
            ConditionOp::IsNull => "is null",
        };
        write!(f, "{}", symbol)
    }
}

/// Compares one column of the row against a constant.
#[derive(Debug, Clone)]
pub struct ColumnCondition {
    column: String,
    op: ConditionOp,
    value: Value,
    bound: Option<(Schema, usize)>,
}

impl ColumnCondition {
    pub fn new(column: impl Into<String>, op: ConditionOp, value: impl Into<Value>) -> Self {
        ColumnCondition {
            column: column.into(),
            op,
            value: value.into(),
            bound: None,
        }
    }

    /// Shorthand for an `IsNull` condition on `column`.
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::new(column, ConditionOp::IsNull, Value::Null)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn op(&self) -> ConditionOp {
        self.op
    }
}

impl Condition for ColumnCondition {
    fn set_input_schema(&mut self, schema: &Schema) -> Result<(), DataError> {
        let index = schema.require_column(&self.column)?;
        self.bound = Some((schema.clone(), index));
        Ok(())
    }

    fn input_schema(&self) -> Option<&Schema> {
        self.bound.as_ref().map(|(schema, _)| schema)
    }

    fn condition(&self, row: &[Value]) -> Result<bool, DataError> {
        let (schema, index) = self.bound.as_ref().ok_or_else(|| DataError::SchemaNotSet {
            component: self.to_string(),
        })?;
        schema.check_row_width(row.len())?;
        Ok(self.condition_value(&row[*index]))
    }

    fn condition_value(&self, value: &Value) -> bool {
        self.op.apply(value, &self.value)
    }
}

impl fmt::Display for ColumnCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            ConditionOp::IsNull => write!(f, "ColumnCondition({} is null)", self.column),
            op => write!(f, "ColumnCondition({} {} {})", self.column, op, self.value),
        }
    }
}

#[cfg(test)]
#[path = "column_condition_test.rs"]
mod tests;
