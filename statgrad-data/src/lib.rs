//! Row and sequence transforms over tabular records.
//!
//! A record is a slice of [`Value`] cells laid out according to a [`Schema`].
//! Transforms are configured against an input schema before mapping rows.

pub mod conditions;
pub mod error;
pub mod schema;
pub mod transforms;
pub mod value;

// Re-export main components
pub use conditions::{ColumnCondition, Condition, ConditionOp};
pub use error::DataError;
pub use schema::{ColumnType, Schema};
pub use transforms::{ConditionalReplaceWithDefault, Transform};
pub use value::Value;
