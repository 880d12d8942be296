pub mod column_condition;
pub mod traits;

pub use column_condition::{ColumnCondition, ConditionOp};
pub use traits::Condition;
