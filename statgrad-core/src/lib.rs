//! Dual-mode reduction operators with reverse-mode differentiation.
//!
//! Operators run either eagerly over [`Array`]s or as nodes of a symbolic
//! [`Graph`] whose backward rules append gradient sub-graphs to the same graph.

pub mod array;
pub mod autograd;
pub mod error;
pub mod graph;
pub mod ops;
pub mod types;
pub mod utils;

pub use array::Array;
pub use error::{ErrorKind, StatGradError};
pub use graph::{Graph, NodeId, VarId};
pub use ops::identity::{OpFamily, OpIdentity};
pub use ops::node::{ExecKind, ExecMode, OperatorNode};
pub use ops::operator::Operator;
pub use ops::reduction::{
    reduction_operator, MeanOp, ReduceParams, StdOp, SumOp, VarianceOp, VarianceParams,
};
pub use types::{DType, Element};

// Re-export traits required by public functions/structs
pub use num_traits;
