use crate::graph::{NodeId, VarId};
use crate::ops::node::ExecKind;
use thiserror::Error;

/// Custom error type for the statgrad framework.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum StatGradError {
    #[error("Invalid axis {axis} for array of rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Array creation error: data length {data_len} does not match shape {shape:?}")]
    ArrayCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Operation '{operation}' is not available on a node built in {mode} mode")]
    InvalidMode { operation: String, mode: ExecKind },

    #[error("Variable {var} ('{name}') has no bound array")]
    UnboundVariable { var: VarId, name: String },

    #[error("Numeric domain error in {operation}: {message}")]
    NumericDomain { operation: String, message: String },

    #[error("Variable {var} is not the output of any registered node")]
    UnresolvedVariable { var: VarId },

    #[error("Node {node} already registered output {existing}")]
    OutputAlreadyRegistered { node: NodeId, existing: VarId },

    #[error("Variable {var} is already defined by a node or a bound value")]
    VariableAlreadyProduced { var: VarId },

    #[error("Unknown node {node}")]
    UnknownNode { node: NodeId },

    #[error("Unknown variable {var}")]
    UnknownVariable { var: VarId },

    #[error("Operation '{operation}' expects {expected} inputs, got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Cycle detected in the computation graph.")]
    CycleDetected,

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse classification of [`StatGradError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Axis out of range, incompatible or mismatched shapes.
    Shape,
    /// Forward on a symbolic node, backward on an eager node, unbound placeholders.
    InvalidMode,
    /// Division by zero or another undefined step.
    NumericDomain,
    /// Differentiation requested for a variable no node produced.
    UnresolvedVariable,
    /// Arena bookkeeping violations.
    Graph,
    /// Operator identity lookups.
    Registry,
    Internal,
}

impl StatGradError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatGradError::InvalidAxis { .. }
            | StatGradError::ShapeMismatch { .. }
            | StatGradError::BroadcastError { .. }
            | StatGradError::ArrayCreationError { .. }
            | StatGradError::IndexOutOfBounds { .. } => ErrorKind::Shape,
            StatGradError::InvalidMode { .. } | StatGradError::UnboundVariable { .. } => {
                ErrorKind::InvalidMode
            }
            StatGradError::NumericDomain { .. } => ErrorKind::NumericDomain,
            StatGradError::UnresolvedVariable { .. } => ErrorKind::UnresolvedVariable,
            StatGradError::OutputAlreadyRegistered { .. }
            | StatGradError::VariableAlreadyProduced { .. }
            | StatGradError::UnknownNode { .. }
            | StatGradError::UnknownVariable { .. }
            | StatGradError::ArityMismatch { .. }
            | StatGradError::CycleDetected => ErrorKind::Graph,
            StatGradError::UnknownOperator(_) => ErrorKind::Registry,
            StatGradError::InternalError(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn numeric_domain(operation: &str, message: impl Into<String>) -> Self {
        StatGradError::NumericDomain {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
