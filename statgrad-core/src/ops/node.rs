//! Dual-mode operator nodes.
//!
//! An [`OperatorNode`] is one application of an [`Operator`] in exactly one of
//! two modes. Eager nodes hold concrete arrays and can only run `forward`.
//! Symbolic nodes live in a [`Graph`] and can only be differentiated. The
//! mode is fixed at construction.

use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, NodeId, VarId};
use crate::ops::identity::OpIdentity;
use crate::ops::operator::{check_arity, Operator};
use crate::ops::reduction::{StdOp, VarianceOp, VarianceParams};
use crate::types::Element;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Which mode a node was built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecKind {
    Eager,
    Symbolic,
}

impl fmt::Display for ExecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecKind::Eager => write!(f, "eager"),
            ExecKind::Symbolic => write!(f, "symbolic"),
        }
    }
}

/// Inputs of a node, concrete or symbolic. The two never mix.
#[derive(Debug, Clone)]
pub enum ExecMode<T: Element> {
    Eager {
        inputs: Vec<Array<T>>,
    },
    Symbolic {
        graph_id: usize,
        node: NodeId,
        inputs: Vec<VarId>,
        output: VarId,
    },
}

/// One operator applied to its inputs, in eager or symbolic mode.
#[derive(Debug, Clone)]
pub struct OperatorNode<T: Element> {
    op: Arc<dyn Operator<T>>,
    mode: ExecMode<T>,
}

impl<T: Element> OperatorNode<T> {
    /// Eager node over concrete inputs. Nothing is validated until `forward`.
    pub fn eager(op: Arc<dyn Operator<T>>, inputs: Vec<Array<T>>) -> Self {
        OperatorNode {
            op,
            mode: ExecMode::Eager { inputs },
        }
    }

    /// Symbolic node: registers `op` over `inputs` in `graph` together with a
    /// fresh output variable.
    ///
    /// # Errors
    /// `UnknownVariable` for foreign inputs, `ArityMismatch` for a wrong input count.
    pub fn symbolic(
        graph: &mut Graph<T>,
        op: Arc<dyn Operator<T>>,
        inputs: &[VarId],
    ) -> Result<Self, StatGradError> {
        let output = graph.apply(Arc::clone(&op), inputs)?;
        let node = graph.producer(output)?;
        debug!(
            "symbolic {} node {} in graph {} -> {}",
            op.identity().name(),
            node,
            graph.id(),
            output
        );
        Ok(OperatorNode {
            op,
            mode: ExecMode::Symbolic {
                graph_id: graph.id(),
                node,
                inputs: inputs.to_vec(),
                output,
            },
        })
    }

    pub fn kind(&self) -> ExecKind {
        match self.mode {
            ExecMode::Eager { .. } => ExecKind::Eager,
            ExecMode::Symbolic { .. } => ExecKind::Symbolic,
        }
    }

    pub fn mode(&self) -> &ExecMode<T> {
        &self.mode
    }

    pub fn op(&self) -> &Arc<dyn Operator<T>> {
        &self.op
    }

    pub fn op_identity(&self) -> OpIdentity {
        self.op.identity()
    }

    /// Output variable of a symbolic node; `None` for eager nodes.
    pub fn output(&self) -> Option<VarId> {
        match self.mode {
            ExecMode::Symbolic { output, .. } => Some(output),
            ExecMode::Eager { .. } => None,
        }
    }

    /// Computes the operator over the node's arrays.
    ///
    /// # Errors
    /// `InvalidMode` on a symbolic node; otherwise whatever the kernel reports
    /// (`InvalidAxis`, `NumericDomain`, ...).
    pub fn forward(&self) -> Result<Array<T>, StatGradError> {
        match &self.mode {
            ExecMode::Eager { inputs } => {
                check_arity(self.op.as_ref(), inputs.len())?;
                let refs: Vec<&Array<T>> = inputs.iter().collect();
                self.op.compute(&refs)
            }
            ExecMode::Symbolic { .. } => Err(self.invalid_mode("forward")),
        }
    }

    /// Builds the gradient of each input as new variables of `graph`, given the
    /// upstream gradient `grad_output` (shaped like the node's output).
    ///
    /// Inputs the operator does not differentiate get an explicit `zeros_like`.
    ///
    /// # Errors
    /// `InvalidMode` on an eager node or when `graph` is not the node's graph.
    pub fn differentiate(
        &self,
        graph: &mut Graph<T>,
        grad_output: VarId,
    ) -> Result<Vec<VarId>, StatGradError> {
        let (graph_id, node, inputs) = match &self.mode {
            ExecMode::Symbolic {
                graph_id,
                node,
                inputs,
                ..
            } => (*graph_id, *node, inputs),
            ExecMode::Eager { .. } => return Err(self.invalid_mode("differentiate")),
        };
        if graph_id != graph.id() {
            return Err(StatGradError::InvalidMode {
                operation: format!("differentiate in foreign graph {}", graph.id()),
                mode: ExecKind::Symbolic,
            });
        }

        let grads = graph.differentiate_node(node, grad_output)?;
        inputs
            .iter()
            .zip(grads)
            .map(|(&input, grad)| match grad {
                Some(g) => Ok(g),
                None => graph.zeros_like(input),
            })
            .collect()
    }

    fn invalid_mode(&self, operation: &str) -> StatGradError {
        StatGradError::InvalidMode {
            operation: format!("{} of {}", operation, self.op.identity().name()),
            mode: self.kind(),
        }
    }
}

/// Generates the eager and symbolic constructors of a variance-family kernel,
/// so every member of the family is built the same way.
macro_rules! variance_family_constructors {
    ($(#[$doc:meta])* $op:ident) => {
        impl $op {
            $(#[$doc])*
            pub fn eager<T: Element>(x: Array<T>, params: VarianceParams) -> OperatorNode<T> {
                OperatorNode::eager(Arc::new($op::new(params)), vec![x])
            }

            $(#[$doc])*
            pub fn symbolic<T: Element>(
                graph: &mut Graph<T>,
                x: VarId,
                params: VarianceParams,
            ) -> Result<OperatorNode<T>, StatGradError> {
                OperatorNode::symbolic(graph, Arc::new($op::new(params)), &[x])
            }
        }
    };
}

variance_family_constructors!(
    /// Variance node over `x` (eager: an array, symbolic: a graph variable).
    VarianceOp
);
variance_family_constructors!(
    /// Standard deviation node over `x` (eager: an array, symbolic: a graph variable).
    StdOp
);

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;
