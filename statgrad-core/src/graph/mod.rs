//! Arena-backed symbolic computation graph.
//!
//! A [`Graph`] owns two arenas: variables (placeholders, constants and node
//! outputs) and nodes (an operator applied to input variables). Everything is
//! referred to by index handles, [`VarId`] and [`NodeId`], so nodes and their
//! gradient sub-graphs never hold references into the graph.
//!
//! Variables are defined at most once: either a value is bound when the
//! variable is created (a constant) or a single node registers it as output.

use crate::array::Array;
use crate::error::StatGradError;
use crate::ops::operator::{check_arity, Operator};
use crate::types::Element;
use log::trace;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod builder;
mod eval;

static NEXT_GRAPH_ID: AtomicUsize = AtomicUsize::new(1);

/// Handle to a variable of a [`Graph`].
///
/// Handles carry the id of the graph that issued them; any other graph treats
/// them as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId {
    pub(crate) graph: usize,
    pub(crate) index: usize,
}

impl VarId {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Id of the issuing graph, see [`Graph::id`].
    pub fn graph_id(&self) -> usize {
        self.graph
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.index)
    }
}

/// Handle to a node of a [`Graph`], tagged like [`VarId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) graph: usize,
    pub(crate) index: usize,
}

impl NodeId {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn graph_id(&self) -> usize {
        self.graph
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.index)
    }
}

/// A named value slot of the graph.
#[derive(Debug, Clone)]
pub struct Variable<T: Element> {
    name: String,
    shape_hint: Option<Vec<usize>>,
    value: Option<Array<T>>,
    producer: Option<NodeId>,
}

impl<T: Element> Variable<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Statically known shape, if any.
    pub fn shape_hint(&self) -> Option<&[usize]> {
        self.shape_hint.as_deref()
    }

    /// Value bound at creation time (constants only).
    pub fn value(&self) -> Option<&Array<T>> {
        self.value.as_ref()
    }

    pub fn producer(&self) -> Option<NodeId> {
        self.producer
    }
}

/// An operator applied to input variables.
#[derive(Debug, Clone)]
pub struct Node<T: Element> {
    op: Arc<dyn Operator<T>>,
    inputs: Vec<VarId>,
    output: Option<VarId>,
}

impl<T: Element> Node<T> {
    pub fn op(&self) -> &Arc<dyn Operator<T>> {
        &self.op
    }

    pub fn inputs(&self) -> &[VarId] {
        &self.inputs
    }

    /// Output variable, once registered.
    pub fn output(&self) -> Option<VarId> {
        self.output
    }
}

/// The symbolic computation graph.
#[derive(Debug)]
pub struct Graph<T: Element> {
    id: usize,
    variables: Vec<Variable<T>>,
    nodes: Vec<Node<T>>,
}

impl<T: Element> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Graph<T> {
    pub fn new() -> Self {
        Graph {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            variables: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Process-unique identifier, used to reject handles from another graph.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Creates a placeholder variable with no value and no producer.
    pub fn new_variable(&mut self, name: &str) -> VarId {
        self.push_variable(name.to_string(), None, None)
    }

    /// Creates a placeholder whose shape is known in advance.
    pub fn new_variable_with_shape(&mut self, name: &str, shape: &[usize]) -> VarId {
        self.push_variable(name.to_string(), Some(shape.to_vec()), None)
    }

    /// Creates a variable bound to a fixed value.
    pub fn constant(&mut self, name: &str, value: Array<T>) -> VarId {
        let shape = value.shape().to_vec();
        self.push_variable(name.to_string(), Some(shape), Some(value))
    }

    fn push_variable(
        &mut self,
        name: String,
        shape_hint: Option<Vec<usize>>,
        value: Option<Array<T>>,
    ) -> VarId {
        let id = VarId {
            graph: self.id,
            index: self.variables.len(),
        };
        trace!("graph {}: new variable {} '{}'", self.id, id, name);
        self.variables.push(Variable {
            name,
            shape_hint,
            value,
            producer: None,
        });
        id
    }

    /// # Errors
    /// `UnknownVariable` for out-of-range handles and handles of another graph.
    pub fn variable(&self, var: VarId) -> Result<&Variable<T>, StatGradError> {
        if var.graph != self.id {
            return Err(StatGradError::UnknownVariable { var });
        }
        self.variables
            .get(var.index)
            .ok_or(StatGradError::UnknownVariable { var })
    }

    pub fn node(&self, node: NodeId) -> Result<&Node<T>, StatGradError> {
        if node.graph != self.id {
            return Err(StatGradError::UnknownNode { node });
        }
        self.nodes
            .get(node.index)
            .ok_or(StatGradError::UnknownNode { node })
    }

    pub fn shape_hint(&self, var: VarId) -> Option<&[usize]> {
        self.variable(var).ok().and_then(|v| v.shape_hint())
    }

    /// Records `op` applied to `inputs`. The output is registered separately.
    pub fn add_node(
        &mut self,
        op: Arc<dyn Operator<T>>,
        inputs: &[VarId],
    ) -> Result<NodeId, StatGradError> {
        for &input in inputs {
            self.variable(input)?;
        }
        check_arity(op.as_ref(), inputs.len())?;
        let id = NodeId {
            graph: self.id,
            index: self.nodes.len(),
        };
        trace!(
            "graph {}: node {} = {}({:?})",
            self.id,
            id,
            op.identity().name(),
            inputs
        );
        self.nodes.push(Node {
            op,
            inputs: inputs.to_vec(),
            output: None,
        });
        Ok(id)
    }

    /// Makes `var` the output of `node` and derives its shape hint.
    ///
    /// # Errors
    /// `OutputAlreadyRegistered` if the node already has an output,
    /// `VariableAlreadyProduced` if `var` is a constant or another node's output.
    pub fn register_output(&mut self, node: NodeId, var: VarId) -> Result<(), StatGradError> {
        let existing = self.node(node)?.output;
        self.variable(var)?;
        if let Some(existing) = existing {
            return Err(StatGradError::OutputAlreadyRegistered { node, existing });
        }
        let slot = &self.variables[var.index];
        if slot.producer.is_some() || slot.value.is_some() {
            return Err(StatGradError::VariableAlreadyProduced { var });
        }

        let inferred = {
            let n = &self.nodes[node.index];
            let input_shapes: Vec<Option<&[usize]>> =
                n.inputs.iter().map(|&i| self.shape_hint(i)).collect();
            n.op.infer_shape(&input_shapes)
        };

        self.nodes[node.index].output = Some(var);
        let slot = &mut self.variables[var.index];
        slot.producer = Some(node);
        if inferred.is_some() {
            slot.shape_hint = inferred;
        }
        Ok(())
    }

    /// Adds a node for `op` over `inputs` and returns its fresh output variable.
    pub fn apply(
        &mut self,
        op: Arc<dyn Operator<T>>,
        inputs: &[VarId],
    ) -> Result<VarId, StatGradError> {
        let name = op.identity().name();
        let node = self.add_node(op, inputs)?;
        let output = self.new_variable(&format!("{}_{}", name, node.index));
        self.register_output(node, output)?;
        Ok(output)
    }

    /// The node whose output is `var`.
    pub fn producer(&self, var: VarId) -> Result<NodeId, StatGradError> {
        self.variable(var)?
            .producer
            .ok_or(StatGradError::UnresolvedVariable { var })
    }

    /// Runs the backward rule of `node`, adding its gradient sub-graph.
    ///
    /// Returns one entry per node input, `None` where the operator reports no
    /// gradient flow.
    pub fn differentiate_node(
        &mut self,
        node: NodeId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let (op, inputs, output) = {
            let n = self.node(node)?;
            let output = n.output.ok_or_else(|| {
                StatGradError::InternalError(format!("node {} has no registered output", node))
            })?;
            (Arc::clone(&n.op), n.inputs.clone(), output)
        };
        self.variable(grad_output)?;
        let grads = op.backward(self, &inputs, output, grad_output)?;
        if grads.len() != inputs.len() {
            return Err(StatGradError::InternalError(format!(
                "backward of {} returned {} gradients for {} inputs",
                op.identity().name(),
                grads.len(),
                inputs.len()
            )));
        }
        Ok(grads)
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
