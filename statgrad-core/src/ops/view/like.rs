//! Shape plumbing kernels.
//!
//! Each takes a reference operand whose only role is to supply a shape at
//! evaluation time. The reference never receives a gradient.

use crate::array::utils::broadcast_shapes;
use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::ops::identity::OpIdentity;
use crate::ops::operator::{binary_inputs, input_vars, unary_input, Operator};
use crate::ops::reduction::ReduceParams;
use crate::types::Element;

/// Broadcasts `a` to the shape of `b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BroadcastLikeOp;

impl<T: Element> Operator<T> for BroadcastLikeOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::BROADCAST_LIKE
    }

    fn arity(&self) -> usize {
        2
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let (a, b) = binary_inputs("broadcast_like", inputs)?;
        a.broadcast_to(b.shape())
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        match input_shapes {
            [Some(a), Some(b)] => broadcast_shapes(a, b).ok().filter(|s| s.as_slice() == *b),
            [None, Some(b)] => Some(b.to_vec()),
            _ => None,
        }
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let [a, _] = input_vars("broadcast_like", inputs)?;
        Ok(vec![Some(graph.sum_to_like(grad_output, a)?), None])
    }
}

/// Sums `a` down to the shape of `b`, the adjoint of [`BroadcastLikeOp`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SumToLikeOp;

impl<T: Element> Operator<T> for SumToLikeOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::SUM_TO_LIKE
    }

    fn arity(&self) -> usize {
        2
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let (a, b) = binary_inputs("sum_to_like", inputs)?;
        a.sum_to_shape(b.shape())
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        match input_shapes {
            [_, Some(b)] => Some(b.to_vec()),
            _ => None,
        }
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let [a, _] = input_vars("sum_to_like", inputs)?;
        Ok(vec![Some(graph.broadcast_like(grad_output, a)?), None])
    }
}

/// Reshapes a reduction result `g` so the reduced axes of `x` are present as
/// size-1 dimensions. Inputs are `[g, x]`.
///
/// With `keep_dims` already set on `reduce` the reshape is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepDimsLikeOp {
    reduce: ReduceParams,
}

impl KeepDimsLikeOp {
    pub fn new(reduce: ReduceParams) -> Self {
        KeepDimsLikeOp { reduce }
    }
}

impl<T: Element> Operator<T> for KeepDimsLikeOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::KEEP_DIMS_LIKE
    }

    fn arity(&self) -> usize {
        2
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let (g, x) = binary_inputs("keep_dims_like", inputs)?;
        let expected = self.reduce.output_shape(x.shape())?;
        if g.shape() != expected.as_slice() {
            return Err(StatGradError::ShapeMismatch {
                expected,
                actual: g.shape().to_vec(),
                operation: "keep_dims_like".to_string(),
            });
        }
        g.reshape(self.reduce.kept_shape(x.shape())?)
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        match input_shapes {
            [_, Some(x)] => self.reduce.kept_shape(x).ok(),
            _ => None,
        }
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let [g, _] = input_vars("keep_dims_like", inputs)?;
        Ok(vec![Some(graph.reshape_like(grad_output, g)?), None])
    }
}

/// Reshapes `a` to the shape of `b` (same element count).
#[derive(Debug, Clone, Copy, Default)]
pub struct ReshapeLikeOp;

impl<T: Element> Operator<T> for ReshapeLikeOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::RESHAPE_LIKE
    }

    fn arity(&self) -> usize {
        2
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let (a, b) = binary_inputs("reshape_like", inputs)?;
        a.reshape(b.shape().to_vec())
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        match input_shapes {
            [_, Some(b)] => Some(b.to_vec()),
            _ => None,
        }
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let [a, _] = input_vars("reshape_like", inputs)?;
        Ok(vec![Some(graph.reshape_like(grad_output, a)?), None])
    }
}

/// Ones shaped like the input. Not differentiable in its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnesLikeOp;

impl<T: Element> Operator<T> for OnesLikeOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::ONES_LIKE
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        Ok(Array::ones_like(unary_input("ones_like", inputs)?))
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        input_shapes.first().copied().flatten().map(<[usize]>::to_vec)
    }

    fn backward(
        &self,
        _graph: &mut Graph<T>,
        _inputs: &[VarId],
        _output: VarId,
        _grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        Ok(vec![None])
    }
}

/// Zeros shaped like the input. Not differentiable in its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZerosLikeOp;

impl<T: Element> Operator<T> for ZerosLikeOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::ZEROS_LIKE
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        Ok(Array::zeros_like(unary_input("zeros_like", inputs)?))
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        input_shapes.first().copied().flatten().map(<[usize]>::to_vec)
    }

    fn backward(
        &self,
        _graph: &mut Graph<T>,
        _inputs: &[VarId],
        _output: VarId,
        _grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        Ok(vec![None])
    }
}

#[cfg(test)]
#[path = "like_test.rs"]
mod tests;
