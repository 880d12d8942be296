//! Broadcasting binary kernels.
//!
//! Each backward rule un-broadcasts its gradients with `sum_to_like`, so an
//! operand that was implicitly expanded receives a gradient of its own shape.

use crate::array::utils::broadcast_shapes;
use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::ops::identity::OpIdentity;
use crate::ops::operator::{binary_inputs, input_vars, Operator};
use crate::types::Element;

fn broadcast_hint(input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
    match input_shapes {
        [Some(a), Some(b)] => broadcast_shapes(a, b).ok(),
        _ => None,
    }
}

/// `a + b`
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOp;

impl<T: Element> Operator<T> for AddOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::ADD
    }

    fn arity(&self) -> usize {
        2
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let (a, b) = binary_inputs("add", inputs)?;
        a.add(b)
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        broadcast_hint(input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let [a, b] = input_vars("add", inputs)?;
        let grad_a = graph.sum_to_like(grad_output, a)?;
        let grad_b = graph.sum_to_like(grad_output, b)?;
        Ok(vec![Some(grad_a), Some(grad_b)])
    }
}

/// `a - b`
#[derive(Debug, Clone, Copy, Default)]
pub struct SubOp;

impl<T: Element> Operator<T> for SubOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::SUB
    }

    fn arity(&self) -> usize {
        2
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let (a, b) = binary_inputs("sub", inputs)?;
        a.sub(b)
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        broadcast_hint(input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let [a, b] = input_vars("sub", inputs)?;
        let grad_a = graph.sum_to_like(grad_output, a)?;
        let neg_grad = graph.neg(grad_output)?;
        let grad_b = graph.sum_to_like(neg_grad, b)?;
        Ok(vec![Some(grad_a), Some(grad_b)])
    }
}

/// `a * b`
#[derive(Debug, Clone, Copy, Default)]
pub struct MulOp;

impl<T: Element> Operator<T> for MulOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::MUL
    }

    fn arity(&self) -> usize {
        2
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let (a, b) = binary_inputs("mul", inputs)?;
        a.mul(b)
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        broadcast_hint(input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let [a, b] = input_vars("mul", inputs)?;
        // d(a*b)/da = b, d(a*b)/db = a
        let grad_a_full = graph.mul(grad_output, b)?;
        let grad_a = graph.sum_to_like(grad_a_full, a)?;
        let grad_b_full = graph.mul(grad_output, a)?;
        let grad_b = graph.sum_to_like(grad_b_full, b)?;
        Ok(vec![Some(grad_a), Some(grad_b)])
    }
}

/// `a / b`. A zero divisor is a numeric-domain error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DivOp;

impl<T: Element> Operator<T> for DivOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::DIV
    }

    fn arity(&self) -> usize {
        2
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let (a, b) = binary_inputs("div", inputs)?;
        a.div(b)
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        broadcast_hint(input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let [a, b] = input_vars("div", inputs)?;
        // da = g / b
        let grad_a_full = graph.div(grad_output, b)?;
        let grad_a = graph.sum_to_like(grad_a_full, a)?;
        // db = -g * a / b^2 = -(g * out) / b
        let g_out = graph.mul(grad_output, output)?;
        let g_out_b = graph.div(g_out, b)?;
        let grad_b_full = graph.neg(g_out_b)?;
        let grad_b = graph.sum_to_like(grad_b_full, b)?;
        Ok(vec![Some(grad_a), Some(grad_b)])
    }
}

#[cfg(test)]
#[path = "pairwise_test.rs"]
mod tests;
