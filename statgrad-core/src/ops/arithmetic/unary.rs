use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::ops::identity::OpIdentity;
use crate::ops::operator::{input_vars, unary_input, Operator};
use crate::ops::reduction::ReduceParams;
use crate::types::Element;

fn same_shape(input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
    match input_shapes {
        [Some(shape)] => Some(shape.to_vec()),
        _ => None,
    }
}

/// `-x`
#[derive(Debug, Clone, Copy, Default)]
pub struct NegOp;

impl<T: Element> Operator<T> for NegOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::NEG
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        Ok(unary_input("neg", inputs)?.neg())
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        same_shape(input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        _inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        Ok(vec![Some(graph.neg(grad_output)?)])
    }
}

/// `sqrt(x)`; negative input is a numeric-domain error.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqrtOp;

impl<T: Element> Operator<T> for SqrtOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::SQRT
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        unary_input("sqrt", inputs)?.sqrt()
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        same_shape(input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        _inputs: &[VarId],
        output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        // d sqrt(x)/dx = 1 / (2 sqrt(x))
        let factor = graph.half_reciprocal(output)?;
        Ok(vec![Some(graph.mul(grad_output, factor)?)])
    }
}

/// Multiplies by a constant factor.
#[derive(Debug, Clone, Copy)]
pub struct ScaleOp<T> {
    factor: T,
}

impl<T: Element> ScaleOp<T> {
    pub fn new(factor: T) -> Self {
        ScaleOp { factor }
    }

    pub fn factor(&self) -> T {
        self.factor
    }
}

impl<T: Element> Operator<T> for ScaleOp<T> {
    fn identity(&self) -> OpIdentity {
        OpIdentity::SCALE
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        Ok(unary_input("scale", inputs)?.scale(self.factor))
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        same_shape(input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        _inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        Ok(vec![Some(graph.scale(grad_output, self.factor)?)])
    }
}

/// `x * multiplier / (n - correction)`, where `n` is the element count of the
/// reduction groups `reduce` describes over the input's own shape.
///
/// This is the factor shared by mean (`1/n`) and variance (`2/(n - c)`)
/// gradients. The count is only known once the input is concrete, which is why
/// it is a kernel and not a constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleByCountOp {
    reduce: ReduceParams,
    multiplier: usize,
    correction: usize,
}

impl ScaleByCountOp {
    pub fn new(reduce: ReduceParams, multiplier: usize, correction: usize) -> Self {
        ScaleByCountOp {
            reduce,
            multiplier,
            correction,
        }
    }

    /// `multiplier / (n - correction)` for an input of `shape`.
    pub fn factor<T: Element>(&self, shape: &[usize]) -> Result<T, StatGradError> {
        let n = self.reduce.count(shape)?;
        if n <= self.correction {
            return Err(StatGradError::numeric_domain(
                "scale_by_count",
                format!(
                    "reduction over {} elements with correction {} has no valid divisor",
                    n, self.correction
                ),
            ));
        }
        let num = T::from_usize(self.multiplier);
        let den = T::from_usize(n - self.correction);
        match (num, den) {
            (Some(num), Some(den)) => Ok(num / den),
            _ => Err(StatGradError::InternalError(format!(
                "cannot represent {}/{} in {:?}",
                self.multiplier,
                n - self.correction,
                T::DTYPE
            ))),
        }
    }
}

impl<T: Element> Operator<T> for ScaleByCountOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::SCALE_BY_COUNT
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let x = unary_input("scale_by_count", inputs)?;
        let factor = self.factor::<T>(x.shape())?;
        Ok(x.scale(factor))
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        same_shape(input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        _inputs: &[VarId],
        _output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let grad = graph.scale_by_count(
            grad_output,
            self.reduce.clone(),
            self.multiplier,
            self.correction,
        )?;
        Ok(vec![Some(grad)])
    }
}

/// `1 / (2x)`, the derivative of `sqrt` expressed through its output.
/// Zero input is a numeric-domain error.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfReciprocalOp;

impl<T: Element> Operator<T> for HalfReciprocalOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::HALF_RECIPROCAL
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        unary_input("half_reciprocal", inputs)?.half_reciprocal()
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        same_shape(input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        input_vars::<1>("half_reciprocal", inputs)?;
        // y = 1/(2x)  =>  dy/dx = -1/(2x^2) = -2y^2
        let y_sq = graph.mul(output, output)?;
        let two = T::one() + T::one();
        let two_y_sq = graph.scale(y_sq, two)?;
        let g = graph.mul(grad_output, two_y_sq)?;
        Ok(vec![Some(graph.neg(g)?)])
    }
}

#[cfg(test)]
#[path = "unary_test.rs"]
mod tests;
