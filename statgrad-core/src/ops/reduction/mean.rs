use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::ops::identity::OpIdentity;
use crate::ops::operator::{input_vars, unary_input, Operator};
use crate::ops::reduction::{sum_axes, ReduceParams};
use crate::types::Element;

/// Computes the mean along the axes described by `params`.
///
/// # Errors
/// `NumericDomain` when a reduction group is empty (a zero-sized axis).
pub fn mean_axes<T: Element>(
    input: &Array<T>,
    params: &ReduceParams,
) -> Result<Array<T>, StatGradError> {
    let n = params.count(input.shape())?;
    if n == 0 {
        return Err(StatGradError::numeric_domain(
            "mean",
            "mean over an empty reduction group",
        ));
    }
    let n = T::from_usize(n)
        .ok_or_else(|| StatGradError::InternalError(format!("cannot represent count {}", n)))?;
    let sum = sum_axes(input, params)?;
    Ok(sum.map(|s| s / n))
}

/// Arithmetic mean over axes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeanOp {
    params: ReduceParams,
}

impl MeanOp {
    pub fn new(params: ReduceParams) -> Self {
        MeanOp { params }
    }

    pub fn params(&self) -> &ReduceParams {
        &self.params
    }
}

impl<T: Element> Operator<T> for MeanOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::MEAN
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        mean_axes(unary_input("mean", inputs)?, &self.params)
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        match input_shapes {
            [Some(x)] => self.params.output_shape(x).ok(),
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
        // d mean/dx = 1/n, spread over every element of the group
        let [x] = input_vars("mean", inputs)?;
        let g_kept = graph.keep_dims_like(grad_output, x, self.params.clone())?;
        let g_full = graph.broadcast_like(g_kept, x)?;
        let grad = graph.scale_by_count(g_full, self.params.clone(), 1, 0)?;
        Ok(vec![Some(grad)])
    }
}

#[cfg(test)]
#[path = "mean_test.rs"]
mod tests;
