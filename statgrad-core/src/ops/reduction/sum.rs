use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::ops::identity::OpIdentity;
use crate::ops::operator::{input_vars, unary_input, Operator};
use crate::ops::reduction::utils::group_offsets;
use crate::ops::reduction::ReduceParams;
use crate::types::Element;

/// Calculates the sum of elements along the axes described by `params`.
///
/// Accumulation happens into the keep-dims shape; the result is then reshaped
/// to the requested output shape, which shares the buffer.
pub fn sum_axes<T: Element>(
    input: &Array<T>,
    params: &ReduceParams,
) -> Result<Array<T>, StatGradError> {
    let axes = params.resolve_axes(input.rank())?;
    let kept_shape = params.kept_shape(input.shape())?;
    let out_numel: usize = kept_shape.iter().product();

    let mut result_data = vec![T::zero(); out_numel];
    let offsets = group_offsets(input.shape(), &axes);
    for (&offset, &value) in offsets.iter().zip(input.data()) {
        result_data[offset] = result_data[offset] + value;
    }

    let kept = Array::new(result_data, kept_shape)?;
    if params.is_keep_dims() {
        Ok(kept)
    } else {
        kept.reshape(params.output_shape(input.shape())?)
    }
}

/// Sum over axes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SumOp {
    params: ReduceParams,
}

impl SumOp {
    pub fn new(params: ReduceParams) -> Self {
        SumOp { params }
    }

    pub fn params(&self) -> &ReduceParams {
        &self.params
    }
}

impl<T: Element> Operator<T> for SumOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::SUM
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        sum_axes(unary_input("sum", inputs)?, &self.params)
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
        let [x] = input_vars("sum", inputs)?;
        let g_kept = graph.keep_dims_like(grad_output, x, self.params.clone())?;
        Ok(vec![Some(graph.broadcast_like(g_kept, x)?)])
    }
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
