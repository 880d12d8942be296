use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::ops::identity::OpIdentity;
use crate::ops::operator::{input_vars, unary_input, Operator};
use crate::ops::reduction::{VarianceOp, VarianceParams};
use crate::types::Element;

/// Standard deviation: the square root of [`VarianceOp`] with the same parameters.
///
/// It owns a variance kernel and nothing else, so both always agree on axes,
/// keep-dims and bias correction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StdOp {
    variance: VarianceOp,
}

impl StdOp {
    pub fn new(params: VarianceParams) -> Self {
        StdOp {
            variance: VarianceOp::new(params),
        }
    }

    pub fn params(&self) -> &VarianceParams {
        self.variance.params()
    }

    pub fn variance(&self) -> &VarianceOp {
        &self.variance
    }
}

impl<T: Element> Operator<T> for StdOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::STD
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        let x = unary_input("std", inputs)?;
        Operator::<T>::compute(&self.variance, &[x])?.sqrt()
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        Operator::<T>::infer_shape(&self.variance, input_shapes)
    }

    fn backward(
        &self,
        graph: &mut Graph<T>,
        inputs: &[VarId],
        output: VarId,
        grad_output: VarId,
    ) -> Result<Vec<Option<VarId>>, StatGradError> {
        let [x] = input_vars("std", inputs)?;
        // d std = d var / (2 std); zero std fails when the factor is evaluated
        let factor = graph.half_reciprocal(output)?;
        let var_grad = graph.mul(grad_output, factor)?;
        Ok(vec![Some(self.variance.grad_subgraph(graph, x, var_grad)?)])
    }
}

#[cfg(test)]
#[path = "std_dev_test.rs"]
mod tests;
