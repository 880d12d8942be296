use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::ops::identity::OpIdentity;
use crate::ops::operator::{input_vars, unary_input, Operator};
use crate::ops::reduction::moments::variance_forward;
use crate::ops::reduction::VarianceParams;
use crate::types::Element;
use log::debug;

/// Variance over axes, optionally bias-corrected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VarianceOp {
    params: VarianceParams,
}

impl VarianceOp {
    pub fn new(params: VarianceParams) -> Self {
        VarianceOp { params }
    }

    pub fn params(&self) -> &VarianceParams {
        &self.params
    }

    /// Builds `dL/dx` for `var(x)` given the upstream gradient `grad`, which
    /// must have the variance's output shape.
    ///
    /// The sub-graph is `keep_dims(grad) * 2 (x - mean(x)) / (n - c)`. The mean
    /// also depends on `x`, but its contribution is
    /// `-2/(n - c) * sum(x - mean) / n`, and `sum(x - mean)` vanishes, so no
    /// nodes are added for it.
    ///
    /// Anything producing a gradient that feeds into a variance, standard
    /// deviation included, reuses this.
    pub fn grad_subgraph<T: Element>(
        &self,
        graph: &mut Graph<T>,
        x: VarId,
        grad: VarId,
    ) -> Result<VarId, StatGradError> {
        let reduce = self.params.reduce();
        let g_kept = if reduce.is_keep_dims() {
            grad
        } else {
            graph.keep_dims_like(grad, x, reduce.clone())?
        };
        let mean = graph.mean(x, reduce.clone().keep_dims(true))?;
        let centered = graph.sub(x, mean)?;
        let scaled = graph.scale_by_count(centered, reduce.clone(), 2, self.params.correction())?;
        let result = graph.mul(scaled, g_kept)?;
        debug!(
            "variance gradient for {} built as {} (bias_corrected: {})",
            x,
            result,
            self.params.is_bias_corrected()
        );
        Ok(result)
    }
}

impl<T: Element> Operator<T> for VarianceOp {
    fn identity(&self) -> OpIdentity {
        OpIdentity::VARIANCE
    }

    fn compute(&self, inputs: &[&Array<T>]) -> Result<Array<T>, StatGradError> {
        variance_forward(unary_input("var", inputs)?, &self.params)
    }

    fn infer_shape(&self, input_shapes: &[Option<&[usize]>]) -> Option<Vec<usize>> {
        match input_shapes {
            [Some(x)] => self.params.reduce().output_shape(x).ok(),
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
        let [x] = input_vars("var", inputs)?;
        Ok(vec![Some(self.grad_subgraph(graph, x, grad_output)?)])
    }
}

#[cfg(test)]
#[path = "variance_test.rs"]
mod tests;
