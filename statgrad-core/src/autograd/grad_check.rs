use crate::array::Array;
use crate::error::StatGradError;
use crate::graph::{Graph, VarId};
use crate::types::Element;
use approx::relative_eq;
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical grad {analytical_grad:?} != numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Input {input_index} ({var}) has no array in the feeds")]
    MissingFeed { input_index: usize, var: VarId },
    #[error("Output gradient shape {actual:?} does not match output shape {expected:?}")]
    OutputGradShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Forward evaluation failed during gradient check: {0}")]
    ForwardPassError(StatGradError),
    #[error("Building or evaluating the gradient graph failed: {0}")]
    BackwardPassError(StatGradError),
    #[error("Array error during intermediate calculation: {0}")]
    ArrayError(StatGradError),
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
}

impl From<StatGradError> for GradCheckError {
    fn from(err: StatGradError) -> Self {
        GradCheckError::ArrayError(err)
    }
}

/// Checks the analytical gradients of `output` against central finite differences.
///
/// The scalar loss is `sum(output * output_grad)`, so the analytical gradient is
/// the one obtained by seeding reverse mode with `output_grad`. Every variable in
/// `wrt` must be fed; each of its elements is perturbed by `±epsilon` in turn.
///
/// Gradient nodes are appended to `graph`.
pub fn check_grad<T: Element>(
    graph: &mut Graph<T>,
    output: VarId,
    wrt: &[VarId],
    feeds: &HashMap<VarId, Array<T>>,
    output_grad: &Array<T>,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError> {
    for (i, &var) in wrt.iter().enumerate() {
        if !feeds.contains_key(&var) {
            return Err(GradCheckError::MissingFeed { input_index: i, var });
        }
    }

    // --- Forward and analytical gradients ---
    let value = graph
        .evaluate(output, feeds)
        .map_err(GradCheckError::ForwardPassError)?;
    if value.shape() != output_grad.shape() {
        return Err(GradCheckError::OutputGradShapeMismatch {
            expected: value.shape().to_vec(),
            actual: output_grad.shape().to_vec(),
        });
    }
    let seed = graph.constant("grad_check_seed", output_grad.clone());
    let grad_vars = graph
        .gradients(output, Some(seed), wrt)
        .map_err(GradCheckError::BackwardPassError)?;
    let analytical = graph
        .evaluate_many(&grad_vars, feeds)
        .map_err(GradCheckError::BackwardPassError)?;

    let weights = output_grad.to_f64_vec();
    let two = 2.0f64;

    // --- Numerical gradients, one element at a time ---
    for (i, &var) in wrt.iter().enumerate() {
        let original = &feeds[&var];
        let original_data = original.to_f64_vec();
        let analytical_data = analytical[i].to_f64_vec();

        for elem_idx in 0..original.numel() {
            let loss_plus = perturbed_loss(
                graph,
                output,
                feeds,
                var,
                original,
                &original_data,
                elem_idx,
                epsilon,
                &weights,
            )?;
            let loss_minus = perturbed_loss(
                graph,
                output,
                feeds,
                var,
                original,
                &original_data,
                elem_idx,
                -epsilon,
                &weights,
            )?;
            let numerical_grad = (loss_plus - loss_minus) / (two * epsilon);
            let analytical_grad = analytical_data[elem_idx];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }
            if !relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = tolerance,
                max_relative = tolerance
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
        debug!(
            "check_grad: {} elements of {} match within {}",
            original.numel(),
            var,
            tolerance
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn perturbed_loss<T: Element>(
    graph: &Graph<T>,
    output: VarId,
    feeds: &HashMap<VarId, Array<T>>,
    var: VarId,
    original: &Array<T>,
    original_data: &[f64],
    elem_idx: usize,
    delta: f64,
    weights: &[f64],
) -> Result<f64, GradCheckError> {
    let data = original_data
        .iter()
        .enumerate()
        .map(|(j, &x)| {
            let x = if j == elem_idx { x + delta } else { x };
            T::from_f64(x).ok_or_else(|| {
                StatGradError::InternalError(format!("cannot represent {} as {:?}", x, T::DTYPE))
            })
        })
        .collect::<Result<Vec<T>, StatGradError>>()?;
    let perturbed = Array::new(data, original.shape().to_vec())?;

    let mut perturbed_feeds = feeds.clone();
    perturbed_feeds.insert(var, perturbed);
    let out = graph
        .evaluate(output, &perturbed_feeds)
        .map_err(GradCheckError::ForwardPassError)?;

    Ok(out
        .to_f64_vec()
        .iter()
        .zip(weights)
        .map(|(o, w)| o * w)
        .sum())
}
