//! Eager variance and standard deviation math.
//!
//! The forward functions back the kernels' `compute`. The backward functions
//! compute the same gradients as the symbolic sub-graphs, directly on arrays;
//! they serve callers that hold concrete values and as a reference for the
//! graph rules.

use crate::array::Array;
use crate::error::StatGradError;
use crate::ops::arithmetic::ScaleByCountOp;
use crate::ops::reduction::utils::group_offsets;
use crate::ops::reduction::{mean_axes, sum_axes, ReduceParams, VarianceParams};
use crate::types::Element;
use log::debug;

fn check_divisor(n: usize, params: &VarianceParams) -> Result<(), StatGradError> {
    if n <= params.correction() {
        return Err(StatGradError::numeric_domain(
            "var",
            format!(
                "reduction over {} elements leaves no degrees of freedom (correction {})",
                n,
                params.correction()
            ),
        ));
    }
    Ok(())
}

/// Flags each reduction group, in keep-dims order, whose elements are all equal.
fn constant_groups<T: Element>(
    x: &Array<T>,
    reduce: &ReduceParams,
) -> Result<Vec<bool>, StatGradError> {
    let axes = reduce.resolve_axes(x.rank())?;
    let groups: usize = reduce.kept_shape(x.shape())?.iter().product();
    let mut first: Vec<Option<T>> = vec![None; groups];
    let mut constant = vec![true; groups];
    for (&offset, &value) in group_offsets(x.shape(), &axes).iter().zip(x.data()) {
        match first[offset] {
            None => first[offset] = Some(value),
            Some(seen) if seen != value => constant[offset] = false,
            Some(_) => {}
        }
    }
    Ok(constant)
}

/// `sum((x - mean)^2) / (n - c)` over the reduced axes.
///
/// Groups of identical elements yield exactly zero. The rounded mean of such a
/// group can differ from its elements, so the two-pass sum alone would leave a
/// residue of order `eps^2`.
///
/// # Errors
/// `InvalidAxis` for out-of-range axes, `NumericDomain` when `n - c` is zero.
pub fn variance_forward<T: Element>(
    x: &Array<T>,
    params: &VarianceParams,
) -> Result<Array<T>, StatGradError> {
    let reduce = params.reduce();
    let n = reduce.count(x.shape())?;
    check_divisor(n, params)?;

    let mean = mean_axes(x, &kept(reduce))?;
    let centered = x.sub(&mean)?;
    let squared = centered.mul(&centered)?;
    let total = sum_axes(&squared, reduce)?;

    let factor = ScaleByCountOp::new(reduce.clone(), 1, params.correction()).factor(x.shape())?;
    let constant = constant_groups(x, reduce)?;
    let data = total
        .data()
        .iter()
        .zip(&constant)
        .map(|(&v, &is_constant)| if is_constant { T::zero() } else { v * factor })
        .collect();
    Array::new(data, total.shape().to_vec())
}

/// `sqrt(variance_forward(x))`.
pub fn std_forward<T: Element>(
    x: &Array<T>,
    params: &VarianceParams,
) -> Result<Array<T>, StatGradError> {
    variance_forward(x, params)?.sqrt()
}

/// Gradient of the variance with respect to `x`.
///
/// `grad_output` has the variance's output shape. The result is
/// `grad * 2 (x - mean) / (n - c)`, shaped like `x`.
pub fn variance_backward<T: Element>(
    x: &Array<T>,
    grad_output: &Array<T>,
    params: &VarianceParams,
) -> Result<Array<T>, StatGradError> {
    let reduce = params.reduce();
    let expected = reduce.output_shape(x.shape())?;
    if grad_output.shape() != expected.as_slice() {
        return Err(StatGradError::ShapeMismatch {
            expected,
            actual: grad_output.shape().to_vec(),
            operation: "variance_backward".to_string(),
        });
    }
    let n = reduce.count(x.shape())?;
    check_divisor(n, params)?;

    let g_kept = grad_output.reshape(reduce.kept_shape(x.shape())?)?;
    let mean = mean_axes(x, &kept(reduce))?;
    let centered = x.sub(&mean)?;
    let factor = ScaleByCountOp::new(reduce.clone(), 2, params.correction()).factor(x.shape())?;
    centered.scale(factor).mul(&g_kept)
}

/// Gradient of the standard deviation with respect to `x`.
///
/// Uses `d std = d var / (2 std)` and defers to [`variance_backward`].
///
/// # Errors
/// `NumericDomain` if any group has zero standard deviation.
pub fn std_backward<T: Element>(
    x: &Array<T>,
    grad_output: &Array<T>,
    params: &VarianceParams,
) -> Result<Array<T>, StatGradError> {
    let std = std_forward(x, params)?;
    let factor = std.half_reciprocal().map_err(|e| {
        debug!("std_backward: zero standard deviation for input {:?}", x.shape());
        e
    })?;
    let var_grad = grad_output.mul(&factor)?;
    variance_backward(x, &var_grad, params)
}

fn kept(reduce: &ReduceParams) -> ReduceParams {
    reduce.clone().keep_dims(true)
}

#[cfg(test)]
#[path = "moments_test.rs"]
mod tests;
