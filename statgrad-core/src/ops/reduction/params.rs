//! Construction parameters shared by every reduction operator.
//!
//! Parameters are fixed once built: there are no setters, only consuming
//! builder methods, so an operator's axis set and flags cannot change after
//! the operator exists.

use super::utils::{calculate_reduction_output_shape, process_reduction_axes, reduction_count};
use crate::error::StatGradError;

/// Axis set and keep-dims policy of a reduction.
///
/// `axes == None` (or an empty list) reduces over every axis. Axes are not
/// validated here; an out-of-range axis fails when the reduction is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ReduceParams {
    axes: Option<Vec<usize>>,
    keep_dims: bool,
}

impl ReduceParams {
    /// Reduce over all axes, dropping them.
    pub fn all() -> Self {
        Self::default()
    }

    /// Reduce over the given axes. An empty slice means all axes.
    pub fn along(axes: &[usize]) -> Self {
        ReduceParams {
            axes: Some(axes.to_vec()),
            keep_dims: false,
        }
    }

    pub fn keep_dims(mut self, keep_dims: bool) -> Self {
        self.keep_dims = keep_dims;
        self
    }

    pub fn axes(&self) -> Option<&[usize]> {
        self.axes.as_deref()
    }

    pub fn is_keep_dims(&self) -> bool {
        self.keep_dims
    }

    /// Sorted, deduplicated axes for an input of `rank` dimensions.
    pub fn resolve_axes(&self, rank: usize) -> Result<Vec<usize>, StatGradError> {
        process_reduction_axes(rank, self.axes())
    }

    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, StatGradError> {
        let axes = self.resolve_axes(input_shape.len())?;
        Ok(calculate_reduction_output_shape(
            input_shape,
            &axes,
            self.keep_dims,
        ))
    }

    /// Output shape with reduced axes kept as size 1, whatever `keep_dims` says.
    pub fn kept_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, StatGradError> {
        let axes = self.resolve_axes(input_shape.len())?;
        Ok(calculate_reduction_output_shape(input_shape, &axes, true))
    }

    /// Number of elements in each reduction group (`n`).
    pub fn count(&self, input_shape: &[usize]) -> Result<usize, StatGradError> {
        let axes = self.resolve_axes(input_shape.len())?;
        Ok(reduction_count(input_shape, &axes))
    }
}

/// Parameters of the variance family (variance, standard deviation).
///
/// The default matches the usual statistics-library convention: all axes,
/// reduced axes dropped, bias-corrected (`n - 1`) estimator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarianceParams {
    reduce: ReduceParams,
    bias_corrected: bool,
}

impl Default for VarianceParams {
    fn default() -> Self {
        VarianceParams {
            reduce: ReduceParams::all(),
            bias_corrected: true,
        }
    }
}

impl VarianceParams {
    pub fn new(reduce: ReduceParams, bias_corrected: bool) -> Self {
        VarianceParams {
            reduce,
            bias_corrected,
        }
    }

    pub fn reduce(&self) -> &ReduceParams {
        &self.reduce
    }

    pub fn is_bias_corrected(&self) -> bool {
        self.bias_corrected
    }

    /// `c` in the `n - c` divisor.
    pub fn correction(&self) -> usize {
        usize::from(self.bias_corrected)
    }
}
