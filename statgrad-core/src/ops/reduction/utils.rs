//! Utility functions for reduction operations.

use crate::array::utils::{calculate_strides, index_to_coord};
use crate::error::StatGradError;

/// Processes the axes provided for a reduction operation.
///
/// - If `axes` is `None` or an empty slice, returns all axes `0..rank`.
/// - Otherwise validates each axis against the rank and removes duplicates.
///
/// # Returns
/// A sorted `Vec<usize>` of unique axes, or `StatGradError::InvalidAxis` if any
/// axis is out of bounds.
pub(crate) fn process_reduction_axes(
    rank: usize,
    axes: Option<&[usize]>,
) -> Result<Vec<usize>, StatGradError> {
    match axes {
        Some(ax) if !ax.is_empty() => {
            let mut processed_axes = Vec::with_capacity(ax.len());
            for &axis in ax {
                if axis >= rank {
                    return Err(StatGradError::InvalidAxis { axis, rank });
                }
                processed_axes.push(axis);
            }
            processed_axes.sort_unstable();
            processed_axes.dedup();
            Ok(processed_axes)
        }
        _ => Ok((0..rank).collect()),
    }
}

/// Calculates the output shape after a reduction operation.
///
/// # Arguments
/// * `input_shape`: The shape of the original array.
/// * `axes`: Processed (unique, in-range) axes to reduce.
/// * `keep_dims`: If true, reduced dimensions are kept with size 1.
pub(crate) fn calculate_reduction_output_shape(
    input_shape: &[usize],
    axes: &[usize],
    keep_dims: bool,
) -> Vec<usize> {
    input_shape
        .iter()
        .enumerate()
        .filter_map(|(i, &dim_size)| {
            if !axes.contains(&i) {
                Some(dim_size)
            } else if keep_dims {
                Some(1)
            } else {
                None
            }
        })
        .collect()
}

/// Number of input elements folded into each output element.
pub(crate) fn reduction_count(input_shape: &[usize], axes: &[usize]) -> usize {
    axes.iter().map(|&axis| input_shape[axis]).product()
}

/// For every element of `input_shape`, in row-major order, the flat offset of
/// its group in the keep-dims output.
pub(crate) fn group_offsets(input_shape: &[usize], axes: &[usize]) -> Vec<usize> {
    let kept_shape = calculate_reduction_output_shape(input_shape, axes, true);
    let kept_strides = calculate_strides(&kept_shape);
    let numel: usize = input_shape.iter().product();
    (0..numel)
        .map(|i| {
            index_to_coord(i, input_shape)
                .iter()
                .enumerate()
                .filter(|(dim, _)| !axes.contains(dim))
                .map(|(dim, &c)| c * kept_strides[dim])
                .sum()
        })
        .collect()
}
