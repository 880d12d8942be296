use crate::error::StatGradError;
use std::cmp::max;

/// Calculates the strides for a given shape.
/// Strides represent the number of elements to skip in the flattened data array
/// to move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// Follows NumPy broadcasting rules:
/// 1. If the shapes have different numbers of dimensions, prepend 1s to the shorter shape.
/// 2. Compare dimensions element-wise from right to left.
/// 3. Dimensions are compatible if they are equal, or one of them is 1.
/// 4. The resulting dimension size is the maximum of the two compared dimensions.
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>, StatGradError> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = shape_a.get(rank_a.wrapping_sub(1 + i)).copied().unwrap_or(1);
        let dim_b = shape_b.get(rank_b.wrapping_sub(1 + i)).copied().unwrap_or(1);

        result_shape[max_rank - 1 - i] = if dim_a == dim_b || dim_b == 1 {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else {
            return Err(StatGradError::BroadcastError {
                shape1: shape_a.to_vec(),
                shape2: shape_b.to_vec(),
            });
        };
    }
    Ok(result_shape)
}

/// Converts a linear (row-major) index into coordinates for `shape`.
pub fn index_to_coord(index: usize, shape: &[usize]) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    let mut remaining = index;
    for (i, &dim) in shape.iter().enumerate().rev() {
        if dim == 0 {
            continue;
        }
        coord[i] = remaining % dim;
        remaining /= dim;
    }
    coord
}

/// Maps coordinates of a broadcast output back to the flat offset of a source
/// of shape `source_shape` (right-aligned, size-1 dimensions pinned to 0).
pub fn broadcast_source_offset(out_coord: &[usize], source_shape: &[usize]) -> usize {
    let rank_diff = out_coord.len() - source_shape.len();
    let strides = calculate_strides(source_shape);
    source_shape
        .iter()
        .zip(strides.iter())
        .enumerate()
        .map(|(i, (&dim, &stride))| {
            let c = if dim == 1 { 0 } else { out_coord[rank_diff + i] };
            c * stride
        })
        .sum()
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
