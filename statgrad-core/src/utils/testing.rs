use crate::array::Array;
use crate::types::Element;

/// Checks that an array has the expected shape and that its data is within
/// `tolerance` of `expected_data`.
///
/// Panics with the first offending index otherwise. Meant for tests.
pub fn check_array_near<T: Element>(
    actual: &Array<T>,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data = actual.to_f64_vec();
    assert_eq!(
        actual_data.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        let diff = (a - e).abs();
        if diff > tolerance || diff.is_nan() {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Helper to create an f64 array for tests.
#[cfg(test)]
pub(crate) fn create_test_array(data: Vec<f64>, shape: Vec<usize>) -> Array<f64> {
    Array::new(data, shape).expect("Failed to create test array")
}
