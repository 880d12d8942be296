use super::*;
use crate::utils::testing::{check_array_near, create_test_array};
use std::collections::HashMap;

fn sample() -> Array<f64> {
    create_test_array(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])
}

#[test]
fn test_sum_all() {
    let result = sum_axes(&sample(), &ReduceParams::all()).unwrap();
    check_array_near(&result, &[], &[21.0], 1e-12);
}

#[test]
fn test_sum_axis0() {
    let result = sum_axes(&sample(), &ReduceParams::along(&[0])).unwrap();
    check_array_near(&result, &[3], &[5.0, 7.0, 9.0], 1e-12);
}

#[test]
fn test_sum_axis1_keepdims() {
    let result = sum_axes(&sample(), &ReduceParams::along(&[1]).keep_dims(true)).unwrap();
    check_array_near(&result, &[2, 1], &[6.0, 15.0], 1e-12);
}

#[test]
fn test_sum_multiple_axes() {
    let t = create_test_array((1..=24).map(f64::from).collect(), vec![2, 3, 4]);
    let result = sum_axes(&t, &ReduceParams::along(&[0, 2])).unwrap();
    // Each middle index j collects 8 values
    check_array_near(&result, &[3], &[68.0, 100.0, 132.0], 1e-12);
    let kept = sum_axes(&t, &ReduceParams::along(&[2, 0]).keep_dims(true)).unwrap();
    check_array_near(&kept, &[1, 3, 1], &[68.0, 100.0, 132.0], 1e-12);
}

#[test]
fn test_sum_duplicate_axes_and_empty_list() {
    let dup = sum_axes(&sample(), &ReduceParams::along(&[1, 1])).unwrap();
    check_array_near(&dup, &[2], &[6.0, 15.0], 1e-12);
    let all = sum_axes(&sample(), &ReduceParams::along(&[]).keep_dims(true)).unwrap();
    check_array_near(&all, &[1, 1], &[21.0], 1e-12);
}

#[test]
fn test_sum_invalid_axis() {
    assert!(matches!(
        sum_axes(&sample(), &ReduceParams::along(&[2])),
        Err(StatGradError::InvalidAxis { axis: 2, rank: 2 })
    ));
}

#[test]
fn test_sum_backward_broadcasts_gradient() {
    let mut g = Graph::<f64>::new();
    let x = g.new_variable_with_shape("x", &[2, 3]);
    let s = g.sum(x, ReduceParams::along(&[1])).unwrap();
    let upstream = g.constant("up", create_test_array(vec![2.0, -1.0], vec![2]));
    let dx = g.gradients(s, Some(upstream), &[x]).unwrap()[0];

    let mut feeds = HashMap::new();
    feeds.insert(x, sample());
    check_array_near(
        &g.evaluate(dx, &feeds).unwrap(),
        &[2, 3],
        &[2.0, 2.0, 2.0, -1.0, -1.0, -1.0],
        1e-12,
    );
}
