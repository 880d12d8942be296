use approx::assert_relative_eq;
use statgrad_core::ops::reduction::moments::{std_backward, variance_backward};
use statgrad_core::{Array, ErrorKind, ReduceParams, StdOp, VarianceOp, VarianceParams};

mod common;
use common::{create_test_array, seeded_rng};

#[test]
fn test_one_to_four_reference_values() {
    let x = create_test_array(vec![1.0, 2.0, 3.0, 4.0], vec![4]);
    let biased = VarianceParams::new(ReduceParams::all(), false);
    let unbiased = VarianceParams::default();

    let var_b = VarianceOp::eager(x.clone(), biased.clone()).forward().unwrap();
    let std_b = StdOp::eager(x.clone(), biased).forward().unwrap();
    let var_u = VarianceOp::eager(x.clone(), unbiased.clone()).forward().unwrap();
    let std_u = StdOp::eager(x, unbiased).forward().unwrap();

    assert_relative_eq!(var_b.item().unwrap(), 1.25, epsilon = 1e-12);
    assert_relative_eq!(std_b.item().unwrap(), 1.1180339887, epsilon = 1e-9);
    assert_relative_eq!(var_u.item().unwrap(), 1.6667, epsilon = 1e-4);
    assert_relative_eq!(std_u.item().unwrap(), 1.2910, epsilon = 1e-4);
}

#[test]
fn test_std_is_sqrt_of_variance_on_random_data() {
    let mut rng = seeded_rng(7);
    let x = Array::<f64>::randn_with(&[3, 4, 5], &mut rng).unwrap();
    for axes in [vec![0], vec![1, 2], vec![]] {
        for bias_corrected in [true, false] {
            let params = VarianceParams::new(ReduceParams::along(&axes), bias_corrected);
            let var = VarianceOp::eager(x.clone(), params.clone()).forward().unwrap();
            let std = StdOp::eager(x.clone(), params).forward().unwrap();
            assert_eq!(var.shape(), std.shape());
            for (v, s) in var.data().iter().zip(std.data()) {
                assert_relative_eq!(v.sqrt(), *s, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_keep_dims_shapes() {
    let x = Array::<f64>::ones(&[2, 3, 4]);
    let cases: [(&[usize], bool, &[usize]); 4] = [
        (&[1], true, &[2, 1, 4]),
        (&[1], false, &[2, 4]),
        (&[0, 2], true, &[1, 3, 1]),
        (&[], false, &[]),
    ];
    for (axes, keep_dims, expected) in cases {
        let params = VarianceParams::new(ReduceParams::along(axes).keep_dims(keep_dims), false);
        let out = StdOp::eager(x.clone(), params).forward().unwrap();
        assert_eq!(out.shape(), expected, "axes {:?} keep_dims {}", axes, keep_dims);
    }
}

#[test]
fn test_specialization_consistency() {
    let mut rng = seeded_rng(11);
    let x = Array::<f64>::rand_with(&[4, 3], -2.0, 2.0, &mut rng).unwrap();
    let params = VarianceParams::new(ReduceParams::along(&[0]), true);
    let g = Array::<f64>::randn_with(&[3], &mut rng).unwrap();

    let std = StdOp::eager(x.clone(), params.clone()).forward().unwrap();
    let grad_var = variance_backward(&x, &g, &params).unwrap();
    let grad_std = std_backward(&x, &g, &params).unwrap();
    for (i, (gs, gv)) in grad_std.data().iter().zip(grad_var.data()).enumerate() {
        assert_relative_eq!(*gs, gv / (2.0 * std.data()[i % 3]), epsilon = 1e-12);
    }
}

#[test]
fn test_zero_variance_eager_gradient_is_an_error() {
    let x = Array::<f64>::full(&[2, 3], 4.0);
    let params = VarianceParams::new(ReduceParams::along(&[1]), true);
    let std = StdOp::eager(x.clone(), params.clone()).forward().unwrap();
    assert_eq!(std.data(), &[0.0, 0.0]);
    let err = std_backward(&x, &Array::ones(&[2]), &params).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NumericDomain);
}

#[test]
fn test_inexact_constants_have_exactly_zero_variance() {
    for (value, n) in [(0.1, 3), (0.7, 5), (1.1, 7), (3.3, 7)] {
        let x = Array::<f64>::full(&[n], value);
        let params = VarianceParams::default();
        let var = VarianceOp::eager(x.clone(), params.clone()).forward().unwrap();
        assert_eq!(var.item().unwrap(), 0.0, "[{}; {}]", value, n);
        let err = std_backward(&x, &Array::scalar(1.0), &params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericDomain, "[{}; {}]", value, n);
    }
}

#[test]
fn test_inexact_constant_group_next_to_varying_group() {
    let x = create_test_array(vec![0.1, 0.1, 0.1, 1.0, 2.0, 4.0], vec![2, 3]);
    let params = VarianceParams::new(ReduceParams::along(&[1]), false);
    let var = VarianceOp::eager(x.clone(), params.clone()).forward().unwrap();
    assert_eq!(var.data()[0], 0.0);
    assert_relative_eq!(var.data()[1], 14.0 / 9.0, epsilon = 1e-12);
    assert!(std_backward(&x, &Array::ones(&[2]), &params).is_err());
}
