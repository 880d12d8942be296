use statgrad_core::{
    reduction_operator, OpFamily, OpIdentity, OperatorNode, ReduceParams, StatGradError,
    VarianceParams,
};

mod common;
use common::create_test_array;

#[test]
fn test_summary_stats_identities() {
    let var = OpIdentity::lookup(OpFamily::SummaryStats, 0).unwrap();
    let std = OpIdentity::lookup(OpFamily::SummaryStats, 1).unwrap();
    assert_eq!(var.name(), "var");
    assert_eq!(std.name(), "std");
    assert_eq!(OpIdentity::from_code(std.code()).unwrap(), std);
    assert_eq!(OpIdentity::from_name("var").unwrap(), var);
}

#[test]
fn test_every_identity_round_trips() {
    for id in OpIdentity::all() {
        assert_eq!(OpIdentity::from_code(id.code()).unwrap(), *id);
        assert_eq!(OpIdentity::from_name(id.name()).unwrap(), *id);
    }
}

#[test]
fn test_dispatch_by_code() {
    let x = create_test_array(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], vec![8]);
    let params = VarianceParams::new(ReduceParams::all(), false);
    let code = OpIdentity::STD.code();
    let op = reduction_operator::<f64>(OpIdentity::from_code(code).unwrap(), params).unwrap();
    let node = OperatorNode::eager(op, vec![x]);
    assert_eq!(node.op_identity(), OpIdentity::STD);
    approx::assert_relative_eq!(node.forward().unwrap().item().unwrap(), 2.0);
}

#[test]
fn test_unknown_identities() {
    assert!(matches!(
        OpIdentity::from_name("median"),
        Err(StatGradError::UnknownOperator(_))
    ));
    assert!(OpIdentity::from_code(u32::MAX).is_err());
    assert!(reduction_operator::<f64>(OpIdentity::SQRT, VarianceParams::default()).is_err());
}
