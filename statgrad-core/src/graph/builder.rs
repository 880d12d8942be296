//! Convenience constructors for the graph-level primitives.
//!
//! Each method is `apply` with a fresh kernel; backward rules are written in
//! terms of these.

use super::{Graph, VarId};
use crate::error::StatGradError;
use crate::ops::arithmetic::{
    AddOp, DivOp, HalfReciprocalOp, MulOp, NegOp, ScaleByCountOp, ScaleOp, SqrtOp, SubOp,
};
use crate::ops::reduction::{MeanOp, ReduceParams, StdOp, SumOp, VarianceOp, VarianceParams};
use crate::ops::view::{
    BroadcastLikeOp, KeepDimsLikeOp, OnesLikeOp, ReshapeLikeOp, SumToLikeOp, ZerosLikeOp,
};
use crate::types::Element;
use std::sync::Arc;

impl<T: Element> Graph<T> {
    /// Both variables' shapes are statically known and identical.
    fn same_known_shape(&self, a: VarId, b: VarId) -> bool {
        matches!((self.shape_hint(a), self.shape_hint(b)), (Some(x), Some(y)) if x == y)
    }

    pub fn add(&mut self, a: VarId, b: VarId) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(AddOp), &[a, b])
    }

    pub fn sub(&mut self, a: VarId, b: VarId) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(SubOp), &[a, b])
    }

    pub fn mul(&mut self, a: VarId, b: VarId) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(MulOp), &[a, b])
    }

    pub fn div(&mut self, a: VarId, b: VarId) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(DivOp), &[a, b])
    }

    pub fn neg(&mut self, x: VarId) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(NegOp), &[x])
    }

    pub fn sqrt(&mut self, x: VarId) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(SqrtOp), &[x])
    }

    pub fn scale(&mut self, x: VarId, factor: T) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(ScaleOp::new(factor)), &[x])
    }

    /// `x * multiplier / (n - correction)`, `n` taken from `reduce` over `x`'s shape.
    pub fn scale_by_count(
        &mut self,
        x: VarId,
        reduce: ReduceParams,
        multiplier: usize,
        correction: usize,
    ) -> Result<VarId, StatGradError> {
        self.apply(
            Arc::new(ScaleByCountOp::new(reduce, multiplier, correction)),
            &[x],
        )
    }

    /// `1 / (2x)`, the factor turning a variance gradient into a standard
    /// deviation gradient.
    pub fn half_reciprocal(&mut self, x: VarId) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(HalfReciprocalOp), &[x])
    }

    pub fn broadcast_like(&mut self, a: VarId, like: VarId) -> Result<VarId, StatGradError> {
        if self.same_known_shape(a, like) {
            return Ok(a);
        }
        self.apply(Arc::new(BroadcastLikeOp), &[a, like])
    }

    /// Sums `a` over the dimensions broadcasting added relative to `like`.
    pub fn sum_to_like(&mut self, a: VarId, like: VarId) -> Result<VarId, StatGradError> {
        if self.same_known_shape(a, like) {
            return Ok(a);
        }
        self.apply(Arc::new(SumToLikeOp), &[a, like])
    }

    /// Re-inserts the axes `reduce` removed from `x` into the reduction result `g`.
    pub fn keep_dims_like(
        &mut self,
        g: VarId,
        x: VarId,
        reduce: ReduceParams,
    ) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(KeepDimsLikeOp::new(reduce)), &[g, x])
    }

    pub fn reshape_like(&mut self, a: VarId, like: VarId) -> Result<VarId, StatGradError> {
        if self.same_known_shape(a, like) {
            return Ok(a);
        }
        self.apply(Arc::new(ReshapeLikeOp), &[a, like])
    }

    pub fn ones_like(&mut self, x: VarId) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(OnesLikeOp), &[x])
    }

    pub fn zeros_like(&mut self, x: VarId) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(ZerosLikeOp), &[x])
    }

    pub fn sum(&mut self, x: VarId, params: ReduceParams) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(SumOp::new(params)), &[x])
    }

    pub fn mean(&mut self, x: VarId, params: ReduceParams) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(MeanOp::new(params)), &[x])
    }

    pub fn variance(&mut self, x: VarId, params: VarianceParams) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(VarianceOp::new(params)), &[x])
    }

    pub fn std(&mut self, x: VarId, params: VarianceParams) -> Result<VarId, StatGradError> {
        self.apply(Arc::new(StdOp::new(params)), &[x])
    }
}
