//! Reverse-mode differentiation over a [`Graph`](crate::graph::Graph).
//!
//! Backward rules live on the operators (see
//! [`Operator::backward`](crate::ops::operator::Operator::backward)); this
//! module orders the nodes, seeds the target, and sums the gradients of
//! variables with several consumers.

mod backward;
pub mod grad_check;
pub(crate) mod graph;

pub use grad_check::{check_grad, GradCheckError};
