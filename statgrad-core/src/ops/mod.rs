//! # Operators (`ops`)
//!
//! - [`operator`]: the [`Operator`](operator::Operator) trait every kernel implements.
//! - [`identity`]: stable `(family, num)` identities and lookups.
//! - [`node`]: [`OperatorNode`](node::OperatorNode), an operator in eager or symbolic mode.
//! - [`reduction`]: sum, mean, variance and standard deviation.
//! - [`arithmetic`] and [`view`]: the primitives gradient sub-graphs are built from.

pub mod arithmetic;
pub mod identity;
pub mod node;
pub mod operator;
pub mod reduction;
pub mod view;
