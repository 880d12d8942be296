//! Element-wise kernels used to express gradient sub-graphs.

mod pairwise;
mod unary;

pub use pairwise::{AddOp, DivOp, MulOp, SubOp};
pub use unary::{HalfReciprocalOp, NegOp, ScaleByCountOp, ScaleOp, SqrtOp};
