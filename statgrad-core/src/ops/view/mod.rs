//! Shape-only kernels: broadcasting, summing back, reshaping and filling.

mod like;

pub use like::{
    BroadcastLikeOp, KeepDimsLikeOp, OnesLikeOp, ReshapeLikeOp, SumToLikeOp, ZerosLikeOp,
};
