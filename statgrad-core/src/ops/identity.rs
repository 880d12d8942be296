//! Stable operator identities.
//!
//! An operator is identified by its family and a small number within that
//! family; the pair is the key used for serialization and dispatch and never
//! changes once assigned. The name is for humans and for lookups by string.

use crate::error::StatGradError;
use std::fmt;

/// Operator families. The discriminant is part of the stable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum OpFamily {
    /// Plain accumulations over axes (sum, mean).
    Accumulation = 1,
    /// Summary statistics of the variance family (variance, standard deviation).
    SummaryStats = 2,
    /// Broadcasting binary element-wise arithmetic.
    Pairwise = 3,
    /// Unary element-wise transforms.
    Transform = 4,
    /// Shape plumbing used by gradient sub-graphs.
    Shape = 5,
}

impl OpFamily {
    fn from_u8(value: u8) -> Option<OpFamily> {
        match value {
            1 => Some(OpFamily::Accumulation),
            2 => Some(OpFamily::SummaryStats),
            3 => Some(OpFamily::Pairwise),
            4 => Some(OpFamily::Transform),
            5 => Some(OpFamily::Shape),
            _ => None,
        }
    }
}

/// Identity of an operator: `(family, num)` plus a human-readable name.
///
/// Two operators with equal identities compute the same forward value for the
/// same inputs and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpIdentity {
    family: OpFamily,
    num: u16,
    name: &'static str,
}

macro_rules! op_identities {
    ($($konst:ident => ($family:ident, $num:expr, $name:expr)),* $(,)?) => {
        impl OpIdentity {
            $(
                pub const $konst: OpIdentity = OpIdentity {
                    family: OpFamily::$family,
                    num: $num,
                    name: $name,
                };
            )*
        }

        const REGISTERED_OPS: &[OpIdentity] = &[$(OpIdentity::$konst),*];
    };
}

op_identities! {
    MEAN => (Accumulation, 0, "mean"),
    SUM => (Accumulation, 1, "sum"),
    VARIANCE => (SummaryStats, 0, "var"),
    STD => (SummaryStats, 1, "std"),
    ADD => (Pairwise, 0, "add"),
    SUB => (Pairwise, 1, "sub"),
    MUL => (Pairwise, 2, "mul"),
    DIV => (Pairwise, 3, "div"),
    NEG => (Transform, 0, "neg"),
    SQRT => (Transform, 1, "sqrt"),
    SCALE => (Transform, 2, "scale"),
    SCALE_BY_COUNT => (Transform, 3, "scale_by_count"),
    HALF_RECIPROCAL => (Transform, 4, "half_reciprocal"),
    BROADCAST_LIKE => (Shape, 0, "broadcast_like"),
    SUM_TO_LIKE => (Shape, 1, "sum_to_like"),
    KEEP_DIMS_LIKE => (Shape, 2, "keep_dims_like"),
    RESHAPE_LIKE => (Shape, 3, "reshape_like"),
    ONES_LIKE => (Shape, 4, "ones_like"),
    ZEROS_LIKE => (Shape, 5, "zeros_like"),
}

impl OpIdentity {
    pub fn family(&self) -> OpFamily {
        self.family
    }

    /// Number of the operator within its family.
    pub fn num(&self) -> u16 {
        self.num
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Packs `(family, num)` into a single integer.
    pub fn code(&self) -> u32 {
        ((self.family as u32) << 16) | u32::from(self.num)
    }

    /// Every registered identity.
    pub fn all() -> &'static [OpIdentity] {
        REGISTERED_OPS
    }

    pub fn lookup(family: OpFamily, num: u16) -> Result<OpIdentity, StatGradError> {
        REGISTERED_OPS
            .iter()
            .find(|op| op.family == family && op.num == num)
            .copied()
            .ok_or_else(|| StatGradError::UnknownOperator(format!("{:?}#{}", family, num)))
    }

    pub fn from_code(code: u32) -> Result<OpIdentity, StatGradError> {
        let family = u8::try_from(code >> 16)
            .ok()
            .and_then(OpFamily::from_u8)
            .ok_or_else(|| StatGradError::UnknownOperator(format!("code {:#x}", code)))?;
        let num = (code & 0xFFFF) as u16;
        Self::lookup(family, num)
    }

    pub fn from_name(name: &str) -> Result<OpIdentity, StatGradError> {
        REGISTERED_OPS
            .iter()
            .find(|op| op.name == name)
            .copied()
            .ok_or_else(|| StatGradError::UnknownOperator(name.to_string()))
    }
}

impl fmt::Display for OpIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}#{})", self.name, self.family, self.num)
    }
}
