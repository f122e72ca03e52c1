//! Candidate Values.
//!
//! The repair engine moves a candidate assignment around; [`Value`] is the
//! cross-plugin currency of that assignment. It is `Hash + Eq` so plugins can
//! key congruence tables on argument value tuples.

use crate::ast::SortId;
use lasso::Spur;
use num_bigint::BigInt;
use num_traits::Zero;
use std::fmt;

/// Mask selecting the low `width` bits of a bit-vector word.
#[must_use]
pub const fn bv_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// A theory-level candidate value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A Boolean.
    Bool(bool),
    /// An arbitrary-precision integer.
    Int(BigInt),
    /// A fixed-width bit-vector.
    BitVec {
        /// Width in bits.
        width: u32,
        /// Value, kept masked to `width`.
        bits: u64,
    },
    /// The `index`-th abstract element of an uninterpreted or array sort.
    Elem {
        /// Sort the element belongs to.
        sort: SortId,
        /// Index within that sort's element pool.
        index: u32,
    },
    /// A datatype constructor value.
    Ctor {
        /// Interned constructor name.
        ctor: Spur,
        /// Field values.
        args: Vec<Value>,
    },
}

impl Value {
    /// The Boolean true value.
    #[must_use]
    pub const fn tru() -> Self {
        Value::Bool(true)
    }

    /// The Boolean false value.
    #[must_use]
    pub const fn fls() -> Self {
        Value::Bool(false)
    }

    /// Integer zero.
    #[must_use]
    pub fn int_zero() -> Self {
        Value::Int(BigInt::zero())
    }

    /// A masked bit-vector value.
    #[must_use]
    pub fn bitvec(width: u32, bits: u64) -> Self {
        Value::BitVec {
            width,
            bits: bits & bv_mask(width),
        }
    }

    /// Boolean payload, if this is a Boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// True iff this value is `Bool(true)`.
    #[must_use]
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::BitVec { width, bits } => write!(f, "#b{bits:0w$b}", w = *width as usize),
            Value::Elem { sort, index } => write!(f, "@{}!{}", sort.0, index),
            Value::Ctor { args, .. } => {
                write!(f, "(ctor")?;
                for a in args {
                    write!(f, " {a}")?;
                }
                write!(f, ")")
            }
        }
    }
}
