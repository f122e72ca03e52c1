//! Boolean Variables and Literals.
//!
//! Minimal SAT-level identifiers shared between the repair engine and the
//! external SAT oracle. A literal packs a variable and a sign into a single
//! word so that clause vectors stay flat.

use std::fmt;
use std::ops::Not;

/// A Boolean variable allocated by the SAT oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

impl Var {
    /// Create a variable from its index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Index of this variable.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A literal: a variable together with a polarity.
///
/// Encoded as `var << 1 | sign`, where an odd value denotes the negated
/// variable. The encoding doubles as a dense index for use lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(u32);

impl Lit {
    /// Positive literal of `var`.
    #[must_use]
    pub const fn pos(var: Var) -> Self {
        Self(var.0 << 1)
    }

    /// Negative literal of `var`.
    #[must_use]
    pub const fn neg(var: Var) -> Self {
        Self(var.0 << 1 | 1)
    }

    /// Literal of `var` with the given sign; `sign == true` means negated.
    #[must_use]
    pub const fn new(var: Var, sign: bool) -> Self {
        Self(var.0 << 1 | sign as u32)
    }

    /// The underlying variable.
    #[must_use]
    pub const fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    /// True iff this literal is the positive polarity.
    #[must_use]
    pub const fn is_pos(self) -> bool {
        self.0 & 1 == 0
    }

    /// True iff this literal is the negative polarity.
    #[must_use]
    pub const fn is_neg(self) -> bool {
        self.0 & 1 == 1
    }

    /// Dense index of this literal (distinct from the negation's index).
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Reconstruct a literal from [`Lit::index`].
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        Lit(self.0 ^ 1)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_neg() {
            write!(f, "-")?;
        }
        write!(f, "{}", self.var().index())
    }
}
