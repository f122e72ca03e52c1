//! Error Types.
//!
//! Search outcomes are values ([`crate::context::CheckResult`]); errors are
//! reserved for construction bugs and API misuse. In particular, asking for
//! the truth of a Boolean term that was never atomized is an explicit error
//! here rather than a silent fallback.

use crate::ast::{Family, TermId};
use thiserror::Error;

/// Errors surfaced by the repair engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlsError {
    /// A Boolean term has no SAT atom attached.
    #[error("boolean term t{} has no SAT atom", (.0).0)]
    NoAtom(TermId),

    /// No plugin is registered for a family that was asked for a value.
    #[error("no plugin registered for family {0:?}")]
    MissingPlugin(Family),

    /// A term id was used before `register_terms` saw it.
    #[error("term t{} is not registered", (.0).0)]
    UnregisteredTerm(TermId),

    /// A family slot was re-registered; plugins are installed exactly once.
    #[error("plugin for family {0:?} is already installed")]
    DuplicatePlugin(Family),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SlsError>;
