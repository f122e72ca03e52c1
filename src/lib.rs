//! Slick - Stochastic Local Search Repair Propagation for SMT
//!
//! This crate provides the repair-propagation engine that sits between a
//! SAT local-search core and a set of theory plugins:
//! - Hash-consed terms with stable [`TermId`] references and theory families
//! - A Boolean bridge atomizing terms and Tseitin-encoding connectives
//! - Depth-ordered repair-down / repair-up worklists over a parent graph
//! - Reservoir-sampled root literals driving per-round relevance
//! - Plugins for Booleans, integers, bit-vectors, arrays, datatypes,
//!   uninterpreted functions and uninterpreted sorts
//!
//! The engine searches for a model of the already-asserted formula; it can
//! answer `Sat` or `Unknown`, never unsatisfiability.
//!
//! # Examples
//!
//! ```
//! use slick::{CheckResult, Context, SlsConfig, TermManager};
//! use slick::sat::MemorySat;
//!
//! let mut tm = TermManager::new();
//! let a = tm.mk_var("a", tm.sorts.bool_sort);
//! let b = tm.mk_var("b", tm.sorts.bool_sort);
//! let not_a = tm.mk_not(a);
//! let clause = tm.mk_or(vec![a, b]);
//!
//! let mut sat = MemorySat::new();
//! let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
//! ctx.assert_term(clause);
//! ctx.assert_term(not_a);
//!
//! // the oracle owns the Boolean assignment; satisfy the skeleton first
//! let lb = ctx.mk_literal(b);
//! if !ctx.is_true(lb) {
//!     ctx.try_flip(lb.var());
//! }
//! assert_eq!(ctx.check(), CheckResult::Sat);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod bridge;
pub mod config;
pub mod context;
pub mod error;
pub mod literal;
pub mod model;
pub mod plugin;
pub mod plugins;
pub mod registry;
pub mod relevance;
pub mod resource;
pub mod sat;
pub mod stats;
pub mod value;
pub mod worklist;

pub use ast::{Family, SortId, SortKind, Term, TermId, TermKind, TermManager};
pub use bridge::AtomTable;
pub use config::SlsConfig;
pub use context::{CheckResult, Context};
pub use error::{Result, SlsError};
pub use literal::{Lit, Var};
pub use model::{FuncInterp, Model};
pub use plugin::{Plugin, PluginTable};
pub use sat::{ClauseInfo, MemorySat, SatSolverContext};
pub use stats::SlsStats;
pub use value::Value;
