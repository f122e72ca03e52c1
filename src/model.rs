//! Models.
//!
//! A model maps uninterpreted constants to candidate values and records
//! uninterpreted function interpretations contributed by plugins. Built when
//! every plugin reports a consistent state and handed to the SAT oracle's
//! `on_model` callback exactly once per successful check.

use crate::ast::{TermId, TermManager};
use crate::value::Value;
use lasso::Spur;
use rustc_hash::FxHashMap;

/// An interpretation of one uninterpreted function: argument value tuples to
/// result value, plus a default for unlisted tuples.
#[derive(Debug, Clone, Default)]
pub struct FuncInterp {
    /// Explicit entries.
    pub entries: Vec<(Vec<Value>, Value)>,
    /// Value of all unlisted argument tuples.
    pub default: Option<Value>,
}

/// A candidate model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    assignments: FxHashMap<TermId, Value>,
    functions: FxHashMap<Spur, FuncInterp>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value of an uninterpreted constant.
    pub fn assign(&mut self, term: TermId, value: Value) {
        self.assignments.insert(term, value);
    }

    /// Value of a constant, if recorded.
    #[must_use]
    pub fn get(&self, term: TermId) -> Option<&Value> {
        self.assignments.get(&term)
    }

    /// Record a function interpretation.
    pub fn assign_func(&mut self, func: Spur, interp: FuncInterp) {
        self.functions.insert(func, interp);
    }

    /// Interpretation of a function, if recorded.
    #[must_use]
    pub fn func(&self, func: Spur) -> Option<&FuncInterp> {
        self.functions.get(&func)
    }

    /// Number of constant assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// True iff no constants are assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterate over constant assignments.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, &Value)> {
        self.assignments.iter().map(|(&t, v)| (t, v))
    }

    /// Render the model, resolving names through the term manager.
    #[must_use]
    pub fn display(&self, tm: &TermManager) -> String {
        let mut lines: Vec<String> = self
            .assignments
            .iter()
            .map(|(&t, v)| format!("{} := {v}", tm.display(t)))
            .collect();
        lines.sort();
        lines.join("\n")
    }
}
