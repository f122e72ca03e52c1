//! SAT Oracle Interface.
//!
//! The repair engine consumes an external SAT engine through
//! [`SatSolverContext`]: clause enumeration, literal truth queries,
//! incremental variable and clause creation, the set of currently falsified
//! clauses, and the model callback. [`MemorySat`] is an in-memory,
//! assignment-driven implementation used by hosts embedding the engine
//! without a full SAT local-search core, and by the test suite.

use crate::literal::{Lit, Var};
use crate::model::Model;
use crate::worklist::IndexedSet;
use smallvec::SmallVec;

/// One clause of the Boolean skeleton.
#[derive(Debug, Clone)]
pub struct ClauseInfo {
    /// Literals of the clause.
    pub lits: SmallVec<[Lit; 4]>,
    /// Soft weight used by scoring hooks.
    pub weight: f64,
}

impl ClauseInfo {
    /// Create a clause with unit weight.
    #[must_use]
    pub fn new(lits: &[Lit]) -> Self {
        Self {
            lits: lits.into(),
            weight: 1.0,
        }
    }

    /// True iff this is a singleton clause.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.lits.len() == 1
    }
}

/// Contract the repair engine requires from the external SAT engine.
pub trait SatSolverContext {
    /// The current CNF skeleton.
    fn clauses(&self) -> &[ClauseInfo];

    /// A clause by index.
    fn get_clause(&self, idx: usize) -> &ClauseInfo {
        &self.clauses()[idx]
    }

    /// Indices of clauses mentioning `lit`.
    fn get_use_list(&self, lit: Lit) -> &[usize];

    /// Truth of a literal under the current assignment.
    fn is_true(&self, lit: Lit) -> bool;

    /// Number of allocated Boolean variables.
    fn num_vars(&self) -> usize;

    /// Indices of currently falsified clauses. Non-empty aborts the outer
    /// check loop.
    fn unsat(&self) -> &IndexedSet;

    /// Allocate a fresh Boolean variable.
    fn add_var(&mut self) -> Var;

    /// Add a clause over existing variables.
    fn add_clause(&mut self, lits: &[Lit]);

    /// Called exactly once when a full model has been found.
    fn on_model(&mut self, model: &Model);

    /// Flip a variable's assignment. Scoring hook; oracles that do not
    /// support search moves may ignore it.
    fn flip(&mut self, var: Var);

    /// Move reward of flipping `var`. Scoring hook.
    fn reward(&self, _var: Var) -> f64 {
        0.0
    }

    /// Soft weight of a clause. Scoring hook.
    fn get_weight(&self, idx: usize) -> f64 {
        self.clauses()[idx].weight
    }
}

/// An assignment-driven SAT oracle.
///
/// The host (or test) owns the assignment: set variable phases with
/// [`MemorySat::set_value`] or let the engine's plugins call `flip`. Clause
/// satisfaction counts are maintained incrementally so `unsat()` is O(1).
#[derive(Debug, Default)]
pub struct MemorySat {
    clauses: Vec<ClauseInfo>,
    assignment: Vec<bool>,
    /// Clause indices per literal index.
    use_lists: Vec<Vec<usize>>,
    /// Number of true literals per clause.
    true_counts: Vec<usize>,
    falsified: IndexedSet,
    model: Option<Model>,
    model_calls: usize,
}

impl MemorySat {
    /// Create an empty oracle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the phase of a variable, updating falsified-clause bookkeeping.
    pub fn set_value(&mut self, var: Var, value: bool) {
        let idx = var.index() as usize;
        assert!(idx < self.assignment.len(), "unallocated variable");
        if self.assignment[idx] != value {
            self.flip_internal(var);
        }
    }

    /// The last model delivered through `on_model`, if any.
    #[must_use]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// How many times `on_model` has fired.
    #[must_use]
    pub fn model_calls(&self) -> usize {
        self.model_calls
    }

    fn lit_is_true(&self, lit: Lit) -> bool {
        self.assignment[lit.var().index() as usize] == lit.is_pos()
    }

    fn flip_internal(&mut self, var: Var) {
        let idx = var.index() as usize;
        self.assignment[idx] = !self.assignment[idx];
        let became_true = if self.assignment[idx] {
            Lit::pos(var)
        } else {
            Lit::neg(var)
        };
        let became_false = !became_true;
        for &ci in &self.use_lists[became_true.index() as usize] {
            self.true_counts[ci] += 1;
            if self.true_counts[ci] == 1 {
                self.falsified.remove(ci as u32);
            }
        }
        for &ci in &self.use_lists[became_false.index() as usize] {
            self.true_counts[ci] -= 1;
            if self.true_counts[ci] == 0 {
                self.falsified.insert(ci as u32);
            }
        }
    }

    fn ensure_lit_slots(&mut self, lit: Lit) {
        let need = lit.index() as usize + 2;
        if self.use_lists.len() < need {
            self.use_lists.resize_with(need, Vec::new);
        }
    }
}

impl SatSolverContext for MemorySat {
    fn clauses(&self) -> &[ClauseInfo] {
        &self.clauses
    }

    fn get_use_list(&self, lit: Lit) -> &[usize] {
        self.use_lists
            .get(lit.index() as usize)
            .map_or(&[], Vec::as_slice)
    }

    fn is_true(&self, lit: Lit) -> bool {
        self.lit_is_true(lit)
    }

    fn num_vars(&self) -> usize {
        self.assignment.len()
    }

    fn unsat(&self) -> &IndexedSet {
        &self.falsified
    }

    fn add_var(&mut self) -> Var {
        let var = Var::new(self.assignment.len() as u32);
        self.assignment.push(false);
        self.ensure_lit_slots(Lit::neg(var));
        var
    }

    fn add_clause(&mut self, lits: &[Lit]) {
        let ci = self.clauses.len();
        let clause = ClauseInfo::new(lits);
        let mut true_count = 0;
        for &lit in &clause.lits {
            self.ensure_lit_slots(lit);
            self.use_lists[lit.index() as usize].push(ci);
            if self.lit_is_true(lit) {
                true_count += 1;
            }
        }
        self.true_counts.push(true_count);
        if true_count == 0 {
            self.falsified.insert(ci as u32);
        }
        self.clauses.push(clause);
    }

    fn on_model(&mut self, model: &Model) {
        self.model = Some(model.clone());
        self.model_calls += 1;
    }

    fn flip(&mut self, var: Var) {
        self.flip_internal(var);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsat_tracking() {
        let mut sat = MemorySat::new();
        let a = sat.add_var();
        let b = sat.add_var();
        sat.add_clause(&[Lit::pos(a), Lit::pos(b)]);
        // both false: clause falsified
        assert_eq!(sat.unsat().len(), 1);
        sat.set_value(b, true);
        assert!(sat.unsat().is_empty());
        sat.set_value(b, false);
        assert_eq!(sat.unsat().len(), 1);
    }

    #[test]
    fn test_use_lists() {
        let mut sat = MemorySat::new();
        let a = sat.add_var();
        sat.add_clause(&[Lit::pos(a)]);
        sat.add_clause(&[Lit::neg(a)]);
        assert_eq!(sat.get_use_list(Lit::pos(a)), &[0]);
        assert_eq!(sat.get_use_list(Lit::neg(a)), &[1]);
    }

    #[test]
    fn test_flip() {
        let mut sat = MemorySat::new();
        let a = sat.add_var();
        sat.add_clause(&[Lit::pos(a)]);
        assert!(!sat.is_true(Lit::pos(a)));
        sat.flip(a);
        assert!(sat.is_true(Lit::pos(a)));
        assert!(sat.unsat().is_empty());
    }

    #[test]
    fn test_unit_clause() {
        let clause = ClauseInfo::new(&[Lit::pos(Var::new(0))]);
        assert!(clause.is_unit());
    }
}
