//! Relevance Engine.
//!
//! Per propagation round, one representative true literal is chosen for each
//! clause of the skeleton by weighted reservoir sampling; the atoms of those
//! root literals seed relevance, and a term is relevant iff a chain of
//! parent links connects it to some root atom. The root-literal sequence is
//! shuffled before use so repair order varies across rounds and seeds.

use crate::ast::TermId;
use crate::bridge::AtomTable;
use crate::literal::Lit;
use crate::registry::TermRegistry;
use crate::sat::SatSolverContext;
use crate::worklist::IndexedSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Per-round relevance state: the relevant and visited sets and the shuffled
/// root-literal sequence. Reset at the start of every propagation round.
#[derive(Debug, Default)]
pub struct Relevance {
    relevant: IndexedSet,
    visited: IndexedSet,
    root_literals: Vec<Lit>,
}

impl Relevance {
    /// Create empty relevance state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild root literals and reset the relevant/visited sets.
    ///
    /// For each clause, scans its literals; among those whose atom is true
    /// and not already relevant, reservoir sampling picks exactly one
    /// representative. A clause that already contains a relevant true
    /// literal contributes no new root.
    pub fn reinit(&mut self, sat: &dyn SatSolverContext, atoms: &AtomTable, rng: &mut StdRng) {
        self.relevant.clear();
        self.visited.clear();
        self.root_literals.clear();

        for clause in sat.clauses() {
            let mut has_relevant = false;
            let mut candidates = 0u32;
            let mut selected: Option<(Lit, TermId)> = None;
            for &lit in &clause.lits {
                let Some(atom) = atoms.atom(lit.var()) else {
                    continue;
                };
                if !sat.is_true(lit) {
                    continue;
                }
                if self.relevant.contains(atom.0) {
                    has_relevant = true;
                    break;
                }
                candidates += 1;
                if rng.gen_range(0..candidates) == 0 {
                    selected = Some((lit, atom));
                }
            }
            if !has_relevant {
                if let Some((lit, atom)) = selected {
                    self.relevant.insert(atom.0);
                    self.root_literals.push(lit);
                }
            }
        }
        self.root_literals.shuffle(rng);
    }

    /// The shuffled root-literal sequence of the current round.
    #[must_use]
    pub fn root_literals(&self) -> &[Lit] {
        &self.root_literals
    }

    /// Memoized upward walk: `term` is relevant iff it is a root atom or
    /// some parent is relevant.
    ///
    /// Uses an explicit stack; shared subterms are revisited through many
    /// parents, so the visited set doubles as the recursion guard.
    pub fn is_relevant(&mut self, registry: &TermRegistry, term: TermId) -> bool {
        if self.relevant.contains(term.0) {
            return true;
        }
        if self.visited.contains(term.0) {
            return false;
        }
        self.visited.insert(term.0);
        // stack entries: (term, index of next parent to explore)
        let mut stack: Vec<(TermId, usize)> = vec![(term, 0)];
        while let Some((id, next)) = stack.last().copied() {
            let parents = registry.parents(id);
            if next >= parents.len() {
                stack.pop();
                continue;
            }
            if let Some(frame) = stack.last_mut() {
                frame.1 = next + 1;
            }
            let parent = parents[next];
            if self.relevant.contains(parent.0) {
                // every term on the current chain reaches a root atom
                for &(t, _) in &stack {
                    self.relevant.insert(t.0);
                }
                return true;
            }
            if self.visited.insert(parent.0) {
                stack.push((parent, 0));
            }
        }
        false
    }

    /// Directly mark a term relevant (used when seeding root atoms).
    pub fn mark_relevant(&mut self, term: TermId) {
        self.relevant.insert(term.0);
    }

    /// True iff `term` is already known relevant, without walking parents.
    #[must_use]
    pub fn is_marked_relevant(&self, term: TermId) -> bool {
        self.relevant.contains(term.0)
    }
}
