//! Term Registry and Dependency Graph.
//!
//! Tracks which terms the engine has seen, the child-to-parents edges used
//! to push "this value changed" notifications upward, and a depth-sorted
//! cache of all registered terms. Registration itself is driven by the
//! context (it has to reach the plugins and the Boolean bridge); this module
//! owns the bookkeeping, including the explicit work stack that makes
//! registration safe to re-enter.

use crate::ast::{TermId, TermManager};
use crate::worklist::IndexedSet;
use smallvec::SmallVec;

/// Registration bookkeeping: membership, parent links, work stack.
#[derive(Debug, Default)]
pub struct TermRegistry {
    registered: IndexedSet,
    parents: Vec<SmallVec<[TermId; 4]>>,
    todo: Vec<TermId>,
    /// Depth-sorted cache of registered terms; empty means stale.
    subterms: Vec<TermId>,
}

impl TermRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `term` completed registration.
    #[must_use]
    pub fn is_registered(&self, term: TermId) -> bool {
        self.registered.contains(term.0)
    }

    /// Mark `term` registered. Idempotent.
    pub fn mark_registered(&mut self, term: TermId) {
        self.registered.insert(term.0);
        self.subterms.clear();
    }

    /// Parents of `term`: the distinct registered terms containing it as a
    /// direct child.
    #[must_use]
    pub fn parents(&self, term: TermId) -> &[TermId] {
        self.parents
            .get(term.index())
            .map_or(&[], SmallVec::as_slice)
    }

    /// Record that `parent` directly contains `child`. Duplicate edges are
    /// dropped, so `parents` is a set.
    pub fn add_parent(&mut self, child: TermId, parent: TermId) {
        if self.parents.len() <= child.index() {
            self.parents.resize_with(child.index() + 1, SmallVec::new);
        }
        let entry = &mut self.parents[child.index()];
        if !entry.contains(&parent) {
            entry.push(parent);
        }
    }

    /// Push a term onto the registration work stack.
    pub fn push_todo(&mut self, term: TermId) {
        self.todo.push(term);
    }

    /// Pop the top of the work stack.
    pub fn pop_todo(&mut self) -> Option<TermId> {
        self.todo.pop()
    }

    /// Top of the work stack without removing it.
    #[must_use]
    pub fn peek_todo(&self) -> Option<TermId> {
        self.todo.last().copied()
    }

    /// Depth of the work stack; more than one entry right after seeding
    /// means a registration pass is already running.
    #[must_use]
    pub fn todo_len(&self) -> usize {
        self.todo.len()
    }

    /// Number of registered terms.
    #[must_use]
    pub fn num_registered(&self) -> usize {
        self.registered.len()
    }

    /// All registered terms, stably sorted by ascending depth. Recomputed
    /// lazily after registrations.
    pub fn subterms(&mut self, tm: &TermManager) -> &[TermId] {
        if self.subterms.is_empty() && !self.registered.is_empty() {
            self.subterms = self.registered.iter().map(TermId).collect();
            self.subterms.sort_by_key(|&t| (tm.depth(t), t.0));
        }
        &self.subterms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_edges_dedup() {
        let mut reg = TermRegistry::new();
        let child = TermId(0);
        let parent = TermId(1);
        reg.add_parent(child, parent);
        reg.add_parent(child, parent);
        assert_eq!(reg.parents(child), &[parent]);
        assert_eq!(reg.parents(parent), &[] as &[TermId]);
    }

    #[test]
    fn test_subterms_depth_sorted() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let not_a = tm.mk_not(a);
        let mut reg = TermRegistry::new();
        reg.mark_registered(not_a);
        reg.mark_registered(a);
        assert_eq!(reg.subterms(&tm), &[a, not_a]);
    }

    #[test]
    fn test_registered_idempotent() {
        let mut reg = TermRegistry::new();
        reg.mark_registered(TermId(3));
        reg.mark_registered(TermId(3));
        assert_eq!(reg.num_registered(), 1);
        assert!(reg.is_registered(TermId(3)));
        assert!(!reg.is_registered(TermId(2)));
    }
}
