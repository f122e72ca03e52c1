//! Repair Worklists.
//!
//! The repair loop drains two id-keyed worklists: repair-down (make a term's
//! value consistent with its context, top-down) and repair-up (propagate a
//! child's new value to its parents, bottom-up). Each combines O(1)
//! membership with priority extraction: a dense membership set next to a
//! binary heap, indexed by term id.
//!
//! Priorities are pluggable. The default strategies order repair-down by
//! descending term depth (a term before the subterms it contains) and
//! repair-up by ascending depth (subterms before the terms containing them).

use crate::ast::{TermId, TermManager};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A dense set of `u32` keys with O(1) membership, idempotent insertion and
/// iteration over the inserted elements.
#[derive(Debug, Default, Clone)]
pub struct IndexedSet {
    member: Vec<bool>,
    elems: Vec<u32>,
}

impl IndexedSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `key` is in the set.
    #[must_use]
    pub fn contains(&self, key: u32) -> bool {
        self.member.get(key as usize).copied().unwrap_or(false)
    }

    /// Insert `key`; inserting a present key is a no-op. Returns true if the
    /// key was newly inserted.
    pub fn insert(&mut self, key: u32) -> bool {
        let idx = key as usize;
        if idx >= self.member.len() {
            self.member.resize(idx + 1, false);
        }
        if self.member[idx] {
            return false;
        }
        self.member[idx] = true;
        self.elems.push(key);
        true
    }

    /// Remove `key` if present. Returns true if it was present.
    pub fn remove(&mut self, key: u32) -> bool {
        let idx = key as usize;
        if idx >= self.member.len() || !self.member[idx] {
            return false;
        }
        self.member[idx] = false;
        // swap-remove from the element list
        if let Some(pos) = self.elems.iter().position(|&k| k == key) {
            self.elems.swap_remove(pos);
        }
        true
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// True iff the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Remove all elements, keeping capacity.
    pub fn clear(&mut self) {
        for &k in &self.elems {
            self.member[k as usize] = false;
        }
        self.elems.clear();
    }

    /// Iterate over the elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.elems.iter().copied()
    }
}

/// Priority function over terms; smaller values are drained first.
pub trait TermPriority {
    /// Priority of `term` under the current term table.
    fn priority(&self, tm: &TermManager, term: TermId) -> u64;
}

/// Orders by descending depth: outer terms drain before their subterms.
#[derive(Debug, Default, Clone, Copy)]
pub struct DownPriority;

impl TermPriority for DownPriority {
    fn priority(&self, tm: &TermManager, term: TermId) -> u64 {
        u64::MAX - u64::from(tm.depth(term))
    }
}

/// Orders by ascending depth: subterms drain before the terms containing
/// them.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpPriority;

impl TermPriority for UpPriority {
    fn priority(&self, tm: &TermManager, term: TermId) -> u64 {
        u64::from(tm.depth(term))
    }
}

/// An id-keyed min-priority queue with O(1) membership test.
///
/// Inserting a present id is a no-op, so the heap never holds two live
/// entries for the same id and `erase_min` needs no lazy-deletion sweep.
pub struct RepairQueue {
    heap: BinaryHeap<Reverse<(u64, u32)>>,
    members: IndexedSet,
    priority: Box<dyn TermPriority + Send>,
}

impl std::fmt::Debug for RepairQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepairQueue")
            .field("len", &self.members.len())
            .finish()
    }
}

impl RepairQueue {
    /// Create a queue draining in the order given by `priority`.
    #[must_use]
    pub fn new(priority: Box<dyn TermPriority + Send>) -> Self {
        Self {
            heap: BinaryHeap::new(),
            members: IndexedSet::new(),
            priority,
        }
    }

    /// True iff `term` is queued.
    #[must_use]
    pub fn contains(&self, term: TermId) -> bool {
        self.members.contains(term.0)
    }

    /// Queue `term`; a no-op if it is already queued.
    pub fn insert(&mut self, tm: &TermManager, term: TermId) {
        if self.members.insert(term.0) {
            let prio = self.priority.priority(tm, term);
            self.heap.push(Reverse((prio, term.0)));
        }
    }

    /// Remove and return the highest-priority term.
    pub fn erase_min(&mut self) -> Option<TermId> {
        while let Some(Reverse((_, id))) = self.heap.pop() {
            if self.members.remove(id) {
                return Some(TermId(id));
            }
        }
        None
    }

    /// Number of queued terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True iff nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drop all queued terms.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.members.clear();
    }

    /// Iterate over queued term ids, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = TermId> + '_ {
        self.members.iter().map(TermId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_set_idempotent() {
        let mut set = IndexedSet::new();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.contains(3));
        assert_eq!(set.len(), 1);
        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert!(set.is_empty());
    }

    #[test]
    fn test_indexed_set_clear() {
        let mut set = IndexedSet::new();
        set.insert(1);
        set.insert(5);
        set.clear();
        assert!(!set.contains(1));
        assert!(!set.contains(5));
        assert!(set.insert(5));
    }

    #[test]
    fn test_queue_orders_by_depth() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let not_a = tm.mk_not(a);
        let not_not_a = tm.mk_not(not_a);

        let mut down = RepairQueue::new(Box::new(DownPriority));
        down.insert(&tm, not_not_a);
        down.insert(&tm, a);
        down.insert(&tm, not_a);
        // outermost first
        assert_eq!(down.erase_min(), Some(not_not_a));
        assert_eq!(down.erase_min(), Some(not_a));
        assert_eq!(down.erase_min(), Some(a));
        assert_eq!(down.erase_min(), None);

        let mut up = RepairQueue::new(Box::new(UpPriority));
        up.insert(&tm, a);
        up.insert(&tm, not_not_a);
        up.insert(&tm, not_a);
        // innermost first
        assert_eq!(up.erase_min(), Some(a));
        assert_eq!(up.erase_min(), Some(not_a));
        assert_eq!(up.erase_min(), Some(not_not_a));
    }

    #[test]
    fn test_queue_insert_idempotent() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let mut q = RepairQueue::new(Box::new(DownPriority));
        q.insert(&tm, a);
        q.insert(&tm, a);
        assert_eq!(q.len(), 1);
        assert!(q.contains(a));
        assert_eq!(q.erase_min(), Some(a));
        assert!(!q.contains(a));
        assert!(q.is_empty());
    }

    #[test]
    fn test_reinsert_after_erase() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let mut q = RepairQueue::new(Box::new(DownPriority));
        q.insert(&tm, a);
        assert_eq!(q.erase_min(), Some(a));
        q.insert(&tm, a);
        assert_eq!(q.erase_min(), Some(a));
    }
}
