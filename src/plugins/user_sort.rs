//! Uninterpreted Sort Plugin.
//!
//! Constants of uninterpreted sorts hold indices into a per-sort element
//! pool; every registered term starts in its own class, equality repair
//! merges or splits classes by rewriting one side's index.

use crate::ast::{Family, SortKind, TermId, TermKind};
use crate::context::Context;
use crate::literal::Lit;
use crate::plugin::Plugin;
use crate::value::Value;
use rustc_hash::FxHashMap;

/// Plugin for uninterpreted sorts.
#[derive(Debug, Default)]
pub struct UserSortPlugin {
    indices: FxHashMap<TermId, u32>,
    atoms: Vec<TermId>,
    next_index: u32,
}

impl UserSortPlugin {
    /// Create the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn is_user(ctx: &Context<'_>, t: TermId) -> bool {
        matches!(
            ctx.tm().sort_kind(ctx.tm().sort(t)),
            SortKind::Uninterpreted(_)
        )
    }

    fn index_of(&mut self, t: TermId) -> u32 {
        if let Some(&i) = self.indices.get(&t) {
            return i;
        }
        let i = self.next_index;
        self.next_index += 1;
        self.indices.insert(t, i);
        i
    }

    fn rigid(ctx: &Context<'_>, t: TermId) -> bool {
        // distinct model values denote distinct elements
        matches!(ctx.tm().get(t).kind, TermKind::ModelValue { .. })
    }
}

impl Plugin for UserSortPlugin {
    fn family(&self) -> Family {
        Family::UserSort
    }

    fn register_term(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if Self::is_user(ctx, term) {
            self.index_of(term);
        }
        if let TermKind::Eq(a, _) = ctx.tm().get(term).kind {
            if Self::is_user(ctx, a) {
                self.atoms.push(term);
            }
        }
    }

    fn propagate_literal(&mut self, ctx: &mut Context<'_>, lit: Lit) {
        let Some(atom) = ctx.atom(lit.var()) else {
            return;
        };
        if let TermKind::Eq(a, b) = ctx.tm().get(atom).kind {
            let actual = self.index_of(a) == self.index_of(b);
            if actual != ctx.is_true(Lit::pos(lit.var())) {
                ctx.schedule_repair_down(atom);
            }
        }
    }

    fn repair_down(&mut self, ctx: &mut Context<'_>, term: TermId) -> bool {
        let TermKind::Eq(a, b) = ctx.tm().get(term).kind else {
            return true;
        };
        let Some(v) = ctx.atom_var(term) else {
            return true;
        };
        let target = ctx.is_true(Lit::pos(v));
        if (self.index_of(a) == self.index_of(b)) == target {
            return true;
        }
        let mut sides = Vec::with_capacity(2);
        if !Self::rigid(ctx, a) {
            sides.push((a, b));
        }
        if !Self::rigid(ctx, b) {
            sides.push((b, a));
        }
        if sides.is_empty() {
            return false;
        }
        let (change, keep) = sides[ctx.rand_index(sides.len())];
        let new = if target {
            self.index_of(keep)
        } else {
            let fresh = self.next_index;
            self.next_index += 1;
            fresh
        };
        self.indices.insert(change, new);
        ctx.new_value_eh(change);
        true
    }

    fn repair_up(&mut self, ctx: &mut Context<'_>, term: TermId) {
        let TermKind::Eq(a, b) = ctx.tm().get(term).kind else {
            return;
        };
        let Some(v) = ctx.atom_var(term) else {
            return;
        };
        let actual = self.index_of(a) == self.index_of(b);
        if ctx.is_true(Lit::pos(v)) != actual {
            if ctx.try_flip(v) {
                ctx.new_value_eh(term);
            } else {
                ctx.schedule_repair_down(term);
            }
        }
    }

    fn repair_literal(&mut self, ctx: &mut Context<'_>, lit: Lit) {
        self.propagate_literal(ctx, lit);
    }

    fn is_sat(&mut self, ctx: &mut Context<'_>) -> bool {
        let mut sat = true;
        for i in 0..self.atoms.len() {
            let t = self.atoms[i];
            let TermKind::Eq(a, b) = ctx.tm().get(t).kind else {
                continue;
            };
            let Some(v) = ctx.atom_var(t) else {
                continue;
            };
            if (self.index_of(a) == self.index_of(b)) != ctx.is_true(Lit::pos(v)) {
                ctx.schedule_repair_down(t);
                sat = false;
            }
        }
        sat
    }

    fn get_value(&mut self, ctx: &mut Context<'_>, term: TermId) -> Option<Value> {
        if !Self::is_user(ctx, term) {
            return None;
        }
        Some(Value::Elem {
            sort: ctx.tm().sort(term),
            index: self.index_of(term),
        })
    }

    fn set_value(&mut self, ctx: &mut Context<'_>, term: TermId, value: &Value) -> bool {
        let Value::Elem { sort, index } = *value else {
            return false;
        };
        if !Self::is_user(ctx, term) || ctx.tm().sort(term) != sort || Self::rigid(ctx, term) {
            return false;
        }
        if self.index_of(term) != index {
            self.indices.insert(term, index);
            ctx.new_value_eh(term);
        }
        true
    }

    fn display(&self, _tm: &crate::ast::TermManager) -> String {
        format!(
            "user-sort: {} elements, {} equalities\n",
            self.indices.len(),
            self.atoms.len()
        )
    }
}
