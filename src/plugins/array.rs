//! Array Plugin.
//!
//! Arrays are abstract elements: each array-sorted term carries an index
//! into its sort's element pool, and equality of arrays is equality of
//! indices. Read/write semantics are enforced lazily during the final
//! check: store axioms and select congruence are checked against the
//! candidate values, repaired by overwriting a select's value where a
//! plugin accepts it, and otherwise turned into clauses.

use crate::ast::{Family, SortKind, TermId, TermKind};
use crate::context::Context;
use crate::literal::Lit;
use crate::plugin::Plugin;
use crate::value::Value;
use rustc_hash::FxHashMap;

/// Plugin for the array family.
#[derive(Debug, Default)]
pub struct ArrayPlugin {
    selects: Vec<TermId>,
    indices: FxHashMap<TermId, u32>,
    next_index: u32,
    atoms: Vec<TermId>,
}

impl ArrayPlugin {
    /// Create the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn is_array(ctx: &Context<'_>, t: TermId) -> bool {
        matches!(ctx.tm().sort_kind(ctx.tm().sort(t)), SortKind::Array(..))
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

    /// Check one select against the store it reads from. Returns a repair
    /// clause term when values disagree and no overwrite is possible.
    fn check_select(&mut self, ctx: &mut Context<'_>, sel: TermId, fix: bool) -> Option<TermId> {
        let TermKind::Select(arr, j) = ctx.tm().get(sel).kind else {
            return None;
        };
        let TermKind::Store(a, i, v) = ctx.tm().get(arr).kind else {
            return None;
        };
        let (Ok(vi), Ok(vj)) = (ctx.get_value(i), ctx.get_value(j)) else {
            return None;
        };
        if vi == vj {
            // select(store(a, i, v), i) = v
            let (Ok(vs), Ok(vv)) = (ctx.get_value(sel), ctx.get_value(v)) else {
                return None;
            };
            if vs == vv {
                return None;
            }
            if fix && ctx.set_value(sel, &vv) {
                return None;
            }
            let tm = ctx.tm_mut();
            let eq_idx = tm.mk_eq(i, j);
            let neq = tm.mk_not(eq_idx);
            let eq_val = tm.mk_eq(sel, v);
            Some(tm.mk_or(vec![neq, eq_val]))
        } else {
            // select(store(a, i, v), j) = select(a, j) when i != j
            let below = ctx.tm_mut().mk_select(a, j);
            let (Ok(vs), Ok(vb)) = (ctx.get_value(sel), ctx.get_value(below)) else {
                let tm = ctx.tm_mut();
                let eq_idx = tm.mk_eq(i, j);
                let eq_val = tm.mk_eq(sel, below);
                return Some(tm.mk_or(vec![eq_idx, eq_val]));
            };
            if vs == vb {
                return None;
            }
            if fix && ctx.set_value(sel, &vb) {
                return None;
            }
            let tm = ctx.tm_mut();
            let eq_idx = tm.mk_eq(i, j);
            let eq_val = tm.mk_eq(sel, below);
            Some(tm.mk_or(vec![eq_idx, eq_val]))
        }
    }
}

impl Plugin for ArrayPlugin {
    fn family(&self) -> Family {
        Family::Array
    }

    fn register_term(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if Self::is_array(ctx, term) {
            self.index_of(term);
        }
        match ctx.tm().get(term).kind {
            TermKind::Select(..) => self.selects.push(term),
            TermKind::Eq(a, _) if Self::is_array(ctx, a) => self.atoms.push(term),
            _ => {}
        }
    }

    fn propagate_literal(&mut self, _ctx: &mut Context<'_>, _lit: Lit) {}

    fn repair_down(&mut self, ctx: &mut Context<'_>, term: TermId) -> bool {
        match ctx.tm().get(term).kind {
            TermKind::Eq(a, b) => {
                let Some(v) = ctx.atom_var(term) else {
                    return true;
                };
                let target = ctx.is_true(Lit::pos(v));
                let (ia, ib) = (self.index_of(a), self.index_of(b));
                if (ia == ib) == target {
                    return true;
                }
                if target {
                    self.indices.insert(a, ib);
                } else {
                    let fresh = self.next_index;
                    self.next_index += 1;
                    self.indices.insert(a, fresh);
                }
                ctx.new_value_eh(a);
                true
            }
            // reads and writes hold abstract values; axioms are enforced in
            // the final check
            _ => true,
        }
    }

    fn repair_up(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if let TermKind::Eq(a, b) = ctx.tm().get(term).kind {
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
    }

    fn repair_literal(&mut self, ctx: &mut Context<'_>, lit: Lit) {
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

    fn propagate(&mut self, ctx: &mut Context<'_>) -> bool {
        for i in 0..self.selects.len() {
            let sel = self.selects[i];
            if let Some(lemma) = self.check_select(ctx, sel, true) {
                ctx.add_constraint(lemma);
                return true;
            }
        }
        false
    }

    fn is_sat(&mut self, ctx: &mut Context<'_>) -> bool {
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
                return false;
            }
        }
        for i in 0..self.selects.len() {
            let sel = self.selects[i];
            if self.check_select(ctx, sel, false).is_some() {
                return false;
            }
        }
        true
    }

    fn get_value(&mut self, ctx: &mut Context<'_>, term: TermId) -> Option<Value> {
        if !Self::is_array(ctx, term) {
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
        if !Self::is_array(ctx, term) || ctx.tm().sort(term) != sort {
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
            "array: {} selects, {} equalities\n",
            self.selects.len(),
            self.atoms.len()
        )
    }
}
