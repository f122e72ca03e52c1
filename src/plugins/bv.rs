//! Bit-Vector Plugin.
//!
//! Candidate values are `u64` words masked to the sort width. Operators are
//! inverted directly during repair: xor and wrapping addition always admit a
//! one-child fix, and/or only when the sibling's bits allow it, numerals
//! never.

use crate::ast::{Family, SortKind, TermId, TermKind};
use crate::context::Context;
use crate::literal::Lit;
use crate::plugin::Plugin;
use crate::value::{bv_mask, Value};
use rustc_hash::FxHashMap;

/// Plugin for the bit-vector family.
#[derive(Debug, Default)]
pub struct BvPlugin {
    values: FxHashMap<TermId, u64>,
    atoms: Vec<TermId>,
    terms: Vec<TermId>,
}

impl BvPlugin {
    /// Create the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn width(ctx: &Context<'_>, t: TermId) -> Option<u32> {
        match *ctx.tm().sort_kind(ctx.tm().sort(t)) {
            SortKind::BitVec(w) => Some(w),
            _ => None,
        }
    }

    fn value(&self, ctx: &Context<'_>, t: TermId) -> u64 {
        if let Some(&v) = self.values.get(&t) {
            return v;
        }
        match ctx.tm().get(t).kind {
            TermKind::BvConst { bits, .. } => bits,
            _ => 0,
        }
    }

    fn eval(&self, ctx: &Context<'_>, t: TermId) -> u64 {
        let Some(w) = Self::width(ctx, t) else {
            return 0;
        };
        let mask = bv_mask(w);
        match ctx.tm().get(t).kind {
            TermKind::BvConst { bits, .. } => bits,
            TermKind::BvAdd(a, b) => self.value(ctx, a).wrapping_add(self.value(ctx, b)) & mask,
            TermKind::BvAnd(a, b) => self.value(ctx, a) & self.value(ctx, b),
            TermKind::BvOr(a, b) => self.value(ctx, a) | self.value(ctx, b),
            TermKind::BvXor(a, b) => self.value(ctx, a) ^ self.value(ctx, b),
            TermKind::BvNot(a) => !self.value(ctx, a) & mask,
            _ => self.value(ctx, t),
        }
    }

    fn eval_pred(&self, ctx: &Context<'_>, t: TermId) -> Option<bool> {
        match ctx.tm().get(t).kind {
            TermKind::BvUle(a, b) => Some(self.value(ctx, a) <= self.value(ctx, b)),
            TermKind::Eq(a, b) if Self::width(ctx, a).is_some() => {
                Some(self.value(ctx, a) == self.value(ctx, b))
            }
            _ => None,
        }
    }

    fn nudge(&mut self, ctx: &mut Context<'_>, t: TermId, new: u64) {
        if self.value(ctx, t) != new {
            self.values.insert(t, new);
            ctx.new_value_eh(t);
        }
    }

    fn adjustable(ctx: &Context<'_>, t: TermId) -> bool {
        !matches!(ctx.tm().get(t).kind, TermKind::BvConst { .. })
    }

    fn repair_pred(&mut self, ctx: &mut Context<'_>, term: TermId, target: bool) -> bool {
        let (TermKind::BvUle(a, b) | TermKind::Eq(a, b)) = ctx.tm().get(term).kind else {
            return true;
        };
        let is_eq = matches!(ctx.tm().get(term).kind, TermKind::Eq(..));
        let Some(w) = Self::width(ctx, a) else {
            return true;
        };
        let mask = bv_mask(w);
        let va = self.value(ctx, a);
        let vb = self.value(ctx, b);

        // candidate (term to change, new value) moves
        let mut moves: Vec<(TermId, u64)> = Vec::with_capacity(2);
        if is_eq {
            if target {
                if Self::adjustable(ctx, a) {
                    moves.push((a, vb));
                }
                if Self::adjustable(ctx, b) {
                    moves.push((b, va));
                }
            } else {
                if Self::adjustable(ctx, a) {
                    moves.push((a, vb ^ 1));
                }
                if Self::adjustable(ctx, b) {
                    moves.push((b, va ^ 1));
                }
            }
        } else if target {
            if Self::adjustable(ctx, a) {
                moves.push((a, vb));
            }
            if Self::adjustable(ctx, b) {
                moves.push((b, va));
            }
        } else {
            // want a > b
            if Self::adjustable(ctx, a) && vb < mask {
                moves.push((a, vb + 1));
            }
            if Self::adjustable(ctx, b) && va > 0 {
                moves.push((b, va - 1));
            }
        }
        if moves.is_empty() {
            return false;
        }
        let (t, new) = moves[ctx.rand_index(moves.len())];
        self.nudge(ctx, t, new);
        true
    }
}

impl Plugin for BvPlugin {
    fn family(&self) -> Family {
        Family::Bv
    }

    fn register_term(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if Self::width(ctx, term).is_some() {
            let v = self.eval(ctx, term);
            self.values.insert(term, v);
            self.terms.push(term);
        }
        let is_atom = match ctx.tm().get(term).kind {
            TermKind::BvUle(..) => true,
            TermKind::Eq(a, _) => Self::width(ctx, a).is_some(),
            _ => false,
        };
        if is_atom {
            self.atoms.push(term);
        }
    }

    fn propagate_literal(&mut self, ctx: &mut Context<'_>, lit: Lit) {
        let Some(atom) = ctx.atom(lit.var()) else {
            return;
        };
        if let Some(actual) = self.eval_pred(ctx, atom) {
            if actual != ctx.is_true(Lit::pos(lit.var())) {
                ctx.schedule_repair_down(atom);
            }
        }
    }

    fn repair_down(&mut self, ctx: &mut Context<'_>, term: TermId) -> bool {
        if ctx.tm().is_bool(term) {
            let Some(v) = ctx.atom_var(term) else {
                return true;
            };
            let target = ctx.is_true(Lit::pos(v));
            if self.eval_pred(ctx, term) == Some(target) {
                return true;
            }
            return self.repair_pred(ctx, term, target);
        }

        let Some(w) = Self::width(ctx, term) else {
            return true;
        };
        let mask = bv_mask(w);
        let desired = self.value(ctx, term);
        if desired == self.eval(ctx, term) {
            return true;
        }
        match ctx.tm().get(term).kind {
            TermKind::BvConst { bits, .. } => {
                self.nudge(ctx, term, bits);
                false
            }
            TermKind::BvNot(a) => {
                if !Self::adjustable(ctx, a) {
                    return false;
                }
                self.nudge(ctx, a, !desired & mask);
                true
            }
            TermKind::BvAdd(a, b) | TermKind::BvXor(a, b) | TermKind::BvAnd(a, b)
            | TermKind::BvOr(a, b) => {
                let is_add = matches!(ctx.tm().get(term).kind, TermKind::BvAdd(..));
                let is_xor = matches!(ctx.tm().get(term).kind, TermKind::BvXor(..));
                let is_and = matches!(ctx.tm().get(term).kind, TermKind::BvAnd(..));
                let mut moves: Vec<(TermId, u64)> = Vec::with_capacity(2);
                for (c, o) in [(a, b), (b, a)] {
                    if !Self::adjustable(ctx, c) {
                        continue;
                    }
                    let vo = self.value(ctx, o);
                    if is_add {
                        moves.push((c, desired.wrapping_sub(vo) & mask));
                    } else if is_xor {
                        moves.push((c, desired ^ vo));
                    } else if is_and {
                        // feasible iff the sibling covers every desired bit
                        if desired & !vo & mask == 0 {
                            moves.push((c, desired | (self.value(ctx, c) & !vo & mask)));
                        }
                    } else {
                        // or: feasible iff the sibling sets no extra bit
                        if vo & !desired & mask == 0 {
                            moves.push((c, desired));
                        }
                    }
                }
                if moves.is_empty() {
                    return false;
                }
                let (t, new) = moves[ctx.rand_index(moves.len())];
                self.nudge(ctx, t, new);
                true
            }
            _ => true,
        }
    }

    fn repair_up(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if ctx.tm().is_bool(term) {
            let Some(actual) = self.eval_pred(ctx, term) else {
                return;
            };
            let Some(v) = ctx.atom_var(term) else {
                return;
            };
            if ctx.is_true(Lit::pos(v)) != actual {
                if ctx.try_flip(v) {
                    ctx.new_value_eh(term);
                } else {
                    ctx.schedule_repair_down(term);
                }
            }
            return;
        }
        let v = self.eval(ctx, term);
        self.nudge(ctx, term, v);
    }

    fn repair_literal(&mut self, ctx: &mut Context<'_>, lit: Lit) {
        self.propagate_literal(ctx, lit);
    }

    fn is_sat(&mut self, ctx: &mut Context<'_>) -> bool {
        let mut sat = true;
        for i in 0..self.atoms.len() {
            let t = self.atoms[i];
            let (Some(actual), Some(v)) = (self.eval_pred(ctx, t), ctx.atom_var(t)) else {
                continue;
            };
            if actual != ctx.is_true(Lit::pos(v)) {
                ctx.schedule_repair_down(t);
                sat = false;
            }
        }
        for i in 0..self.terms.len() {
            let t = self.terms[i];
            if self.value(ctx, t) != self.eval(ctx, t) {
                ctx.schedule_repair_up(t);
                sat = false;
            }
        }
        sat
    }

    fn get_value(&mut self, ctx: &mut Context<'_>, term: TermId) -> Option<Value> {
        let w = Self::width(ctx, term)?;
        if let Some(&bits) = self.values.get(&term) {
            return Some(Value::bitvec(w, bits));
        }
        match ctx.tm().get(term).kind {
            TermKind::BvConst { bits, .. } => Some(Value::bitvec(w, bits)),
            _ => None,
        }
    }

    fn set_value(&mut self, ctx: &mut Context<'_>, term: TermId, value: &Value) -> bool {
        let Value::BitVec { width, bits } = *value else {
            return false;
        };
        if Self::width(ctx, term) != Some(width) || !Self::adjustable(ctx, term) {
            return false;
        }
        if !self.values.contains_key(&term) {
            return false;
        }
        self.nudge(ctx, term, bits);
        true
    }

    fn display(&self, _tm: &crate::ast::TermManager) -> String {
        format!("bv: {} terms, {} atoms\n", self.terms.len(), self.atoms.len())
    }
}
