//! Linear Integer Arithmetic Plugin.
//!
//! Keeps a candidate integer per registered term. Sums and products carry a
//! cached value repaired against their children; uninterpreted constants,
//! function applications and array reads of integer sort are adjustable
//! leaves the repair moves operate on. Predicates (`<=`, `<`, integer `=`)
//! are repaired by nudging one side's value to satisfy the atom's assigned
//! truth.

use crate::ast::{Family, TermId, TermKind};
use crate::context::Context;
use crate::literal::Lit;
use crate::plugin::Plugin;
use crate::value::Value;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;

/// Plugin for the arithmetic family.
#[derive(Debug, Default)]
pub struct ArithPlugin {
    values: FxHashMap<TermId, BigInt>,
    atoms: Vec<TermId>,
    terms: Vec<TermId>,
}

impl ArithPlugin {
    /// Create the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn value(&self, ctx: &Context<'_>, t: TermId) -> BigInt {
        if let Some(v) = self.values.get(&t) {
            return v.clone();
        }
        match &ctx.tm().get(t).kind {
            TermKind::IntConst(v) => v.clone(),
            _ => BigInt::zero(),
        }
    }

    /// Recompute a term's value from its children's cached values.
    fn eval(&self, ctx: &Context<'_>, t: TermId) -> BigInt {
        match &ctx.tm().get(t).kind {
            TermKind::IntConst(v) => v.clone(),
            TermKind::Add(args) => args.iter().map(|&a| self.value(ctx, a)).sum(),
            TermKind::Mul(args) => args.iter().map(|&a| self.value(ctx, a)).product(),
            _ => self.value(ctx, t),
        }
    }

    fn eval_pred(&self, ctx: &Context<'_>, t: TermId) -> Option<bool> {
        match ctx.tm().get(t).kind {
            TermKind::Le(a, b) => Some(self.value(ctx, a) <= self.value(ctx, b)),
            TermKind::Lt(a, b) => Some(self.value(ctx, a) < self.value(ctx, b)),
            TermKind::Eq(a, b) => Some(self.value(ctx, a) == self.value(ctx, b)),
            _ => None,
        }
    }

    fn nudge(&mut self, ctx: &mut Context<'_>, t: TermId, new: BigInt) {
        if self.value(ctx, t) != new {
            self.values.insert(t, new);
            ctx.new_value_eh(t);
        }
    }

    fn adjustable(ctx: &Context<'_>, t: TermId) -> bool {
        !matches!(ctx.tm().get(t).kind, TermKind::IntConst(_))
    }

    fn is_int(ctx: &Context<'_>, t: TermId) -> bool {
        ctx.tm().sort(t) == ctx.tm().sorts.int_sort
    }

    /// Repair one side of a predicate so the relation matches `target`.
    fn repair_pred(&mut self, ctx: &mut Context<'_>, term: TermId, target: bool) -> bool {
        let (TermKind::Le(a, b) | TermKind::Lt(a, b) | TermKind::Eq(a, b)) =
            ctx.tm().get(term).kind
        else {
            return true;
        };
        let strict = matches!(ctx.tm().get(term).kind, TermKind::Lt(..));
        let is_eq = matches!(ctx.tm().get(term).kind, TermKind::Eq(..));
        let va = self.value(ctx, a);
        let vb = self.value(ctx, b);

        let mut sides = Vec::with_capacity(2);
        if Self::adjustable(ctx, a) {
            sides.push(true);
        }
        if Self::adjustable(ctx, b) {
            sides.push(false);
        }
        if sides.is_empty() {
            return false;
        }
        let left = sides[ctx.rand_index(sides.len())];

        let one = BigInt::one();
        let new = if is_eq {
            if target {
                if left { vb } else { va }
            } else if left {
                vb + &one
            } else {
                va + &one
            }
        } else if target {
            // want a <= b (or a < b)
            match (left, strict) {
                (true, false) => vb,
                (true, true) => vb - &one,
                (false, false) => va,
                (false, true) => va + &one,
            }
        } else {
            // want a > b (or a >= b)
            match (left, strict) {
                (true, false) => vb + &one,
                (true, true) => vb,
                (false, false) => va - &one,
                (false, true) => va,
            }
        };
        self.nudge(ctx, if left { a } else { b }, new);
        true
    }
}

impl Plugin for ArithPlugin {
    fn family(&self) -> Family {
        Family::Arith
    }

    fn register_term(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if Self::is_int(ctx, term) {
            let v = self.eval(ctx, term);
            self.values.insert(term, v);
            self.terms.push(term);
        }
        let is_atom = match ctx.tm().get(term).kind {
            TermKind::Le(..) | TermKind::Lt(..) => true,
            TermKind::Eq(a, _) => Self::is_int(ctx, a),
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

        let desired = self.value(ctx, term);
        let actual = self.eval(ctx, term);
        if desired == actual {
            return true;
        }
        match ctx.tm().get(term).kind.clone() {
            TermKind::IntConst(v) => {
                // numerals are rigid; restore and report failure
                self.nudge(ctx, term, v);
                false
            }
            TermKind::Add(args) => {
                let adjustable: Vec<TermId> = args
                    .iter()
                    .copied()
                    .filter(|&a| Self::adjustable(ctx, a))
                    .collect();
                if adjustable.is_empty() {
                    return false;
                }
                let child = adjustable[ctx.rand_index(adjustable.len())];
                let delta = desired - actual;
                let new = self.value(ctx, child) + delta;
                self.nudge(ctx, child, new);
                true
            }
            TermKind::Mul(args) => {
                if desired.is_zero() {
                    let adjustable: Vec<TermId> = args
                        .iter()
                        .copied()
                        .filter(|&a| Self::adjustable(ctx, a))
                        .collect();
                    if adjustable.is_empty() {
                        return false;
                    }
                    let child = adjustable[ctx.rand_index(adjustable.len())];
                    self.nudge(ctx, child, BigInt::zero());
                    return true;
                }
                let start = ctx.rand_index(args.len());
                for i in 0..args.len() {
                    let child = args[(start + i) % args.len()];
                    if !Self::adjustable(ctx, child) {
                        continue;
                    }
                    let rest: BigInt = args
                        .iter()
                        .filter(|&&o| o != child)
                        .map(|&o| self.value(ctx, o))
                        .product();
                    if rest.is_zero() || !(&desired % &rest).is_zero() {
                        continue;
                    }
                    let new = &desired / &rest;
                    self.nudge(ctx, child, new);
                    return true;
                }
                false
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
        if !Self::is_int(ctx, term) {
            return None;
        }
        if let Some(v) = self.values.get(&term) {
            return Some(Value::Int(v.clone()));
        }
        match &ctx.tm().get(term).kind {
            TermKind::IntConst(v) => Some(Value::Int(v.clone())),
            _ => None,
        }
    }

    fn set_value(&mut self, ctx: &mut Context<'_>, term: TermId, value: &Value) -> bool {
        let Value::Int(i) = value else {
            return false;
        };
        if !Self::is_int(ctx, term) || !Self::adjustable(ctx, term) {
            return false;
        }
        if !self.values.contains_key(&term) {
            return false;
        }
        self.nudge(ctx, term, i.clone());
        true
    }

    fn display(&self, _tm: &crate::ast::TermManager) -> String {
        format!("arith: {} terms, {} atoms\n", self.terms.len(), self.atoms.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TermManager;
    use crate::config::SlsConfig;
    use crate::sat::MemorySat;

    #[test]
    fn test_sum_eval() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let x = tm.mk_var("x", tm.sorts.int_sort);
        let two = tm.mk_int(BigInt::from(2));
        let sum = tm.mk_add(vec![x, two]);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let mut p = ArithPlugin::new();
        p.register_term(&mut ctx, x);
        p.register_term(&mut ctx, two);
        p.register_term(&mut ctx, sum);
        assert_eq!(p.eval(&ctx, sum), BigInt::from(2));
        p.nudge(&mut ctx, x, BigInt::from(5));
        assert_eq!(p.eval(&ctx, sum), BigInt::from(7));
    }

    #[test]
    fn test_repair_pred_le() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let x = tm.mk_var("x", tm.sorts.int_sort);
        let ten = tm.mk_int(BigInt::from(10));
        let le = tm.mk_le(ten, x);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let mut p = ArithPlugin::new();
        for t in [x, ten, le] {
            p.register_term(&mut ctx, t);
        }
        // 10 <= x with x = 0 is false; only x is adjustable
        assert_eq!(p.eval_pred(&ctx, le), Some(false));
        assert!(p.repair_pred(&mut ctx, le, true));
        assert_eq!(p.eval_pred(&ctx, le), Some(true));
        assert_eq!(p.value(&ctx, x), BigInt::from(10));
    }

    #[test]
    fn test_repair_down_add() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let x = tm.mk_var("x", tm.sorts.int_sort);
        let y = tm.mk_var("y", tm.sorts.int_sort);
        let sum = tm.mk_add(vec![x, y]);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let mut p = ArithPlugin::new();
        for t in [x, y, sum] {
            p.register_term(&mut ctx, t);
        }
        p.values.insert(sum, BigInt::from(7));
        assert!(p.repair_down(&mut ctx, sum));
        assert_eq!(p.eval(&ctx, sum), BigInt::from(7));
    }
}
