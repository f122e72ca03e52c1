//! Algebraic Datatype Plugin.
//!
//! Constructor applications evaluate to structured values; constants of
//! datatype sorts start as opaque elements until an equality or selector
//! forces a shape. Because the plugin's own slot is vacant during dispatch,
//! datatype-sorted operands are resolved through the local value map and
//! only foreign-sorted fields go through the context.

use crate::ast::{Family, SortKind, TermId, TermKind};
use crate::context::Context;
use crate::literal::Lit;
use crate::plugin::Plugin;
use crate::value::Value;
use rustc_hash::FxHashMap;

/// Plugin for the datatype family.
#[derive(Debug, Default)]
pub struct DatatypePlugin {
    values: FxHashMap<TermId, Value>,
    terms: Vec<TermId>,
    selectors: Vec<TermId>,
    atoms: Vec<TermId>,
    next_opaque: u32,
}

impl DatatypePlugin {
    /// Create the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn is_dt(ctx: &Context<'_>, t: TermId) -> bool {
        matches!(ctx.tm().sort_kind(ctx.tm().sort(t)), SortKind::Datatype(_))
    }

    fn opaque(&mut self, ctx: &Context<'_>, t: TermId) -> Value {
        let index = self.next_opaque;
        self.next_opaque += 1;
        Value::Elem {
            sort: ctx.tm().sort(t),
            index,
        }
    }

    fn cached(&mut self, ctx: &mut Context<'_>, t: TermId) -> Value {
        if let Some(v) = self.values.get(&t) {
            return v.clone();
        }
        let v = self.opaque(ctx, t);
        self.values.insert(t, v.clone());
        v
    }

    /// Candidate value of any term, whatever its sort.
    fn value_of(&mut self, ctx: &mut Context<'_>, t: TermId) -> Option<Value> {
        if Self::is_dt(ctx, t) {
            Some(self.cached(ctx, t))
        } else {
            ctx.get_value(t).ok()
        }
    }

    /// Recompute a datatype-sorted term's value from its children.
    fn compute(&mut self, ctx: &mut Context<'_>, t: TermId) -> Value {
        match ctx.tm().get(t).kind.clone() {
            TermKind::DtConstructor { ctor, args } => {
                let mut vals = Vec::with_capacity(args.len());
                for &a in &args {
                    match self.value_of(ctx, a) {
                        Some(v) => vals.push(v),
                        None => return self.cached(ctx, t),
                    }
                }
                Value::Ctor { ctor, args: vals }
            }
            TermKind::DtSelector { ctor, field, arg } => {
                if let Some(Value::Ctor { ctor: c, args }) = self.value_of(ctx, arg) {
                    if c == ctor {
                        if let Some(v) = args.get(field as usize) {
                            return v.clone();
                        }
                    }
                }
                self.cached(ctx, t)
            }
            _ => self.cached(ctx, t),
        }
    }

    fn set_cached(&mut self, ctx: &mut Context<'_>, t: TermId, v: Value) {
        if self.values.get(&t) != Some(&v) {
            self.values.insert(t, v);
            ctx.new_value_eh(t);
        }
    }

    fn atom_truth(&mut self, ctx: &mut Context<'_>, atom: TermId) -> Option<bool> {
        match ctx.tm().get(atom).kind.clone() {
            TermKind::DtTester { ctor, arg } => {
                Some(matches!(self.value_of(ctx, arg), Some(Value::Ctor { ctor: c, .. }) if c == ctor))
            }
            TermKind::Eq(a, b) if Self::is_dt(ctx, a) => {
                Some(self.value_of(ctx, a)? == self.value_of(ctx, b)?)
            }
            _ => None,
        }
    }

    fn rigid(ctx: &Context<'_>, t: TermId) -> bool {
        matches!(ctx.tm().get(t).kind, TermKind::DtConstructor { .. })
    }
}

impl Plugin for DatatypePlugin {
    fn family(&self) -> Family {
        Family::Datatype
    }

    fn register_term(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if Self::is_dt(ctx, term) {
            let v = self.compute(ctx, term);
            self.values.insert(term, v);
            self.terms.push(term);
        }
        match ctx.tm().get(term).kind {
            TermKind::DtSelector { .. } => self.selectors.push(term),
            TermKind::DtTester { .. } => self.atoms.push(term),
            TermKind::Eq(a, _) if Self::is_dt(ctx, a) => self.atoms.push(term),
            _ => {}
        }
    }

    fn propagate_literal(&mut self, ctx: &mut Context<'_>, lit: Lit) {
        let Some(atom) = ctx.atom(lit.var()) else {
            return;
        };
        if let Some(actual) = self.atom_truth(ctx, atom) {
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
            if self.atom_truth(ctx, term) == Some(target) {
                return true;
            }
            return match ctx.tm().get(term).kind.clone() {
                TermKind::DtTester { arg, .. } => {
                    // making an opaque constant into a specific constructor
                    // needs the constructor's signature, which only a term
                    // would supply; only the negative direction is local
                    if !target && !Self::rigid(ctx, arg) {
                        let fresh = self.opaque(ctx, arg);
                        self.set_cached(ctx, arg, fresh);
                        true
                    } else {
                        false
                    }
                }
                TermKind::Eq(a, b) => {
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
                    if target {
                        let Some(v) = self.value_of(ctx, keep) else {
                            return false;
                        };
                        self.set_cached(ctx, change, v);
                    } else {
                        let fresh = self.opaque(ctx, change);
                        self.set_cached(ctx, change, fresh);
                    }
                    true
                }
                _ => true,
            };
        }

        let desired = self.cached(ctx, term);
        let actual = self.compute(ctx, term);
        if desired == actual {
            return true;
        }
        match ctx.tm().get(term).kind.clone() {
            TermKind::DtConstructor { ctor, args } => {
                let Value::Ctor { ctor: c, args: vals } = desired else {
                    return false;
                };
                if c != ctor || vals.len() != args.len() {
                    // wrong head; restore the computed value and escalate
                    self.set_cached(ctx, term, actual);
                    return false;
                }
                let mut ok = true;
                for (&child, val) in args.iter().zip(vals.iter()) {
                    if Self::is_dt(ctx, child) {
                        if Self::rigid(ctx, child) {
                            ok = false;
                        } else {
                            self.set_cached(ctx, child, val.clone());
                        }
                    } else {
                        ok &= ctx.set_value(child, val);
                    }
                }
                ok
            }
            _ => true,
        }
    }

    fn repair_up(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if ctx.tm().is_bool(term) {
            let Some(actual) = self.atom_truth(ctx, term) else {
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
        if Self::is_dt(ctx, term) {
            let v = self.compute(ctx, term);
            self.set_cached(ctx, term, v);
        }
    }

    fn repair_literal(&mut self, ctx: &mut Context<'_>, lit: Lit) {
        self.propagate_literal(ctx, lit);
    }

    fn propagate(&mut self, ctx: &mut Context<'_>) -> bool {
        // push field values out of matched selectors of foreign sorts
        let mut progress = false;
        for i in 0..self.selectors.len() {
            let sel = self.selectors[i];
            if Self::is_dt(ctx, sel) {
                continue;
            }
            let TermKind::DtSelector { ctor, field, arg } = ctx.tm().get(sel).kind.clone() else {
                continue;
            };
            let Some(Value::Ctor { ctor: c, args }) = self.value_of(ctx, arg) else {
                continue;
            };
            if c != ctor {
                continue;
            }
            let Some(fv) = args.get(field as usize).cloned() else {
                continue;
            };
            if ctx.get_value(sel).ok().as_ref() != Some(&fv) && ctx.set_value(sel, &fv) {
                progress = true;
            }
        }
        progress
    }

    fn is_sat(&mut self, ctx: &mut Context<'_>) -> bool {
        let mut sat = true;
        for i in 0..self.atoms.len() {
            let t = self.atoms[i];
            let (Some(actual), Some(v)) = (self.atom_truth(ctx, t), ctx.atom_var(t)) else {
                continue;
            };
            if actual != ctx.is_true(Lit::pos(v)) {
                ctx.schedule_repair_down(t);
                sat = false;
            }
        }
        for i in 0..self.terms.len() {
            let t = self.terms[i];
            if self.cached(ctx, t) != self.compute(ctx, t) {
                ctx.schedule_repair_up(t);
                sat = false;
            }
        }
        sat
    }

    fn get_value(&mut self, ctx: &mut Context<'_>, term: TermId) -> Option<Value> {
        if !Self::is_dt(ctx, term) {
            return None;
        }
        Some(self.cached(ctx, term))
    }

    fn set_value(&mut self, ctx: &mut Context<'_>, term: TermId, value: &Value) -> bool {
        if !Self::is_dt(ctx, term) || Self::rigid(ctx, term) {
            return false;
        }
        self.set_cached(ctx, term, value.clone());
        true
    }

    fn display(&self, _tm: &crate::ast::TermManager) -> String {
        format!(
            "datatype: {} terms, {} atoms\n",
            self.terms.len(),
            self.atoms.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TermManager;
    use crate::config::SlsConfig;
    use crate::sat::MemorySat;
    use num_bigint::BigInt;

    #[test]
    fn test_constructor_value() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let dt = tm.mk_datatype_sort("pair");
        let one = tm.mk_int(BigInt::from(1));
        let two = tm.mk_int(BigInt::from(2));
        let p = tm.mk_constructor("mk-pair", vec![one, two], dt);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        ctx.register_terms(p);
        let Ok(Value::Ctor { args, .. }) = ctx.get_value(p) else {
            panic!("expected a constructor value");
        };
        assert_eq!(args, vec![Value::Int(BigInt::from(1)), Value::Int(BigInt::from(2))]);
    }

    #[test]
    fn test_selector_pushes_field() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let dt = tm.mk_datatype_sort("pair");
        let int = tm.sorts.int_sort;
        let seven = tm.mk_int(BigInt::from(7));
        let eight = tm.mk_int(BigInt::from(8));
        let p = tm.mk_constructor("mk-pair", vec![seven, eight], dt);
        let fst = tm.mk_selector("mk-pair", 0, p, int);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        ctx.register_terms(fst);
        ctx.with_plugin(Family::Datatype, |ctx, p| p.propagate(ctx));
        assert_eq!(ctx.get_value(fst).ok(), Some(Value::Int(BigInt::from(7))));
    }

    #[test]
    fn test_eq_repair_merges_opaque() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let dt = tm.mk_datatype_sort("tree");
        let x = tm.mk_var("x", dt);
        let y = tm.mk_var("y", dt);
        let eq = tm.mk_eq(x, y);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let lit = ctx.mk_literal(eq);
        ctx.try_flip(lit.var());
        let done = ctx.with_plugin(Family::Datatype, |ctx, p| p.repair_down(ctx, eq));
        assert_eq!(done, Some(true));
        assert_eq!(ctx.get_value(x).ok(), ctx.get_value(y).ok());
    }
}
