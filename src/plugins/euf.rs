//! Uninterpreted Function Plugin.
//!
//! Function applications are adjustable leaves for the plugins owning their
//! result sorts; this plugin enforces congruence across them during the
//! final check. Two applications of the same function whose arguments
//! evaluate to the same tuple must agree: the cheaper fix overwrites one
//! result value, and when no plugin accepts the overwrite a congruence
//! lemma is added instead, restarting the search.

use crate::ast::{Family, TermId, TermKind};
use crate::context::Context;
use crate::literal::Lit;
use crate::model::{FuncInterp, Model};
use crate::plugin::Plugin;
use crate::value::Value;
use lasso::Spur;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Plugin for the uninterpreted function family.
#[derive(Debug, Default)]
pub struct EufPlugin {
    apps: Vec<TermId>,
}

impl EufPlugin {
    /// Create the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn app_key(ctx: &mut Context<'_>, t: TermId) -> Option<(Spur, Vec<Value>)> {
        let TermKind::Apply { func, args } = ctx.tm().get(t).kind.clone() else {
            return None;
        };
        let mut vals = Vec::with_capacity(args.len());
        for &a in &args {
            vals.push(ctx.get_value(a).ok()?);
        }
        Some((func, vals))
    }

    /// `args(r) = args(t)  =>  r = t`, as a clause term.
    fn congruence_lemma(ctx: &mut Context<'_>, r: TermId, t: TermId) -> TermId {
        let ra = ctx.tm().get(r).kind.children();
        let ta: SmallVec<[TermId; 4]> = ctx.tm().get(t).kind.children();
        let tm = ctx.tm_mut();
        let mut lits = Vec::new();
        for (&x, &y) in ra.iter().zip(ta.iter()) {
            if x != y {
                let eq = tm.mk_eq(x, y);
                lits.push(tm.mk_not(eq));
            }
        }
        lits.push(tm.mk_eq(r, t));
        tm.mk_or(lits)
    }
}

impl Plugin for EufPlugin {
    fn family(&self) -> Family {
        Family::Uf
    }

    fn register_term(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if matches!(ctx.tm().get(term).kind, TermKind::Apply { .. }) {
            self.apps.push(term);
        }
    }

    fn propagate_literal(&mut self, _ctx: &mut Context<'_>, _lit: Lit) {}

    fn repair_down(&mut self, _ctx: &mut Context<'_>, _term: TermId) -> bool {
        // an application's result is a free leaf; nothing below to adjust
        true
    }

    fn repair_up(&mut self, _ctx: &mut Context<'_>, _term: TermId) {}

    fn repair_literal(&mut self, _ctx: &mut Context<'_>, _lit: Lit) {}

    fn propagate(&mut self, ctx: &mut Context<'_>) -> bool {
        let mut progress = false;
        let mut table: FxHashMap<(Spur, Vec<Value>), TermId> = FxHashMap::default();
        for i in 0..self.apps.len() {
            let t = self.apps[i];
            let Some(key) = Self::app_key(ctx, t) else {
                continue;
            };
            if let Some(&r) = table.get(&key) {
                let (Ok(vr), Ok(vt)) = (ctx.get_value(r), ctx.get_value(t)) else {
                    continue;
                };
                if vr != vt {
                    if ctx.set_value(t, &vr) {
                        progress = true;
                    } else {
                        let lemma = Self::congruence_lemma(ctx, r, t);
                        ctx.add_constraint(lemma);
                        return true;
                    }
                }
            } else {
                table.insert(key, t);
            }
        }
        progress
    }

    fn is_sat(&mut self, ctx: &mut Context<'_>) -> bool {
        let mut table: FxHashMap<(Spur, Vec<Value>), Value> = FxHashMap::default();
        for i in 0..self.apps.len() {
            let t = self.apps[i];
            let Some(key) = Self::app_key(ctx, t) else {
                continue;
            };
            let Ok(vt) = ctx.get_value(t) else {
                continue;
            };
            if let Some(vr) = table.get(&key) {
                if *vr != vt {
                    return false;
                }
            } else {
                table.insert(key, vt);
            }
        }
        true
    }

    fn get_value(&mut self, _ctx: &mut Context<'_>, _term: TermId) -> Option<Value> {
        // application values live with the plugin owning the result sort
        None
    }

    fn mk_model(&mut self, ctx: &mut Context<'_>, model: &mut Model) {
        let mut interps: FxHashMap<Spur, FuncInterp> = FxHashMap::default();
        for i in 0..self.apps.len() {
            let t = self.apps[i];
            let Some((func, args)) = Self::app_key(ctx, t) else {
                continue;
            };
            let Ok(result) = ctx.get_value(t) else {
                continue;
            };
            let interp = interps.entry(func).or_default();
            if !interp.entries.iter().any(|(a, _)| *a == args) {
                interp.entries.push((args, result));
            }
        }
        for (func, interp) in interps {
            model.assign_func(func, interp);
        }
    }

    fn display(&self, _tm: &crate::ast::TermManager) -> String {
        format!("euf: {} applications\n", self.apps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TermManager;
    use crate::config::SlsConfig;
    use crate::sat::MemorySat;

    #[test]
    fn test_congruence_detects_mismatch() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let int = tm.sorts.int_sort;
        let x = tm.mk_var("x", int);
        let fx1 = tm.mk_apply("f", vec![x], int);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        ctx.register_terms(fx1);
        // a single application is trivially congruent
        assert!(ctx
            .with_plugin(Family::Uf, |ctx, p| p.is_sat(ctx))
            .unwrap_or(false));
    }

    #[test]
    fn test_lemma_shape() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let int = tm.sorts.int_sort;
        let x = tm.mk_var("x", int);
        let y = tm.mk_var("y", int);
        let fx = tm.mk_apply("f", vec![x], int);
        let fy = tm.mk_apply("f", vec![y], int);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let lemma = EufPlugin::congruence_lemma(&mut ctx, fx, fy);
        // (or (not (= x y)) (= (f x) (f y)))
        let TermKind::Or(args) = &ctx.tm().get(lemma).kind else {
            panic!("expected a disjunction");
        };
        assert_eq!(args.len(), 2);
    }
}
