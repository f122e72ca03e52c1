//! Boolean Connective Plugin.
//!
//! Owns `true`/`false`, negation, conjunction, disjunction, equivalence,
//! xor and if-then-else, plus equalities between Boolean terms. Values of
//! Boolean sort live in the SAT assignment itself: a term's candidate value
//! is the truth of its atom, or its structural evaluation when the Tseitin
//! encoding gave the term no variable of its own.

use crate::ast::{Family, TermId, TermKind};
use crate::context::Context;
use crate::literal::Lit;
use crate::plugin::Plugin;
use crate::value::Value;

/// Truth of a Boolean term, preferring its atom's assignment.
fn truth(ctx: &Context<'_>, t: TermId) -> bool {
    match ctx.atom_var(t) {
        Some(v) => ctx.is_true(Lit::pos(v)),
        None => eval(ctx, t),
    }
}

/// Structural truth of a Boolean term from its children's truth.
fn eval(ctx: &Context<'_>, t: TermId) -> bool {
    match &ctx.tm().get(t).kind {
        TermKind::True => true,
        TermKind::False => false,
        TermKind::Not(a) => !truth(ctx, *a),
        TermKind::And(args) => args.iter().all(|&a| truth(ctx, a)),
        TermKind::Or(args) => args.iter().any(|&a| truth(ctx, a)),
        TermKind::Iff(a, b) | TermKind::Eq(a, b) => truth(ctx, *a) == truth(ctx, *b),
        TermKind::Xor(a, b) => truth(ctx, *a) != truth(ctx, *b),
        TermKind::Ite(c, t2, e) => {
            if truth(ctx, *c) {
                truth(ctx, *t2)
            } else {
                truth(ctx, *e)
            }
        }
        _ => false,
    }
}

/// Drive a Boolean term's truth to `value` by flipping its atom.
///
/// Fails on unatomized terms and on unit-locked atoms; a successful flip
/// notifies the engine so the change propagates both ways.
fn set_bool(ctx: &mut Context<'_>, t: TermId, value: bool) -> bool {
    let Some(v) = ctx.atom_var(t) else {
        return false;
    };
    if ctx.is_true(Lit::pos(v)) == value {
        return true;
    }
    if !ctx.try_flip(v) {
        return false;
    }
    ctx.new_value_eh(t);
    true
}

/// Plugin for the Boolean family.
#[derive(Debug, Default)]
pub struct BasicPlugin {
    atoms: Vec<TermId>,
}

impl BasicPlugin {
    /// Create the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Plugin for BasicPlugin {
    fn family(&self) -> Family {
        Family::Basic
    }

    fn register_term(&mut self, ctx: &mut Context<'_>, term: TermId) {
        if ctx.tm().family(term) == Some(Family::Basic) && ctx.tm().is_bool(term) {
            self.atoms.push(term);
        }
    }

    fn propagate_literal(&mut self, ctx: &mut Context<'_>, lit: Lit) {
        let Some(atom) = ctx.atom(lit.var()) else {
            return;
        };
        if eval(ctx, atom) != ctx.is_true(Lit::pos(lit.var())) {
            ctx.schedule_repair_down(atom);
        }
    }

    fn repair_down(&mut self, ctx: &mut Context<'_>, term: TermId) -> bool {
        let Some(v) = ctx.atom_var(term) else {
            return true;
        };
        let target = ctx.is_true(Lit::pos(v));
        if eval(ctx, term) == target {
            return true;
        }
        match ctx.tm().get(term).kind.clone() {
            TermKind::True => target,
            TermKind::False => !target,
            TermKind::Not(a) => set_bool(ctx, a, !target),
            TermKind::And(args) => {
                if target {
                    let mut ok = true;
                    for &a in &args {
                        if !truth(ctx, a) {
                            ok &= set_bool(ctx, a, true);
                        }
                    }
                    ok
                } else {
                    let idx = ctx.rand_index(args.len());
                    set_bool(ctx, args[idx], false)
                }
            }
            TermKind::Or(args) => {
                if target {
                    let idx = ctx.rand_index(args.len());
                    set_bool(ctx, args[idx], true)
                } else {
                    let mut ok = true;
                    for &a in &args {
                        if truth(ctx, a) {
                            ok &= set_bool(ctx, a, false);
                        }
                    }
                    ok
                }
            }
            TermKind::Iff(a, b) | TermKind::Eq(a, b) => {
                let (change, keep) = if ctx.rand_bool() { (a, b) } else { (b, a) };
                let other = truth(ctx, keep);
                set_bool(ctx, change, other == target)
            }
            TermKind::Xor(a, b) => {
                let (change, keep) = if ctx.rand_bool() { (a, b) } else { (b, a) };
                let other = truth(ctx, keep);
                set_bool(ctx, change, other != target)
            }
            TermKind::Ite(c, t, e) => {
                if truth(ctx, c) {
                    set_bool(ctx, t, target)
                } else {
                    set_bool(ctx, e, target)
                }
            }
            _ => true,
        }
    }

    fn repair_up(&mut self, ctx: &mut Context<'_>, term: TermId) {
        let Some(v) = ctx.atom_var(term) else {
            return;
        };
        let actual = eval(ctx, term);
        if ctx.is_true(Lit::pos(v)) != actual {
            if ctx.try_flip(v) {
                ctx.new_value_eh(term);
            } else {
                // unit-locked atom: push the requirement back down
                ctx.schedule_repair_down(term);
            }
        }
    }

    fn repair_literal(&mut self, ctx: &mut Context<'_>, lit: Lit) {
        let Some(atom) = ctx.atom(lit.var()) else {
            return;
        };
        if eval(ctx, atom) != ctx.is_true(Lit::pos(lit.var())) {
            ctx.schedule_repair_down(atom);
        }
    }

    fn is_sat(&mut self, ctx: &mut Context<'_>) -> bool {
        let mut sat = true;
        for &t in &self.atoms {
            if let Some(v) = ctx.atom_var(t) {
                if eval(ctx, t) != ctx.is_true(Lit::pos(v)) {
                    ctx.schedule_repair_down(t);
                    sat = false;
                }
            }
        }
        sat
    }

    fn get_value(&mut self, ctx: &mut Context<'_>, term: TermId) -> Option<Value> {
        if !ctx.tm().is_bool(term) {
            return None;
        }
        if ctx.atom_var(term).is_none()
            && matches!(ctx.tm().get(term).kind, TermKind::Var { .. })
        {
            return None;
        }
        Some(Value::Bool(truth(ctx, term)))
    }

    fn set_value(&mut self, ctx: &mut Context<'_>, term: TermId, value: &Value) -> bool {
        let Value::Bool(b) = value else {
            return false;
        };
        if !ctx.tm().is_bool(term) {
            return false;
        }
        set_bool(ctx, term, *b)
    }
}
