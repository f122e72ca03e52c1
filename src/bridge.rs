//! Boolean Bridge.
//!
//! Connects the term world to the SAT oracle: a bijection between Boolean
//! variables and atom terms, on-demand atomization of Boolean terms, and a
//! Tseitin encoder turning Boolean structure into clauses. Negation never
//! allocates a variable; `not` chains fold into the literal's sign, so an
//! atom term is never itself a negation.

use crate::ast::{TermId, TermKind};
use crate::context::Context;
use crate::literal::{Lit, Var};
use rustc_hash::FxHashMap;

/// Bijection between Boolean variables and the atom terms they stand for.
///
/// Not every variable has an atom (the oracle may own auxiliary variables),
/// but a mapped variable maps to exactly one term and vice versa, for the
/// lifetime of the table.
#[derive(Debug, Default)]
pub struct AtomTable {
    /// Atom per variable index; `None` for unmapped variables.
    atoms: Vec<Option<TermId>>,
    vars: FxHashMap<TermId, Var>,
}

impl AtomTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `term` as the atom of `var`. Neither side may be mapped
    /// already; atoms are never re-atomized.
    pub fn register(&mut self, var: Var, term: TermId) {
        let idx = var.index() as usize;
        if idx >= self.atoms.len() {
            self.atoms.resize(idx + 1, None);
        }
        debug_assert!(self.atoms[idx].is_none());
        debug_assert!(!self.vars.contains_key(&term));
        self.atoms[idx] = Some(term);
        self.vars.insert(term, var);
    }

    /// Atom attached to `var`, if any.
    #[must_use]
    pub fn atom(&self, var: Var) -> Option<TermId> {
        self.atoms.get(var.index() as usize).copied().flatten()
    }

    /// Variable attached to `term`, if any.
    #[must_use]
    pub fn var(&self, term: TermId) -> Option<Var> {
        self.vars.get(&term).copied()
    }

    /// Iterate over all atom terms.
    pub fn terms(&self) -> impl Iterator<Item = TermId> + '_ {
        self.atoms.iter().copied().flatten()
    }

    /// Iterate over `(var, atom)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (Var, TermId)> + '_ {
        self.atoms
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (Var::new(i as u32), t)))
    }

    /// Number of mapped atoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True iff no atoms are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Context<'_> {
    /// Literal standing for a Boolean term, allocating and encoding on first
    /// use.
    ///
    /// Idempotent: a second call with the same term (or its negation)
    /// returns the same variable. Boolean connectives are Tseitin-encoded;
    /// theory atoms are registered with the plugins instead.
    pub fn mk_literal(&mut self, term: TermId) -> Lit {
        let mut e = term;
        let mut neg = false;
        while let &TermKind::Not(a) = &self.tm.get(e).kind {
            e = a;
            neg = !neg;
        }
        if let Some(v) = self.atoms.var(e) {
            return Lit::new(v, neg);
        }
        let v = self.sat.add_var();
        self.atoms.register(v, e);
        let lit = Lit::pos(v);
        if let Some(fam) = self.tm.family(e) {
            self.with_plugin(fam, |ctx, p| p.init_bool_var(ctx, v));
        }
        match self.tm.get(e).kind.clone() {
            TermKind::True => self.sat.add_clause(&[lit]),
            TermKind::False => self.sat.add_clause(&[!lit]),
            TermKind::And(args) => {
                let mut all = vec![lit];
                for &arg in &args {
                    let la = self.mk_literal(arg);
                    self.sat.add_clause(&[!lit, la]);
                    all.push(!la);
                }
                self.sat.add_clause(&all);
            }
            TermKind::Or(args) => {
                let mut any = vec![!lit];
                for &arg in &args {
                    let la = self.mk_literal(arg);
                    self.sat.add_clause(&[lit, !la]);
                    any.push(la);
                }
                self.sat.add_clause(&any);
            }
            TermKind::Iff(x, y) => {
                let lx = self.mk_literal(x);
                let ly = self.mk_literal(y);
                self.sat.add_clause(&[!lit, !lx, ly]);
                self.sat.add_clause(&[!lit, lx, !ly]);
                self.sat.add_clause(&[lit, lx, ly]);
                self.sat.add_clause(&[lit, !lx, !ly]);
            }
            TermKind::Xor(x, y) => {
                let lx = self.mk_literal(x);
                let ly = self.mk_literal(y);
                self.sat.add_clause(&[!lit, lx, ly]);
                self.sat.add_clause(&[!lit, !lx, !ly]);
                self.sat.add_clause(&[lit, !lx, ly]);
                self.sat.add_clause(&[lit, lx, !ly]);
            }
            TermKind::Ite(c, t, f) => {
                let lc = self.mk_literal(c);
                let lt = self.mk_literal(t);
                let lf = self.mk_literal(f);
                self.sat.add_clause(&[!lit, !lc, lt]);
                self.sat.add_clause(&[!lit, lc, lf]);
                self.sat.add_clause(&[lit, !lc, !lt]);
                self.sat.add_clause(&[lit, lc, !lf]);
            }
            _ => self.register_terms(e),
        }
        Lit::new(v, neg)
    }

    /// Assert a Boolean term, decomposing its top-level structure into
    /// clauses rather than funneling everything through one fresh literal.
    ///
    /// Does not touch the new-constraint flag; [`Context::add_constraint`]
    /// layers that on top.
    pub(crate) fn add_clause_term(&mut self, term: TermId) {
        self.assert_polarized(term, false);
    }

    fn assert_polarized(&mut self, term: TermId, neg: bool) {
        match self.tm.get(term).kind.clone() {
            TermKind::Not(a) => self.assert_polarized(a, !neg),
            TermKind::And(args) if !neg => {
                for &arg in &args {
                    self.assert_polarized(arg, false);
                }
            }
            TermKind::And(args) => {
                let lits: Vec<Lit> = args.iter().map(|&a| !self.mk_literal(a)).collect();
                self.sat.add_clause(&lits);
            }
            TermKind::Or(args) if !neg => {
                let lits: Vec<Lit> = args.iter().map(|&a| self.mk_literal(a)).collect();
                self.sat.add_clause(&lits);
            }
            TermKind::Or(args) => {
                for &arg in &args {
                    self.assert_polarized(arg, true);
                }
            }
            TermKind::Iff(x, y) => {
                let lx = self.mk_literal(x);
                let ly = self.mk_literal(y);
                if neg {
                    self.sat.add_clause(&[lx, ly]);
                    self.sat.add_clause(&[!lx, !ly]);
                } else {
                    self.sat.add_clause(&[!lx, ly]);
                    self.sat.add_clause(&[lx, !ly]);
                }
            }
            TermKind::Xor(x, y) => {
                let lx = self.mk_literal(x);
                let ly = self.mk_literal(y);
                if neg {
                    self.sat.add_clause(&[!lx, ly]);
                    self.sat.add_clause(&[lx, !ly]);
                } else {
                    self.sat.add_clause(&[lx, ly]);
                    self.sat.add_clause(&[!lx, !ly]);
                }
            }
            TermKind::Ite(c, t, f) => {
                let lc = self.mk_literal(c);
                let lt = self.mk_literal(t);
                let lf = self.mk_literal(f);
                if neg {
                    self.sat.add_clause(&[!lc, !lt]);
                    self.sat.add_clause(&[lc, !lf]);
                } else {
                    self.sat.add_clause(&[!lc, lt]);
                    self.sat.add_clause(&[lc, lf]);
                }
            }
            _ => {
                let lit = self.mk_literal(term);
                let lit = if neg { !lit } else { lit };
                self.sat.add_clause(&[lit]);
            }
        }
    }

    /// Assert a Boolean term as part of the input problem.
    pub fn assert_term(&mut self, term: TermId) {
        self.add_clause_term(term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TermManager;
    use crate::config::SlsConfig;
    use crate::sat::{ClauseInfo, MemorySat, SatSolverContext};

    #[test]
    fn test_atom_table_bijection() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let mut atoms = AtomTable::new();
        let v = Var::new(0);
        atoms.register(v, a);
        assert_eq!(atoms.atom(v), Some(a));
        assert_eq!(atoms.var(a), Some(v));
        assert_eq!(atoms.atom(Var::new(1)), None);
        assert_eq!(atoms.len(), 1);
    }

    #[test]
    fn test_mk_literal_idempotent() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let not_a = tm.mk_not(a);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let l1 = ctx.mk_literal(a);
        let l2 = ctx.mk_literal(a);
        let l3 = ctx.mk_literal(not_a);
        assert_eq!(l1, l2);
        assert_eq!(l3, !l1);
        assert_eq!(ctx.num_bool_vars(), 1);
    }

    #[test]
    fn test_not_chain_folds_into_sign() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let nn_a = {
            let n = tm.mk_not(a);
            tm.mk_not(n)
        };
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let l1 = ctx.mk_literal(a);
        let l2 = ctx.mk_literal(nn_a);
        assert_eq!(l1, l2);
    }

    #[test]
    fn test_tseitin_or() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let b = tm.mk_var("b", tm.sorts.bool_sort);
        let or = tm.mk_or(vec![a, b]);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let lit = ctx.mk_literal(or);
        // one variable for the connective, one per argument
        assert_eq!(ctx.num_bool_vars(), 3);
        // two implications plus the closing clause
        assert_eq!(ctx.clauses().len(), 3);
        assert!(lit.is_pos());
    }

    #[test]
    fn test_assert_decomposes_conjunction() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let b = tm.mk_var("b", tm.sorts.bool_sort);
        let c = tm.mk_or(vec![a, b]);
        let and = tm.mk_and(vec![c, a]);
        {
            let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
            ctx.assert_term(and);
        }
        // (a or b) as one clause, a as a unit; no variable for the `and`
        assert_eq!(sat.num_vars(), 2);
        assert_eq!(sat.clauses().len(), 2);
        assert!(sat.clauses().iter().any(ClauseInfo::is_unit));
        let _ = c;
    }

    #[test]
    fn test_assert_negated_and_is_de_morgan() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let b = tm.mk_var("b", tm.sorts.bool_sort);
        let and = tm.mk_and(vec![a, b]);
        let neg = tm.mk_not(and);
        {
            let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
            ctx.assert_term(neg);
        }
        // single clause (-a or -b)
        assert_eq!(sat.clauses().len(), 1);
        assert_eq!(sat.clauses()[0].lits.len(), 2);
        assert!(sat.clauses()[0].lits.iter().all(|l| l.is_neg()));
    }
}
