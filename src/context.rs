//! SLS Repair-Propagation Context.
//!
//! The orchestrator of the search: owns the plugin table, the atom table,
//! the parent graph, the two repair worklists and the per-round relevance
//! state, and drives the inner propagation state machine
//!
//! ```text
//! ROOT_PROPAGATE -> REPAIR_DOWN <-> REPAIR_UP -> LITERAL_REPAIR -> FINAL_CHECK
//! ```
//!
//! until every plugin agrees on the candidate assignment (`Sat`), a plugin
//! strengthens the Boolean skeleton with a new clause (`Unknown`, restart),
//! or the resource budget runs out (`Unknown`). The engine is a model
//! search; it never concludes unsatisfiability.

use crate::ast::{Family, TermId, TermKind, TermManager};
use crate::bridge::AtomTable;
use crate::config::SlsConfig;
use crate::error::{Result, SlsError};
use crate::literal::{Lit, Var};
use crate::model::Model;
use crate::plugin::{Plugin, PluginTable, ALL_FAMILIES};
use crate::plugins;
use crate::registry::TermRegistry;
use crate::relevance::Relevance;
use crate::resource::ResourceLimit;
use crate::sat::{ClauseInfo, SatSolverContext};
use crate::stats::SlsStats;
use crate::value::Value;
use crate::worklist::{DownPriority, IndexedSet, RepairQueue, UpPriority};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use tracing::{debug, trace};

/// Outcome of a [`Context::check`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    /// Every plugin is consistent with the Boolean assignment; a model was
    /// delivered through `on_model`.
    Sat,
    /// A new constraint was learned, the SAT oracle reports falsified
    /// clauses, or the resource budget ran out.
    Unknown,
}

/// The repair-propagation engine.
pub struct Context<'a> {
    pub(crate) tm: &'a mut TermManager,
    pub(crate) sat: &'a mut dyn SatSolverContext,
    pub(crate) plugins: PluginTable,
    pub(crate) atoms: AtomTable,
    pub(crate) registry: TermRegistry,
    pub(crate) relevance: Relevance,
    pub(crate) repair_down: RepairQueue,
    pub(crate) repair_up: RepairQueue,
    pub(crate) rng: StdRng,
    pub(crate) limit: ResourceLimit,
    pub(crate) stats: SlsStats,
    pub(crate) new_constraint: bool,
    initialized: bool,
    /// Clauses scanned for units so far; learned clauses are picked up on
    /// the next `init`.
    unit_cursor: usize,
    unit_indices: IndexedSet,
}

impl<'a> Context<'a> {
    /// Create a context with the full default plugin set installed.
    pub fn new(
        tm: &'a mut TermManager,
        sat: &'a mut dyn SatSolverContext,
        config: SlsConfig,
    ) -> Self {
        Self::with_plugins(
            tm,
            sat,
            config,
            vec![
                Box::new(plugins::BasicPlugin::new()),
                Box::new(plugins::ArithPlugin::new()),
                Box::new(plugins::BvPlugin::new()),
                Box::new(plugins::ArrayPlugin::new()),
                Box::new(plugins::DatatypePlugin::new()),
                Box::new(plugins::EufPlugin::new()),
                Box::new(plugins::UserSortPlugin::new()),
                Box::new(plugins::ModelValuePlugin::new()),
            ],
        )
    }

    /// Create a context with an explicit plugin set.
    ///
    /// Panics if two plugins claim the same family; plugin installation is a
    /// construction-time concern, not a search failure.
    pub fn with_plugins(
        tm: &'a mut TermManager,
        sat: &'a mut dyn SatSolverContext,
        config: SlsConfig,
        plugin_list: Vec<Box<dyn Plugin>>,
    ) -> Self {
        let mut plugins = PluginTable::new();
        for p in plugin_list {
            if let Err(err) = plugins.install(p) {
                panic!("plugin installation failed: {err}");
            }
        }
        let rng = StdRng::seed_from_u64(config.seed);
        let limit = ResourceLimit::new(config.max_steps);
        Self {
            tm,
            sat,
            plugins,
            atoms: AtomTable::new(),
            registry: TermRegistry::new(),
            relevance: Relevance::new(),
            repair_down: RepairQueue::new(Box::new(DownPriority)),
            repair_up: RepairQueue::new(Box::new(UpPriority)),
            rng,
            limit,
            stats: SlsStats::default(),
            new_constraint: false,
            initialized: false,
            unit_cursor: 0,
            unit_indices: IndexedSet::new(),
        }
    }

    /// Dispatch to the plugin of `family`, vacating its slot for the call so
    /// the plugin can reach back into the context.
    pub(crate) fn with_plugin<R>(
        &mut self,
        family: Family,
        f: impl FnOnce(&mut Context<'a>, &mut dyn Plugin) -> R,
    ) -> Option<R> {
        let mut plugin = self.plugins.take(family)?;
        let result = f(self, plugin.as_mut());
        self.plugins.put(family, plugin);
        Some(result)
    }

    // ------------------------------------------------------------------
    // top-level loop

    /// Run propagation rounds until a model is found, a new clause restarts
    /// the search, or the resource budget is exhausted.
    pub fn check(&mut self) -> CheckResult {
        self.init();
        while self.sat.unsat().is_empty() && self.limit.inc() {
            self.propagate_boolean_assignment();

            if self.new_constraint || !self.sat.unsat().is_empty() {
                return CheckResult::Unknown;
            }

            if self.all_plugins_sat() {
                let model = self.build_model();
                debug!(assignments = model.len(), "model found");
                self.sat.on_model(&model);
                return CheckResult::Sat;
            }
        }
        CheckResult::Unknown
    }

    /// Per-round setup: lower the new-constraint flag and index any unit
    /// clauses added since the last round, so learned units lock their
    /// variables too. The one-time part (atom registration, plugin
    /// initialize) runs on the first call only.
    pub fn init(&mut self) {
        self.new_constraint = false;
        for clause in &self.sat.clauses()[self.unit_cursor..] {
            if clause.is_unit() {
                self.unit_indices.insert(clause.lits[0].index());
            }
        }
        self.unit_cursor = self.sat.clauses().len();
        if self.initialized {
            return;
        }
        self.initialized = true;
        let atoms: Vec<TermId> = self.atoms.terms().collect();
        for atom in atoms {
            self.register_terms(atom);
        }
        for fam in ALL_FAMILIES {
            self.with_plugin(fam, |ctx, p| p.initialize(ctx));
        }
    }

    fn all_plugins_sat(&mut self) -> bool {
        ALL_FAMILIES
            .into_iter()
            .all(|fam| self.with_plugin(fam, |ctx, p| p.is_sat(ctx)).unwrap_or(true))
    }

    fn build_model(&mut self) -> Model {
        let mut model = Model::new();
        let registered: Vec<TermId> = self.subterms().to_vec();
        for t in registered {
            if !matches!(self.tm.get(t).kind, TermKind::Var { .. }) {
                continue;
            }
            if let Ok(v) = self.get_value(t) {
                model.assign(t, v);
            }
        }
        for fam in ALL_FAMILIES {
            self.with_plugin(fam, |ctx, p| p.mk_model(ctx, &mut model));
        }
        model
    }

    // ------------------------------------------------------------------
    // inner state machine

    /// One propagation round over the current Boolean assignment.
    pub(crate) fn propagate_boolean_assignment(&mut self) {
        self.relevance.reinit(&*self.sat, &self.atoms, &mut self.rng);

        for fam in ALL_FAMILIES {
            self.with_plugin(fam, |ctx, p| p.start_propagation(ctx));
        }

        let roots: Vec<Lit> = self.relevance.root_literals().to_vec();
        for lit in roots {
            if self.new_constraint {
                return;
            }
            self.stats.propagations += 1;
            self.propagate_literal(lit);
        }
        if self.new_constraint {
            return;
        }

        while !self.new_constraint
            && self.limit.inc()
            && (!self.repair_down.is_empty() || !self.repair_up.is_empty())
        {
            while !self.new_constraint && self.limit.inc() {
                let Some(t) = self.repair_down.erase_min() else {
                    break;
                };
                self.stats.repair_down += 1;
                trace!(term = t.0, "repair down");
                if let Some(fam) = self.tm.family(t) {
                    let repaired = self
                        .with_plugin(fam, |ctx, p| p.repair_down(ctx, t))
                        .unwrap_or(true);
                    if !repaired && !self.repair_up.contains(t) {
                        trace!(term = t.0, "revert repair, escalate up");
                        self.repair_up.insert(&*self.tm, t);
                    }
                }
            }
            while !self.new_constraint && self.limit.inc() {
                let Some(t) = self.repair_up.erase_min() else {
                    break;
                };
                self.stats.repair_up += 1;
                trace!(term = t.0, "repair up");
                if let Some(fam) = self.tm.family(t) {
                    self.with_plugin(fam, |ctx, p| p.repair_up(ctx, t));
                }
            }
        }

        self.repair_literals();

        let mut propagated = true;
        while propagated && !self.new_constraint {
            propagated = false;
            for fam in ALL_FAMILIES {
                if self.new_constraint {
                    break;
                }
                if self
                    .with_plugin(fam, |ctx, p| p.propagate(ctx))
                    .unwrap_or(false)
                {
                    propagated = true;
                }
            }
        }
    }

    /// Route a true root literal to the plugin owning its atom.
    fn propagate_literal(&mut self, lit: Lit) {
        if !self.sat.is_true(lit) {
            return;
        }
        let Some(atom) = self.atoms.atom(lit.var()) else {
            return;
        };
        let Some(fam) = self.tm.family(atom) else {
            return;
        };
        self.with_plugin(fam, |ctx, p| p.propagate_literal(ctx, lit));
    }

    /// Re-validate every registered atom against the actual Boolean
    /// assignment.
    fn repair_literals(&mut self) {
        for vi in 0..self.sat.num_vars() {
            if self.new_constraint {
                break;
            }
            let var = Var::new(vi as u32);
            let Some(atom) = self.atoms.atom(var) else {
                continue;
            };
            let lit = Lit::new(var, !self.sat.is_true(Lit::pos(var)));
            if let Some(fam) = self.tm.family(atom) {
                self.with_plugin(fam, |ctx, p| p.repair_literal(ctx, lit));
            }
        }
    }

    // ------------------------------------------------------------------
    // term registration

    /// Register `root` and all of its subterms, children first.
    ///
    /// Builds parent links, atomizes Boolean subterms and calls every
    /// plugin's `register_term` hook exactly once per distinct term. Safe to
    /// call from within a registration pass: the nested call seeds the work
    /// stack and returns, leaving the in-progress pass to pick it up.
    pub fn register_terms(&mut self, root: TermId) {
        if self.registry.is_registered(root) {
            return;
        }
        self.registry.push_todo(root);
        if self.registry.todo_len() > 1 {
            return;
        }
        while let Some(term) = self.registry.peek_todo() {
            if self.registry.is_registered(term) {
                self.registry.pop_todo();
                continue;
            }
            let children = self.tm.get(term).kind.children();
            let pending: Vec<TermId> = children
                .iter()
                .copied()
                .filter(|&c| !self.registry.is_registered(c))
                .collect();
            if pending.is_empty() {
                self.registry.pop_todo();
                for &child in &children {
                    self.registry.add_parent(child, term);
                }
                // mark before the hooks so re-entrant registration of the
                // same term is a no-op
                self.registry.mark_registered(term);
                if self.tm.is_bool(term) {
                    self.mk_literal(term);
                }
                self.register_term(term);
            } else {
                for child in pending {
                    self.registry.push_todo(child);
                }
            }
        }
    }

    fn register_term(&mut self, term: TermId) {
        trace!(term = term.0, "register term");
        for fam in ALL_FAMILIES {
            self.with_plugin(fam, |ctx, p| p.register_term(ctx, term));
        }
    }

    // ------------------------------------------------------------------
    // plugin-facing surface

    /// A plugin changed `term`'s candidate value: schedule `term` for
    /// repair-down and its parents for repair-up.
    pub fn new_value_eh(&mut self, term: TermId) {
        self.repair_down.insert(&*self.tm, term);
        for i in 0..self.registry.parents(term).len() {
            let parent = self.registry.parents(term)[i];
            self.repair_up.insert(&*self.tm, parent);
        }
    }

    /// Schedule a term for repair-down.
    pub fn schedule_repair_down(&mut self, term: TermId) {
        self.repair_down.insert(&*self.tm, term);
    }

    /// Schedule a term for repair-up.
    pub fn schedule_repair_up(&mut self, term: TermId) {
        self.repair_up.insert(&*self.tm, term);
    }

    /// Add a clause derived from `term` and raise the new-constraint flag,
    /// aborting the current round.
    pub fn add_constraint(&mut self, term: TermId) {
        debug!(term = term.0, "new constraint");
        self.add_clause_term(term);
        self.new_constraint = true;
        self.stats.constraints += 1;
    }

    /// Add a clause over existing literals and raise the new-constraint
    /// flag.
    pub fn add_clause(&mut self, lits: &[Lit]) {
        self.sat.add_clause(lits);
        self.new_constraint = true;
        self.stats.constraints += 1;
    }

    /// Candidate value of a term, routed to the plugin owning its sort.
    pub fn get_value(&mut self, term: TermId) -> Result<Value> {
        let fam = self.tm.sort_kind(self.tm.sort(term)).family();
        match self.with_plugin(fam, |ctx, p| p.get_value(ctx, term)) {
            None => Err(SlsError::MissingPlugin(fam)),
            Some(None) => Err(SlsError::UnregisteredTerm(term)),
            Some(Some(v)) => Ok(v),
        }
    }

    /// Offer a value to the plugins; the first taker wins.
    pub fn set_value(&mut self, term: TermId, value: &Value) -> bool {
        for fam in ALL_FAMILIES {
            if self
                .with_plugin(fam, |ctx, p| p.set_value(ctx, term, value))
                .unwrap_or(false)
            {
                return true;
            }
        }
        false
    }

    /// Transitive relevance of a term under the current root literals.
    pub fn is_relevant(&mut self, term: TermId) -> bool {
        self.relevance.is_relevant(&self.registry, term)
    }

    /// Truth of a literal under the Boolean assignment.
    #[must_use]
    pub fn is_true(&self, lit: Lit) -> bool {
        self.sat.is_true(lit)
    }

    /// Truth of a Boolean term under the Boolean assignment.
    ///
    /// A Boolean term without an atom is a construction bug, reported as an
    /// explicit error rather than silently recursed on.
    pub fn is_true_term(&self, term: TermId) -> Result<bool> {
        match self.atoms.var(term) {
            Some(v) => Ok(self.sat.is_true(Lit::pos(v))),
            None => Err(SlsError::NoAtom(term)),
        }
    }

    /// True iff `lit` is asserted by a singleton clause collected at `init`.
    #[must_use]
    pub fn is_unit(&self, lit: Lit) -> bool {
        self.unit_indices.contains(lit.index())
    }

    /// Flip a variable unless either of its polarities is unit-asserted.
    /// Returns true if the flip happened.
    pub fn try_flip(&mut self, var: Var) -> bool {
        let lit = Lit::pos(var);
        if self.unit_indices.contains(lit.index()) || self.unit_indices.contains((!lit).index()) {
            return false;
        }
        self.sat.flip(var);
        true
    }

    /// Atom attached to a Boolean variable, if any.
    #[must_use]
    pub fn atom(&self, var: Var) -> Option<TermId> {
        self.atoms.atom(var)
    }

    /// Boolean variable attached to a term, if any.
    #[must_use]
    pub fn atom_var(&self, term: TermId) -> Option<Var> {
        self.atoms.var(term)
    }

    /// The current CNF skeleton.
    #[must_use]
    pub fn clauses(&self) -> &[ClauseInfo] {
        self.sat.clauses()
    }

    /// Clauses mentioning a literal.
    #[must_use]
    pub fn get_use_list(&self, lit: Lit) -> &[usize] {
        self.sat.get_use_list(lit)
    }

    /// Number of allocated Boolean variables.
    #[must_use]
    pub fn num_bool_vars(&self) -> usize {
        self.sat.num_vars()
    }

    /// Soft weight of a clause.
    #[must_use]
    pub fn get_weight(&self, idx: usize) -> f64 {
        self.sat.get_weight(idx)
    }

    /// Move reward of flipping `var`, as reported by the oracle.
    #[must_use]
    pub fn reward(&self, var: Var) -> f64 {
        self.sat.reward(var)
    }

    /// The shuffled root literals of the current round.
    #[must_use]
    pub fn root_literals(&self) -> &[Lit] {
        self.relevance.root_literals()
    }

    /// All registered terms, sorted by ascending depth.
    pub fn subterms(&mut self) -> &[TermId] {
        self.registry.subterms(&*self.tm)
    }

    /// The term manager.
    #[must_use]
    pub fn tm(&self) -> &TermManager {
        self.tm
    }

    /// Mutable term manager, for plugins building constraint terms.
    pub fn tm_mut(&mut self) -> &mut TermManager {
        self.tm
    }

    /// Uniform random index below `n`; `n` must be positive.
    pub fn rand_index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Uniform random Boolean.
    pub fn rand_bool(&mut self) -> bool {
        self.rng.gen()
    }

    // ------------------------------------------------------------------
    // host-facing surface

    /// Notify plugins of a host-driven restart.
    pub fn on_restart(&mut self) {
        self.stats.restarts += 1;
        for fam in ALL_FAMILIES {
            self.with_plugin(fam, |ctx, p| p.on_restart(ctx));
        }
    }

    /// Notify plugins that clause weights were rescaled.
    pub fn on_rescale(&mut self) {
        for fam in ALL_FAMILIES {
            self.with_plugin(fam, |ctx, p| p.on_rescale(ctx));
        }
    }

    /// Attach an externally created atom to a Boolean variable.
    pub fn register_atom(&mut self, var: Var, term: TermId) {
        self.atoms.register(var, term);
    }

    /// Engine statistics, with plugin contributions merged in.
    #[must_use]
    pub fn collect_statistics(&self) -> SlsStats {
        let mut stats = self.stats;
        self.plugins.for_each(|p| p.collect_statistics(&mut stats));
        stats
    }

    /// Reset engine and plugin statistics.
    pub fn reset_statistics(&mut self) {
        self.stats.reset();
        self.plugins.for_each_mut(|p| p.reset_statistics());
    }

    /// Steps consumed so far from the resource budget.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.limit.steps()
    }

    /// Handle for cancelling a running check from another thread.
    #[must_use]
    pub fn cancel_flag(&self) -> std::sync::Arc<std::sync::atomic::AtomicBool> {
        self.limit.cancel_flag()
    }

    /// Render worklists, atoms and plugin state for diagnostics.
    #[must_use]
    pub fn display(&self) -> String {
        let mut out = String::new();
        for t in self.repair_down.iter() {
            let _ = writeln!(out, "d {}", self.tm.display(t));
        }
        for t in self.repair_up.iter() {
            let _ = writeln!(out, "u {}", self.tm.display(t));
        }
        for (var, term) in self.atoms.entries() {
            let truth = if self.sat.is_true(Lit::pos(var)) { "T" } else { "F" };
            let _ = writeln!(out, "{}: {} := {}", var, self.tm.display(term), truth);
        }
        self.plugins.for_each(|p| out.push_str(&p.display(self.tm)));
        out
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("registered", &self.registry.num_registered())
            .field("repair_down", &self.repair_down.len())
            .field("repair_up", &self.repair_up.len())
            .field("new_constraint", &self.new_constraint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::MemorySat;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Calls {
        repair_down: Vec<TermId>,
        repair_up: Vec<TermId>,
        registered: Vec<TermId>,
    }

    /// Arith-slot plugin that refuses every repair-down request.
    struct StubbornPlugin {
        calls: Rc<RefCell<Calls>>,
    }

    impl Plugin for StubbornPlugin {
        fn family(&self) -> Family {
            Family::Arith
        }
        fn register_term(&mut self, _ctx: &mut Context<'_>, term: TermId) {
            self.calls.borrow_mut().registered.push(term);
        }
        fn propagate_literal(&mut self, _ctx: &mut Context<'_>, _lit: Lit) {}
        fn repair_down(&mut self, _ctx: &mut Context<'_>, term: TermId) -> bool {
            self.calls.borrow_mut().repair_down.push(term);
            false
        }
        fn repair_up(&mut self, _ctx: &mut Context<'_>, term: TermId) {
            self.calls.borrow_mut().repair_up.push(term);
        }
        fn repair_literal(&mut self, _ctx: &mut Context<'_>, _lit: Lit) {}
        fn is_sat(&mut self, _ctx: &mut Context<'_>) -> bool {
            true
        }
        fn get_value(&mut self, _ctx: &mut Context<'_>, _term: TermId) -> Option<Value> {
            None
        }
    }

    #[test]
    fn test_failed_repair_down_escalates_up() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let x = tm.mk_var("x", tm.sorts.int_sort);
        let y = tm.mk_var("y", tm.sorts.int_sort);
        let eq = tm.mk_eq(x, y);
        let calls = Rc::new(RefCell::new(Calls::default()));
        let stubborn = StubbornPlugin {
            calls: Rc::clone(&calls),
        };
        let mut ctx = Context::with_plugins(
            &mut tm,
            &mut sat,
            SlsConfig::default(),
            vec![Box::new(stubborn)],
        );
        ctx.mk_literal(eq);
        ctx.schedule_repair_down(eq);
        ctx.propagate_boolean_assignment();
        let calls = calls.borrow();
        assert_eq!(calls.repair_down, vec![eq]);
        // the refused term came back through the repair-up queue
        assert_eq!(calls.repair_up, vec![eq]);
    }

    #[test]
    fn test_round_drains_worklists() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let x = tm.mk_var("x", tm.sorts.int_sort);
        let y = tm.mk_var("y", tm.sorts.int_sort);
        let sum = tm.mk_add(vec![x, y]);
        let five = tm.mk_int(num_bigint::BigInt::from(5));
        let eq = tm.mk_eq(sum, five);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        ctx.assert_term(eq);
        let lit = ctx.mk_literal(eq);
        if !ctx.is_true(lit) {
            ctx.try_flip(lit.var());
        }
        ctx.init();
        ctx.propagate_boolean_assignment();
        // no new constraint: the round ran to a fixpoint
        assert!(!ctx.new_constraint);
        assert!(ctx.repair_down.is_empty());
        assert!(ctx.repair_up.is_empty());
    }

    #[test]
    fn test_register_terms_exactly_once() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let x = tm.mk_var("x", tm.sorts.int_sort);
        let y = tm.mk_var("y", tm.sorts.int_sort);
        let sum = tm.mk_add(vec![x, y]);
        let sum2 = tm.mk_add(vec![sum, x]);
        let calls = Rc::new(RefCell::new(Calls::default()));
        let stubborn = StubbornPlugin {
            calls: Rc::clone(&calls),
        };
        let mut ctx = Context::with_plugins(
            &mut tm,
            &mut sat,
            SlsConfig::default(),
            vec![Box::new(stubborn)],
        );
        ctx.register_terms(sum2);
        ctx.register_terms(sum2);
        let registered = &calls.borrow().registered;
        // x is shared between both sums but registers once
        assert_eq!(registered.len(), 4);
        let mut seen = registered.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 4);
        // children precede parents
        let pos = |t: TermId| registered.iter().position(|&r| r == t).unwrap();
        assert!(pos(x) < pos(sum));
        assert!(pos(sum) < pos(sum2));
    }

    #[test]
    fn test_parent_links_follow_structure() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let b = tm.mk_var("b", tm.sorts.bool_sort);
        let or = tm.mk_or(vec![a, b]);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        ctx.register_terms(or);
        assert_eq!(ctx.registry.parents(a), &[or]);
        assert_eq!(ctx.registry.parents(b), &[or]);
        assert_eq!(ctx.registry.parents(or), &[] as &[TermId]);
    }

    #[test]
    fn test_new_value_eh_schedules_both_queues() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let x = tm.mk_var("x", tm.sorts.int_sort);
        let y = tm.mk_var("y", tm.sorts.int_sort);
        let sum = tm.mk_add(vec![x, y]);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        ctx.register_terms(sum);
        ctx.new_value_eh(x);
        assert!(ctx.repair_down.contains(x));
        assert!(ctx.repair_up.contains(sum));
        assert!(!ctx.repair_up.contains(x));
    }

    #[test]
    fn test_new_constraint_aborts_round() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let la = ctx.mk_literal(a);
        ctx.init();
        let before = ctx.clauses().len();
        ctx.add_clause(&[la]);
        assert!(ctx.new_constraint);
        assert_eq!(ctx.clauses().len(), before + 1);
        assert_eq!(ctx.check(), CheckResult::Unknown);
        // init lowers the flag for the next round
        ctx.init();
        assert!(!ctx.new_constraint);
    }

    #[test]
    fn test_learned_units_lock_flips() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        let la = ctx.mk_literal(a);
        ctx.init();
        // no unit clause yet: the variable is free to move
        assert!(ctx.try_flip(la.var()));
        ctx.add_clause(&[la]);
        ctx.init();
        // the learned unit locks the variable from the next round on
        assert!(ctx.is_unit(la));
        assert!(!ctx.try_flip(la.var()));
    }

    #[test]
    fn test_exhausted_budget_reports_unknown() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let config = SlsConfig::default().with_max_steps(0);
        let mut ctx = Context::new(&mut tm, &mut sat, config);
        let la = ctx.mk_literal(a);
        let _ = la;
        assert_eq!(ctx.check(), CheckResult::Unknown);
    }

    #[test]
    fn test_get_value_unregistered_term() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let x = tm.mk_var("x", tm.sorts.int_sort);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        assert_eq!(ctx.get_value(x), Err(SlsError::UnregisteredTerm(x)));
        ctx.register_terms(x);
        assert_eq!(ctx.get_value(x), Ok(Value::int_zero()));
    }

    #[test]
    fn test_is_true_term_requires_atom() {
        let mut tm = TermManager::new();
        let mut sat = MemorySat::new();
        let a = tm.mk_var("a", tm.sorts.bool_sort);
        let mut ctx = Context::new(&mut tm, &mut sat, SlsConfig::default());
        assert_eq!(ctx.is_true_term(a), Err(SlsError::NoAtom(a)));
        ctx.mk_literal(a);
        assert_eq!(ctx.is_true_term(a), Ok(false));
    }
}
