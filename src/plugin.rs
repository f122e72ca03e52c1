//! Theory Plugin Protocol.
//!
//! Each syntactic family of terms is owned by one plugin. The context routes
//! registration, literal propagation and the repair passes through the
//! family-indexed table below; plugins communicate with each other only
//! through `Context::get_value`/`set_value` and by adding clauses.
//!
//! Plugins never fail with errors: inability to repair is reported through
//! return values (`repair_down -> false`, `propagate -> false`), which the
//! dispatcher turns into rescheduling or a new-constraint restart.

use crate::ast::{Family, TermId, TermManager};
use crate::context::Context;
use crate::error::{Result, SlsError};
use crate::literal::{Lit, Var};
use crate::model::Model;
use crate::stats::SlsStats;
use crate::value::Value;

/// Capability set every theory plugin implements.
///
/// Methods take the context by mutable reference; during a dispatch the
/// plugin's own table slot is vacated, so a plugin must answer queries about
/// its own family from local state rather than recursing through the
/// context.
pub trait Plugin {
    /// Family this plugin owns.
    fn family(&self) -> Family;

    /// Record theory-specific structure for a newly registered term.
    ///
    /// Called exactly once per distinct term, for every plugin, children
    /// first.
    fn register_term(&mut self, ctx: &mut Context<'_>, term: TermId);

    /// One-time setup after all initial atoms are registered.
    fn initialize(&mut self, _ctx: &mut Context<'_>) {}

    /// A fresh Boolean variable was attached to an atom of this family.
    fn init_bool_var(&mut self, _ctx: &mut Context<'_>, _var: Var) {}

    /// Hook at the start of every propagation round.
    fn start_propagation(&mut self, _ctx: &mut Context<'_>) {}

    /// A root literal of this family is true under the Boolean assignment.
    fn propagate_literal(&mut self, ctx: &mut Context<'_>, lit: Lit);

    /// Make `term`'s value consistent with the needs of its context.
    ///
    /// Returning false escalates: the engine schedules `term` for repair-up
    /// instead.
    fn repair_down(&mut self, ctx: &mut Context<'_>, term: TermId) -> bool;

    /// A child of `term` changed value; update `term`'s cached value.
    ///
    /// Failure manifests as rescheduling or a new clause, never a return
    /// value.
    fn repair_up(&mut self, ctx: &mut Context<'_>, term: TermId);

    /// Re-validate the plugin's view of `lit` against the Boolean
    /// assignment.
    fn repair_literal(&mut self, ctx: &mut Context<'_>, lit: Lit);

    /// Theory-level final check. Returns true if progress was made and the
    /// caller should loop again.
    fn propagate(&mut self, _ctx: &mut Context<'_>) -> bool {
        false
    }

    /// True iff the plugin's local state is consistent with the Boolean
    /// assignment.
    fn is_sat(&mut self, ctx: &mut Context<'_>) -> bool;

    /// Candidate value of a term whose sort this plugin owns.
    fn get_value(&mut self, ctx: &mut Context<'_>, term: TermId) -> Option<Value>;

    /// Best-effort value override. Returns true if the plugin took it.
    fn set_value(&mut self, _ctx: &mut Context<'_>, _term: TermId, _value: &Value) -> bool {
        false
    }

    /// Contribute interpretations to a freshly built model.
    fn mk_model(&mut self, _ctx: &mut Context<'_>, _model: &mut Model) {}

    /// The host restarted the search.
    fn on_restart(&mut self, _ctx: &mut Context<'_>) {}

    /// Clause weights were rescaled.
    fn on_rescale(&mut self, _ctx: &mut Context<'_>) {}

    /// Merge plugin counters into the engine statistics.
    fn collect_statistics(&self, _stats: &mut SlsStats) {}

    /// Reset plugin counters.
    fn reset_statistics(&mut self) {}

    /// Render plugin state for diagnostics.
    fn display(&self, _tm: &TermManager) -> String {
        String::new()
    }
}

/// Dense family-indexed plugin table.
///
/// At most one plugin per family; entries may be empty. Plugins are
/// installed once and live for the lifetime of the context.
pub struct PluginTable {
    slots: [Option<Box<dyn Plugin>>; Family::COUNT],
}

impl std::fmt::Debug for PluginTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let installed: Vec<usize> = (0..Family::COUNT)
            .filter(|&i| self.slots[i].is_some())
            .collect();
        f.debug_struct("PluginTable")
            .field("installed", &installed)
            .finish()
    }
}

impl PluginTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Install a plugin in its family slot.
    pub fn install(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        let fam = plugin.family();
        let slot = &mut self.slots[fam.index()];
        if slot.is_some() {
            return Err(SlsError::DuplicatePlugin(fam));
        }
        *slot = Some(plugin);
        Ok(())
    }

    /// Temporarily remove a plugin for dispatch; pair with [`PluginTable::put`].
    pub fn take(&mut self, family: Family) -> Option<Box<dyn Plugin>> {
        self.slots[family.index()].take()
    }

    /// Return a plugin taken with [`PluginTable::take`].
    pub fn put(&mut self, family: Family, plugin: Box<dyn Plugin>) {
        debug_assert!(self.slots[family.index()].is_none());
        self.slots[family.index()] = Some(plugin);
    }

    /// True iff a plugin is installed for `family`.
    #[must_use]
    pub fn has(&self, family: Family) -> bool {
        self.slots[family.index()].is_some()
    }

    /// Visit every installed plugin.
    pub fn for_each(&self, mut f: impl FnMut(&dyn Plugin)) {
        for slot in self.slots.iter().flatten() {
            f(slot.as_ref());
        }
    }

    /// Visit every installed plugin mutably.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut dyn Plugin)) {
        for slot in self.slots.iter_mut().flatten() {
            f(slot.as_mut());
        }
    }
}

impl Default for PluginTable {
    fn default() -> Self {
        Self::new()
    }
}

/// All families, in dispatch order.
pub const ALL_FAMILIES: [Family; Family::COUNT] = [
    Family::Basic,
    Family::Arith,
    Family::Bv,
    Family::Array,
    Family::Datatype,
    Family::Uf,
    Family::UserSort,
    Family::ModelValue,
];

#[cfg(test)]
mod tests {
    use super::*;

    struct NullPlugin(Family);

    impl Plugin for NullPlugin {
        fn family(&self) -> Family {
            self.0
        }
        fn register_term(&mut self, _ctx: &mut Context<'_>, _term: TermId) {}
        fn propagate_literal(&mut self, _ctx: &mut Context<'_>, _lit: Lit) {}
        fn repair_down(&mut self, _ctx: &mut Context<'_>, _term: TermId) -> bool {
            true
        }
        fn repair_up(&mut self, _ctx: &mut Context<'_>, _term: TermId) {}
        fn repair_literal(&mut self, _ctx: &mut Context<'_>, _lit: Lit) {}
        fn is_sat(&mut self, _ctx: &mut Context<'_>) -> bool {
            true
        }
        fn get_value(&mut self, _ctx: &mut Context<'_>, _term: TermId) -> Option<Value> {
            None
        }
    }

    #[test]
    fn test_install_once() {
        let mut table = PluginTable::new();
        assert!(table.install(Box::new(NullPlugin(Family::Arith))).is_ok());
        assert!(table.has(Family::Arith));
        assert_eq!(
            table.install(Box::new(NullPlugin(Family::Arith))),
            Err(SlsError::DuplicatePlugin(Family::Arith))
        );
    }

    #[test]
    fn test_take_put() {
        let mut table = PluginTable::new();
        table.install(Box::new(NullPlugin(Family::Bv))).unwrap();
        let p = table.take(Family::Bv).unwrap();
        assert!(!table.has(Family::Bv));
        table.put(Family::Bv, p);
        assert!(table.has(Family::Bv));
    }
}
