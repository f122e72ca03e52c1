//! Model Value Plugin.
//!
//! Model value terms are rigid placeholders minted during model
//! construction; they never change value, so every repair request against
//! one simply fails upward.

use crate::ast::{Family, TermId, TermKind};
use crate::context::Context;
use crate::literal::Lit;
use crate::plugin::Plugin;
use crate::value::Value;

/// Plugin for model value terms.
#[derive(Debug, Default)]
pub struct ModelValuePlugin;

impl ModelValuePlugin {
    /// Create the plugin.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for ModelValuePlugin {
    fn family(&self) -> Family {
        Family::ModelValue
    }

    fn register_term(&mut self, _ctx: &mut Context<'_>, _term: TermId) {}

    fn propagate_literal(&mut self, _ctx: &mut Context<'_>, _lit: Lit) {}

    fn repair_down(&mut self, ctx: &mut Context<'_>, term: TermId) -> bool {
        // rigid: succeeds only if nothing actually wants a different value
        !matches!(ctx.tm().get(term).kind, TermKind::ModelValue { .. })
    }

    fn repair_up(&mut self, _ctx: &mut Context<'_>, _term: TermId) {}

    fn repair_literal(&mut self, _ctx: &mut Context<'_>, _lit: Lit) {}

    fn is_sat(&mut self, _ctx: &mut Context<'_>) -> bool {
        true
    }

    fn get_value(&mut self, ctx: &mut Context<'_>, term: TermId) -> Option<Value> {
        match ctx.tm().get(term).kind {
            TermKind::ModelValue { index } => Some(Value::Elem {
                sort: ctx.tm().sort(term),
                index,
            }),
            _ => None,
        }
    }
}
