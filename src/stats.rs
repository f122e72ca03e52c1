//! Engine Statistics.

/// Counters accumulated across `check` rounds.
///
/// Plugins contribute through `collect_statistics`; the context owns the
/// repair and constraint counters itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlsStats {
    /// Repair-down items drained.
    pub repair_down: u64,
    /// Repair-up items drained.
    pub repair_up: u64,
    /// New clauses added by plugins.
    pub constraints: u64,
    /// Root literals propagated.
    pub propagations: u64,
    /// Restarts signalled to plugins.
    pub restarts: u64,
}

impl SlsStats {
    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &SlsStats) {
        self.repair_down += other.repair_down;
        self.repair_up += other.repair_up;
        self.constraints += other.constraints;
        self.propagations += other.propagations;
        self.restarts += other.restarts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_reset() {
        let mut a = SlsStats {
            repair_down: 1,
            ..Default::default()
        };
        let b = SlsStats {
            repair_down: 2,
            constraints: 3,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.repair_down, 3);
        assert_eq!(a.constraints, 3);
        a.reset();
        assert_eq!(a.repair_down, 0);
    }
}
