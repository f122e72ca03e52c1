//! Engine Configuration.

/// Tunables for the repair engine.
///
/// The seed feeds the root-literal reservoir sampling and shuffle; runs with
/// the same seed, formula and oracle behavior are reproducible.
#[derive(Debug, Clone)]
pub struct SlsConfig {
    /// Seed for the engine's random generator.
    pub seed: u64,
    /// Step budget across all repair work; see [`crate::resource::ResourceLimit`].
    pub max_steps: u64,
}

impl Default for SlsConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_steps: 10_000_000,
        }
    }
}

impl SlsConfig {
    /// Replace the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the step budget.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }
}
