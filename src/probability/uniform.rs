//! Uniform trial source.
//!
//! Draws a uniform integer in `[1, resolution]`, converts it to a derived
//! probability `min(draw / resolution, 1.0)`, and declares the event occurred
//! iff the derived probability is at most the requested one.

use rand::Rng;

use super::TrialSource;

/// Bernoulli trial source backed by uniform integer draws.
#[derive(Debug, Clone)]
pub struct UniformTrials<R: Rng> {
    rng: R,
    resolution: u32,
}

impl<R: Rng> UniformTrials<R> {
    /// `resolution` is the size of the draw space and must be nonzero
    /// (enforced by config validation before a run-set starts).
    pub fn new(resolution: u32, rng: R) -> Self {
        debug_assert!(resolution > 0, "uniform resolution must be nonzero");
        Self { rng, resolution }
    }

    /// Probability represented by one draw out of the resolution space.
    pub fn derived_probability(&self, draw: u32) -> f64 {
        (draw as f64 / self.resolution as f64).min(1.0)
    }
}

impl<R: Rng> TrialSource for UniformTrials<R> {
    fn trial(&mut self, probability: f64) -> bool {
        let draw = self.rng.gen_range(1..=self.resolution);
        self.derived_probability(draw) <= probability
    }
}
