//! Bernoulli trial sources.
//!
//! A [`TrialSource`] answers one question: did this probabilistic event occur
//! today? Two distribution families are supported, selectable by
//! configuration. The random source is injectable so tests can substitute a
//! deterministic one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub mod gaussian;
pub mod uniform;

pub use gaussian::{cdf, inverse_cdf, pdf, GaussianTrials};
pub use uniform::UniformTrials;

use crate::config::Distribution;

/// Produces Bernoulli trial outcomes.
pub trait TrialSource {
    /// Returns true with approximately the requested probability.
    /// `probability` must be in `[0, 1]`.
    fn trial(&mut self, probability: f64) -> bool;
}

/// A trial source driven by either supported distribution family.
#[derive(Debug, Clone)]
pub enum DistributionTrials<R: Rng> {
    Gaussian(GaussianTrials<R>),
    Uniform(UniformTrials<R>),
}

impl<R: Rng> DistributionTrials<R> {
    pub fn new(distribution: Distribution, uniform_size: u32, rng: R) -> Self {
        match distribution {
            Distribution::Normal => DistributionTrials::Gaussian(GaussianTrials::new(rng)),
            Distribution::Uniform => {
                DistributionTrials::Uniform(UniformTrials::new(uniform_size, rng))
            }
        }
    }
}

impl<R: Rng> TrialSource for DistributionTrials<R> {
    fn trial(&mut self, probability: f64) -> bool {
        match self {
            DistributionTrials::Gaussian(trials) => trials.trial(probability),
            DistributionTrials::Uniform(trials) => trials.trial(probability),
        }
    }
}

/// RNG for one run. Seed 0 means system entropy; otherwise run `i` gets
/// `seed + i` so reruns with the same seed are bit-identical.
pub(crate) fn run_rng(random_seed: u64, run: u32) -> StdRng {
    if random_seed > 0 {
        StdRng::seed_from_u64(random_seed.wrapping_add(run as u64))
    } else {
        StdRng::from_entropy()
    }
}
