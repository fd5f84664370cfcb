//! Run-set configuration.
//!
//! The core consumes configuration, it never produces it. Loading (files,
//! menus) belongs to the caller; validation must complete before any run
//! starts so the core never partially executes on invalid input.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Distribution family used for Bernoulli trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Standard normal draw evaluated through the Gaussian CDF.
    Normal,
    /// Uniform integer draw over a configured resolution.
    Uniform,
}

/// Configuration for one simulation run-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent runs.
    /// Default: 100
    pub simulations: u32,

    /// Number of discrete days per run.
    /// Default: 30
    pub days: u32,

    /// Distribution family for infection and patch trials.
    /// Default: normal
    pub distribution: Distribution,

    /// Base daily compromise likelihood assigned to nodes, in `[0, 1]`.
    /// Default: 0.05
    pub threat_likelihood: f64,

    /// Daily patch likelihood applied to every node, in `[0, 1]`.
    /// Default: 0.2
    pub patch_likelihood: f64,

    /// Resolution for uniform trials (size of the integer draw space).
    /// Default: 100
    pub uniform_size: u32,

    /// Recovery time objective: maximum tolerable days compromised per run.
    /// Default: 5
    pub rto: u32,

    /// Recovery point objective: maximum tolerable cumulative data-loss days.
    /// Default: 5
    pub rpo: u32,

    /// Backup cadence in days. Must be greater than zero.
    /// Default: 5
    pub backup_frequency: u32,

    /// Side-effect flag for an external write-back collaborator.
    /// Ignored by the core's pure computation.
    /// Default: false
    #[serde(default)]
    pub populate_blocks: bool,

    /// Random seed (0 = use system entropy).
    /// Run `i` of a run-set is seeded with `random_seed + i`.
    /// Default: 0
    #[serde(default)]
    pub random_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulations: 100,
            days: 30,
            distribution: Distribution::Normal,
            threat_likelihood: 0.05,
            patch_likelihood: 0.2,
            uniform_size: 100,
            rto: 5,
            rpo: 5,
            backup_frequency: 5,
            populate_blocks: false,
            random_seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Validate every recognized option.
    ///
    /// Rejecting `backup_frequency = 0` here keeps the modulo out of the
    /// data-loss calculation. A zero `uniform_size` is rejected when the
    /// uniform distribution is selected: the draw range `[1, 0]` is empty.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threat_likelihood) {
            return Err(Error::invalid_config(
                "threat_likelihood",
                format!("must be in [0, 1], got {}", self.threat_likelihood),
            ));
        }
        if !(0.0..=1.0).contains(&self.patch_likelihood) {
            return Err(Error::invalid_config(
                "patch_likelihood",
                format!("must be in [0, 1], got {}", self.patch_likelihood),
            ));
        }
        if self.backup_frequency == 0 {
            return Err(Error::invalid_config(
                "backup_frequency",
                "must be greater than zero",
            ));
        }
        if self.distribution == Distribution::Uniform && self.uniform_size == 0 {
            return Err(Error::invalid_config(
                "uniform_size",
                "must be greater than zero when distribution is uniform",
            ));
        }
        Ok(())
    }
}
