//! Stochastic propagation simulation and cross-run aggregation.
//!
//! ```text
//! EffectiveThreat ─► PropagationSimulator (one per run, parallel)
//!                          │
//!                          ▼
//!                      RunLedger (one per run)
//!                          │
//!                          ▼  fold after all runs complete
//!                    NodeStatistics (per node: distributions + RTO/RPO)
//! ```
//!
//! Ledgers survive the run-set: persist them (serde) and feed them back to
//! [`compute_statistics`] to re-evaluate compliance with different RTO/RPO
//! parameters without re-simulating.

pub mod ledger;
pub mod runner;
pub mod statistics;

#[cfg(test)]
mod tests;

pub use ledger::RunLedger;
pub use runner::{run_simulation_set, run_simulation_set_with, PropagationSimulator, RunState};
pub use statistics::{
    average, compute_statistics, days_compromised, days_data_lost, first_day_compromised,
    summarize, times_compromised, FiveNumberSummary, NodeStatistics, NEVER_COMPROMISED,
};
