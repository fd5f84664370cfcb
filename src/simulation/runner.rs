//! Frontier-expansion propagation simulator.
//!
//! One run walks `days` discrete steps. Each day the in-scope frontier grows
//! with the neighbors of compromised nodes, in-scope clean nodes draw an
//! infection trial, and every node draws a patch trial. The patch pass runs
//! strictly after the infection pass and may undo an infection decided the
//! same day; that same-day override is inherited modeling behavior, not a
//! bug to fix.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::errors::{Error, Result};
use crate::graph::{ArchGraph, NodeId};
use crate::probability::{run_rng, DistributionTrials, TrialSource};
use crate::simulation::ledger::RunLedger;
use crate::threat::EffectiveThreat;

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running(u32),
    Completed,
}

/// State machine for one simulation run.
pub struct PropagationSimulator<'a, G: ArchGraph, T: TrialSource> {
    graph: &'a G,
    entry_points: &'a [NodeId],
    threat: &'a EffectiveThreat,
    patch_likelihood: f64,
    days: u32,
    trials: T,
    state: RunState,
    in_scope: HashSet<NodeId>,
    compromised: HashMap<NodeId, bool>,
    ledger: RunLedger,
}

impl<'a, G: ArchGraph, T: TrialSource> PropagationSimulator<'a, G, T> {
    pub fn new(
        graph: &'a G,
        entry_points: &'a [NodeId],
        threat: &'a EffectiveThreat,
        patch_likelihood: f64,
        days: u32,
        trials: T,
    ) -> Self {
        // Entry points are in scope from day zero; no node starts compromised.
        let in_scope: HashSet<NodeId> = entry_points.iter().cloned().collect();
        let compromised = graph
            .nodes()
            .iter()
            .map(|node| (node.id.clone(), false))
            .collect();

        Self {
            graph,
            entry_points,
            threat,
            patch_likelihood,
            days,
            trials,
            state: RunState::NotStarted,
            in_scope,
            compromised,
            ledger: RunLedger::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute all days and return the sealed ledger.
    pub fn run(mut self) -> Result<RunLedger> {
        for day in 0..self.days {
            self.state = RunState::Running(day);
            self.step(day)?;
        }
        self.state = RunState::Completed;
        self.ledger.seal();
        Ok(self.ledger)
    }

    fn step(&mut self, day: u32) -> Result<()> {
        // Frontier expansion: compromised in-scope nodes pull their
        // neighbors into scope for today's infection pass.
        let mut new_targets: Vec<NodeId> = Vec::new();
        for node in &self.in_scope {
            if self.compromised.get(node).copied().unwrap_or(false) {
                let neighbors = self.graph.neighbors(node);
                debug!(
                    "[Propagation] Day {day}: {node} is compromised, scoping neighbors: {}",
                    neighbors
                        .iter()
                        .map(NodeId::as_str)
                        .collect::<Vec<_>>()
                        .join(";")
                );
                new_targets.extend_from_slice(neighbors);
            }
        }
        self.in_scope.extend(new_targets);
        self.ledger.record_in_scope(self.in_scope.len());

        // Infection then patch, walking nodes in graph order so the random
        // stream is consumed deterministically under a fixed seed.
        for node in self.graph.nodes() {
            let id = &node.id;
            let mut is_compromised = self.compromised.get(id).copied().unwrap_or(false);

            if self.in_scope.contains(id) && !is_compromised {
                let likelihood = self
                    .threat
                    .get(id)
                    .ok_or_else(|| Error::MissingThreat(id.clone()))?;
                if self.trials.trial(likelihood) {
                    is_compromised = true;
                }
            }

            // Patch pass applies to every node, in scope or not, and can
            // override an infection decided this same day. The trial is
            // always drawn, even for clean nodes, to keep the random stream
            // aligned with the reference behavior.
            if self.trials.trial(self.patch_likelihood) {
                is_compromised = false;
            }

            self.ledger.record_status(id, is_compromised);
            self.compromised.insert(id.clone(), is_compromised);
        }

        // Scope reset: entry points stay targetable even when patched back
        // to clean; everything currently compromised attacks tomorrow.
        self.in_scope.clear();
        self.in_scope.extend(self.entry_points.iter().cloned());
        let mut compromised_total = 0;
        for (id, &is_compromised) in &self.compromised {
            if is_compromised {
                self.in_scope.insert(id.clone());
                compromised_total += 1;
            }
        }
        self.ledger.record_compromised(compromised_total);
        Ok(())
    }
}

/// Run a full set of independent simulations in parallel.
///
/// Validates the configuration first; the core never partially executes on
/// invalid input. Run `i` is seeded with `config.random_seed + i` when a seed
/// is set, so reruns produce bit-identical ledgers.
pub fn run_simulation_set<G>(
    graph: &G,
    entry_points: &[NodeId],
    threat: &EffectiveThreat,
    config: &SimulationConfig,
) -> Result<Vec<RunLedger>>
where
    G: ArchGraph + Sync,
{
    config.validate()?;

    let distribution = config.distribution;
    let uniform_size = config.uniform_size;
    let random_seed = config.random_seed;

    run_set_inner(
        graph,
        entry_points,
        threat,
        config.patch_likelihood,
        config.days,
        config.simulations,
        |run| DistributionTrials::new(distribution, uniform_size, run_rng(random_seed, run)),
    )
}

/// Run a set of simulations with an injected per-run trial source factory.
///
/// This is the deterministic-testing entry point: supply a factory returning
/// a fixed or scripted [`TrialSource`] and the run-set becomes fully
/// reproducible regardless of configuration.
pub fn run_simulation_set_with<G, T, F>(
    graph: &G,
    entry_points: &[NodeId],
    threat: &EffectiveThreat,
    patch_likelihood: f64,
    days: u32,
    simulations: u32,
    make_trials: F,
) -> Result<Vec<RunLedger>>
where
    G: ArchGraph + Sync,
    T: TrialSource,
    F: Fn(u32) -> T + Sync,
{
    run_set_inner(
        graph,
        entry_points,
        threat,
        patch_likelihood,
        days,
        simulations,
        make_trials,
    )
}

fn run_set_inner<G, T, F>(
    graph: &G,
    entry_points: &[NodeId],
    threat: &EffectiveThreat,
    patch_likelihood: f64,
    days: u32,
    simulations: u32,
    make_trials: F,
) -> Result<Vec<RunLedger>>
where
    G: ArchGraph + Sync,
    T: TrialSource,
    F: Fn(u32) -> T + Sync,
{
    // Runs are independent: each holds its own RNG, scope set, and ledger.
    // Any failed run aborts the whole set; no partial ledgers escape.
    let ledgers = (0..simulations)
        .into_par_iter()
        .map(|run| {
            let simulator = PropagationSimulator::new(
                graph,
                entry_points,
                threat,
                patch_likelihood,
                days,
                make_trials(run),
            );
            let ledger = simulator.run()?;
            debug!("[Propagation] Finished run {run} of {simulations}");
            Ok(ledger)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ledgers)
}
