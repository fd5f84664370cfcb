//! # breachsim — stochastic cyber-risk propagation simulator
//!
//! Estimates the cyber-risk exposure of an architecture (a graph of
//! components) by repeatedly simulating, day by day, how a compromise
//! originating at chosen entry points spreads to neighboring components, is
//! probabilistically patched, and ultimately violates or satisfies
//! recovery-time/recovery-point objectives (RTO/RPO).
//!
//! ```text
//! SecurityWeightTable + Nodes
//!          │
//!          ▼
//!   EffectiveThreat ──► PropagationSimulator ──► RunLedger  (per run, parallel)
//!                              ▲                     │
//!                        ArchGraph (neighbors)       ▼
//!                                              NodeStatistics (fold all runs)
//! ```
//!
//! The crate is the simulation core only. Graph extraction, configuration
//! loading, menus, and report generation are external collaborators: the
//! graph arrives through the read-only [`ArchGraph`] trait and results leave
//! as plain data ([`RunLedger`], [`NodeStatistics`]).
//!
//! # Usage
//!
//! ```
//! use breachsim::{
//!     compute_effective_threat, compute_statistics, run_simulation_set,
//!     AdjacencyGraph, ArchGraph, Node, NodeId, SecurityWeightTable, SimulationConfig,
//! };
//!
//! let mut graph = AdjacencyGraph::new();
//! graph.add_node(Node::new("web", "Web Frontend", 0.4));
//! graph.add_node(Node::new("db", "Database", 0.4));
//! graph.connect("web", "db");
//!
//! let mut weights = SecurityWeightTable::new();
//! weights.insert("Firewall", "None", 1.0);
//! weights.insert("Firewall", "Stateful", 0.5);
//!
//! let threat = compute_effective_threat(graph.nodes(), &weights)?;
//! let config = SimulationConfig { random_seed: 7, ..Default::default() };
//! let entry_points = vec![NodeId::from("web")];
//!
//! let ledgers = run_simulation_set(&graph, &entry_points, &threat, &config)?;
//! let statistics =
//!     compute_statistics(&ledgers, config.rto, config.rpo, config.backup_frequency)?;
//! # Ok::<(), breachsim::Error>(())
//! ```

#![deny(unreachable_pub)]

mod config;
mod errors;
mod graph;
mod threat;

pub mod probability;
pub mod simulation;

// Re-exports
pub use config::{Distribution, SimulationConfig};
pub use errors::{Error, Result};
pub use graph::{AdjacencyGraph, ArchGraph, Node, NodeId};
pub use probability::{DistributionTrials, GaussianTrials, TrialSource, UniformTrials};
pub use simulation::{
    compute_statistics, run_simulation_set, run_simulation_set_with, FiveNumberSummary,
    NodeStatistics, PropagationSimulator, RunLedger, RunState, NEVER_COMPROMISED,
};
pub use threat::{
    compute_effective_threat, EffectiveThreat, SecurityWeightTable, NONE_VALUE,
};
