//! Integration tests for the full simulate-then-aggregate pipeline.
//!
//! These exercise the components together:
//! - threat computation feeding the simulator
//! - propagation through a small architecture graph
//! - ledger persistence and the recompute-statistics workflow
//! - statistical sanity of the stochastic trial sources end to end

use std::collections::HashMap;

use crate::config::{Distribution, SimulationConfig};
use crate::graph::{AdjacencyGraph, ArchGraph, Node, NodeId};
use crate::probability::TrialSource;
use crate::simulation::{
    compute_statistics, run_simulation_set, run_simulation_set_with, RunLedger,
};
use crate::threat::{compute_effective_threat, EffectiveThreat, SecurityWeightTable, NONE_VALUE};

/// Three-tier architecture: web front end, app server, database, plus an
/// isolated build box that nothing connects to.
fn three_tier_graph() -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::new();
    graph.add_node(Node::new("web", "Web Frontend", 0.8));
    graph.add_node(
        Node::new("app", "App Server", 0.8).with_property("Firewall", "Stateful"),
    );
    graph.add_node(
        Node::new("db", "Database", 0.8)
            .with_property("Firewall", "Stateful")
            .with_property("Encryption", "AtRest"),
    );
    graph.add_node(Node::new("build", "Build Box", 0.8));
    graph.connect("web", "app");
    graph.connect("app", "db");
    graph
}

fn weight_table() -> SecurityWeightTable {
    let mut weights = SecurityWeightTable::new();
    weights.insert("Firewall", NONE_VALUE, 1.0);
    weights.insert("Firewall", "Stateful", 0.5);
    weights.insert("Encryption", NONE_VALUE, 1.0);
    weights.insert("Encryption", "AtRest", 0.25);
    weights
}

struct AlwaysOccur;
impl TrialSource for AlwaysOccur {
    fn trial(&mut self, probability: f64) -> bool {
        probability >= 1.0
    }
}

#[test]
fn test_threat_feeds_simulator() {
    let graph = three_tier_graph();
    let threat = compute_effective_threat(graph.nodes(), &weight_table()).unwrap();

    assert!((threat.get(&"web".into()).unwrap() - 0.8).abs() < 1e-12);
    assert!((threat.get(&"app".into()).unwrap() - 0.4).abs() < 1e-12);
    assert!((threat.get(&"db".into()).unwrap() - 0.1).abs() < 1e-12);

    let config = SimulationConfig {
        simulations: 5,
        days: 15,
        random_seed: 11,
        ..Default::default()
    };
    let entry_points = vec![NodeId::from("web")];
    let ledgers = run_simulation_set(&graph, &entry_points, &threat, &config).unwrap();
    assert_eq!(ledgers.len(), 5);
}

#[test]
fn test_deterministic_spread_reaches_depth_per_day() {
    // With certain infection and no patching, compromise advances exactly one
    // hop per day along the chain web -> app -> db.
    let graph = three_tier_graph();
    let mut threat = EffectiveThreat::default();
    for node in graph.nodes() {
        threat.insert(node.id.clone(), 1.0);
    }
    let entry_points = vec![NodeId::from("web")];

    let ledgers =
        run_simulation_set_with(&graph, &entry_points, &threat, 0.0, 4, 1, |_| AlwaysOccur)
            .unwrap();
    let ledger = &ledgers[0];

    assert_eq!(ledger.node_series(&"web".into()).unwrap(), &[true; 4]);
    assert_eq!(
        ledger.node_series(&"app".into()).unwrap(),
        &[false, true, true, true]
    );
    assert_eq!(
        ledger.node_series(&"db".into()).unwrap(),
        &[false, false, true, true]
    );
    assert_eq!(ledger.node_series(&"build".into()).unwrap(), &[false; 4]);
    assert_eq!(ledger.compromised_count(), &[1, 2, 3, 3]);
    // Scope: {web}, then +app, then +db; build stays out.
    assert_eq!(ledger.in_scope_count(), &[1, 2, 3, 3]);
}

#[test]
fn test_statistics_from_deterministic_run() {
    let graph = three_tier_graph();
    let mut threat = EffectiveThreat::default();
    for node in graph.nodes() {
        threat.insert(node.id.clone(), 1.0);
    }
    let entry_points = vec![NodeId::from("web")];

    let ledgers =
        run_simulation_set_with(&graph, &entry_points, &threat, 0.0, 4, 3, |_| AlwaysOccur)
            .unwrap();
    let statistics = compute_statistics(&ledgers, 3, 1, 2).unwrap();

    let web = &statistics[&NodeId::from("web")];
    assert_eq!(web.first_day_compromised, vec![0, 0, 0]);
    assert_eq!(web.total_days_compromised, vec![4, 4, 4]);
    assert_eq!(web.times_compromised, vec![1, 1, 1]);
    // 4 days compromised >= rto 3 in every run.
    assert_eq!(web.simulations_rto_passed, 0);

    let build = &statistics[&NodeId::from("build")];
    assert_eq!(build.first_day_compromised, vec![-1, -1, -1]);
    assert_eq!(build.simulations_rto_passed, 3);
    assert_eq!(build.simulations_rpo_passed, 3);
    assert_eq!(build.first_day_summary().average, 0.0);

    let app = &statistics[&NodeId::from("app")];
    // Outage starts day 1, last backup day 0 with frequency 2 -> 1 day lost.
    assert_eq!(app.days_data_lost, vec![1, 1, 1]);
    assert_eq!(app.simulations_rpo_passed, 0);
}

#[test]
fn test_recompute_workflow_round_trips_through_persistence() {
    let graph = three_tier_graph();
    let threat = compute_effective_threat(graph.nodes(), &weight_table()).unwrap();
    let entry_points = vec![NodeId::from("web")];

    let config = SimulationConfig {
        simulations: 6,
        days: 20,
        random_seed: 42,
        ..Default::default()
    };
    let ledgers = run_simulation_set(&graph, &entry_points, &threat, &config).unwrap();

    // Persist, reload, and recompute with a different RTO/RPO.
    let persisted: Vec<String> = ledgers
        .iter()
        .map(|ledger| ledger.to_json().unwrap())
        .collect();
    let reloaded: Vec<RunLedger> = persisted
        .iter()
        .map(|json| RunLedger::from_json(json).unwrap())
        .collect();
    assert_eq!(reloaded, ledgers);

    let original = compute_statistics(&ledgers, config.rto, config.rpo, config.backup_frequency)
        .unwrap();
    let relaxed = compute_statistics(&reloaded, 1_000, 1_000, config.backup_frequency).unwrap();

    for (node, stats) in &relaxed {
        // Distributions are identical; only compliance counts move.
        assert_eq!(stats.first_day_compromised, original[node].first_day_compromised);
        assert_eq!(stats.days_data_lost, original[node].days_data_lost);
        // Absurdly generous objectives pass every run.
        assert_eq!(stats.simulations_rto_passed, 6);
        assert_eq!(stats.simulations_rpo_passed, 6);
    }
}

#[test]
fn test_entry_point_compromise_rate_tracks_threat() {
    // Single isolated node, no patching: P(compromised on day 0) should
    // track the effective threat for both distribution families.
    let mut graph = AdjacencyGraph::new();
    graph.add_node(Node::new("solo", "Solo", 0.3));
    let mut threat = EffectiveThreat::default();
    threat.insert("solo".into(), 0.3);
    let entry_points = vec![NodeId::from("solo")];

    for distribution in [Distribution::Normal, Distribution::Uniform] {
        let config = SimulationConfig {
            simulations: 4_000,
            days: 1,
            distribution,
            patch_likelihood: 0.0,
            uniform_size: 1_000,
            random_seed: 77,
            ..Default::default()
        };
        let ledgers = run_simulation_set(&graph, &entry_points, &threat, &config).unwrap();

        let compromised = ledgers
            .iter()
            .filter(|ledger| ledger.node_series(&"solo".into()).unwrap()[0])
            .count();
        let rate = compromised as f64 / 4_000.0;
        assert!(
            (rate - 0.3).abs() < 0.035,
            "{distribution:?}: expected rate ~0.3, got {rate}"
        );
    }
}

#[test]
fn test_patching_reduces_days_compromised() {
    let graph = three_tier_graph();
    let threat = compute_effective_threat(graph.nodes(), &weight_table()).unwrap();
    let entry_points = vec![NodeId::from("web")];

    let mut totals = HashMap::new();
    for (label, patch_likelihood) in [("never", 0.0), ("often", 0.5)] {
        let config = SimulationConfig {
            simulations: 200,
            days: 30,
            patch_likelihood,
            random_seed: 9,
            ..Default::default()
        };
        let ledgers = run_simulation_set(&graph, &entry_points, &threat, &config).unwrap();
        let statistics =
            compute_statistics(&ledgers, config.rto, config.rpo, config.backup_frequency)
                .unwrap();

        let web_days: u32 = statistics[&NodeId::from("web")].total_days_compromised.iter().sum();
        totals.insert(label, web_days);
    }

    assert!(
        totals["often"] < totals["never"],
        "Patching should reduce total compromised days: {totals:?}"
    );
}
