//! Per-run recorder.
//!
//! A [`RunLedger`] stores, for one simulation run, the day-indexed compromise
//! state of every node plus the daily aggregate counts. It is append-only
//! while the run executes and sealed when the run completes; statistics are
//! derived from sealed ledgers only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::graph::NodeId;

/// Day-indexed record of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLedger {
    // BTreeMap keeps node iteration (and serialized form) stable.
    states: BTreeMap<NodeId, Vec<bool>>,
    compromised_count: Vec<u32>,
    in_scope_count: Vec<u32>,
    sealed: bool,
}

impl RunLedger {
    pub(crate) fn new() -> Self {
        Self {
            states: BTreeMap::new(),
            compromised_count: Vec::new(),
            in_scope_count: Vec::new(),
            sealed: false,
        }
    }

    /// Reconstruct a sealed ledger from externally persisted tabular data,
    /// for the recompute-statistics-without-resimulating workflow.
    pub fn from_parts(
        states: BTreeMap<NodeId, Vec<bool>>,
        compromised_count: Vec<u32>,
        in_scope_count: Vec<u32>,
    ) -> Result<Self> {
        let days = compromised_count.len();
        if in_scope_count.len() != days {
            return Err(Error::LedgerParse(format!(
                "in-scope series has {} days, compromised series has {days}",
                in_scope_count.len()
            )));
        }
        for (node, series) in &states {
            if series.len() != days {
                return Err(Error::LedgerParse(format!(
                    "series for node {node} has {} days, expected {days}",
                    series.len()
                )));
            }
        }
        Ok(Self {
            states,
            compromised_count,
            in_scope_count,
            sealed: true,
        })
    }

    pub(crate) fn record_in_scope(&mut self, count: usize) {
        debug_assert!(!self.sealed);
        self.in_scope_count.push(count as u32);
    }

    pub(crate) fn record_status(&mut self, node: &NodeId, compromised: bool) {
        debug_assert!(!self.sealed);
        self.states.entry(node.clone()).or_default().push(compromised);
    }

    pub(crate) fn record_compromised(&mut self, count: usize) {
        debug_assert!(!self.sealed);
        self.compromised_count.push(count as u32);
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of recorded days.
    pub fn days(&self) -> usize {
        self.compromised_count.len()
    }

    /// Nodes present in this ledger, in stable order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.states.keys()
    }

    /// Every node's boolean day series, in stable order.
    pub fn series(&self) -> impl Iterator<Item = (&NodeId, &[bool])> {
        self.states
            .iter()
            .map(|(node, series)| (node, series.as_slice()))
    }

    /// One node's boolean day series.
    pub fn node_series(&self, node: &NodeId) -> Option<&[bool]> {
        self.states.get(node).map(Vec::as_slice)
    }

    /// Total compromised nodes at the end of each day.
    pub fn compromised_count(&self) -> &[u32] {
        &self.compromised_count
    }

    /// Size of the in-scope set on each day, after frontier expansion.
    pub fn in_scope_count(&self) -> &[u32] {
        &self.in_scope_count
    }

    /// Serialize for persistence by an external reporting collaborator.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::LedgerParse(e.to_string()))
    }

    /// Read back a persisted ledger.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::LedgerParse(e.to_string()))
    }
}
