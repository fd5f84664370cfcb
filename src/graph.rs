//! Architecture graph abstraction.
//!
//! The simulator never extracts topology itself; it consumes a read-only
//! [`ArchGraph`] capability injected by the caller. Any concrete model source
//! (an architectural modeling tool, a CMDB export, a test fixture) can
//! implement it. The trait offers no mutation, so topology is frozen for the
//! duration of a run-set by construction.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of an architecture component.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

/// A modeled architectural component that can be compromised.
///
/// Owned by the external graph collaborator; the core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Human-readable display name.
    pub name: String,
    /// Base daily compromise likelihood in `[0, 1]`, before security
    /// property weights are applied.
    pub threat_likelihood: f64,
    /// Security property name -> currently assigned value.
    /// A property absent from this map reads as `"None"`.
    pub properties: HashMap<String, String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, threat_likelihood: f64) -> Self {
        Node {
            id: id.into(),
            name: name.into(),
            threat_likelihood,
            properties: HashMap::new(),
        }
    }

    /// Builder-style property assignment.
    pub fn with_property(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(property.into(), value.into());
        self
    }
}

/// Read-only view of the architecture under assessment.
///
/// `nodes()` must return a stable order: the infection and patch passes walk
/// it once per day, so the order determines how the random stream is consumed
/// and therefore reproducibility under a fixed seed.
pub trait ArchGraph {
    /// Every component in the architecture, in a stable order.
    fn nodes(&self) -> &[Node];

    /// Components reachable from `node` in one propagation step.
    /// Unknown nodes have no neighbors.
    fn neighbors(&self, node: &NodeId) -> &[NodeId];
}

/// Simple in-memory adjacency-list graph.
///
/// Suitable for tests and for callers that extract topology into plain data
/// before handing it to the simulator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjacencyGraph {
    nodes: Vec<Node>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    #[serde(skip)]
    empty: Vec<NodeId>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Connect two components (undirected): compromise can propagate either way.
    pub fn connect(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) {
        let a = a.into();
        let b = b.into();
        let forward = self.adjacency.entry(a.clone()).or_default();
        if !forward.contains(&b) {
            forward.push(b.clone());
        }
        let backward = self.adjacency.entry(b).or_default();
        if !backward.contains(&a) {
            backward.push(a);
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

impl ArchGraph for AdjacencyGraph {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn neighbors(&self, node: &NodeId) -> &[NodeId] {
        self.adjacency.get(node).unwrap_or(&self.empty)
    }
}
