//! Threat model: security weight tables and effective threat computation.
//!
//! Each node starts from its base compromise likelihood; every tracked
//! security property scales it by the weight assigned to the node's current
//! value for that property. The result is computed once per run-set and is
//! immutable while runs execute.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Error, Result};
use crate::graph::{Node, NodeId};

/// Property value meaning "not set". Every property mapping must map it to
/// 1.0: absence of a security property must not reduce risk.
pub const NONE_VALUE: &str = "None";

/// Mapping from security property name to the weights of its possible values.
///
/// A weight of 1.0 leaves the base likelihood untouched; smaller weights
/// reduce it; 0.0 fully mitigates. Weights above 1.0 are invalid: a security
/// property can never make a node more exposed than having none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityWeightTable(BTreeMap<String, BTreeMap<String, f64>>);

impl SecurityWeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        property: impl Into<String>,
        value: impl Into<String>,
        multiplier: f64,
    ) {
        self.0
            .entry(property.into())
            .or_default()
            .insert(value.into(), multiplier);
    }

    /// Tracked properties with their value weights, in stable order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, f64>)> {
        self.0.iter().map(|(name, values)| (name.as_str(), values))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate the table before a run-set starts.
    ///
    /// Every property needs at least one value, a `"None" -> 1.0` entry, and
    /// all multipliers in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (property, values) in &self.0 {
            if values.is_empty() {
                return Err(Error::invalid_weight_table(property, "no values defined"));
            }
            if values.get(NONE_VALUE) != Some(&1.0) {
                return Err(Error::invalid_weight_table(
                    property,
                    format!("\"{NONE_VALUE}\": 1.0 entry missing or incorrect"),
                ));
            }
            for (value, multiplier) in values {
                if !(0.0..=1.0).contains(multiplier) {
                    return Err(Error::invalid_weight_table(
                        property,
                        format!("multiplier {multiplier} for value {value:?} not in [0, 1]"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Per-node effective daily compromise probability.
///
/// Computed once per run-set by [`compute_effective_threat`]; read-only for
/// every run in the set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectiveThreat(HashMap<NodeId, f64>);

impl EffectiveThreat {
    pub fn get(&self, node: &NodeId) -> Option<f64> {
        self.0.get(node).copied()
    }

    pub fn insert(&mut self, node: NodeId, likelihood: f64) {
        self.0.insert(node, likelihood);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compute each node's effective daily compromise probability.
///
/// A node value missing from the weight table is an inconsistent model and
/// aborts the whole computation; a property the node never assigned reads as
/// [`NONE_VALUE`].
pub fn compute_effective_threat(
    nodes: &[Node],
    weights: &SecurityWeightTable,
) -> Result<EffectiveThreat> {
    weights.validate()?;

    let mut threat = EffectiveThreat::default();
    for node in nodes {
        let mut likelihood = node.threat_likelihood;

        for (property, values) in weights.properties() {
            let value = node
                .properties
                .get(property)
                .map(String::as_str)
                .unwrap_or(NONE_VALUE);

            let modifier = values
                .get(value)
                .ok_or_else(|| Error::UnknownPropertyValue {
                    node: node.id.clone(),
                    property: property.to_string(),
                    value: value.to_string(),
                })?;

            debug!(
                "[Threat] Updating likelihood for {} with modifier {} ({property} = {value:?})",
                node.id, modifier
            );
            likelihood *= modifier;
        }

        threat.insert(node.id.clone(), likelihood);
    }
    Ok(threat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SecurityWeightTable {
        let mut weights = SecurityWeightTable::new();
        weights.insert("Encryption", NONE_VALUE, 1.0);
        weights.insert("Encryption", "HTTPS", 0.5);
        weights.insert("Firewall", NONE_VALUE, 1.0);
        weights.insert("Firewall", "Stateful", 0.4);
        weights
    }

    #[test]
    fn test_weights_multiply_base_likelihood() {
        let nodes = vec![
            Node::new("a", "Web Server", 0.8)
                .with_property("Encryption", "HTTPS")
                .with_property("Firewall", "Stateful"),
            Node::new("b", "Legacy Box", 0.8),
        ];

        let threat = compute_effective_threat(&nodes, &table()).unwrap();
        // 0.8 * 0.5 * 0.4
        assert!((threat.get(&"a".into()).unwrap() - 0.16).abs() < 1e-12);
        // No properties assigned: both read as "None" -> x1.0
        assert!((threat.get(&"b".into()).unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_value_aborts() {
        let nodes = vec![Node::new("a", "Web Server", 0.8).with_property("Encryption", "ROT13")];

        let err = compute_effective_threat(&nodes, &table()).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownPropertyValue {
                node: "a".into(),
                property: "Encryption".to_string(),
                value: "ROT13".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_none_entry_rejected() {
        let mut weights = SecurityWeightTable::new();
        weights.insert("Encryption", "HTTPS", 0.5);

        assert!(weights.validate().is_err());
        assert!(compute_effective_threat(&[], &weights).is_err());
    }

    #[test]
    fn test_none_must_map_to_one() {
        let mut weights = SecurityWeightTable::new();
        weights.insert("Encryption", NONE_VALUE, 0.9);

        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_multiplier_out_of_range_rejected() {
        let mut weights = table();
        weights.insert("Encryption", "QuantumTunnel", 1.2);

        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_table_round_trips_through_json() {
        let json = r#"{
            "Encryption": { "None": 1.0, "HTTPS": 0.5 },
            "Firewall": { "None": 1.0, "Stateful": 0.4 }
        }"#;

        let weights: SecurityWeightTable = serde_json::from_str(json).unwrap();
        assert!(weights.validate().is_ok());
        assert_eq!(weights, table());
    }
}
