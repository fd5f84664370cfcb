use thiserror::Error;

use crate::graph::NodeId;

/// Main crate error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A configuration value failed validation before any run started.
    #[error("Invalid config value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    /// A security weight table entry failed validation.
    #[error("Invalid weight table entry for property {property}: {reason}")]
    InvalidWeightTable { property: String, reason: String },

    /// A node carries a property value the weight table does not know about.
    /// This indicates an inconsistent model; threat computation is aborted.
    #[error("Node {node} has unknown value {value:?} for security property {property}")]
    UnknownPropertyValue {
        node: NodeId,
        property: String,
        value: String,
    },

    /// A node reached an infection trial without an effective threat entry.
    #[error("No effective threat entry for node {0}")]
    MissingThreat(NodeId),

    /// A persisted run ledger could not be read back.
    #[error("Ledger parse error: {0}")]
    LedgerParse(String),
}

// Convenience constructors for common error patterns
impl Error {
    /// Create a config validation error.
    pub fn invalid_config(key: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            key,
            reason: reason.into(),
        }
    }

    /// Create a weight table validation error.
    pub fn invalid_weight_table(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidWeightTable {
            property: property.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
