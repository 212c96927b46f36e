//! Provenance and schema descriptors attached to generated graphs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::params::{StreamMode, WattsStrogatzParams};

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information recorded for every generated graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunProvenance {
    /// Schema of the provenance record itself.
    pub schema_version: SchemaVersion,
    /// Parameters the graph was generated with.
    pub params: WattsStrogatzParams,
    /// Master seed used for all randomness.
    pub seed: u64,
    /// Stream layout used while rewiring.
    pub streams: StreamMode,
    /// Canonical hash of the final adjacency structure.
    pub graph_hash: String,
    /// Version map for all tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}
