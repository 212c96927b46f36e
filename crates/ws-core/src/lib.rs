#![deny(missing_docs)]
#![doc = "Core types shared by the Watts-Strogatz generator: node identifiers, structured errors, validated parameters and seeded randomness."]

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod params;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, WsError};
pub use params::{
    non_negative, OddDegreePolicy, StreamMode, WattsStrogatzParams, DEFAULT_MAX_ATTEMPTS_PER_SLOT,
};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RandomSource, RngHandle};

/// Identifier for a node on the ring, an index in `[0, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Creates an identifier from a ring index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u64)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }

    /// Returns the identifier as a ring index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounds on inbound and outbound degrees for a collection of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeBounds {
    /// Minimum inbound degree observed across all nodes.
    pub min_in_degree: Option<usize>,
    /// Maximum inbound degree observed across all nodes.
    pub max_in_degree: Option<usize>,
    /// Minimum outbound degree observed across all nodes.
    pub min_out_degree: Option<usize>,
    /// Maximum outbound degree observed across all nodes.
    pub max_out_degree: Option<usize>,
}

impl DegreeBounds {
    /// Builds bounds from per-node in and out degrees.
    pub fn from_degrees(in_degrees: &[usize], out_degrees: &[usize]) -> Self {
        Self {
            min_in_degree: in_degrees.iter().copied().min(),
            max_in_degree: in_degrees.iter().copied().max(),
            min_out_degree: out_degrees.iter().copied().min(),
            max_out_degree: out_degrees.iter().copied().max(),
        }
    }
}
