#![deny(missing_docs)]

//! Watts-Strogatz small-world graph construction.
//!
//! Generation runs in two phases over one [`AdjacencyStructure`]:
//!
//! 1. [`build_ring_lattice`] links every node to its `k` nearest ring
//!    neighbours. No randomness is consumed.
//! 2. [`rewire_in_place`] visits nodes in ascending order, draws how many of
//!    the node's slots to rewire from `Binomial(k, p)`, shuffles the slot
//!    indices and retargets the first slots of the shuffle. Candidates are
//!    rejected while they equal the node or any value currently in its row.
//!
//! Rewiring only edits the owning node's row, so the result is a list of
//! outgoing neighbours per node and is generally not symmetric. Use
//! [`graph_stats`] to measure how far it has drifted from an undirected graph.

mod adjacency;
mod config;
mod generator;
mod hash;
mod lattice;
mod rewire;
mod serialization;
mod stats;

pub use adjacency::AdjacencyStructure;
pub use config::GeneratorConfig;
pub use generator::{generate, watts_strogatz_with, SmallWorldGraph, PROVENANCE_SCHEMA};
pub use hash::canonical_hash;
pub use lattice::{build_ring_lattice, ring_neighbours};
pub use rewire::{rewire_in_place, rewire_in_place_substreams, RewireReport};
pub use serialization::{
    adjlist_to_string, graph_from_json, graph_to_json, read_adjlist, write_adjlist, write_graph,
    OutputFormat, GRAPH_SCHEMA,
};
pub use stats::{graph_stats, GraphStats};
