use std::collections::BTreeMap;

use ws_core::errors::WsError;
use ws_core::provenance::{RunProvenance, SchemaVersion};
use ws_core::rng::{RandomSource, RngHandle};
use ws_core::{StreamMode, WattsStrogatzParams};

use crate::adjacency::AdjacencyStructure;
use crate::hash::canonical_hash;
use crate::lattice::build_ring_lattice;
use crate::rewire::{rewire_in_place, rewire_in_place_substreams, RewireReport};

/// Schema version of [`RunProvenance`] records written by this crate.
pub const PROVENANCE_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// A generated small-world graph together with its run record.
#[derive(Debug, Clone)]
pub struct SmallWorldGraph {
    /// Final per-node neighbour lists.
    pub adjacency: AdjacencyStructure,
    /// Rewiring totals.
    pub report: RewireReport,
    /// Seed, parameters and hash of the run.
    pub provenance: RunProvenance,
}

/// Runs both phases against a caller-owned random source.
///
/// Nothing is returned on error; a partially rewired structure never escapes.
pub fn watts_strogatz_with<R: RandomSource + ?Sized>(
    params: &WattsStrogatzParams,
    rng: &mut R,
) -> Result<(AdjacencyStructure, RewireReport), WsError> {
    let mut adjacency = build_ring_lattice(params)?;
    let report = rewire_in_place(&mut adjacency, params, rng)?;
    Ok((adjacency, report))
}

/// Seeds the random streams from `seed` and generates the graph.
pub fn generate(
    params: &WattsStrogatzParams,
    seed: u64,
    streams: StreamMode,
) -> Result<SmallWorldGraph, WsError> {
    let span = tracing::info_span!(
        "generate",
        nodes = params.nodes,
        degree = params.degree,
        p = params.rewire_probability,
        seed
    );
    let _guard = span.enter();

    let (adjacency, report) = match streams {
        StreamMode::Shared => {
            let mut rng = RngHandle::from_seed(seed);
            watts_strogatz_with(params, &mut rng)?
        }
        StreamMode::PerNode => {
            let mut adjacency = build_ring_lattice(params)?;
            let report = rewire_in_place_substreams(&mut adjacency, params, seed)?;
            (adjacency, report)
        }
    };

    let graph_hash = canonical_hash(&adjacency);
    tracing::info!(
        rewired = report.rewired_slots,
        fraction = report.rewired_fraction(adjacency.edge_count()),
        hash = %graph_hash,
        "graph generated"
    );
    let provenance = RunProvenance {
        schema_version: PROVENANCE_SCHEMA,
        params: params.clone(),
        seed,
        streams,
        graph_hash,
        tool_versions: tool_versions(),
    };
    Ok(SmallWorldGraph {
        adjacency,
        report,
        provenance,
    })
}

fn tool_versions() -> BTreeMap<String, String> {
    BTreeMap::from([("ws-graph".to_string(), env!("CARGO_PKG_VERSION").to_string())])
}
