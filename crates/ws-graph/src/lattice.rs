use ws_core::errors::{ErrorInfo, WsError};
use ws_core::{NodeId, WattsStrogatzParams};

use crate::adjacency::AdjacencyStructure;

/// Builds the ring lattice: node `i` is linked to its `k` nearest ring neighbours.
///
/// Each row is filled by walking forward from `i - k/2` (mod `N`) and skipping
/// `i` itself, so slot order runs from the farthest predecessor to the
/// farthest successor. With an odd degree under
/// [`OddDegreePolicy::ExtraSuccessor`](ws_core::OddDegreePolicy::ExtraSuccessor)
/// the walk naturally takes one more successor than predecessors.
pub fn build_ring_lattice(params: &WattsStrogatzParams) -> Result<AdjacencyStructure, WsError> {
    params.validate()?;
    let nodes = params.nodes;
    let degree = params.degree;

    let mut graph = AdjacencyStructure::with_capacity(nodes, degree);
    let mut row = Vec::with_capacity(degree);
    for node in 0..nodes {
        row.clear();
        fill_ring_row(node, nodes, degree, &mut row)?;
        graph.push_row(&row);
    }
    debug_assert_eq!(graph.filled_rows(), nodes);
    tracing::debug!(nodes, degree, "ring lattice built");
    Ok(graph)
}

/// Lattice row of `node` without allocating the whole structure.
pub fn ring_neighbours(node: usize, nodes: usize, degree: usize) -> Result<Vec<NodeId>, WsError> {
    if node >= nodes {
        return Err(WsError::InvalidParameter(
            ErrorInfo::new("node-out-of-range", "node is not on the ring")
                .with_context("node", node)
                .with_context("nodes", nodes),
        ));
    }
    let mut row = Vec::with_capacity(degree);
    fill_ring_row(node, nodes, degree, &mut row)?;
    Ok(row)
}

fn fill_ring_row(
    node: usize,
    nodes: usize,
    degree: usize,
    row: &mut Vec<NodeId>,
) -> Result<(), WsError> {
    let half = degree / 2;
    // The walk never needs more than `nodes` steps; stopping there keeps a
    // degree >= nodes from cycling forever over already used offsets.
    for step in 0..nodes {
        if row.len() == degree {
            break;
        }
        let neighbour = (node + nodes - half % nodes + step) % nodes;
        if neighbour != node {
            row.push(NodeId::from_index(neighbour));
        }
    }
    if row.len() != degree {
        return Err(WsError::ConstructionInfeasible(
            ErrorInfo::new("row-incomplete", "ring walk could not fill the row")
                .with_context("node", node)
                .with_context("filled", row.len())
                .with_context("degree", degree),
        ));
    }
    Ok(())
}
