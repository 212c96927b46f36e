use serde::{Deserialize, Serialize};
use ws_core::{DegreeBounds, WattsStrogatzParams};

use crate::adjacency::AdjacencyStructure;
use crate::lattice::build_ring_lattice;

/// Structural diagnostics for a generated or loaded structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub nodes: usize,
    /// Row length.
    pub degree: usize,
    /// Directed edge count (`nodes * degree`).
    pub directed_edges: usize,
    /// In/out degree extremes. Out-degree is always `degree`.
    pub degree_bounds: DegreeBounds,
    /// Share of edges `i -> j` whose reverse `j -> i` is present. `None` without edges.
    pub reciprocity: Option<f64>,
    /// Slots pointing back at their own row.
    pub self_loops: usize,
    /// Rows listing some neighbour twice.
    pub rows_with_duplicates: usize,
    /// Slots whose value differs from the ring lattice of the same shape.
    pub rewired_slots: Option<usize>,
}

/// Computes [`GraphStats`] for `graph`.
pub fn graph_stats(graph: &AdjacencyStructure) -> GraphStats {
    let in_degrees = graph.in_degrees();
    let out_degrees = vec![graph.degree(); graph.node_count()];
    GraphStats {
        nodes: graph.node_count(),
        degree: graph.degree(),
        directed_edges: graph.edge_count(),
        degree_bounds: DegreeBounds::from_degrees(&in_degrees, &out_degrees),
        reciprocity: reciprocity(graph),
        self_loops: graph.self_loops(),
        rows_with_duplicates: graph.rows_with_duplicates(),
        rewired_slots: lattice_deviation(graph),
    }
}

fn reciprocity(graph: &AdjacencyStructure) -> Option<f64> {
    if graph.edge_count() == 0 {
        return None;
    }
    let mut mutual = 0usize;
    for (node, row) in graph.rows() {
        mutual += row
            .iter()
            .filter(|target| graph.has_edge(target.index(), node))
            .count();
    }
    Some(mutual as f64 / graph.edge_count() as f64)
}

fn lattice_deviation(graph: &AdjacencyStructure) -> Option<usize> {
    let params = WattsStrogatzParams::new(graph.node_count(), graph.degree(), 0.0);
    let lattice = build_ring_lattice(&params).ok()?;
    let changed = graph
        .rows()
        .zip(lattice.rows())
        .map(|((_, row), (_, base))| row.iter().zip(base).filter(|(a, b)| a != b).count())
        .sum();
    Some(changed)
}
