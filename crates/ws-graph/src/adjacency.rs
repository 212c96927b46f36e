use std::collections::BTreeSet;
use std::ops::Range;

use ws_core::errors::{ErrorInfo, WsError};
use ws_core::NodeId;

/// Per-node neighbour lists of uniform length, stored row-major.
///
/// Row `i` holds the `degree` outgoing neighbours of node `i` in slot order.
/// Slots are the unit of rewiring: the rewirer overwrites a value at a slot
/// position and never touches another node's row, so the structure is a
/// directed graph even though the initial lattice is symmetric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyStructure {
    nodes: usize,
    degree: usize,
    slots: Vec<NodeId>,
}

impl AdjacencyStructure {
    /// Allocates an empty structure that will hold `nodes` rows of `degree` slots.
    pub(crate) fn with_capacity(nodes: usize, degree: usize) -> Self {
        Self {
            nodes,
            degree,
            slots: Vec::with_capacity(nodes.saturating_mul(degree)),
        }
    }

    /// Appends the next row during construction.
    pub(crate) fn push_row(&mut self, row: &[NodeId]) {
        debug_assert_eq!(row.len(), self.degree);
        self.slots.extend_from_slice(row);
    }

    /// Number of rows pushed so far.
    pub(crate) fn filled_rows(&self) -> usize {
        if self.degree == 0 {
            self.nodes
        } else {
            self.slots.len() / self.degree
        }
    }

    /// Builds a structure from explicit rows, checking row length and id range.
    pub fn from_rows(rows: Vec<Vec<NodeId>>) -> Result<Self, WsError> {
        let nodes = rows.len();
        let degree = rows.first().map(Vec::len).unwrap_or(0);
        let mut graph = Self::with_capacity(nodes, degree);
        for (node, row) in rows.iter().enumerate() {
            if row.len() != degree {
                return Err(WsError::Serde(
                    ErrorInfo::new("ragged-rows", "every row must have the same length")
                        .with_context("node", node)
                        .with_context("expected", degree)
                        .with_context("found", row.len()),
                ));
            }
            if let Some(bad) = row.iter().find(|id| id.index() >= nodes) {
                return Err(WsError::Serde(
                    ErrorInfo::new("node-out-of-range", "neighbour id is not a node of the graph")
                        .with_context("node", node)
                        .with_context("neighbour", bad)
                        .with_context("nodes", nodes),
                ));
            }
            graph.push_row(row);
        }
        Ok(graph)
    }

    /// Number of nodes `N`.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Row length `k`.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of directed edges, `N * k`.
    pub fn edge_count(&self) -> usize {
        self.slots.len()
    }

    fn span(&self, node: usize) -> Range<usize> {
        let start = node * self.degree;
        start..start + self.degree
    }

    /// Returns the row of `node` in slot order.
    ///
    /// # Panics
    /// Panics if `node` is not below [`node_count`](Self::node_count).
    pub fn row(&self, node: usize) -> &[NodeId] {
        assert!(node < self.nodes, "node {node} out of range");
        &self.slots[self.span(node)]
    }

    pub(crate) fn row_mut(&mut self, node: usize) -> &mut [NodeId] {
        let span = self.span(node);
        &mut self.slots[span]
    }

    /// Iterates `(node, row)` pairs in ascending node order.
    pub fn rows(&self) -> impl Iterator<Item = (NodeId, &[NodeId])> + '_ {
        (0..self.nodes).map(move |node| (NodeId::from_index(node), self.row(node)))
    }

    /// Returns whether the directed edge `from -> to` is present.
    pub fn has_edge(&self, from: usize, to: NodeId) -> bool {
        from < self.nodes && self.row(from).contains(&to)
    }

    /// In-degree of every node, indexed by node.
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes];
        for target in &self.slots {
            degrees[target.index()] += 1;
        }
        degrees
    }

    /// Number of slots pointing back at their own row.
    pub fn self_loops(&self) -> usize {
        self.rows()
            .map(|(node, row)| row.iter().filter(|target| **target == node).count())
            .sum()
    }

    /// Number of rows that contain the same neighbour twice.
    pub fn rows_with_duplicates(&self) -> usize {
        self.rows()
            .filter(|(_, row)| row.iter().collect::<BTreeSet<_>>().len() != row.len())
            .count()
    }
}
