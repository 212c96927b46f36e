use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ws_core::errors::{ErrorInfo, WsError};
use ws_core::rng::{RandomSource, RngHandle};
use ws_core::{NodeId, WattsStrogatzParams};

use crate::adjacency::AdjacencyStructure;

/// Totals collected while rewiring a structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewireReport {
    /// Slots that received a new target.
    pub rewired_slots: usize,
    /// Candidate draws rejected as self loops or duplicates.
    pub rejected_draws: usize,
    /// Binomial rewiring count drawn for each node, indexed by node.
    pub per_node: Vec<usize>,
}

impl RewireReport {
    fn with_nodes(nodes: usize) -> Self {
        Self {
            per_node: Vec::with_capacity(nodes),
            ..Self::default()
        }
    }

    /// Fraction of all slots that were rewired.
    pub fn rewired_fraction(&self, edge_count: usize) -> f64 {
        if edge_count == 0 {
            0.0
        } else {
            self.rewired_slots as f64 / edge_count as f64
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RowOutcome {
    rewirings: usize,
    rejected: usize,
}

/// Rewires every row in ascending node order from one shared stream.
///
/// Per node the source is consumed as: one binomial draw for the number of
/// slots to rewire, one shuffle of the slot indices, then uniform draws until
/// each selected slot has an acceptable target. A candidate is acceptable when
/// it is neither the node itself nor any value currently in the row, including
/// slots already rewritten earlier for the same node.
pub fn rewire_in_place<R: RandomSource + ?Sized>(
    graph: &mut AdjacencyStructure,
    params: &WattsStrogatzParams,
    rng: &mut R,
) -> Result<RewireReport, WsError> {
    check_shape(graph, params)?;
    let mut report = RewireReport::with_nodes(graph.node_count());
    for node in 0..graph.node_count() {
        let outcome = rewire_row(graph.row_mut(node), node, params, rng)?;
        record(&mut report, outcome);
    }
    tracing::debug!(
        rewired = report.rewired_slots,
        rejected = report.rejected_draws,
        "rewiring finished on shared stream"
    );
    Ok(report)
}

/// Rewires every row with node `i` drawing from substream `i` of `master_seed`.
///
/// Results for a node do not depend on how many draws other nodes consumed.
pub fn rewire_in_place_substreams(
    graph: &mut AdjacencyStructure,
    params: &WattsStrogatzParams,
    master_seed: u64,
) -> Result<RewireReport, WsError> {
    check_shape(graph, params)?;
    let mut report = RewireReport::with_nodes(graph.node_count());
    for node in 0..graph.node_count() {
        let mut rng = RngHandle::substream(master_seed, node as u64);
        let outcome = rewire_row(graph.row_mut(node), node, params, &mut rng)?;
        record(&mut report, outcome);
    }
    tracing::debug!(
        rewired = report.rewired_slots,
        rejected = report.rejected_draws,
        "rewiring finished on per-node substreams"
    );
    Ok(report)
}

fn record(report: &mut RewireReport, outcome: RowOutcome) {
    report.rewired_slots += outcome.rewirings;
    report.rejected_draws += outcome.rejected;
    report.per_node.push(outcome.rewirings);
}

fn check_shape(graph: &AdjacencyStructure, params: &WattsStrogatzParams) -> Result<(), WsError> {
    params.validate()?;
    if graph.node_count() != params.nodes || graph.degree() != params.degree {
        return Err(WsError::InvalidParameter(
            ErrorInfo::new("shape-mismatch", "structure does not match the parameters")
                .with_context("nodes", graph.node_count())
                .with_context("degree", graph.degree())
                .with_context("expected_nodes", params.nodes)
                .with_context("expected_degree", params.degree),
        ));
    }
    Ok(())
}

fn rewire_row<R: RandomSource + ?Sized>(
    row: &mut [NodeId],
    node: usize,
    params: &WattsStrogatzParams,
    rng: &mut R,
) -> Result<RowOutcome, WsError> {
    let degree = row.len();
    let rewirings = rng.binomial(degree, params.rewire_probability)?;
    let mut outcome = RowOutcome {
        rewirings,
        rejected: 0,
    };
    if rewirings == 0 {
        return Ok(outcome);
    }

    let mut order: Vec<usize> = (0..degree).collect();
    rng.shuffle_indices(&mut order);

    let owner = NodeId::from_index(node);
    if free_targets(row, owner, params.nodes) == 0 {
        return Err(WsError::RewireExhausted(
            ErrorInfo::new("no-free-target", "every node is already a neighbour or the node itself")
                .with_context("node", node)
                .with_context("nodes", params.nodes)
                .with_context("degree", degree)
                .with_hint("rewiring needs at least degree + 2 nodes"),
        ));
    }

    for &slot in order.iter().take(rewirings) {
        let mut accepted = None;
        for _ in 0..params.max_attempts_per_slot {
            let candidate = NodeId::from_index(rng.uniform_index(params.nodes));
            if candidate == owner || row.contains(&candidate) {
                outcome.rejected += 1;
                continue;
            }
            accepted = Some(candidate);
            break;
        }
        let Some(target) = accepted else {
            tracing::warn!(node, slot, "rewiring gave up after the retry budget");
            return Err(WsError::RewireExhausted(
                ErrorInfo::new("attempts-exhausted", "no acceptable target within the retry budget")
                    .with_context("node", node)
                    .with_context("slot", slot)
                    .with_context("attempts", params.max_attempts_per_slot),
            ));
        };
        row[slot] = target;
    }
    tracing::trace!(node, rewirings, rejected = outcome.rejected, "row rewired");
    Ok(outcome)
}

fn free_targets(row: &[NodeId], owner: NodeId, nodes: usize) -> usize {
    let taken: BTreeSet<NodeId> = row.iter().copied().filter(|id| *id != owner).collect();
    nodes.saturating_sub(taken.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays fixed outcomes so draw order can be asserted exactly.
    struct Scripted {
        binomials: VecDeque<usize>,
        uniforms: VecDeque<usize>,
        reverse_shuffle: bool,
        uniform_calls: usize,
    }

    impl RandomSource for Scripted {
        fn uniform_index(&mut self, _upper: usize) -> usize {
            self.uniform_calls += 1;
            self.uniforms.pop_front().unwrap()
        }

        fn binomial(&mut self, _trials: usize, _probability: f64) -> Result<usize, WsError> {
            Ok(self.binomials.pop_front().unwrap_or(0))
        }

        fn shuffle_indices(&mut self, indices: &mut [usize]) {
            if self.reverse_shuffle {
                indices.reverse();
            }
        }
    }

    fn ids(raw: &[u64]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::from_raw).collect()
    }

    #[test]
    fn membership_is_checked_against_the_live_row() {
        // Node 0 of N=10, k=4: lattice row [8, 9, 1, 2].
        let mut row = ids(&[8, 9, 1, 2]);
        let params = WattsStrogatzParams::new(10, 4, 0.5);
        let mut rng = Scripted {
            binomials: VecDeque::from(vec![2]),
            // Slot 3 first (reversed order): 0 is self, 8 is present, 5 accepted.
            // Slot 2 next: 5 was just written so it is rejected, 2 is no longer
            // present after slot 3 changed, so it is accepted.
            uniforms: VecDeque::from(vec![0, 8, 5, 5, 2]),
            reverse_shuffle: true,
            uniform_calls: 0,
        };
        let outcome = rewire_row(&mut row, 0, &params, &mut rng).unwrap();
        assert_eq!(row, ids(&[8, 9, 2, 5]));
        assert_eq!(outcome.rewirings, 2);
        assert_eq!(outcome.rejected, 3);
        assert_eq!(rng.uniform_calls, 5);
    }

    #[test]
    fn slot_keeps_rejecting_its_own_current_value() {
        let mut row = ids(&[2, 1]);
        let params = WattsStrogatzParams::new(4, 2, 1.0);
        let mut rng = Scripted {
            binomials: VecDeque::from(vec![1]),
            uniforms: VecDeque::from(vec![2, 1, 3]),
            reverse_shuffle: false,
            uniform_calls: 0,
        };
        rewire_row(&mut row, 0, &params, &mut rng).unwrap();
        assert_eq!(row, ids(&[3, 1]));
    }

    #[test]
    fn retry_budget_is_enforced() {
        let mut row = ids(&[1, 2]);
        let params = WattsStrogatzParams::new(5, 2, 1.0).with_max_attempts(3);
        let mut rng = Scripted {
            binomials: VecDeque::from(vec![1]),
            uniforms: VecDeque::from(vec![0, 1, 2]),
            reverse_shuffle: false,
            uniform_calls: 0,
        };
        let err = rewire_row(&mut row, 0, &params, &mut rng).unwrap_err();
        assert_eq!(err.info().code, "attempts-exhausted");
        assert_eq!(err.info().context.get("attempts"), Some(&"3".to_string()));
        assert_eq!(rng.uniform_calls, 3);
    }

    #[test]
    fn zero_rewirings_skip_the_shuffle_and_draws() {
        let mut row = ids(&[5, 1]);
        let params = WattsStrogatzParams::new(6, 2, 0.0);
        let mut rng = Scripted {
            binomials: VecDeque::new(),
            uniforms: VecDeque::new(),
            reverse_shuffle: true,
            uniform_calls: 0,
        };
        let outcome = rewire_row(&mut row, 0, &params, &mut rng).unwrap();
        assert_eq!(outcome.rewirings, 0);
        assert_eq!(row, ids(&[5, 1]));
        assert_eq!(rng.uniform_calls, 0);
    }

    #[test]
    fn free_targets_counts_distinct_non_self_values() {
        let owner = NodeId::from_raw(0);
        assert_eq!(free_targets(&ids(&[1, 2]), owner, 4), 1);
        assert_eq!(free_targets(&ids(&[1, 1]), owner, 4), 2);
        assert_eq!(free_targets(&ids(&[1, 2, 3]), owner, 4), 0);
    }
}
