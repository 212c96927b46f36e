use std::collections::BTreeSet;

use ws_core::rng::RngHandle;
use ws_core::{WattsStrogatzParams, WsError};
use ws_graph::{
    build_ring_lattice, graph_stats, rewire_in_place, rewire_in_place_substreams,
    watts_strogatz_with, AdjacencyStructure,
};

fn assert_rows_valid(graph: &AdjacencyStructure) {
    for (node, row) in graph.rows() {
        assert_eq!(row.len(), graph.degree());
        assert!(!row.contains(&node), "self loop on node {node}");
        let distinct: BTreeSet<_> = row.iter().collect();
        assert_eq!(distinct.len(), graph.degree(), "duplicate in row of node {node}");
        assert!(row.iter().all(|target| target.index() < graph.node_count()));
    }
}

#[test]
fn rows_stay_simple_across_seeds() {
    for seed in 0..200u64 {
        for (nodes, degree, p) in [(30, 4, 0.3), (12, 6, 0.9), (8, 5, 1.0), (100, 10, 0.1)] {
            let params = WattsStrogatzParams::new(nodes, degree, p);
            let mut rng = RngHandle::from_seed(seed);
            let (graph, report) = watts_strogatz_with(&params, &mut rng).unwrap();
            assert_rows_valid(&graph);
            assert_eq!(report.per_node.len(), nodes);
            assert_eq!(report.per_node.iter().sum::<usize>(), report.rewired_slots);
            assert!(report.per_node.iter().all(|count| *count <= degree));
        }
    }
}

#[test]
fn zero_probability_leaves_the_lattice_untouched() {
    let params = WattsStrogatzParams::new(40, 6, 0.0);
    let lattice = build_ring_lattice(&params).unwrap();
    for seed in [1, 2, 3] {
        let mut graph = lattice.clone();
        let mut rng = RngHandle::from_seed(seed);
        let report = rewire_in_place(&mut graph, &params, &mut rng).unwrap();
        assert_eq!(graph, lattice);
        assert_eq!(report.rewired_slots, 0);
        assert_eq!(report.rejected_draws, 0);
    }
}

#[test]
fn full_probability_moves_almost_every_slot() {
    let params = WattsStrogatzParams::new(500, 4, 1.0);
    let lattice = build_ring_lattice(&params).unwrap();
    let mut unchanged = 0usize;
    let mut total = 0usize;
    for seed in 0..20u64 {
        let mut graph = lattice.clone();
        let mut rng = RngHandle::from_seed(seed);
        let report = rewire_in_place(&mut graph, &params, &mut rng).unwrap();
        assert_eq!(report.rewired_slots, graph.edge_count());
        for ((_, row), (_, base)) in graph.rows().zip(lattice.rows()) {
            unchanged += row.iter().zip(base).filter(|(a, b)| a == b).count();
            total += row.len();
        }
    }
    // The slot's own value is in the live row while it is redrawn.
    assert_eq!(unchanged, 0, "{unchanged} of {total} slots kept their lattice value");
}

#[test]
fn rewired_fraction_tracks_probability() {
    let params = WattsStrogatzParams::new(2_000, 10, 0.2);
    let mut rng = RngHandle::from_seed(77);
    let (graph, report) = watts_strogatz_with(&params, &mut rng).unwrap();
    let fraction = report.rewired_fraction(graph.edge_count());
    assert!((fraction - 0.2).abs() < 0.02, "fraction {fraction}");
}

#[test]
fn rewiring_breaks_symmetry() {
    let params = WattsStrogatzParams::new(200, 6, 0.5);
    let mut rng = RngHandle::from_seed(5);
    let (graph, _) = watts_strogatz_with(&params, &mut rng).unwrap();
    let stats = graph_stats(&graph);
    let reciprocity = stats.reciprocity.unwrap();
    assert!(reciprocity < 1.0, "rewired structure unexpectedly symmetric");
    assert_eq!(stats.self_loops, 0);
    assert_eq!(stats.rows_with_duplicates, 0);
}

#[test]
fn dense_ring_exhausts_instead_of_hanging() {
    let params = WattsStrogatzParams::new(5, 4, 1.0);
    let mut rng = RngHandle::from_seed(9);
    match watts_strogatz_with(&params, &mut rng) {
        Err(WsError::RewireExhausted(info)) => {
            assert_eq!(info.code, "no-free-target");
            assert_eq!(info.context.get("node"), Some(&"0".to_string()));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn minimum_ring_without_rewiring_completes() {
    let params = WattsStrogatzParams::new(5, 4, 0.0);
    let mut rng = RngHandle::from_seed(9);
    let (graph, report) = watts_strogatz_with(&params, &mut rng).unwrap();
    assert_eq!(graph, build_ring_lattice(&params).unwrap());
    assert_eq!(report.rewired_slots, 0);
}

#[test]
fn one_free_target_is_always_found() {
    // N = k + 2 leaves exactly one acceptable target per slot.
    let params = WattsStrogatzParams::new(6, 4, 1.0);
    for seed in 0..50u64 {
        let mut rng = RngHandle::from_seed(seed);
        let (graph, _) = watts_strogatz_with(&params, &mut rng).unwrap();
        assert_rows_valid(&graph);
    }
}

#[test]
fn zero_degree_rewiring_is_a_no_op() {
    let params = WattsStrogatzParams::new(9, 0, 1.0);
    let mut rng = RngHandle::from_seed(1);
    let (graph, report) = watts_strogatz_with(&params, &mut rng).unwrap();
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(report.rewired_slots, 0);
}

#[test]
fn shape_mismatch_is_rejected() {
    let mut graph = build_ring_lattice(&WattsStrogatzParams::new(10, 4, 0.0)).unwrap();
    let mut rng = RngHandle::from_seed(1);
    let err = rewire_in_place(&mut graph, &WattsStrogatzParams::new(10, 2, 0.5), &mut rng)
        .unwrap_err();
    assert_eq!(err.info().code, "shape-mismatch");
}

#[test]
fn invalid_probability_is_rejected_before_mutation() {
    let params = WattsStrogatzParams::new(10, 4, 0.0);
    let lattice = build_ring_lattice(&params).unwrap();
    let mut graph = lattice.clone();
    let mut rng = RngHandle::from_seed(1);
    let bad = WattsStrogatzParams::new(10, 4, 1.5);
    let err = rewire_in_place(&mut graph, &bad, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "probability-out-of-range");
    assert_eq!(graph, lattice);
}

#[test]
fn substream_rows_are_valid() {
    let params = WattsStrogatzParams::new(64, 6, 0.4);
    for seed in 0..20u64 {
        let mut graph = build_ring_lattice(&params).unwrap();
        rewire_in_place_substreams(&mut graph, &params, seed).unwrap();
        assert_rows_valid(&graph);
    }
}
