use sha2::{Digest, Sha256};

use crate::adjacency::AdjacencyStructure;

const DOMAIN_TAG: &[u8] = b"ws-adjacency:v1";

/// Computes the canonical structural hash for the provided structure.
///
/// Rows are hashed in node order and slots in slot order, so two structures
/// hash equal only if they are slot-for-slot identical.
pub fn canonical_hash(graph: &AdjacencyStructure) -> String {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_TAG);
    hasher.update((graph.node_count() as u64).to_le_bytes());
    hasher.update((graph.degree() as u64).to_le_bytes());
    for (_, row) in graph.rows() {
        for target in row {
            hasher.update(target.as_raw().to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}
