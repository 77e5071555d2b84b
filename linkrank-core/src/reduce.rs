use crate::cycles::strip_cycles;
use crate::graph::build_adjacency;
use crate::index::VertexIndex;
use crate::liveness::LivenessCache;
use crate::rank::{RankMap, propagate};
use linkrank_ingest::LinkRecord;
use tracing::info;

/// What one reduction group emits: its rank map plus enough bookkeeping
/// for the job summary.
#[derive(Debug, Clone)]
pub struct GroupOutput {
    pub key: String,
    pub ranks: RankMap,
    pub vertices: usize,
    pub edges_removed: usize,
}

/// Processes one reduction group end to end: index the live URLs, build
/// the adjacency matrix, strip the loop-closing edges a walk from vertex
/// 0 finds, propagate ranks, and map the result back to URLs.
///
/// Runs to completion on one logical worker; the only awaits are the
/// liveness probes. No state survives into the next group except the
/// shared cache.
pub async fn reduce(key: &str, records: &[LinkRecord], liveness: &LivenessCache) -> GroupOutput {
    let index = VertexIndex::build(records, liveness).await;
    let mut matrix = build_adjacency(records, &index);
    let removed = strip_cycles(&mut matrix);
    let ranks = propagate(&matrix, &index);

    info!(
        "Group '{}': {} records, {} vertices, {} edges removed, {} URLs ranked",
        key,
        records.len(),
        index.len(),
        removed.len(),
        ranks.len()
    );

    GroupOutput {
        key: key.to_string(),
        ranks,
        vertices: index.len(),
        edges_removed: removed.len(),
    }
}
