use crate::graph::AdjacencyMatrix;
use crate::index::VertexIndex;
use std::collections::HashMap;

/// Per-URL importance scores, one reduction group's output.
pub type RankMap = HashMap<String, f64>;

/// Single forward propagation pass over vertices in index order.
///
/// Every rank starts at 1.0. Vertex i with out-degree d > 0 hands
/// rank[i] / d to each of its targets. A target with a higher index is
/// processed later and propagates its already-updated value onward - the
/// result depends on index assignment on purpose. This is not an
/// iterative PageRank: no damping factor, no convergence loop.
pub fn propagate(matrix: &AdjacencyMatrix, index: &VertexIndex) -> RankMap {
    let v = matrix.size();
    let mut ranks = vec![1.0f64; v];

    for source in 0..v {
        let out_degree = matrix.out_degree(source);
        if out_degree == 0 {
            continue;
        }
        let share = ranks[source] / out_degree as f64;
        for target in 0..v {
            if matrix.get(source, target) {
                ranks[target] += share;
            }
        }
    }

    index
        .urls()
        .iter()
        .enumerate()
        .map(|(i, url)| (url.clone(), ranks[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_adjacency;
    use crate::liveness::{LivenessCache, Prober};
    use async_trait::async_trait;
    use linkrank_ingest::LinkRecord;
    use std::sync::Arc;

    struct AlwaysLive;

    #[async_trait]
    impl Prober for AlwaysLive {
        async fn probe(&self, _url: &str) -> bool {
            true
        }
    }

    async fn indexed(records: &[LinkRecord]) -> (AdjacencyMatrix, VertexIndex) {
        let cache = LivenessCache::new(Arc::new(AlwaysLive));
        let index = VertexIndex::build(records, &cache).await;
        let matrix = build_adjacency(records, &index);
        (matrix, index)
    }

    #[tokio::test]
    async fn test_empty_graph() {
        let (matrix, index) = indexed(&[]).await;
        assert!(propagate(&matrix, &index).is_empty());
    }

    #[tokio::test]
    async fn test_no_edges_all_ranks_one() {
        // Indexed vertices with every edge filtered away keep 1.0 each.
        let records = vec![LinkRecord::new(
            "http://a.example/".to_string(),
            vec!["http://b.example/".to_string()],
        )];
        let cache = LivenessCache::new(Arc::new(AlwaysLive));
        let index = VertexIndex::build(&records, &cache).await;
        let matrix = AdjacencyMatrix::new(index.len());

        let ranks = propagate(&matrix, &index);
        assert_eq!(ranks["http://a.example/"], 1.0);
        assert_eq!(ranks["http://b.example/"], 1.0);
    }

    #[tokio::test]
    async fn test_single_edge() {
        let records = vec![LinkRecord::new(
            "http://a.example/".to_string(),
            vec!["http://b.example/".to_string()],
        )];
        let (matrix, index) = indexed(&records).await;

        let ranks = propagate(&matrix, &index);
        assert_eq!(ranks["http://a.example/"], 1.0);
        assert_eq!(ranks["http://b.example/"], 2.0);
    }

    #[tokio::test]
    async fn test_updated_values_flow_forward() {
        // 0 -> 1 -> 2: vertex 1 is processed after receiving vertex 0's
        // full rank, so vertex 2 sees 2.0, not 1.0.
        let records = vec![
            LinkRecord::new(
                "http://a.example/".to_string(),
                vec!["http://b.example/".to_string()],
            ),
            LinkRecord::new(
                "http://b.example/".to_string(),
                vec!["http://c.example/".to_string()],
            ),
        ];
        let (matrix, index) = indexed(&records).await;

        let ranks = propagate(&matrix, &index);
        assert_eq!(ranks["http://a.example/"], 1.0);
        assert_eq!(ranks["http://b.example/"], 2.0);
        assert_eq!(ranks["http://c.example/"], 3.0);
    }

    #[tokio::test]
    async fn test_share_split_across_targets() {
        let records = vec![LinkRecord::new(
            "http://a.example/".to_string(),
            vec![
                "http://b.example/".to_string(),
                "http://c.example/".to_string(),
            ],
        )];
        let (matrix, index) = indexed(&records).await;

        let ranks = propagate(&matrix, &index);
        assert_eq!(ranks["http://a.example/"], 1.0);
        assert_eq!(ranks["http://b.example/"], 1.5);
        assert_eq!(ranks["http://c.example/"], 1.5);
    }
}
